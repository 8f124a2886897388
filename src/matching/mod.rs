// Target matching — assign a new, unseen record to the nearest
// existing cluster.
//
// Each cluster is scored by the sum of relative errors
// |x - mu| / mu between the record's numeric fields and the cluster's
// raw column means. A zero column mean makes the ratio undefined; the
// cluster becomes Unranked (disqualified, never a crash) instead of
// carrying a floating-point infinity through the comparison.

use std::cmp::Ordering;

use serde::Deserialize;
use tracing::info;

use crate::cluster::engine::{ClusteringResult, UNCLUSTERED};
use crate::data::table::Table;
use crate::error::{Error, Result};

/// A new record to match: a flat map of column name to JSON value.
/// Only numeric, non-null fields participate in scoring.
#[derive(Debug, Clone, Deserialize)]
pub struct Record(pub serde_json::Map<String, serde_json::Value>);

impl Record {
    /// The record's numeric, non-missing fields.
    pub fn numeric_fields(&self) -> Vec<(&str, f64)> {
        self.0
            .iter()
            .filter_map(|(name, value)| value.as_f64().map(|v| (name.as_str(), v)))
            .collect()
    }
}

/// A cluster's aggregated deviation from the target record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchScore {
    Finite(f64),
    /// At least one compared column had a zero mean in this cluster;
    /// the relative error is undefined and the cluster ranks last.
    Unranked,
}

impl MatchScore {
    /// Ordering for min-selection: finite scores by value, Unranked
    /// after every finite score. Equal scores compare Equal, so the
    /// first-encountered cluster wins a tie.
    pub fn cmp_for_min(&self, other: &MatchScore) -> Ordering {
        match (self, other) {
            (MatchScore::Finite(a), MatchScore::Finite(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (MatchScore::Finite(_), MatchScore::Unranked) => Ordering::Less,
            (MatchScore::Unranked, MatchScore::Finite(_)) => Ordering::Greater,
            (MatchScore::Unranked, MatchScore::Unranked) => Ordering::Equal,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// Drop the unclustered group from consideration when it is
    /// non-empty (on by default).
    pub remove_unclustered: bool,
    /// Restrict comparison to these columns, when given.
    pub column_filter: Option<Vec<String>>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            remove_unclustered: true,
            column_filter: None,
        }
    }
}

/// The full score mapping plus the winning cluster.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// (cluster id, score) in cluster grouping order.
    pub scores: Vec<(i64, MatchScore)>,
    pub best: i64,
}

/// Score every cluster against the target record and pick the minimum.
///
/// Comparison columns are the record's numeric non-missing fields,
/// intersected with the optional column filter and with the raw
/// table's numeric columns. Ties break to the first-encountered
/// cluster; fails with a precondition error when no clusters remain.
pub fn target_matching(
    raw: &Table,
    result: &ClusteringResult,
    target: &Record,
    options: &MatchOptions,
) -> Result<MatchOutcome> {
    let comparison: Vec<(&str, f64)> = target
        .numeric_fields()
        .into_iter()
        .filter(|(name, _)| match &options.column_filter {
            Some(filter) => filter.iter().any(|f| f.as_str() == *name),
            None => true,
        })
        .filter(|(name, _)| raw.numeric(name).is_some())
        .collect();

    let drop_unclustered = options.remove_unclustered && !result.unclustered().is_empty();

    let mut scores: Vec<(i64, MatchScore)> = Vec::new();
    for (cluster_id, items) in result.members() {
        if drop_unclustered && *cluster_id == UNCLUSTERED {
            continue;
        }

        let mut total = 0.0;
        let mut unranked = false;
        for &(name, x) in &comparison {
            // Columns with no present values in this cluster contribute
            // nothing.
            let Some(mu) = raw.masked_mean(name, items) else {
                continue;
            };
            if mu == 0.0 {
                unranked = true;
                break;
            }
            total += ((x - mu) / mu).abs();
        }

        let score = if unranked {
            MatchScore::Unranked
        } else {
            MatchScore::Finite(total)
        };
        scores.push((*cluster_id, score));
    }

    // min_by would keep the LAST of equal minima; scan manually so the
    // first-encountered cluster wins ties.
    let mut best: Option<(i64, MatchScore)> = None;
    for &(id, score) in &scores {
        let better = match best {
            Some((_, current)) => score.cmp_for_min(&current) == Ordering::Less,
            None => true,
        };
        if better {
            best = Some((id, score));
        }
    }
    let best = best
        .map(|(id, _)| id)
        .ok_or_else(|| Error::Precondition("no clusters to match against".to_string()))?;

    info!(
        clusters = scores.len(),
        columns = comparison.len(),
        best,
        "Matched target record"
    );

    Ok(MatchOutcome { scores, best })
}
