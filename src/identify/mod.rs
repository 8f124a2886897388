// Group identification — which feature columns make a cluster what it is.
//
// A column identifies a cluster when the cluster's mean z-score against
// the global clean distribution deviates past a threshold while the
// column stays internally stable (low relative std within the cluster).
//
// Global per-column statistics are an explicit injected value
// (GlobalStats), never an implicit lookup. Zero standard deviation
// yields an infinite z-score sentinel, never a crash.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cluster::engine::UNCLUSTERED;
use crate::data::table::Table;
use crate::error::Result;
use crate::stats;

/// Per-column mean and std over the full cleaned dataset, computed by
/// external tooling (or `from_table` for convenience).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalStats {
    pub mean: HashMap<String, f64>,
    pub std: HashMap<String, f64>,
}

impl GlobalStats {
    /// Compute global statistics from a clean table (sample std, missing
    /// values skipped).
    pub fn from_table(clean: &Table) -> Self {
        let mut mean = HashMap::new();
        let mut std = HashMap::new();
        for name in clean.numeric_column_names() {
            let values: Vec<f64> = clean
                .numeric(name)
                .map(|col| col.iter().copied().flatten().collect())
                .unwrap_or_default();
            mean.insert(name.to_string(), stats::mean(&values));
            std.insert(name.to_string(), stats::sample_std(&values));
        }
        Self { mean, std }
    }

    /// Load precomputed statistics from a JSON artifact.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        crate::data::artifacts::load_json(path, "global stats")
    }
}

/// Per-item z-scores against the global distribution, tagged with each
/// item's cluster id.
#[derive(Debug, Clone)]
pub struct ZScoreFrame {
    /// Feature columns, in clean-schema order, restricted to columns
    /// with global statistics.
    pub columns: Vec<String>,
    /// One row per item: (cluster id, z-score per column).
    pub rows: Vec<(i64, Vec<f64>)>,
}

impl ZScoreFrame {
    /// z-score every item of every numeric clean column:
    /// `(value - global_mean) / global_std`, with `+inf` when the global
    /// std is zero.
    pub fn build(clean: &Table, labels: &[i64], global: &GlobalStats) -> Self {
        let columns: Vec<String> = clean
            .numeric_column_names()
            .into_iter()
            .filter(|name| global.mean.contains_key(*name) && global.std.contains_key(*name))
            .map(|name| name.to_string())
            .collect();

        let series: Vec<&[Option<f64>]> = columns
            .iter()
            .map(|name| clean.numeric(name).unwrap_or_default())
            .collect();

        let rows = labels
            .iter()
            .enumerate()
            .map(|(item, &cluster)| {
                let zs = columns
                    .iter()
                    .zip(&series)
                    .map(|(name, values)| {
                        let value = values.get(item).copied().flatten().unwrap_or(f64::NAN);
                        let mean = global.mean[name];
                        let std = global.std[name];
                        if std == 0.0 {
                            f64::INFINITY
                        } else {
                            (value - mean) / std
                        }
                    })
                    .collect();
                (cluster, zs)
            })
            .collect();

        Self { columns, rows }
    }

    /// Within-cluster z-score values of one column.
    fn cluster_column(&self, cluster_id: i64, column_index: usize) -> Vec<f64> {
        self.rows
            .iter()
            .filter(|(id, _)| *id == cluster_id)
            .map(|(_, zs)| zs[column_index])
            .collect()
    }
}

/// Per-cluster mean z-score for every feature column — one row per
/// cluster id, ascending.
#[derive(Debug, Clone)]
pub struct ZScoreTable {
    pub columns: Vec<String>,
    pub rows: Vec<(i64, Vec<f64>)>,
}

impl ZScoreTable {
    pub fn from_frame(frame: &ZScoreFrame) -> Self {
        let mut grouped: BTreeMap<i64, Vec<Vec<f64>>> = BTreeMap::new();
        for (cluster, zs) in &frame.rows {
            grouped
                .entry(*cluster)
                .or_default()
                .push(zs.clone());
        }

        let rows = grouped
            .into_iter()
            .map(|(cluster, rows)| {
                let means = (0..frame.columns.len())
                    .map(|c| {
                        let column: Vec<f64> = rows.iter().map(|r| r[c]).collect();
                        stats::mean(&column)
                    })
                    .collect();
                (cluster, means)
            })
            .collect();

        Self {
            columns: frame.columns.clone(),
            rows,
        }
    }
}

/// For each cluster, the columns whose mean z-score deviates at least
/// `zscore_threshold` while the within-cluster z-scores stay stable
/// (`|std/mean| <= std_threshold`, sample std). Clusters with fewer
/// than two members have no defined spread and get no identifiers.
/// Covers every cluster id from `-1` to the max observed; empty lists
/// are allowed.
pub fn group_identifiers(
    frame: &ZScoreFrame,
    table: &ZScoreTable,
    zscore_threshold: f64,
    std_threshold: f64,
) -> BTreeMap<i64, Vec<String>> {
    let max_cluster = table
        .rows
        .iter()
        .map(|(id, _)| *id)
        .max()
        .unwrap_or(UNCLUSTERED);

    let mut identifiers: BTreeMap<i64, Vec<String>> =
        (UNCLUSTERED..=max_cluster).map(|id| (id, Vec::new())).collect();

    for (cluster, means) in &table.rows {
        for (column_index, column) in table.columns.iter().enumerate() {
            if means[column_index].abs() < zscore_threshold {
                continue;
            }
            let within = frame.cluster_column(*cluster, column_index);
            // The spread of a single z-score is undefined (sample std
            // needs n >= 2), so a singleton cluster never passes the
            // stability test.
            if within.len() < 2 {
                continue;
            }
            let std = stats::sample_std(&within);
            let mean = stats::mean(&within);
            if (std / mean).abs() <= std_threshold {
                identifiers
                    .entry(*cluster)
                    .or_default()
                    .push(column.clone());
            }
        }
    }

    let identified = identifiers.values().filter(|v| !v.is_empty()).count();
    info!(
        clusters = identifiers.len(),
        with_identifiers = identified,
        "Computed group identifiers"
    );

    identifiers
}

/// Auxiliary scorer over raw column values: `0` (significant) when the
/// z-score magnitude exceeds `zscore_threshold` AND the population std
/// stays under `std_threshold`, else `1`.
///
/// Comparisons here are strict (`>` / `<`), unlike the inclusive
/// thresholds in `group_identifiers`; the asymmetry is kept as-is.
/// Zero std yields an infinite z-score rather than dividing by zero.
pub fn std_zscore_threshold_filter(
    values: &[f64],
    column: &str,
    global: &GlobalStats,
    std_threshold: f64,
    zscore_threshold: f64,
) -> u8 {
    let Some(&global_mean) = global.mean.get(column) else {
        return 1;
    };

    let std = stats::population_std(values);
    let zscore = if std == 0.0 {
        f64::INFINITY
    } else {
        (stats::mean(values) - global_mean) / std
    };

    if zscore.abs() > zscore_threshold && std < std_threshold {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(pairs: &[(&str, f64, f64)]) -> GlobalStats {
        GlobalStats {
            mean: pairs.iter().map(|(n, m, _)| (n.to_string(), *m)).collect(),
            std: pairs.iter().map(|(n, _, s)| (n.to_string(), *s)).collect(),
        }
    }

    #[test]
    fn test_filter_significant() {
        // Tight values far from the global mean: significant
        let g = global(&[("x", 0.0, 1.0)]);
        assert_eq!(std_zscore_threshold_filter(&[5.0, 5.1, 4.9], "x", &g, 1.0, 1.0), 0);
    }

    #[test]
    fn test_filter_high_variance_is_not_significant() {
        let g = global(&[("x", 0.0, 1.0)]);
        assert_eq!(std_zscore_threshold_filter(&[0.0, 10.0, -10.0], "x", &g, 1.0, 1.0), 1);
    }

    #[test]
    fn test_filter_zero_std_gives_infinite_zscore() {
        // std == 0: z is the +inf sentinel, and 0 < std_threshold holds
        let g = global(&[("x", 0.0, 1.0)]);
        assert_eq!(std_zscore_threshold_filter(&[3.0, 3.0, 3.0], "x", &g, 1.0, 1.0), 0);
    }

    #[test]
    fn test_filter_strict_threshold_boundary() {
        // |z| exactly equal to the threshold fails the strict `>`
        let g = global(&[("x", 0.0, 1.0)]);
        // values mean 1.0, population std 1.0 -> z = 1.0
        let values = [0.0, 2.0];
        assert_eq!(std_zscore_threshold_filter(&values, "x", &g, 2.0, 1.0), 1);
    }

    #[test]
    fn test_filter_unknown_column() {
        let g = global(&[]);
        assert_eq!(std_zscore_threshold_filter(&[1.0], "nope", &g, 1.0, 1.0), 1);
    }
}
