// Node and cluster descriptions.
//
// Each node gets the identity column chosen by minimal-std selection
// plus its item count. A cluster's description aggregates its nodes'
// identities into a density profile: the fraction of node-size-weighted
// mass attributed to each identity column. The denominator is the sum
// of node sizes, NOT the deduplicated item count — overlapping nodes
// inflate it, an accepted approximation of the density semantics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cluster::complex::{Complex, ComponentRecord};
use crate::cluster::engine::{ClusteringResult, UNCLUSTERED};
use crate::data::table::Table;
use crate::describe::minimal_std::minimal_std_column;
use crate::error::{Error, Result};
use crate::stats;

/// A node's identity column and item count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub label: String,
    pub size: usize,
}

/// A cluster's density profile over identity columns, plus its
/// (deduplicated) member count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterDescription {
    /// (identity column, fraction) in first-seen node order; fractions
    /// are rounded to 2 decimals and sum to ~1.0 when nodes are disjoint.
    pub density: Vec<(String, f64)>,
    pub size: usize,
}

/// Describe every node: minimal-std column over the node's items, and
/// the node's item count.
pub fn node_descriptions(
    clean: &Table,
    complex: &Complex,
    density_cols: &[String],
) -> Result<BTreeMap<String, NodeDescription>> {
    let mut descriptions = BTreeMap::new();
    for node in &complex.nodes {
        let label = minimal_std_column(clean, &node.items, density_cols)?;
        debug!(node = %node.id, %label, size = node.items.len(), "Described node");
        descriptions.insert(
            node.id.clone(),
            NodeDescription {
                label,
                size: node.items.len(),
            },
        );
    }
    Ok(descriptions)
}

/// Describe every cluster, including the unclustered group.
///
/// Per component: accumulate node sizes under each node's identity
/// label, then divide by the total node-size mass. The unclustered
/// group gets a single full-weight entry from minimal-std selection
/// over the unclustered item mask.
pub fn cluster_descriptions(
    clean: &Table,
    components: &[ComponentRecord],
    result: &ClusteringResult,
    nodes: &BTreeMap<String, NodeDescription>,
    density_cols: &[String],
) -> Result<BTreeMap<i64, ClusterDescription>> {
    let mut descriptions = BTreeMap::new();

    for component in components {
        // First-seen label order, accumulating sizes of nodes that share
        // an identity column.
        let mut holder: Vec<(String, usize)> = Vec::new();
        let mut n_total = 0usize;

        for node_id in &component.node_ids {
            let description = nodes.get(node_id).ok_or_else(|| {
                Error::Precondition(format!(
                    "component {} references undescribed node {node_id}",
                    component.component_id
                ))
            })?;
            n_total += description.size;
            match holder.iter_mut().find(|(label, _)| *label == description.label) {
                Some(entry) => entry.1 += description.size,
                None => holder.push((description.label.clone(), description.size)),
            }
        }

        let density = holder
            .into_iter()
            .map(|(label, size)| (label, stats::round2(size as f64 / n_total as f64)))
            .collect();

        let size = result
            .sizes()
            .get(&component.cluster_id)
            .copied()
            .unwrap_or(0);
        descriptions.insert(component.cluster_id, ClusterDescription { density, size });
    }

    // The unclustered group has no nodes; its single identity column
    // comes straight from the unclustered item mask.
    let unclustered_label = minimal_std_column(clean, result.unclustered(), density_cols)?;
    descriptions.insert(
        UNCLUSTERED,
        ClusterDescription {
            density: vec![(unclustered_label, 1.0)],
            size: result.unclustered().len(),
        },
    );

    Ok(descriptions)
}
