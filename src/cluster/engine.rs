// Item labeling derived from the fitted complex.
//
// Two-phase API: `ClusteringResult::build` computes every labeling once
// from the immutable complex and component records; everything after
// that is a pure read. There is no invalidation path — if the mapper
// artifact changes on disk, build a new result from a fresh load.
//
// Cluster labels use an overwrite-on-conflict policy: when an item's
// nodes span more than one component (a data anomaly under a strict
// partition), the last-processed component's cluster id wins.
// `items_in_multiple_groups` exposes the overlap that policy masks.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, info};

use crate::cluster::complex::{Complex, ComponentRecord};
use crate::error::{Error, Result};

/// The unclustered group: items belonging to zero nodes.
pub const UNCLUSTERED: i64 = -1;

/// Immutable item labelings derived from a fitted complex.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringResult {
    n_items: usize,
    /// Per item, the ids of every node containing it (empty = unclustered).
    node_memberships: Vec<Vec<String>>,
    /// Items contained in zero nodes, ascending.
    unclustered: Vec<usize>,
    /// Per item, the single cluster id (overwrite-on-conflict).
    labels: Vec<i64>,
    /// Per-cluster item lists BEFORE the overwrite policy collapses
    /// multi-membership, in component processing order; the unclustered
    /// group comes last. Lists are deduplicated within a cluster.
    members: Vec<(i64, Vec<usize>)>,
    /// Distinct member count per cluster, including the unclustered group.
    sizes: BTreeMap<i64, usize>,
}

impl ClusteringResult {
    /// Derive all labelings from the complex and its component records.
    ///
    /// `n_items` is the row count of the (row-aligned) data tables.
    /// Fails with a precondition error when the complex has no nodes.
    pub fn build(
        complex: &Complex,
        components: &[ComponentRecord],
        n_items: usize,
    ) -> Result<Self> {
        if complex.is_empty() {
            return Err(Error::Precondition(
                "a fitted complex with at least one node is required before clustering"
                    .to_string(),
            ));
        }

        // Inverted index: one pass over the complex instead of scanning
        // every node per item.
        let mut node_memberships: Vec<Vec<String>> = vec![Vec::new(); n_items];
        for node in &complex.nodes {
            for &item in &node.items {
                if item >= n_items {
                    return Err(Error::Precondition(format!(
                        "node {} covers item {item}, outside the {n_items}-row index space",
                        node.id
                    )));
                }
                node_memberships[item].push(node.id.clone());
            }
        }

        let unclustered: Vec<usize> = node_memberships
            .iter()
            .enumerate()
            .filter(|(_, nodes)| nodes.is_empty())
            .map(|(i, _)| i)
            .collect();

        let mut labels = vec![UNCLUSTERED; n_items];
        let mut members: Vec<(i64, Vec<usize>)> = Vec::with_capacity(components.len() + 1);
        let mut sizes = BTreeMap::new();

        for component in components {
            // Union of the component's node item sets, deduplicated.
            let mut indices = BTreeSet::new();
            for node_id in &component.node_ids {
                let items = complex.items(node_id).ok_or_else(|| {
                    Error::Precondition(format!(
                        "component {} references unknown node {node_id}",
                        component.component_id
                    ))
                })?;
                indices.extend(items.iter().copied());
            }

            let indices: Vec<usize> = indices.into_iter().collect();
            for &item in &indices {
                labels[item] = component.cluster_id;
            }
            sizes.insert(component.cluster_id, indices.len());

            // A repeated cluster id keeps its original position but takes
            // the later component's membership, matching the overwrite
            // policy on labels.
            match members
                .iter_mut()
                .find(|(id, _)| *id == component.cluster_id)
            {
                Some(entry) => entry.1 = indices,
                None => members.push((component.cluster_id, indices)),
            }

            debug!(
                component = component.component_id,
                cluster = component.cluster_id,
                nodes = component.node_ids.len(),
                "Labeled component"
            );
        }

        sizes.insert(UNCLUSTERED, unclustered.len());
        members.push((UNCLUSTERED, unclustered.clone()));

        info!(
            items = n_items,
            clusters = members.len() - 1,
            unclustered = unclustered.len(),
            "Clustering derived"
        );

        Ok(Self {
            n_items,
            node_memberships,
            unclustered,
            labels,
            members,
            sizes,
        })
    }

    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// The node ids containing each item (empty = unclustered).
    pub fn node_memberships(&self) -> &[Vec<String>] {
        &self.node_memberships
    }

    /// Items contained in zero nodes.
    pub fn unclustered(&self) -> &[usize] {
        &self.unclustered
    }

    /// Single-valued cluster label per item (`-1` = unclustered).
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Pre-overwrite per-cluster item lists, in component processing
    /// order with the unclustered group last.
    pub fn members(&self) -> &[(i64, Vec<usize>)] {
        &self.members
    }

    /// Item list of one cluster.
    pub fn members_of(&self, cluster_id: i64) -> Option<&[usize]> {
        self.members
            .iter()
            .find(|(id, _)| *id == cluster_id)
            .map(|(_, items)| items.as_slice())
    }

    /// Distinct member count per cluster, including the unclustered group.
    pub fn sizes(&self) -> &BTreeMap<i64, usize> {
        &self.sizes
    }

    /// Items appearing in more than one per-cluster list, with the
    /// clusters they appear in. Uses the pre-overwrite lists, so overlap
    /// hidden by the single-valued labels is visible here. Empty iff no
    /// item's nodes span more than one connected component.
    pub fn items_in_multiple_groups(&self) -> BTreeMap<usize, Vec<i64>> {
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for (_, items) in &self.members {
            for &item in items {
                *counts.entry(item).or_insert(0) += 1;
            }
        }

        let mut overlapping = BTreeMap::new();
        for (&item, &count) in &counts {
            if count > 1 {
                let clusters: Vec<i64> = self
                    .members
                    .iter()
                    .filter(|(_, items)| items.contains(&item))
                    .map(|(id, _)| *id)
                    .collect();
                overlapping.insert(item, clusters);
            }
        }
        overlapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::complex::NodeRecord;

    fn two_node_complex() -> Complex {
        Complex {
            nodes: vec![
                NodeRecord {
                    id: "a".to_string(),
                    items: vec![0, 1],
                },
                NodeRecord {
                    id: "b".to_string(),
                    items: vec![1, 2],
                },
            ],
        }
    }

    fn one_component() -> Vec<ComponentRecord> {
        vec![ComponentRecord {
            component_id: 0,
            cluster_id: 0,
            node_ids: vec!["a".to_string(), "b".to_string()],
            edges: vec![("a".to_string(), "b".to_string())],
        }]
    }

    #[test]
    fn test_empty_complex_is_a_precondition_error() {
        let err = ClusteringResult::build(&Complex::default(), &[], 3).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_overlapping_nodes_in_one_component() {
        let result = ClusteringResult::build(&two_node_complex(), &one_component(), 3).unwrap();
        assert_eq!(result.labels(), &[0, 0, 0]);
        assert_eq!(result.sizes()[&0], 3);
        assert_eq!(result.sizes()[&UNCLUSTERED], 0);
        // Item 1 sits in both nodes but only one cluster
        assert_eq!(result.node_memberships()[1], vec!["a", "b"]);
        assert!(result.items_in_multiple_groups().is_empty());
    }

    #[test]
    fn test_item_out_of_range_is_rejected() {
        let err = ClusteringResult::build(&two_node_complex(), &one_component(), 2).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_unknown_node_in_component() {
        let components = vec![ComponentRecord {
            component_id: 0,
            cluster_id: 0,
            node_ids: vec!["missing".to_string()],
            edges: vec![],
        }];
        let err = ClusteringResult::build(&two_node_complex(), &components, 3).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }
}
