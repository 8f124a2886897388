// Unit tests for the clustering derivation.
//
// Covers the labeling invariants: size conservation, idempotent
// rebuilds, the overwrite-on-conflict policy, and the overlap report
// that exposes what that policy masks.

use strata::cluster::complex::{Complex, ComponentRecord, NodeRecord};
use strata::cluster::engine::{ClusteringResult, UNCLUSTERED};
use strata::error::Error;

fn node(id: &str, items: &[usize]) -> NodeRecord {
    NodeRecord {
        id: id.to_string(),
        items: items.to_vec(),
    }
}

fn component(component_id: usize, cluster_id: i64, node_ids: &[&str]) -> ComponentRecord {
    ComponentRecord {
        component_id,
        cluster_id,
        node_ids: node_ids.iter().map(|s| s.to_string()).collect(),
        edges: vec![],
    }
}

// ============================================================
// Concrete scenario: {A:{0,1}, B:{1,2}}, one component
// ============================================================

#[test]
fn one_component_with_overlapping_nodes() {
    let complex = Complex {
        nodes: vec![node("A", &[0, 1]), node("B", &[1, 2])],
    };
    let components = vec![component(0, 0, &["A", "B"])];

    let result = ClusteringResult::build(&complex, &components, 3).unwrap();

    assert_eq!(result.labels(), &[0, 0, 0]);
    assert_eq!(result.sizes()[&0], 3);
    assert_eq!(result.sizes()[&UNCLUSTERED], 0);

    // Node-level membership shows item 1 in both A and B
    assert_eq!(result.node_memberships()[1], vec!["A", "B"]);

    // Both nodes map to the same cluster, so the cluster-level overlap
    // report is empty
    assert!(result.items_in_multiple_groups().is_empty());
}

// ============================================================
// Unclustered items
// ============================================================

#[test]
fn item_in_zero_nodes_goes_to_minus_one() {
    let complex = Complex {
        nodes: vec![node("A", &[0, 1]), node("B", &[2, 3])],
    };
    let components = vec![component(0, 0, &["A", "B"])];

    // Items 4 and 5 are covered by no node
    let result = ClusteringResult::build(&complex, &components, 6).unwrap();

    assert!(result.node_memberships()[5].is_empty());
    assert_eq!(result.labels()[5], UNCLUSTERED);
    assert_eq!(result.unclustered(), &[4, 5]);
    assert_eq!(result.members_of(UNCLUSTERED).unwrap(), &[4, 5]);
    assert_eq!(result.sizes()[&UNCLUSTERED], 2);
}

#[test]
fn cluster_sizes_sum_to_item_count() {
    let complex = Complex {
        nodes: vec![node("A", &[0, 1]), node("B", &[2]), node("C", &[3, 4])],
    };
    let components = vec![
        component(0, 0, &["A"]),
        component(1, 1, &["B"]),
        component(2, 2, &["C"]),
    ];

    let n = 7; // items 5 and 6 unclustered
    let result = ClusteringResult::build(&complex, &components, n).unwrap();

    let total: usize = result.sizes().values().sum();
    assert_eq!(total, n);
}

// ============================================================
// Idempotence
// ============================================================

#[test]
fn rebuild_from_same_complex_is_identical() {
    let complex = Complex {
        nodes: vec![node("A", &[0, 1, 2]), node("B", &[2, 3])],
    };
    let components = vec![component(0, 0, &["A", "B"])];

    let first = ClusteringResult::build(&complex, &components, 5).unwrap();
    let second = ClusteringResult::build(&complex, &components, 5).unwrap();

    assert_eq!(first, second);
}

// ============================================================
// Overwrite-on-conflict across components
// ============================================================

#[test]
fn item_spanning_two_components_gets_last_processed_label() {
    // Item 1 sits in nodes belonging to two different components — a
    // data anomaly the overwrite policy resolves in favor of the
    // last-processed component.
    let complex = Complex {
        nodes: vec![node("A", &[0, 1]), node("B", &[1, 2])],
    };
    let components = vec![component(0, 0, &["A"]), component(1, 1, &["B"])];

    let result = ClusteringResult::build(&complex, &components, 3).unwrap();
    assert_eq!(result.labels(), &[0, 1, 1]);

    // The pre-overwrite lists still show item 1 in both clusters
    let overlaps = result.items_in_multiple_groups();
    assert_eq!(overlaps.len(), 1);
    assert_eq!(overlaps[&1], vec![0, 1]);
}

#[test]
fn component_order_decides_the_winning_label() {
    let complex = Complex {
        nodes: vec![node("A", &[0, 1]), node("B", &[1, 2])],
    };
    let reversed = vec![component(1, 1, &["B"]), component(0, 0, &["A"])];

    let result = ClusteringResult::build(&complex, &reversed, 3).unwrap();
    assert_eq!(result.labels()[1], 0);
}

#[test]
fn overlap_report_empty_without_cross_component_sharing() {
    let complex = Complex {
        nodes: vec![node("A", &[0, 1]), node("B", &[2, 3])],
    };
    let components = vec![component(0, 0, &["A"]), component(1, 1, &["B"])];

    let result = ClusteringResult::build(&complex, &components, 4).unwrap();
    assert!(result.items_in_multiple_groups().is_empty());
}

// ============================================================
// Preconditions
// ============================================================

#[test]
fn empty_complex_fails_precondition() {
    let err = ClusteringResult::build(&Complex::default(), &[], 10).unwrap_err();
    assert!(matches!(err, Error::Precondition(_)));
    assert!(err.to_string().contains("fitted complex"));
}

#[test]
fn member_lists_keep_component_order_with_unclustered_last() {
    let complex = Complex {
        nodes: vec![node("A", &[0]), node("B", &[1])],
    };
    let components = vec![component(0, 4, &["A"]), component(1, 2, &["B"])];

    let result = ClusteringResult::build(&complex, &components, 3).unwrap();
    let order: Vec<i64> = result.members().iter().map(|(id, _)| *id).collect();
    assert_eq!(order, vec![4, 2, UNCLUSTERED]);
}
