// The fitted Mapper complex as persisted: an arena of cover nodes plus
// explicit connected-component records.
//
// Components are plain records ({component_id, cluster_id, node_ids,
// edges}) rather than graph objects used as map keys — component
// identity is an integer index, never object identity. The complex is
// immutable once loaded; this core never mutates it.

use serde::{Deserialize, Serialize};

/// One cover element: a node id and the item indices it covers.
/// Multiple nodes may share items (overlap).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub items: Vec<usize>,
}

/// The totality of nodes, in artifact order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Complex {
    pub nodes: Vec<NodeRecord>,
}

impl Complex {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Item set of a node, if the id exists.
    pub fn items(&self, node_id: &str) -> Option<&[usize]> {
        self.nodes
            .iter()
            .find(|n| n.id == node_id)
            .map(|n| n.items.as_slice())
    }
}

/// One connected component of the node-adjacency graph, with the
/// cluster id the external fitting process assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub component_id: usize,
    pub cluster_id: i64,
    pub node_ids: Vec<String>,
    #[serde(default)]
    pub edges: Vec<(String, String)>,
}

/// The full node-adjacency graph. Opaque to the labeling derivation
/// (components are precomputed), carried for downstream consumers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<String>,
    #[serde(default)]
    pub edges: Vec<(String, String)>,
}
