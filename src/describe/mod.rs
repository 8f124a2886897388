// Descriptions — per-node identity columns and per-group density
// profiles derived from them.

pub mod engine;
pub mod minimal_std;

pub use engine::{cluster_descriptions, node_descriptions, ClusterDescription, NodeDescription};
pub use minimal_std::{density_columns, minimal_std_column};
