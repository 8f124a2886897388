// Clustering — the fitted complex's node/component arena and the
// derivation of item labelings from it.

pub mod complex;
pub mod engine;
