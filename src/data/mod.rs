// Data layer — tabular model, persisted artifact shapes, and the
// lazily-loading container that owns the three row-aligned tables.

pub mod artifacts;
pub mod container;
pub mod table;
