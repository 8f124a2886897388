// Strata: explainable clustering over a fitted Mapper complex.
//
// This is the library root. Each module corresponds to a stage of the
// pipeline: load persisted artifacts, derive item labelings from the
// complex, describe the resulting groups, find their identifying
// columns, and match new records to the nearest group.

pub mod cluster;
pub mod config;
pub mod data;
pub mod describe;
pub mod error;
pub mod identify;
pub mod matching;
pub mod output;
pub mod stats;
