use std::env;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// All artifact locations come from env vars; the .env file is loaded
/// automatically at startup via dotenvy.
pub struct Config {
    /// Path to the raw data artifact (STRATA_RAW)
    pub raw_path: String,
    /// Path to the clean data artifact (STRATA_CLEAN)
    pub clean_path: String,
    /// Path to the projection artifact (STRATA_PROJECTION)
    pub projection_path: String,
    /// Path to the fitted mapper artifact (STRATA_MAPPER)
    pub mapper_path: String,
    /// Optional path to precomputed global column statistics
    /// (STRATA_STATS). When unset, stats are computed from the clean
    /// table instead.
    pub stats_path: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Nothing is required at load time — each command validates the
    /// paths it actually needs via the `require_*` helpers.
    pub fn load() -> Result<Self> {
        Ok(Self {
            raw_path: env::var("STRATA_RAW").unwrap_or_default(),
            clean_path: env::var("STRATA_CLEAN").unwrap_or_default(),
            projection_path: env::var("STRATA_PROJECTION").unwrap_or_default(),
            mapper_path: env::var("STRATA_MAPPER").unwrap_or_default(),
            stats_path: env::var("STRATA_STATS").ok(),
        })
    }

    /// Check that the three data artifact paths are configured.
    /// Call this before any operation that touches the tables.
    pub fn require_data(&self) -> Result<()> {
        for (var, value) in [
            ("STRATA_RAW", &self.raw_path),
            ("STRATA_CLEAN", &self.clean_path),
            ("STRATA_PROJECTION", &self.projection_path),
        ] {
            if value.is_empty() {
                anyhow::bail!(
                    "{var} not set. Add it to your .env file.\n\
                     See .env.example for the required variables."
                );
            }
        }
        Ok(())
    }

    /// Check that the mapper artifact path is configured.
    /// Call this before any operation that needs the fitted complex.
    pub fn require_mapper(&self) -> Result<()> {
        if self.mapper_path.is_empty() {
            anyhow::bail!(
                "STRATA_MAPPER not set. Point it at a fitted mapper artifact.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }
}
