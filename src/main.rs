use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use strata::cluster::engine::ClusteringResult;
use strata::config::Config;
use strata::data::artifacts::{self, MapperArtifact};
use strata::data::container::DataContainer;
use strata::describe;
use strata::identify::{self, GlobalStats, ZScoreFrame, ZScoreTable};
use strata::matching::{self, MatchOptions, Record};
use strata::output;

/// Strata: explainable clustering over a fitted Mapper complex.
///
/// Reads the persisted raw/clean/projection artifacts and a fitted
/// mapper, derives policy groups from the complex, and answers
/// questions about them: what describes each group, which columns
/// identify it, and which group a new record belongs to.
#[derive(Parser)]
#[command(name = "strata", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show artifact locations and basic shape information
    Status,

    /// Derive policy groups and print their density descriptions
    Groups,

    /// List items whose nodes span more than one group
    Overlaps,

    /// Find the statistically identifying columns of each group
    Identify {
        /// Minimum |mean z-score| for a column to count as deviating
        #[arg(long, default_value = "1.0")]
        zscore_threshold: f64,

        /// Maximum |std/mean| of within-group z-scores for stability
        #[arg(long, default_value = "1.0")]
        std_threshold: f64,
    },

    /// Match a new record (a JSON object) to its nearest group
    Match {
        /// Path to a JSON file holding the record
        target: String,

        /// Keep the unclustered group in consideration
        #[arg(long)]
        keep_unclustered: bool,

        /// Restrict comparison to these columns
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("strata=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Status => {
            let (container, mapper) = load_inputs(&config)?;
            let raw = container.raw()?;
            let clean = container.clean()?;
            let projection = container.projection()?;
            let hyper = container.projection_hyperparameters()?;

            println!("Raw:        {} ({} rows, {} columns)", config.raw_path, raw.n_rows(), raw.n_cols());
            println!("Clean:      {} ({} rows, {} columns, {} dropped)",
                config.clean_path,
                clean.n_rows(),
                clean.n_cols(),
                container.dropped_columns()?.len(),
            );
            // Report the array's actual row width, not the recorded
            // hyperparameter, in case the artifact disagrees with itself.
            let dims = projection.first().map(|r| r.len()).unwrap_or(0);
            println!("Projection: {} ({} rows x {} dims, n_neighbors={}, min_dist={})",
                config.projection_path,
                projection.len(),
                dims,
                hyper.n_neighbors,
                hyper.min_dist,
            );
            println!("Mapper:     {} ({} nodes, {} components)",
                config.mapper_path,
                mapper.mapper.complex.len(),
                mapper.mapper.components.len(),
            );
        }

        Commands::Groups => {
            let (container, mapper) = load_inputs(&config)?;
            let clean = container.clean()?;
            let raw = container.raw()?;

            let result = ClusteringResult::build(
                &mapper.mapper.complex,
                &mapper.mapper.components,
                clean.n_rows(),
            )?;

            let density_cols = describe::density_columns(raw, clean);
            let nodes = describe::node_descriptions(clean, &mapper.mapper.complex, &density_cols)?;
            let clusters = describe::cluster_descriptions(
                clean,
                &mapper.mapper.components,
                &result,
                &nodes,
                &density_cols,
            )?;

            output::display_groups(&clusters);
        }

        Commands::Overlaps => {
            let (container, mapper) = load_inputs(&config)?;
            let clean = container.clean()?;
            let result = ClusteringResult::build(
                &mapper.mapper.complex,
                &mapper.mapper.components,
                clean.n_rows(),
            )?;
            output::display_overlaps(&result.items_in_multiple_groups());
        }

        Commands::Identify {
            zscore_threshold,
            std_threshold,
        } => {
            let (container, mapper) = load_inputs(&config)?;
            let clean = container.clean()?;
            let result = ClusteringResult::build(
                &mapper.mapper.complex,
                &mapper.mapper.components,
                clean.n_rows(),
            )?;

            let global = match &config.stats_path {
                Some(path) => GlobalStats::load(Path::new(path))?,
                None => {
                    info!("STRATA_STATS not set, computing global stats from the clean table");
                    GlobalStats::from_table(clean)
                }
            };

            let frame = ZScoreFrame::build(clean, result.labels(), &global);
            let table = ZScoreTable::from_frame(&frame);
            let identifiers =
                identify::group_identifiers(&frame, &table, zscore_threshold, std_threshold);

            output::display_identifiers(&identifiers);
        }

        Commands::Match {
            target,
            keep_unclustered,
            columns,
        } => {
            let (container, mapper) = load_inputs(&config)?;
            let clean = container.clean()?;
            let raw = container.raw()?;
            let result = ClusteringResult::build(
                &mapper.mapper.complex,
                &mapper.mapper.components,
                clean.n_rows(),
            )?;

            let contents = fs::read_to_string(&target)
                .with_context(|| format!("could not read target record at {target}"))?;
            let record: Record = serde_json::from_str(&contents)
                .with_context(|| format!("target record at {target} is not a JSON object"))?;

            let options = MatchOptions {
                remove_unclustered: !keep_unclustered,
                column_filter: columns,
            };
            let outcome = matching::target_matching(raw, &result, &record, &options)?;

            output::display_match(&outcome);
        }
    }

    Ok(())
}

/// Validate configuration and open the data container + mapper artifact.
fn load_inputs(config: &Config) -> Result<(DataContainer, MapperArtifact)> {
    config.require_data()?;
    config.require_mapper()?;

    let container = DataContainer::new(
        &config.raw_path,
        &config.clean_path,
        &config.projection_path,
    )?;
    let mapper = artifacts::load_mapper(Path::new(&config.mapper_path))?;

    Ok((container, mapper))
}
