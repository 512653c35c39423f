//! Command-line interface components.

use crate::config::{CompressionAlgorithm, OutputFormat, SplitterConfig};
use crate::constants::{DEFAULT_AGGREGATE_PATTERN, DEFAULT_COMPRESSION, DEFAULT_SPLIT_PATTERN};
use crate::error::SplitterError;
use crate::processor::{Aggregation, BatchSplitter, split_file};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "scan-splitter")]
#[command(about = "Split composite body-scan exports into anthro and landmark tables")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only show errors; hides progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Number of files processed concurrently (defaults to the CPU count)
    #[arg(short = 'j', long, global = true)]
    pub workers: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split one composite scan file into its anthro and landmark components
    Single {
        /// Composite scan file
        #[arg(value_name = "SCAN_FILE")]
        scan_file: PathBuf,
    },

    /// Split every composite scan in a directory
    Batch {
        /// Directory of composite scans
        #[arg(value_name = "SCAN_DIR")]
        scan_dir: PathBuf,

        /// File name pattern selecting composite scans
        #[arg(long, default_value = DEFAULT_SPLIT_PATTERN)]
        pattern: String,

        /// Search subdirectories too
        #[arg(short, long)]
        recurse: bool,
    },

    /// Aggregate split anthro files into one table
    Aggregate {
        #[command(flatten)]
        options: AggregateOptions,
    },

    /// Split a scan directory, then aggregate the results
    Run {
        /// Directory of composite scans
        #[arg(value_name = "SCAN_DIR")]
        scan_dir: PathBuf,

        /// Search subdirectories too
        #[arg(short, long)]
        recurse: bool,

        /// Reference table whose first column lists the canonical measurement names
        #[arg(long, value_name = "FILE")]
        names: Option<PathBuf>,

        /// Location code for subjects whose file name carries none
        #[arg(long, default_value = "")]
        location_fill: String,
    },
}

#[derive(clap::Args, Debug)]
pub struct AggregateOptions {
    /// Directory of split anthro files
    #[arg(value_name = "ANTHRO_DIR")]
    pub anthro_dir: PathBuf,

    /// Reference table whose first column lists the canonical measurement names
    #[arg(long, value_name = "FILE")]
    pub names: Option<PathBuf>,

    /// Location code for subjects whose file name carries none
    #[arg(long, default_value = "")]
    pub location_fill: String,

    /// File name pattern selecting anthro files
    #[arg(long, default_value = DEFAULT_AGGREGATE_PATTERN)]
    pub pattern: String,

    /// Search subdirectories too
    #[arg(short, long)]
    pub recurse: bool,

    /// Output file (defaults to ANTHRO_DIR/aggregate_anthro.<format>)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = DEFAULT_COMPRESSION)]
    pub compression: String,
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Base configuration shared by all commands
    pub fn base_config(&self) -> SplitterConfig {
        let defaults = SplitterConfig::default();
        SplitterConfig {
            workers: self.workers.unwrap_or(defaults.workers),
            show_progress: !self.quiet,
            ..defaults
        }
    }
}

impl AggregateOptions {
    fn config(&self, base: SplitterConfig) -> std::result::Result<SplitterConfig, SplitterError> {
        Ok(SplitterConfig {
            aggregate_pattern: self.pattern.clone(),
            recurse: self.recurse,
            default_location: self.location_fill.clone(),
            output_format: self.format,
            compression_algorithm: self.compression.parse::<CompressionAlgorithm>()?,
            ..base
        })
    }
}

/// Set up structured logging based on CLI arguments
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scan_splitter={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Run the selected command
pub async fn run(args: Args) -> Result<()> {
    setup_logging(&args);
    debug!("Command line arguments: {:?}", args);

    let base = args.base_config();
    let Some(command) = args.command else {
        return Ok(());
    };

    match command {
        Commands::Single { scan_file } => {
            let outputs = split_file(&scan_file)
                .with_context(|| format!("Failed to split {}", scan_file.display()))?;
            println!(
                "{} {} anthro rows -> {}",
                "Wrote".bright_green(),
                outputs.anthro_rows,
                outputs.anthro_path.display()
            );
            println!(
                "{} {} landmark rows -> {}",
                "Wrote".bright_green(),
                outputs.landmark_rows,
                outputs.landmark_path.display()
            );
        }
        Commands::Batch {
            scan_dir,
            pattern,
            recurse,
        } => {
            let config = SplitterConfig {
                split_pattern: pattern,
                recurse,
                ..base
            };
            BatchSplitter::new(&scan_dir, config)?.run().await?;
        }
        Commands::Aggregate { options } => {
            let config = options.config(base)?;
            Aggregation::new(
                &options.anthro_dir,
                options.names.clone(),
                options.output.clone(),
                config,
            )?
            .run()
            .await
            .context("Aggregation failed, no table was written")?;
        }
        Commands::Run {
            scan_dir,
            recurse,
            names,
            location_fill,
        } => {
            let config = SplitterConfig {
                recurse,
                default_location: location_fill,
                ..base
            };
            let split_stats = BatchSplitter::new(&scan_dir, config.clone())?.run().await?;
            info!("Split {} scans, aggregating", split_stats.files_processed);
            println!();
            Aggregation::new(&scan_dir, names, None, config)?
                .run()
                .await
                .context("Aggregation failed, no table was written")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_flags() {
        let args = Args::parse_from(["scan-splitter", "-vv", "batch", "."]);
        assert_eq!(args.get_log_level(), "debug");

        let args = Args::parse_from(["scan-splitter", "batch", ".", "--quiet"]);
        assert_eq!(args.get_log_level(), "error");
        assert!(!args.base_config().show_progress);
    }

    #[test]
    fn test_aggregate_options() {
        let args = Args::parse_from([
            "scan-splitter",
            "-j",
            "3",
            "aggregate",
            "anthro",
            "--location-fill",
            "FOO",
            "--format",
            "parquet",
            "--compression",
            "zstd",
        ]);
        let base = args.base_config();
        assert_eq!(base.workers, 3);

        match args.command {
            Some(Commands::Aggregate { options }) => {
                let config = options.config(base).unwrap();
                assert_eq!(config.default_location, "FOO");
                assert_eq!(config.output_format, OutputFormat::Parquet);
                assert_eq!(config.compression_algorithm, CompressionAlgorithm::Zstd);
                assert_eq!(config.aggregate_pattern, "*_composite.anthro.csv");
            }
            other => panic!("Expected aggregate command, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_compression_rejected() {
        let args = Args::parse_from([
            "scan-splitter",
            "aggregate",
            "anthro",
            "--compression",
            "brotli",
        ]);
        match args.command {
            Some(Commands::Aggregate { options }) => {
                assert!(options.config(SplitterConfig::default()).is_err());
            }
            other => panic!("Expected aggregate command, got {other:?}"),
        }
    }
}
