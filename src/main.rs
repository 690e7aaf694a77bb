use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use criticality_graph::config::AnalysisConfig;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "criticality-graph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// JSON configuration file
    #[arg(short, long, global = true, env = "CRITICALITY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate synthetic comparison records
    Generate {
        /// Number of comparisons
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(10..=10000))]
        count: Option<u64>,

        /// Seed for the generator
        #[arg(long)]
        seed: Option<u64>,

        /// Draw multipliers from [1, 50] instead of [1, 5]
        #[arg(long)]
        extended: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Score repositories and rank them into funding tiers
    Score {
        /// Comparison records (.csv or .json)
        #[arg(short, long)]
        input: PathBuf,

        /// Write training data, score and priority tables here
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Rows to print
        #[arg(long, default_value_t = 20)]
        top: usize,
    },

    /// Build the dependency graph and settle its layout
    Graph {
        /// Comparison records (.csv or .json)
        #[arg(short, long)]
        input: PathBuf,

        /// Drop pairs compared fewer times than this
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        min_edge_count: Option<u32>,

        /// Keep only the largest connected component
        #[arg(long)]
        largest_component: bool,

        /// Write graph and layout JSON here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Open the interactive viewer
    View {
        /// Comparison records; synthetic data when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Synthetic record count
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(10..=10000))]
        count: Option<u64>,

        /// Synthetic data seed
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 if quiet => tracing::Level::ERROR,
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(log_level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let mut config = AnalysisConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Generate {
            count,
            seed,
            extended,
            format,
            output,
        } => {
            if let Some(count) = count {
                config.generate.count = count as usize;
            }
            if let Some(seed) = seed {
                config.generate.seed = seed;
            }
            config.generate.extended_multiplier |= extended;
            commands::generate::run(&config, format, output)
        }
        Commands::Score {
            input,
            export_dir,
            top,
        } => commands::score::run(&config, &input, export_dir, top),
        Commands::Graph {
            input,
            min_edge_count,
            largest_component,
            output,
        } => {
            if let Some(min_edge_count) = min_edge_count {
                config.graph.min_edge_count = min_edge_count;
            }
            config.graph.largest_component_only |= largest_component;
            commands::graph::run(&config, &input, output)
        }
        Commands::View { input, count, seed } => {
            if let Some(count) = count {
                config.generate.count = count as usize;
            }
            if let Some(seed) = seed {
                config.generate.seed = seed;
            }
            commands::view::run(config, input)
        }
    }
}
