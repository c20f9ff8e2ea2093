//! Command line entry point for fighter-rank
//!
//! Reads normalized match records from a JSON file, runs the ranking
//! pipeline, and prints the composite ranking (and optionally the TrueSkill
//! table) as text or JSON.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fighter_rank::config::AppConfig;
use fighter_rank::ranking::{render_bayesian, render_rankings};
use fighter_rank::rating::RatingSourceKind;
use fighter_rank::{RankingError, RankingPipeline, RankingSnapshot, RawMatchRecord};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Output format for the ranking report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Fighter Rank - Elo, TrueSkill and composite rankings from match results
#[derive(Parser)]
#[command(
    name = "fighter-rank",
    version,
    about = "Rank competitors from a chronological stream of head-to-head match results",
    long_about = "Fighter Rank folds normalized match records into Elo and TrueSkill ratings, \
                 accumulates strike and takedown differentials plus win-method scores, and \
                 prints a composite ranking."
)]
struct Args {
    /// Match records file
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to match records (JSON array or JSON lines)"
    )]
    input: Option<PathBuf>,

    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Composite rating input override
    #[arg(
        long,
        value_name = "SOURCE",
        help = "Rating feeding the composite score (elo, bayesian)"
    )]
    rating_source: Option<RatingSourceKind>,

    /// Run the TrueSkill engine
    #[arg(long, help = "Also compute and print the TrueSkill table")]
    bayesian: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Only print the first N competitors
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without ranking")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file or environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(source) = args.rating_source {
        config.ranking.rating_source = source;
    }

    if args.bayesian {
        config.ranking.enable_bayesian = true;
    }

    fighter_rank::config::validate_config(&config)?;
    Ok(config)
}

/// Read match records and order them by date.
///
/// Undated records sort ahead of every dated one. The sort is stable, so
/// records sharing a date keep their file order, as do the undated ones
/// among themselves.
fn load_records(path: &Path) -> Result<Vec<RawMatchRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read match records from {}", path.display()))?;

    let mut records: Vec<RawMatchRecord> = if contents.trim_start().starts_with('[') {
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON array in {}", path.display()))?
    } else {
        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(number, line)| {
                serde_json::from_str(line).map_err(|e| RankingError::InputError {
                    message: format!("{} line {}: {}", path.display(), number + 1, e),
                })
            })
            .collect::<std::result::Result<_, _>>()?
    };

    records.sort_by_key(|record| record.date);
    Ok(records)
}

fn print_snapshot(
    config: &AppConfig,
    snapshot: &RankingSnapshot,
    format: OutputFormat,
    top: Option<usize>,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(snapshot)?);
        }
        OutputFormat::Text => {
            let title = format!(
                "{} rankings ({} ratings, {} records):",
                config.service.name, snapshot.rating_source, snapshot.records_processed
            );
            print!("{}", render_rankings(&title, &snapshot.rankings, top));

            if let Some(standings) = &snapshot.bayesian {
                println!();
                print!("{}", render_bayesian(standings, top));
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.dry_run {
        info!("Configuration validation successful");
        info!("   Rating source: {}", config.ranking.rating_source);
        info!("   Bayesian table: {}", config.ranking.enable_bayesian);
        info!("   Elo K-factor: {}", config.elo.k_factor);
        return Ok(());
    }

    let Some(input) = args.input.as_deref() else {
        eprintln!("No input file given; pass --input FILE");
        std::process::exit(2);
    };

    let records = load_records(input)?;
    info!("Loaded {} match records from {}", records.len(), input.display());

    let mut pipeline = RankingPipeline::new(&config.pipeline())?;
    if let Err(e) = pipeline.feed_all(records) {
        error!("Ranking run aborted: {}", e);
        return Err(e);
    }

    print_snapshot(&config, &pipeline.snapshot(), args.format, args.top)
}
