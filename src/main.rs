//! mcmod-harvest main entry point
//!
//! This is the command-line interface for the mod data scraper and the
//! locale transform utility.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use mcmod_harvest::config::{load_config_with_hash, Config};
use mcmod_harvest::crawler::Coordinator;
use mcmod_harvest::locale::{convert_locale_file, TaiwanTraditional};
use mcmod_harvest::output::print_statistics;
use mcmod_harvest::state::{RangePlan, RangeRequest};
use mcmod_harvest::storage::CsvStore;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// mcmod-harvest: incremental mod data scraper for mcmod.cn
///
/// Scrapes mod names and CurseForge/Modrinth slugs one id at a time into a
/// CSV file that can be resumed from its last row.
#[derive(Parser, Debug)]
#[command(name = "mcmod-harvest")]
#[command(version)]
#[command(about = "Incremental mod data scraper for mcmod.cn", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape mod detail pages into the CSV store
    Scrape(ScrapeArgs),

    /// Regenerate the Traditional Chinese locale from the Simplified one
    Locale(LocaleArgs),
}

#[derive(Args, Debug)]
struct ScrapeArgs {
    /// Starting mod ID
    #[arg(short, long, default_value_t = 1)]
    start: u32,

    /// Ending mod ID (inclusive)
    #[arg(short, long, default_value_t = 10)]
    end: u32,

    /// Output CSV file (overrides output.csv-path)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Keep existing rows instead of truncating the output file
    #[arg(long)]
    append: bool,

    /// Continue from the last id in the output file to the latest id online.
    /// Ignores --start/--end.
    #[arg(long)]
    auto_range: bool,

    /// Resolve and show the id range without scraping
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct LocaleArgs {
    /// Simplified Chinese source file (overrides locale.source-path)
    #[arg(long, value_name = "FILE")]
    source: Option<PathBuf>,

    /// Traditional Chinese target file (overrides locale.target-path)
    #[arg(long, value_name = "FILE")]
    target: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_or_default_config(cli.config.as_deref())?;

    match cli.command {
        Command::Scrape(args) => handle_scrape(config, args).await,
        Command::Locale(args) => handle_locale(&config, args),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mcmod_harvest=info,warn"),
            1 => EnvFilter::new("mcmod_harvest=debug,info"),
            2 => EnvFilter::new("mcmod_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn load_or_default_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles the scrape command, including --dry-run
async fn handle_scrape(mut config: Config, args: ScrapeArgs) -> anyhow::Result<()> {
    if let Some(output) = &args.output {
        config.output.csv_path = output.display().to_string();
    }

    let request = if args.auto_range {
        RangeRequest::Auto
    } else {
        RangeRequest::Explicit {
            start: args.start,
            end: args.end,
            append: args.append,
        }
    };

    tracing::info!("Starting to scrape mcmod.cn data...");
    tracing::info!("Output file: {}", config.output.csv_path);

    let store = CsvStore::new(&config.output.csv_path);
    let mut coordinator = Coordinator::new(config, store)?;
    let plan = coordinator.plan(request).await?;

    if args.dry_run {
        print_plan(&plan);
        return Ok(());
    }

    let stats = coordinator.run(plan).await?;
    if stats.requested > 0 {
        print_statistics(&stats);
    }
    Ok(())
}

fn print_plan(plan: &RangePlan) {
    println!("=== mcmod-harvest Dry Run ===\n");
    match plan {
        RangePlan::Scrape(range) => {
            println!("Would scrape mod IDs {}-{} ({} ids)", range.start, range.end, range.count());
            println!(
                "Output mode: {}",
                if range.append { "append" } else { "truncate" }
            );
        }
        RangePlan::UpToDate { last_id, latest_id } => {
            println!(
                "Nothing to scrape: local last id {}, latest online {}",
                last_id, latest_id
            );
        }
    }
}

/// Handles the locale command
fn handle_locale(config: &Config, args: LocaleArgs) -> anyhow::Result<()> {
    let source = args
        .source
        .unwrap_or_else(|| PathBuf::from(&config.locale.source_path));
    let target = args
        .target
        .unwrap_or_else(|| PathBuf::from(&config.locale.target_path));

    convert_locale_file(&source, &target, &TaiwanTraditional)?;
    println!("Conversion complete!");
    Ok(())
}
