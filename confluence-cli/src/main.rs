//! Confluence CLI: scan, reconcile and inspect the daily selection.
//!
//! Commands:
//! - `scan`: score the ranked universe and store the top picks
//! - `reconcile`: compare the stored picks against current prices
//! - `show`: print the stored selection
//! - `watch`: reconcile then scan on a fixed interval
//! - `config`: print the effective configuration as TOML

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use confluence_core::domain::Selection;
use confluence_core::TOP_K;
use confluence_runner::{
    run_reconciliation, run_scan_cycle, selection_message, write_reconciliation_csv, AppConfig,
    CycleOptions, LiveServices, ReconciliationReport, ScanReport, SelectionStore,
};

#[derive(Parser)]
#[command(
    name = "confluence",
    about = "Confluence: multi-signal crypto scanner with daily top picks"
)]
struct Cli {
    /// Path to a TOML config file. Built-in defaults when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the selection store path.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Debug-level logging (RUST_LOG still wins when set).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score the ranked universe and store the top picks.
    Scan {
        /// Number of market-cap ranked assets to consider.
        #[arg(long)]
        universe_size: Option<usize>,
    },
    /// Compare the stored picks against current prices.
    Reconcile {
        /// Also write the rows as CSV to this path.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Print the stored selection.
    Show,
    /// Reconcile the previous picks, scan, then sleep; repeat.
    Watch {
        /// Hours between cycles.
        #[arg(long, default_value_t = 24)]
        interval_hours: u64,

        /// Stop after this many cycles. Runs until interrupted when omitted.
        #[arg(long)]
        cycles: Option<u32>,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(store) = cli.store {
        config.store.selection_path = store;
    }

    match cli.command {
        Commands::Scan { universe_size } => {
            if let Some(size) = universe_size {
                if size == 0 {
                    bail!("--universe-size must be at least 1");
                }
                config.scan.universe_size = size;
            }
            let services = LiveServices::from_config(&config)?;
            run_scan(&services, &config).map(|_| ())
        }
        Commands::Reconcile { csv } => {
            let services = LiveServices::from_config(&config)?;
            let report = run_reconcile(&services)?;
            if let Some(path) = csv {
                write_reconciliation_csv(&path, &report.rows)?;
                println!("Wrote {} rows to {}", report.rows.len(), path.display());
            }
            Ok(())
        }
        Commands::Show => {
            let services = LiveServices::from_config(&config)?;
            match services.store.read_selection()? {
                Some(selection) => print_selection(&selection),
                None => println!(
                    "No selection stored at {}",
                    services.store.path().display()
                ),
            }
            Ok(())
        }
        Commands::Watch {
            interval_hours,
            cycles,
        } => {
            if interval_hours == 0 {
                bail!("--interval-hours must be at least 1");
            }
            let services = LiveServices::from_config(&config)?;
            run_watch(&services, &config, interval_hours, cycles);
            Ok(())
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run_scan(services: &LiveServices, config: &AppConfig) -> Result<ScanReport> {
    let report = run_scan_cycle(&services.scan_cycle(), &CycleOptions::from(config))?;
    for skipped in &report.skipped {
        info!(
            symbol = %skipped.symbol,
            pair = skipped.pair.as_deref().unwrap_or("-"),
            reason = %skipped.reason,
            "skipped"
        );
    }
    info!(
        selected = report.selection.len(),
        store = %services.store.path().display(),
        "selection stored"
    );
    Ok(report)
}

fn run_reconcile(services: &LiveServices) -> Result<ReconciliationReport> {
    let report = run_reconciliation(&services.store, &services.market, &services.sink)?;
    if report.is_noop() {
        println!("No selection to reconcile yet; run `confluence scan` first.");
    }
    Ok(report)
}

/// Cycle failures are logged and the loop carries on with the next cycle.
fn run_watch(
    services: &LiveServices,
    config: &AppConfig,
    interval_hours: u64,
    cycles: Option<u32>,
) {
    let interval = Duration::from_secs(interval_hours * 3600);
    let mut completed = 0u32;
    loop {
        if let Err(e) = run_reconcile(services) {
            error!(error = %e, "reconciliation failed");
        }
        if let Err(e) = run_scan(services, config) {
            error!(error = %e, "scan failed");
        }
        completed += 1;

        if cycles.is_some_and(|max| completed >= max) {
            info!(cycles = completed, "watch finished");
            return;
        }
        let next = Utc::now() + chrono::Duration::hours(interval_hours as i64);
        info!(next_run = %next.format("%Y-%m-%d %H:%M UTC"), "sleeping until next cycle");
        std::thread::sleep(interval);
    }
}

fn print_selection(selection: &Selection) {
    println!("{}", selection_message(selection));
    println!(
        "\n{} of at most {TOP_K} picks, fingerprint {}",
        selection.len(),
        &selection.fingerprint[..selection.fingerprint.len().min(16)]
    );
    for candidate in &selection.candidates {
        let triggers: Vec<String> = candidate
            .triggers()
            .iter()
            .map(|t| format!("{} (+{})", t.label, t.weight))
            .collect();
        println!("  {:<12} {}", candidate.symbol(), triggers.join(", "));
    }
}
