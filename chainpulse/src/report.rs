//! chainpulse-report - render a dashboard snapshot as text or JSON
//!
//! Loads raw rows from the local store, runs the full transformation
//! pipeline, and prints the network totals, trailing growth, top apps
//! and the 90-day projection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chainpulse_core::pipeline::{row_growth_count, row_growth_percent};
use chainpulse_core::snapshot::SUMMARY_WINDOWS;
use chainpulse_core::{
    format, CompareWindow, Config, DashboardParams, DashboardView, DataSnapshot, Forecast,
    LabelMode, Network, Store,
};
use chrono::NaiveDate;
use clap::Parser;

#[derive(Parser)]
#[command(name = "chainpulse-report")]
#[command(about = "Report account growth for a network")]
#[command(version)]
struct Args {
    /// Network to report on (mainnet or testnet)
    #[arg(short, long)]
    network: Option<String>,

    /// First day of the reporting range (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the reporting range (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Trailing comparison window in days (30, 60 or 90)
    #[arg(short, long)]
    window: Option<u32>,

    /// Show growth labels as counts instead of percentages
    #[arg(long)]
    counts: bool,

    /// How many top apps to single out
    #[arg(short, long)]
    top: Option<usize>,

    /// Output format: text (default) or json
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Override the store database path
    #[arg(long)]
    db: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = chainpulse_core::logging::init(&config.logging)
        .context("failed to initialize logging")?;

    let network = match &args.network {
        Some(name) => Network::from_storage(name)
            .with_context(|| format!("unknown network '{}'", name))?,
        None => config.dashboard.network,
    };

    let window = match args.window {
        Some(days) => CompareWindow::from_days(days)
            .with_context(|| format!("window must be 30, 60 or 90 days, got {}", days))?,
        None => config.dashboard.window()?,
    };

    let label_mode = if args.counts {
        LabelMode::Count
    } else {
        config.dashboard.label_mode
    };

    let params = DashboardParams {
        window,
        label_mode,
        top_n: args.top.unwrap_or(config.dashboard.top_n),
        ..Default::default()
    };

    let db_path = args
        .db
        .unwrap_or_else(|| config.resolved_database_path());
    let store = Store::open(&db_path).context("failed to open store")?;
    store.migrate().context("failed to run store migrations")?;

    // Unbounded defaults; the store range filter is inclusive.
    let from = args
        .from
        .or_else(|| NaiveDate::from_ymd_opt(2000, 1, 1))
        .context("invalid range start")?;
    let to = args
        .to
        .or_else(|| NaiveDate::from_ymd_opt(9999, 12, 31))
        .context("invalid range end")?;

    let snapshot =
        DataSnapshot::load(&store, network, from, to).context("failed to load snapshot")?;
    let view = DashboardView::compute(&snapshot, &params);

    if args.format == "json" {
        print_json(&view, &params)?;
    } else {
        print_text(&snapshot, &view, &params);
    }

    Ok(())
}

fn print_text(snapshot: &DataSnapshot, view: &DashboardView, params: &DashboardParams) {
    if view.totals.is_empty() {
        println!("No data for {} in the requested range.", snapshot.network);
        println!("Run 'chainpulse-import' first to load indexer exports.");
        return;
    }

    let latest = view.totals.last().map(|p| p.total).unwrap_or(0);
    let growth = view
        .comparison
        .last()
        .map(|p| format::growth_label(p.delta, p.percent, params.label_mode))
        .unwrap_or_else(|| "—".to_string());

    println!("Network: {}", snapshot.network);
    println!(
        "Total accounts: {} ({} over {} days)",
        format::grouped(latest),
        growth,
        params.window.days()
    );

    match &view.forecast {
        Forecast::Projected { series, horizon } => {
            if let Some(last) = series.last() {
                println!("Projected by {}: {}", horizon, format::compact(last.total));
            }
        }
        Forecast::InsufficientData => {
            println!("Projection: not enough history");
        }
    }

    println!("\nTop apps (as of latest snapshot):");
    let top = view.summary.iter().take(params.top_n);
    for (rank, row) in top.enumerate() {
        let label = format::growth_label(
            row_growth_count(row, params.window.days()),
            row_growth_percent(row, params.window.days()),
            params.label_mode,
        );
        println!(
            "  {:>2}. {:<24} {:>12}  {}",
            rank + 1,
            row.entity_id,
            format::grouped(row.total),
            label
        );
    }

    println!("\nMomentum (growth per window):");
    println!("  {:<24} {:>8} {:>8} {:>8}", "app", "30d", "60d", "90d");
    for row in view.summary.iter().take(params.top_n) {
        let cells: Vec<String> = SUMMARY_WINDOWS
            .iter()
            .map(|w| {
                format::growth_label(
                    row_growth_count(row, *w),
                    row_growth_percent(row, *w),
                    params.label_mode,
                )
            })
            .collect();
        println!(
            "  {:<24} {:>8} {:>8} {:>8}",
            row.entity_id, cells[0], cells[1], cells[2]
        );
    }
}

fn print_json(view: &DashboardView, params: &DashboardParams) -> Result<()> {
    let forecast = match &view.forecast {
        Forecast::Projected { series, horizon } => serde_json::json!({
            "horizon": horizon,
            "series": series,
        }),
        Forecast::InsufficientData => serde_json::Value::Null,
    };

    let output = serde_json::json!({
        "window_days": params.window.days(),
        "totals": view.totals,
        "comparison": view.comparison,
        "forecast": forecast,
        "stack_absolute": view.stack_absolute,
        "stack_growth": view.stack_growth,
        "summary": view.summary,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
