//! chainpulse-import - load raw daily rows and entity metadata into the store
//!
//! Reads JSON exports from the chain indexer and upserts them into the
//! local SQLite store. Re-importing the same file is safe; rows are
//! keyed by (network, day[, entity]) and later imports win.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chainpulse_core::{pipeline, Config, EntityMeta, Network, RawDailyRow, Store};
use clap::Parser;

#[derive(Parser)]
#[command(name = "chainpulse-import")]
#[command(about = "Import raw daily rows into the chainpulse store")]
#[command(version)]
struct Args {
    /// Network the rows belong to (mainnet or testnet)
    #[arg(short, long, default_value = "mainnet")]
    network: String,

    /// JSON file with network-wide daily totals
    /// (array of {day, new_count, deleted_count?})
    #[arg(long)]
    totals: Option<PathBuf>,

    /// JSON file with per-entity daily counts
    /// (array of {day, entity_id, new_count})
    #[arg(long)]
    entities: Option<PathBuf>,

    /// JSON file with entity metadata
    /// (array of {slug, title, logo_url?, website_url?, has_contract})
    #[arg(long)]
    metadata: Option<PathBuf>,

    /// Override the store database path
    #[arg(long)]
    db: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = chainpulse_core::logging::init(&config.logging)
        .context("failed to initialize logging")?;

    let network = Network::from_storage(&args.network)
        .with_context(|| format!("unknown network '{}'", args.network))?;

    let db_path = args
        .db
        .unwrap_or_else(|| config.resolved_database_path());
    let store = Store::open(&db_path).context("failed to open store")?;
    store.migrate().context("failed to run store migrations")?;

    if args.totals.is_none() && args.entities.is_none() && args.metadata.is_none() {
        anyhow::bail!("nothing to import; pass --totals, --entities and/or --metadata");
    }

    if let Some(path) = &args.totals {
        let count = import_totals(&store, network, path)
            .with_context(|| format!("failed to import totals from {:?}", path))?;
        println!("Imported {} daily total(s)", count);
    }

    if let Some(path) = &args.entities {
        let count = import_entities(&store, network, path)
            .with_context(|| format!("failed to import entity rows from {:?}", path))?;
        println!("Imported {} entity row(s)", count);
    }

    if let Some(path) = &args.metadata {
        let count = import_metadata(&store, network, path)
            .with_context(|| format!("failed to import metadata from {:?}", path))?;
        println!("Imported {} entity record(s)", count);
    }

    Ok(())
}

fn read_rows(path: &PathBuf) -> Result<Vec<RawDailyRow>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn import_totals(store: &Store, network: Network, path: &PathBuf) -> Result<usize> {
    let rows = read_rows(path)?;
    let records = pipeline::normalize(&rows)?;

    for record in &records {
        store.insert_new_accounts(network, record.day, record.new_count)?;
        // A zero-deletion day is represented by absence, matching how the
        // totals query reads the table back.
        if record.deleted_count > 0 {
            store.insert_deleted_accounts(network, record.day, record.deleted_count)?;
        }
    }

    tracing::info!(network = %network, rows = records.len(), "Totals imported");
    Ok(records.len())
}

fn import_entities(store: &Store, network: Network, path: &PathBuf) -> Result<usize> {
    let rows = read_rows(path)?;
    let records = pipeline::normalize(&rows)?;

    for record in &records {
        let entity_id = record
            .entity_id
            .as_deref()
            .context("entity row without an entity_id")?;
        store.insert_entity_accounts(network, record.day, entity_id, record.new_count)?;
    }

    tracing::info!(network = %network, rows = records.len(), "Entity rows imported");
    Ok(records.len())
}

fn import_metadata(store: &Store, network: Network, path: &PathBuf) -> Result<usize> {
    let content = std::fs::read_to_string(path)?;
    let metas: Vec<EntityMeta> = serde_json::from_str(&content)?;

    for meta in &metas {
        store.upsert_entity(network, meta)?;
    }

    tracing::info!(network = %network, entities = metas.len(), "Metadata imported");
    Ok(metas.len())
}
