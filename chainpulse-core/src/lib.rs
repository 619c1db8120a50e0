//! # chainpulse-core
//!
//! Core library for chainpulse - account growth analytics for NEAR-style
//! chain networks.
//!
//! This library provides:
//! - Domain types for daily records, cumulative series, and chart shapes
//! - A pure transformation pipeline (normalize, accumulate, compare,
//!   decompose, forecast, rank)
//! - SQLite-backed storage for raw daily rows and entity metadata
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three layers:
//! - **Raw:** per-day delta rows and entity metadata, as collected
//! - **Snapshot:** normalized, validated arrays bundled per fetch
//! - **Derived:** cumulative series and chart shapes, recomputed
//!   wholesale from a snapshot on every parameter change
//!
//! Nothing derived is ever persisted; the store holds raw deltas only.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chainpulse_core::{Config, DashboardParams, DashboardView, DataSnapshot, Network, Store};
//!
//! # fn main() -> chainpulse_core::Result<()> {
//! let config = Config::load()?;
//! let store = Store::open(&config.resolved_database_path())?;
//! store.migrate()?;
//!
//! let start = chrono::NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
//! let end = chrono::NaiveDate::from_ymd_opt(2022, 3, 31).unwrap();
//! let snapshot = DataSnapshot::load(&store, Network::Mainnet, start, end)?;
//! let view = DashboardView::compute(&snapshot, &DashboardParams::default());
//! println!("days plotted: {}", view.totals.len());
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use provider::DataProvider;
pub use snapshot::{DashboardView, DataSnapshot};
pub use store::Store;
pub use types::*;

// Public modules
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod pipeline;
pub mod provider;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod types;
