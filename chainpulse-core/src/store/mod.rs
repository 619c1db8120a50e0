//! Storage layer for chainpulse
//!
//! SQLite-backed store for raw daily rows and entity metadata, with:
//! - Schema migrations via PRAGMA user_version
//! - Repository pattern for parameterized queries
//!
//! Only raw deltas are persisted; every derived series is recomputed by
//! the pipeline from a fresh snapshot.

pub mod repo;
pub mod schema;

pub use repo::Store;
