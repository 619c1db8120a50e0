//! Data provider boundary.
//!
//! The pipeline never talks to storage directly; it consumes flat arrays
//! of raw rows handed over by a [`DataProvider`]. The trait is the
//! single asynchronous-looking boundary of the system, modeled
//! synchronously: one request per dataset, complete arrays, no paging.

use chrono::NaiveDate;

use crate::error::Result;
use crate::types::{EntityMeta, Network, RawDailyRow};

/// Source of raw daily rows and entity metadata.
///
/// All date parameters are inclusive UTC day boundaries. Implementations
/// return plain arrays of flat records; the normalizer downstream owns
/// validation.
pub trait DataProvider {
    /// Network-wide daily new/deleted account counts for `[start, end]`.
    fn fetch_daily_account_totals(
        &self,
        network: Network,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawDailyRow>>;

    /// Per-entity daily new account counts for `[start, end]`.
    fn fetch_daily_accounts_by_entity(
        &self,
        network: Network,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawDailyRow>>;

    /// Metadata for every tracked entity on the network.
    fn fetch_entity_metadata(&self, network: Network) -> Result<Vec<EntityMeta>>;
}
