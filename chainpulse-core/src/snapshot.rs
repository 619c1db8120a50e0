//! Data snapshot and wholesale recompute.
//!
//! A [`DataSnapshot`] is the explicit, immutable bundle of everything a
//! computation cycle needs: normalized network totals, per-entity rows,
//! and entity metadata, stamped with the fetch time. It replaces the
//! hidden module-level caches the original dashboard kept between
//! requests; the pipeline receives the snapshot by reference and owns no
//! state of its own.
//!
//! [`DashboardView::compute`] is the root of the pipeline: one pure pass
//! that produces every chart-ready shape. Any parameter change (window,
//! detail toggle, label mode) recomputes wholesale; a superseded result
//! is simply dropped by the caller.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::pipeline;
use crate::provider::DataProvider;
use crate::types::{
    ComparisonPoint, CumulativeSeries, DailyRecord, DashboardParams, DecomposeMode,
    DecomposedPoint, EntityMeta, EntitySeries, Forecast, Network, SummaryRow,
};

/// Ranking windows the summary/momentum views request.
pub const SUMMARY_WINDOWS: [u32; 3] = [30, 60, 90];

/// Immutable inputs for one computation cycle.
#[derive(Debug, Clone)]
pub struct DataSnapshot {
    /// Which network the rows were fetched for
    pub network: Network,
    /// Normalized network-wide daily records
    pub totals: Vec<DailyRecord>,
    /// Normalized per-entity daily records
    pub per_entity: Vec<DailyRecord>,
    /// Entity metadata for labels, logos and links
    pub entities: Vec<EntityMeta>,
    /// When the snapshot was assembled
    pub fetched_at: DateTime<Utc>,
}

impl DataSnapshot {
    /// Fetch and normalize one complete snapshot from a provider.
    ///
    /// This is the only boundary that touches I/O; everything downstream
    /// operates on the already-resolved arrays.
    pub fn load<P: DataProvider>(
        provider: &P,
        network: Network,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self> {
        let totals_raw = provider.fetch_daily_account_totals(network, start, end)?;
        let entity_raw = provider.fetch_daily_accounts_by_entity(network, start, end)?;
        let entities = provider.fetch_entity_metadata(network)?;

        let totals = pipeline::normalize(&totals_raw)?;
        let per_entity = pipeline::normalize(&entity_raw)?;

        tracing::info!(
            network = %network,
            total_days = totals.len(),
            entity_rows = per_entity.len(),
            entities = entities.len(),
            "Snapshot loaded"
        );

        Ok(Self {
            network,
            totals,
            per_entity,
            entities,
            fetched_at: Utc::now(),
        })
    }

    /// Last day the network-wide series has data for.
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.totals.last().map(|r| r.day)
    }
}

/// Everything the rendering layer plots, computed in one pass.
#[derive(Debug, Clone)]
pub struct DashboardView {
    /// Network-wide cumulative series (brush chart input)
    pub totals: CumulativeSeries,
    /// Trailing-window growth per day of the total series
    pub comparison: Vec<ComparisonPoint>,
    /// Observed series plus the 90-day projection, or the sentinel
    pub forecast: Forecast,
    /// Absolute top-N / all-other stack
    pub stack_absolute: Vec<DecomposedPoint>,
    /// Growth-rebased stack (zeroed at the window start)
    pub stack_growth: Vec<DecomposedPoint>,
    /// Per-entity lines for the detail toggle, growth-rebased
    pub detail_lines: EntitySeries,
    /// Ranked single-day snapshot rows for bar and table views
    pub summary: Vec<SummaryRow>,
}

impl DashboardView {
    /// Run the full pipeline against a snapshot.
    ///
    /// Pure: allocates fresh outputs and leaves the snapshot untouched,
    /// so panels with different parameters can compute concurrently.
    pub fn compute(snapshot: &DataSnapshot, params: &DashboardParams) -> Self {
        let started = std::time::Instant::now();

        let totals = pipeline::accumulate(&snapshot.totals);
        let all_entities = pipeline::accumulate_entities(&snapshot.per_entity);
        let top = top_entities(&all_entities, params.top_n);

        let comparison = pipeline::compare(&totals, params.window);
        let forecast = pipeline::forecast(&totals);

        let stack_absolute =
            pipeline::decompose(&totals, &top, DecomposeMode::Absolute, params.detail);
        let stack_growth = pipeline::decompose(&totals, &top, DecomposeMode::Growth, params.detail);
        let detail_lines = pipeline::entity_detail(&top, DecomposeMode::Growth);

        let summary = snapshot
            .per_entity
            .last()
            .map(|last| pipeline::rank(last.day, &all_entities, &SUMMARY_WINDOWS, None))
            .unwrap_or_default();

        tracing::debug!(
            days = totals.len(),
            entities = all_entities.len(),
            top_n = params.top_n,
            window = params.window.days(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "Dashboard view recomputed"
        );

        Self {
            totals,
            comparison,
            forecast,
            stack_absolute,
            stack_growth,
            detail_lines,
            summary,
        }
    }
}

/// Keep the `n` entities with the largest latest cumulative total.
///
/// Ties break by slug so the selection is deterministic across runs.
pub fn top_entities(entities: &EntitySeries, n: usize) -> EntitySeries {
    let mut ranked: Vec<(&String, i64)> = entities
        .iter()
        .map(|(slug, series)| (slug, series.last().map(|p| p.total).unwrap_or(0)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(n)
        .map(|(slug, _)| (slug.clone(), entities[slug].clone()))
        .collect()
}
