//! Core domain types for chainpulse
//!
//! These types describe the data that flows through the dashboard pipeline:
//! raw per-day rows from the provider, the cumulative series derived from
//! them, and the chart-ready shapes the rendering layer consumes.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Network** | A chain deployment the provider tracks (mainnet, testnet) |
//! | **Entity / App** | A tracked application, identified by a stable slug |
//! | **Cumulative total** | Running sum of daily deltas up to and including a day |
//! | **Comparison window** | A fixed trailing day-count (30/60/90) for growth deltas |
//! | **Decomposition** | Splitting a combined series into "top-N" and "all other" legs |
//! | **Rebase** | Shifting a series so its value at the window's first day is zero |
//! | **Forecast horizon** | The fixed 90-day future extension via regression |

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================
// Network
// ============================================

/// A chain deployment whose account counts the provider tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// Stable string form used for storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }

    /// Parse the storage form back into a network.
    pub fn from_storage(value: &str) -> Option<Self> {
        match value {
            "mainnet" => Some(Network::Mainnet),
            "testnet" => Some(Network::Testnet),
            _ => None,
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// Raw rows and daily records
// ============================================

/// An untyped row as the provider (or a JSON import file) hands it over.
///
/// Fields are optional so that the normalizer, not serde, decides what is
/// malformed: a missing `deleted_count` is legal (outer-join semantics,
/// zero deletions), a missing day or new-count is not.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDailyRow {
    /// ISO 8601 date-only string (UTC day boundary)
    pub day: Option<String>,
    /// Entity slug, `None` for the network-wide series
    #[serde(default)]
    pub entity_id: Option<String>,
    /// Accounts created on this day
    #[serde(default)]
    pub new_count: Option<i64>,
    /// Accounts deleted on this day
    #[serde(default)]
    pub deleted_count: Option<i64>,
}

/// One day's validated delta for the whole network (`entity_id = None`)
/// or for a single application. Immutable once read from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// UTC day this delta was collected for
    pub day: NaiveDate,
    /// Entity slug, `None` for the network-wide series
    pub entity_id: Option<String>,
    /// Accounts created on this day (>= 0)
    pub new_count: i64,
    /// Accounts deleted on this day (>= 0, always 0 for per-entity rows)
    pub deleted_count: i64,
}

impl DailyRecord {
    /// Net account delta for the day.
    pub fn net(&self) -> i64 {
        self.new_count - self.deleted_count
    }
}

// ============================================
// Cumulative series
// ============================================

/// One point of a running-total series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativePoint {
    /// UTC day
    pub day: NaiveDate,
    /// Running total up to and including `day`
    pub total: i64,
}

/// Ordered running-total series: strictly increasing unique days.
///
/// Totals are not guaranteed monotonic (deletions can shrink them), but
/// every point is the previous total plus that day's net delta.
pub type CumulativeSeries = Vec<CumulativePoint>;

/// Per-entity cumulative series, keyed by entity slug.
///
/// BTreeMap keeps iteration deterministic, which downstream ranking and
/// stacking rely on.
pub type EntitySeries = BTreeMap<String, CumulativeSeries>;

// ============================================
// Chart-ready shapes
// ============================================

/// Growth of a series point relative to its comparison-window anchor.
///
/// `anchor` is the series value at `day - window`; when no record exists
/// there, `anchor`, `delta` and `percent` are all `None` and the rendering
/// layer shows an em dash. `percent` is also `None` when the anchor is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonPoint {
    pub day: NaiveDate,
    pub current: i64,
    pub anchor: Option<i64>,
    pub delta: Option<i64>,
    /// Floored percent growth, sign preserved
    pub percent: Option<i64>,
}

/// One day of the top-N / all-other stack.
///
/// Both fields are leg widths: in absolute mode `other + top_apps`
/// reconstructs the network total for the day (modulo the documented
/// fallback when the network total lags the entity data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecomposedPoint {
    pub day: NaiveDate,
    pub other: i64,
    pub top_apps: i64,
}

/// Which view a decomposition serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecomposeMode {
    /// Raw stacked totals
    Absolute,
    /// Both legs rebased to zero at the first day of the series
    Growth,
}

/// Result of the forecast engine.
///
/// The projected variant carries the observed series plus exactly one
/// synthetic point at the 90-day horizon. Drawing the dashed segment
/// between the last real point and the synthetic one is the rendering
/// layer's job.
#[derive(Debug, Clone, PartialEq)]
pub enum Forecast {
    Projected {
        /// Observed series with the synthetic horizon point appended
        series: Vec<ForecastPoint>,
        /// The horizon day the synthetic point was projected onto
        horizon: NaiveDate,
    },
    /// Fewer than 2 observed points; no forecast line must be rendered.
    InsufficientData,
}

/// One point of a forecast series. Totals are floats because the horizon
/// point is regression output, not raw data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub day: NaiveDate,
    pub total: f64,
}

/// Single-day snapshot of one entity with trailing anchors, for ranked
/// bar and table views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub entity_id: String,
    /// Cumulative total on the snapshot day
    pub total: i64,
    /// Historical total per requested window, `None` when the entity has
    /// no record at the offset day
    pub anchors: BTreeMap<u32, Option<i64>>,
}

impl SummaryRow {
    /// Anchor value for a window, flattened.
    pub fn anchor(&self, window: u32) -> Option<i64> {
        self.anchors.get(&window).copied().flatten()
    }
}

// ============================================
// Entity metadata
// ============================================

/// Default logo shown when an entity has none.
pub const DEFAULT_LOGO: &str = "/images/ecosystem.png";

/// Base URL that `/img/`-relative logos resolve against.
pub const ECOSYSTEM_RAW_BASE: &str = "https://github.com/near/ecosystem/raw/main";

/// Descriptive metadata for a tracked application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMeta {
    /// Stable slug identifying the entity
    pub slug: String,
    /// Display title
    pub title: String,
    /// Logo URL; `None` falls back to [`DEFAULT_LOGO`] via [`EntityMeta::logo`]
    pub logo_url: Option<String>,
    /// Website URL
    pub website_url: Option<String>,
    /// Whether the entity has an on-chain contract
    pub has_contract: bool,
}

impl EntityMeta {
    /// Resolved logo URL: missing logos fall back to the default asset,
    /// `/img/`-relative ones are resolved against the ecosystem repo.
    pub fn logo(&self) -> String {
        match self.logo_url.as_deref() {
            None => DEFAULT_LOGO.to_string(),
            Some(url) if url.starts_with("/img/") => format!("{}{}", ECOSYSTEM_RAW_BASE, url),
            Some(url) => url.to_string(),
        }
    }
}

// ============================================
// User parameters
// ============================================

/// Trailing comparison window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareWindow {
    Days30,
    Days60,
    Days90,
}

impl CompareWindow {
    /// Window length in days.
    pub fn days(&self) -> u32 {
        match self {
            CompareWindow::Days30 => 30,
            CompareWindow::Days60 => 60,
            CompareWindow::Days90 => 90,
        }
    }

    /// Parse a day count into a window; only 30/60/90 are valid.
    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            30 => Some(CompareWindow::Days30),
            60 => Some(CompareWindow::Days60),
            90 => Some(CompareWindow::Days90),
            _ => None,
        }
    }
}

/// How growth labels are rendered: percent or absolute count. Switching
/// modes reformats the same stored delta, nothing is recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    #[default]
    Percent,
    Count,
}

/// A user-supplied numeric threshold with a display label. Lives in
/// memory for the duration of a session, never persisted server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub value: f64,
    pub label: String,
}

impl Threshold {
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// The full set of user parameters a recompute cycle reacts to.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardParams {
    /// Trailing comparison window (30/60/90 days)
    pub window: CompareWindow,
    /// Top-10 detail view toggle
    pub detail: bool,
    /// Growth label rendering mode
    pub label_mode: LabelMode,
    /// Goal lines for the accounts chart
    pub goals: Vec<Threshold>,
    /// Milestone lines for the top-apps chart
    pub milestones: Vec<Threshold>,
    /// How many entities count as "top apps"
    pub top_n: usize,
}

impl Default for DashboardParams {
    fn default() -> Self {
        Self {
            window: CompareWindow::Days30,
            detail: false,
            label_mode: LabelMode::Percent,
            goals: Vec::new(),
            milestones: Vec::new(),
            top_n: 10,
        }
    }
}
