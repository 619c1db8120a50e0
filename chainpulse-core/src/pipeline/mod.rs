//! The data-transformation pipeline.
//!
//! Sits between the raw per-day rows a provider returns and the shapes
//! the chart renderers consume. Data flows leaf to root:
//!
//! ```text
//! raw rows -> normalize -> cumulative -> { compare, decompose, rank }
//!                               \-> forecast
//! ```
//!
//! Every operation is a pure function from input series plus parameters
//! to freshly allocated output; the pipeline owns no mutable state, so
//! panels with different windows or modes can recompute concurrently
//! against the same snapshot without locking.

pub mod compare;
pub mod cumulative;
pub mod decompose;
pub mod forecast;
pub mod normalize;
pub mod rank;

pub use compare::{compare, growth_percent};
pub use cumulative::{accumulate, accumulate_entities, accumulate_window};
pub use decompose::{decompose, entity_detail};
pub use forecast::{forecast, FORECAST_HORIZON_DAYS};
pub use normalize::normalize;
pub use rank::{rank, row_growth_count, row_growth_percent};
