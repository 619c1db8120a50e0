//! Comparison-window engine: trailing growth deltas and percentages.
//!
//! For each day the engine locates the exact-match series value one
//! window-length earlier and derives the delta against it. Sparse
//! history is expected: missing anchors surface as `None` fields, never
//! as errors, and the rendering layer shows an em dash.

use std::collections::HashMap;

use chrono::Duration;

use crate::types::{CompareWindow, ComparisonPoint, CumulativeSeries};

/// Compare every point of a series against its value `window` days prior.
///
/// Percent growth is `floor((current - anchor) / anchor * 100)` with the
/// sign preserved; a zero anchor short-circuits to `None` instead of
/// propagating infinity.
pub fn compare(series: &CumulativeSeries, window: CompareWindow) -> Vec<ComparisonPoint> {
    let by_day: HashMap<_, _> = series.iter().map(|p| (p.day, p.total)).collect();
    let offset = Duration::days(window.days() as i64);

    series
        .iter()
        .map(|point| {
            let anchor = by_day.get(&(point.day - offset)).copied();
            let delta = anchor.map(|a| point.total - a);
            let percent = anchor.and_then(|a| growth_percent(point.total, a));
            ComparisonPoint {
                day: point.day,
                current: point.total,
                anchor,
                delta,
                percent,
            }
        })
        .collect()
}

/// Floored percent growth of `current` over `anchor`, `None` when the
/// anchor is zero.
pub fn growth_percent(current: i64, anchor: i64) -> Option<i64> {
    if anchor == 0 {
        return None;
    }
    let pct = (current - anchor) as f64 / anchor as f64 * 100.0;
    Some(pct.floor() as i64)
}
