//! Cumulative aggregator: day-level deltas -> running totals.
//!
//! Mirrors the provider's window functions: the network-wide series sums
//! `new - deleted` per day, per-entity series sum new accounts only
//! (deletions are not tracked per entity). The windowed variant
//! reproduces the row_number trick the original growth query used to
//! avoid double-counting a running total that started before the window.

use chrono::NaiveDate;

use crate::types::{CumulativePoint, CumulativeSeries, DailyRecord, EntitySeries};

/// Running total of `new - deleted` over the whole series.
///
/// The first record's total is its own delta; there is no prior
/// accumulation to carry.
pub fn accumulate(records: &[DailyRecord]) -> CumulativeSeries {
    let mut total = 0i64;
    records
        .iter()
        .map(|r| {
            total += r.net();
            CumulativePoint { day: r.day, total }
        })
        .collect()
}

/// Running total restricted to `[start, end]`, both inclusive.
///
/// The first in-range row contributes 0 while all subsequent rows add
/// their own delta: a sub-range of a running total would otherwise
/// double-count everything accumulated before `start`.
pub fn accumulate_window(
    records: &[DailyRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> CumulativeSeries {
    let mut total = 0i64;
    let mut first = true;
    records
        .iter()
        .filter(|r| r.day >= start && r.day <= end)
        .map(|r| {
            if first {
                first = false;
            } else {
                total += r.net();
            }
            CumulativePoint { day: r.day, total }
        })
        .collect()
}

/// Per-entity running totals of new accounts.
///
/// Records without an entity id (network-wide rows) are skipped. Each
/// entity's series covers only the days it has records for; gaps stay
/// gaps.
pub fn accumulate_entities(records: &[DailyRecord]) -> EntitySeries {
    let mut series = EntitySeries::new();

    for record in records {
        let Some(entity) = record.entity_id.as_deref() else {
            continue;
        };
        let entry = series.entry(entity.to_string()).or_default();
        let prev = entry.last().map(|p| p.total).unwrap_or(0);
        entry.push(CumulativePoint {
            day: record.day,
            total: prev + record.new_count,
        });
    }

    series
}
