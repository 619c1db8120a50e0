//! Summary ranker: single-day snapshot per entity with trailing anchors.
//!
//! Feeds the ranked bar chart and the momentum table. Each row carries
//! the entity's cumulative total on the snapshot day plus its historical
//! total one offset back per requested window.
//!
//! The anchor offset is `window + 1` days, not `window`. The historical
//! dashboards were built on that interval and downstream numbers are
//! only comparable if it stays.

use chrono::{Duration, NaiveDate};

use crate::pipeline::compare::growth_percent;
use crate::types::{EntitySeries, SummaryRow};

/// Build the per-entity snapshot for `snapshot_day`.
///
/// Entities with no record on the snapshot day produce no row. Rows are
/// sorted descending by total with ties keeping their original order,
/// and truncated to the top `limit` when one is given.
pub fn rank(
    snapshot_day: NaiveDate,
    entities: &EntitySeries,
    windows: &[u32],
    limit: Option<usize>,
) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = entities
        .iter()
        .filter_map(|(slug, series)| {
            let total = lookup(series, snapshot_day)?;
            let anchors = windows
                .iter()
                .map(|&w| {
                    let offset_day = snapshot_day - Duration::days(w as i64 + 1);
                    (w, lookup(series, offset_day))
                })
                .collect();
            Some(SummaryRow {
                entity_id: slug.clone(),
                total,
                anchors,
            })
        })
        .collect();

    // Stable: equal totals keep entity iteration order.
    rows.sort_by(|a, b| b.total.cmp(&a.total));

    if let Some(limit) = limit {
        rows.truncate(limit);
    }

    rows
}

/// Growth of a row over one of its window anchors, floored percent.
///
/// `None` (rendered as a dash) when the anchor is missing or zero.
pub fn row_growth_percent(row: &SummaryRow, window: u32) -> Option<i64> {
    let anchor = row.anchor(window)?;
    growth_percent(row.total, anchor)
}

/// Count growth of a row over one of its window anchors.
pub fn row_growth_count(row: &SummaryRow, window: u32) -> Option<i64> {
    row.anchor(window).map(|anchor| row.total - anchor)
}

fn lookup(series: &[crate::types::CumulativePoint], day: NaiveDate) -> Option<i64> {
    series
        .binary_search_by(|p| p.day.cmp(&day))
        .ok()
        .map(|idx| series[idx].total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CumulativePoint;

    fn day(d: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap() + Duration::days(d)
    }

    fn entity(days_totals: &[(i64, i64)]) -> Vec<CumulativePoint> {
        days_totals
            .iter()
            .map(|&(d, total)| CumulativePoint { day: day(d), total })
            .collect()
    }

    #[test]
    fn test_anchor_uses_off_by_one_offset() {
        let mut entities = EntitySeries::new();
        entities.insert(
            "alpha".to_string(),
            entity(&[(0, 10), (69, 60), (70, 70), (100, 100)]),
        );

        let rows = rank(day(100), &entities, &[30], None);
        assert_eq!(rows.len(), 1);
        // window 30 anchors 31 days back: day 69, not day 70.
        assert_eq!(rows[0].anchor(30), Some(60));
    }

    #[test]
    fn test_missing_anchor_is_none() {
        let mut entities = EntitySeries::new();
        entities.insert("alpha".to_string(), entity(&[(100, 100)]));

        let rows = rank(day(100), &entities, &[30, 90], None);
        assert_eq!(rows[0].anchor(30), None);
        assert_eq!(rows[0].anchor(90), None);
        assert_eq!(row_growth_percent(&rows[0], 30), None);
    }

    #[test]
    fn test_entity_without_snapshot_day_record_is_dropped() {
        let mut entities = EntitySeries::new();
        entities.insert("alpha".to_string(), entity(&[(99, 50)]));
        entities.insert("beta".to_string(), entity(&[(100, 10)]));

        let rows = rank(day(100), &entities, &[30], None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entity_id, "beta");
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let mut entities = EntitySeries::new();
        entities.insert("alpha".to_string(), entity(&[(0, 50)]));
        entities.insert("beta".to_string(), entity(&[(0, 90)]));
        entities.insert("gamma".to_string(), entity(&[(0, 50)]));

        let rows = rank(day(0), &entities, &[], None);
        let order: Vec<_> = rows.iter().map(|r| r.entity_id.as_str()).collect();
        assert_eq!(order, vec!["beta", "alpha", "gamma"]);

        // Re-invocation with identical input gives identical order.
        let again = rank(day(0), &entities, &[], None);
        assert_eq!(rows, again);
    }

    #[test]
    fn test_limit_truncates_to_top_k() {
        let mut entities = EntitySeries::new();
        for (i, slug) in ["a", "b", "c", "d"].iter().enumerate() {
            entities.insert(slug.to_string(), entity(&[(0, 10 * (i as i64 + 1))]));
        }
        let rows = rank(day(0), &entities, &[], Some(2));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].total, 40);
        assert_eq!(rows[1].total, 30);
    }

    #[test]
    fn test_growth_helpers() {
        let mut entities = EntitySeries::new();
        entities.insert("alpha".to_string(), entity(&[(0, 13), (31, 25)]));

        let rows = rank(day(31), &entities, &[30], None);
        assert_eq!(rows[0].anchor(30), Some(13));
        assert_eq!(row_growth_count(&rows[0], 30), Some(12));
        assert_eq!(row_growth_percent(&rows[0], 30), Some(92));
    }

    #[test]
    fn test_zero_anchor_growth_is_none() {
        let mut entities = EntitySeries::new();
        entities.insert("alpha".to_string(), entity(&[(0, 0), (31, 25)]));

        let rows = rank(day(31), &entities, &[30], None);
        assert_eq!(rows[0].anchor(30), Some(0));
        assert_eq!(row_growth_percent(&rows[0], 30), None);
        assert_eq!(row_growth_count(&rows[0], 30), Some(25));
    }
}
