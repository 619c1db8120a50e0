//! Integration tests for the chainpulse pipeline
//!
//! These tests run the full flow: raw rows into the SQLite store, out
//! through the provider boundary, normalized into a snapshot, and
//! transformed into the complete dashboard view.

use chainpulse_core::pipeline::{self, row_growth_percent};
use chainpulse_core::{
    CompareWindow, DashboardParams, DashboardView, DataSnapshot, EntityMeta, Forecast, Network,
    Store,
};
use chrono::{Duration, NaiveDate};
use tempfile::TempDir;

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
}

fn day(offset: i64) -> NaiveDate {
    base_day() + Duration::days(offset)
}

/// Seed 120 days of steady growth: 100 new accounts a day network-wide,
/// 3 deletions every fifth day, two entities splitting 30 of the new
/// accounts between them.
fn seeded_store(path: &std::path::Path) -> Store {
    let store = Store::open(&path.join("data.db")).unwrap();
    store.migrate().unwrap();

    for offset in 0..120 {
        let d = day(offset);
        store.insert_new_accounts(Network::Mainnet, d, 100).unwrap();
        if offset % 5 == 0 {
            store.insert_deleted_accounts(Network::Mainnet, d, 3).unwrap();
        }
        store
            .insert_entity_accounts(Network::Mainnet, d, "alpha", 20)
            .unwrap();
        store
            .insert_entity_accounts(Network::Mainnet, d, "beta", 10)
            .unwrap();
    }

    store
        .upsert_entity(
            Network::Mainnet,
            &EntityMeta {
                slug: "alpha".to_string(),
                title: "Alpha".to_string(),
                logo_url: Some("/logos/alpha.png".to_string()),
                website_url: None,
                has_contract: true,
            },
        )
        .unwrap();

    store
}

#[test]
fn test_store_to_view_end_to_end() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(dir.path());

    let snapshot = DataSnapshot::load(&store, Network::Mainnet, day(0), day(119)).unwrap();
    assert_eq!(snapshot.totals.len(), 120);
    assert_eq!(snapshot.per_entity.len(), 240);
    assert_eq!(snapshot.entities.len(), 1);
    assert_eq!(snapshot.last_day(), Some(day(119)));

    let view = DashboardView::compute(&snapshot, &DashboardParams::default());

    // 120 days at net 100 minus 3 every fifth day (24 deletion days).
    let expected_total = 120 * 100 - 24 * 3;
    assert_eq!(view.totals.last().unwrap().total, expected_total);

    // The stack always conserves the network total.
    for (stack, total) in view.stack_absolute.iter().zip(&view.totals) {
        assert_eq!(stack.other + stack.top_apps, total.total);
    }

    // Both entities have records on the last day, so both rank.
    assert_eq!(view.summary.len(), 2);
    assert_eq!(view.summary[0].entity_id, "alpha");
    assert_eq!(view.summary[0].total, 120 * 20);
    assert_eq!(view.summary[1].entity_id, "beta");

    // Steady linear growth projects forward without blowing up.
    match &view.forecast {
        Forecast::Projected { series, horizon } => {
            assert_eq!(*horizon, day(119 + 90));
            assert_eq!(series.len(), view.totals.len() + 1);
            let projected = series.last().unwrap();
            assert_eq!(projected.day, *horizon);
            // Roughly 99.4 net/day for another 90 days beyond the last total.
            let expected = expected_total as f64 + 90.0 * 99.4;
            assert!(
                (projected.total - expected).abs() < expected * 0.1,
                "projection {} too far from {}",
                projected.total,
                expected
            );
        }
        Forecast::InsufficientData => panic!("expected a projection"),
    }
}

#[test]
fn test_trailing_comparison_against_stored_history() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(dir.path());

    let snapshot = DataSnapshot::load(&store, Network::Mainnet, day(0), day(119)).unwrap();
    let totals = pipeline::accumulate(&snapshot.totals);
    let comparison = pipeline::compare(&totals, CompareWindow::Days30);

    // Day 29 has no anchor 30 days back; day 30 does.
    let at_29 = &comparison[29];
    assert_eq!(at_29.anchor, None);
    assert_eq!(at_29.percent, None);

    let at_30 = &comparison[30];
    assert!(at_30.anchor.is_some());
    assert!(at_30.delta.unwrap() > 0);
}

#[test]
fn test_summary_anchors_come_from_stored_series() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(dir.path());

    let snapshot = DataSnapshot::load(&store, Network::Mainnet, day(0), day(119)).unwrap();
    let view = DashboardView::compute(&snapshot, &DashboardParams::default());

    let alpha = &view.summary[0];
    // Anchor sits window+1 days back: day 119 - 31 = day 88, total 89*20.
    assert_eq!(alpha.anchor(30), Some(89 * 20));
    assert!(row_growth_percent(alpha, 30).unwrap() > 0);
}

#[test]
fn test_partial_range_fetch() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(dir.path());

    // A narrow window only sees its own rows; cumulative totals restart
    // from the first in-range day.
    let snapshot = DataSnapshot::load(&store, Network::Mainnet, day(100), day(109)).unwrap();
    assert_eq!(snapshot.totals.len(), 10);

    let view = DashboardView::compute(&snapshot, &DashboardParams::default());
    assert!(view.totals.last().unwrap().total <= 10 * 100);
}

#[test]
fn test_empty_network_is_no_data_not_error() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(dir.path());

    let snapshot = DataSnapshot::load(&store, Network::Testnet, day(0), day(119)).unwrap();
    assert!(snapshot.totals.is_empty());

    let view = DashboardView::compute(&snapshot, &DashboardParams::default());
    assert!(view.totals.is_empty());
    assert_eq!(view.forecast, Forecast::InsufficientData);
    assert!(view.summary.is_empty());
}
