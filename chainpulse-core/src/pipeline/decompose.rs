//! Top-N / overflow decomposition: combined total -> stacked legs.
//!
//! Splits the network total into a "top apps" leg (sum of the tracked
//! top entities per day) and an "all other" remainder leg. Growth mode
//! rebases both legs to zero at the first day of the combined series so
//! the stack shows accumulation over the window instead of absolute
//! size.

use std::collections::BTreeMap;

use crate::types::{
    CumulativePoint, CumulativeSeries, DecomposeMode, DecomposedPoint, EntitySeries,
};

/// Decompose a network total into top-apps and all-other legs.
///
/// Per day, `top_apps` sums the entity totals that have a record for
/// that day (entities without one contribute 0, not a carried-forward
/// value) and `other` is the network total minus that sum. When the
/// network total lags behind the entity data for a day, `other` falls
/// back to 0 and the stack is reconstructed from the entity total alone.
///
/// With `detail` set, both overview legs are forced to 0 for every day
/// (the overview is hidden, not deleted) and [`entity_detail`] supplies
/// the per-entity lines instead.
pub fn decompose(
    total: &CumulativeSeries,
    entities: &EntitySeries,
    mode: DecomposeMode,
    detail: bool,
) -> Vec<DecomposedPoint> {
    // Union day domain: entity sums first, then network totals set the
    // remainder.
    let mut combined: BTreeMap<_, DecomposedPoint> = BTreeMap::new();

    for series in entities.values() {
        for point in series {
            let entry = combined.entry(point.day).or_insert(DecomposedPoint {
                day: point.day,
                other: 0,
                top_apps: 0,
            });
            entry.top_apps += point.total;
        }
    }

    for point in total {
        let entry = combined.entry(point.day).or_insert(DecomposedPoint {
            day: point.day,
            other: 0,
            top_apps: 0,
        });
        entry.other = point.total - entry.top_apps;
    }

    let mut stack: Vec<DecomposedPoint> = combined.into_values().collect();

    if mode == DecomposeMode::Growth {
        rebase(&mut stack);
    }

    if detail {
        for point in &mut stack {
            point.other = 0;
            point.top_apps = 0;
        }
    }

    stack
}

/// Rebase both legs to zero at the first day, clamping negatives to 0.
///
/// `other` rebases against the bottom-of-stack baseline (its own value
/// on day 0, which is the combined stack's other-start) and `top_apps`
/// against its own first value.
fn rebase(stack: &mut [DecomposedPoint]) {
    let Some(first) = stack.first().copied() else {
        return;
    };
    for point in stack.iter_mut() {
        point.other = (point.other - first.other).max(0);
        point.top_apps = (point.top_apps - first.top_apps).max(0);
    }
}

/// Per-entity detail lines for the top-10 view.
///
/// In growth mode each entity is rebased independently, starting from 0
/// at its first appearance.
pub fn entity_detail(entities: &EntitySeries, mode: DecomposeMode) -> EntitySeries {
    entities
        .iter()
        .map(|(slug, series)| {
            let start = match mode {
                DecomposeMode::Growth => series.first().map(|p| p.total).unwrap_or(0),
                DecomposeMode::Absolute => 0,
            };
            let rebased = series
                .iter()
                .map(|p| CumulativePoint {
                    day: p.day,
                    total: p.total - start,
                })
                .collect();
            (slug.clone(), rebased)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 3, d).unwrap()
    }

    fn series(totals: &[i64]) -> CumulativeSeries {
        totals
            .iter()
            .enumerate()
            .map(|(i, &total)| CumulativePoint {
                day: day(i as u32 + 1),
                total,
            })
            .collect()
    }

    fn one_entity(totals: &[i64]) -> EntitySeries {
        let mut entities = EntitySeries::new();
        entities.insert("alpha".to_string(), series(totals));
        entities
    }

    #[test]
    fn test_absolute_conserves_total() {
        let total = series(&[10, 13, 13]);
        let entities = one_entity(&[5, 5, 5]);
        let stack = decompose(&total, &entities, DecomposeMode::Absolute, false);

        let others: Vec<_> = stack.iter().map(|p| p.other).collect();
        let tops: Vec<_> = stack.iter().map(|p| p.top_apps).collect();
        assert_eq!(others, vec![5, 8, 8]);
        assert_eq!(tops, vec![5, 5, 5]);

        for (point, total) in stack.iter().zip(&total) {
            assert_eq!(point.other + point.top_apps, total.total);
        }
    }

    #[test]
    fn test_growth_rebases_both_legs_to_zero() {
        let total = series(&[10, 13, 13]);
        let entities = one_entity(&[5, 5, 5]);
        let stack = decompose(&total, &entities, DecomposeMode::Growth, false);

        let others: Vec<_> = stack.iter().map(|p| p.other).collect();
        let tops: Vec<_> = stack.iter().map(|p| p.top_apps).collect();
        assert_eq!(others, vec![0, 3, 3]);
        assert_eq!(tops, vec![0, 0, 0]);
    }

    #[test]
    fn test_growth_clamps_negatives() {
        // Other leg shrinks below its start: 8 -> 5.
        let total = series(&[13, 11]);
        let entities = one_entity(&[5, 6]);
        let stack = decompose(&total, &entities, DecomposeMode::Growth, false);
        assert!(stack.iter().all(|p| p.other >= 0 && p.top_apps >= 0));
        assert_eq!(stack[1].other, 0);
    }

    #[test]
    fn test_missing_network_total_falls_back_to_entity_data() {
        // Network total lags one day behind the entity series.
        let total = series(&[10, 13]);
        let entities = one_entity(&[5, 5, 6]);
        let stack = decompose(&total, &entities, DecomposeMode::Absolute, false);

        assert_eq!(stack.len(), 3);
        assert_eq!(stack[2].other, 0);
        assert_eq!(stack[2].top_apps, 6);
    }

    #[test]
    fn test_day_only_in_network_data() {
        let total = series(&[10, 13]);
        let entities = one_entity(&[5]);
        let stack = decompose(&total, &entities, DecomposeMode::Absolute, false);
        assert_eq!(stack[1].other, 13);
        assert_eq!(stack[1].top_apps, 0);
    }

    #[test]
    fn test_detail_hides_overview_legs() {
        let total = series(&[10, 13, 13]);
        let entities = one_entity(&[5, 5, 5]);
        let stack = decompose(&total, &entities, DecomposeMode::Absolute, true);
        assert_eq!(stack.len(), 3);
        assert!(stack.iter().all(|p| p.other == 0 && p.top_apps == 0));
    }

    #[test]
    fn test_entity_detail_growth_rebases_from_first_appearance() {
        let mut entities = EntitySeries::new();
        entities.insert(
            "alpha".to_string(),
            vec![
                CumulativePoint { day: day(3), total: 40 },
                CumulativePoint { day: day(4), total: 55 },
            ],
        );
        let detail = entity_detail(&entities, DecomposeMode::Growth);
        let alpha = &detail["alpha"];
        assert_eq!(alpha[0].total, 0);
        assert_eq!(alpha[1].total, 15);
    }

    #[test]
    fn test_entity_detail_absolute_is_unchanged() {
        let entities = one_entity(&[5, 9]);
        let detail = entity_detail(&entities, DecomposeMode::Absolute);
        assert_eq!(detail, entities);
    }

    #[test]
    fn test_multiple_entities_sum_per_day() {
        let total = series(&[20, 30]);
        let mut entities = one_entity(&[5, 7]);
        entities.insert("beta".to_string(), series(&[3, 4]));
        let stack = decompose(&total, &entities, DecomposeMode::Absolute, false);
        assert_eq!(stack[0].top_apps, 8);
        assert_eq!(stack[0].other, 12);
        assert_eq!(stack[1].top_apps, 11);
        assert_eq!(stack[1].other, 19);
    }
}
