//! Property-based tests for the analytics invariants.
//!
//! These tests use proptest to check the ABC partition and trend selection
//! across a wide range of sales tables.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use demand_forecast::analytics::{classify_abc, top_trend, AbcCategory};
use demand_forecast::forecasting::{DemandModel, ForecastEngine, SeriesPoint};
use proptest::prelude::*;
use std::sync::Arc;

// Strategies for generating test data
fn totals_strategy() -> impl Strategy<Value = BTreeMap<i32, f64>> {
    prop::collection::btree_map(1i32..500, (0u32..10_000).prop_map(f64::from), 0..40)
}

fn window_strategy() -> impl Strategy<Value = (BTreeMap<i32, f64>, BTreeMap<i32, f64>)> {
    (totals_strategy(), totals_strategy())
}

// Property: every product lands in exactly one category, in ranking order
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn abc_partitions_all_products(totals in totals_strategy()) {
        let entries = classify_abc(&totals, &BTreeMap::new());
        prop_assert_eq!(entries.len(), totals.len());

        let mut seen: Vec<i32> = entries.iter().map(|e| e.product_id).collect();
        seen.sort_unstable();
        let expected: Vec<i32> = totals.keys().copied().collect();
        prop_assert_eq!(seen, expected);

        // categories never go back up: A* B* C*
        let ranks: Vec<u8> = entries
            .iter()
            .map(|e| match e.category {
                AbcCategory::A => 0,
                AbcCategory::B => 1,
                AbcCategory::C => 2,
            })
            .collect();
        prop_assert!(ranks.windows(2).all(|w| w[0] <= w[1]));

        for pair in entries.windows(2) {
            prop_assert!(pair[0].total_sold >= pair[1].total_sold);
        }
    }

    #[test]
    fn abc_a_class_stays_within_threshold(totals in totals_strategy()) {
        let grand: f64 = totals.values().sum();
        let entries = classify_abc(&totals, &BTreeMap::new());
        let a_total: f64 = entries
            .iter()
            .filter(|e| e.category == AbcCategory::A)
            .map(|e| e.total_sold)
            .sum();
        prop_assert!(a_total * 100.0 <= 70.0 * grand);
    }
}

// Property: the reported trend product has the maximum growth
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn trend_is_the_maximum_among_eligible((recent, prior) in window_strategy()) {
        let record = top_trend(&recent, &prior, &BTreeMap::new());
        let eligible: Vec<(i32, f64)> = prior
            .iter()
            .filter(|(_, p)| **p > 0.0)
            .map(|(id, p)| {
                let r = recent.get(id).copied().unwrap_or(0.0);
                (*id, (r - p) / p * 100.0)
            })
            .collect();

        match record {
            None => prop_assert!(eligible.is_empty()),
            Some(record) => {
                prop_assert!(prior[&record.product_id] > 0.0);
                let best = eligible
                    .iter()
                    .map(|(_, g)| *g)
                    .fold(f64::NEG_INFINITY, f64::max);
                prop_assert!((record.growth - best).abs() <= 0.005 + 1e-9);
                let first_best = eligible
                    .iter()
                    .find(|(_, g)| *g == best)
                    .map(|(id, _)| *id);
                prop_assert_eq!(Some(record.product_id), first_best);
            }
        }
    }
}

// Property: forecasts always extend exactly `horizon` days past the history
proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn forecast_horizon_follows_history(
        values in prop::collection::vec(1u32..200, 14..60),
        horizon in 1usize..30,
    ) {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let series: Vec<SeriesPoint> = values
            .iter()
            .enumerate()
            .map(|(i, v)| SeriesPoint::new(start + Duration::days(i as i64), f64::from(*v)))
            .collect();
        let engine = ForecastEngine::new(Arc::new(DemandModel::new()), horizon, 2).unwrap();
        let forecast = engine.forecast("prop", &series).unwrap().unwrap();

        prop_assert_eq!(forecast.len(), series.len() + horizon);
        let last = series[series.len() - 1].ds;
        for (i, point) in forecast[series.len()..].iter().enumerate() {
            prop_assert_eq!(point.ds, last + Duration::days(i as i64 + 1));
            prop_assert!(point.yhat.map_or(true, |y| y >= 0.0));
            prop_assert!(point.real.is_none());
        }
    }
}
