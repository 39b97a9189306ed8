use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::abc::display_name;
use super::round_to;
use crate::entities::ProductId;

/// The two adjacent comparison windows, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendWindows {
    pub recent: (NaiveDate, NaiveDate),
    pub prior: (NaiveDate, NaiveDate),
}

impl TrendWindows {
    /// `recent` ends on `last` and spans `days` days; `prior` is the
    /// `days`-long window right before it.
    pub fn ending_at(last: NaiveDate, days: u32) -> Self {
        let days = i64::from(days.max(1));
        let recent_start = last - Duration::days(days - 1);
        let prior_end = recent_start - Duration::days(1);
        let prior_start = prior_end - Duration::days(days - 1);
        Self {
            recent: (recent_start, last),
            prior: (prior_start, prior_end),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    #[serde(rename = "id_producto")]
    pub product_id: ProductId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "ventas_actuales")]
    pub recent_sales: f64,
    #[serde(rename = "ventas_anteriores")]
    pub prior_sales: f64,
    /// Percent change from prior to recent, 2 decimals.
    #[serde(rename = "crecimiento")]
    pub growth: f64,
}

/// The product with the highest growth between the two windows.
///
/// Only products with non-zero prior sales are eligible; a product that
/// sold in the prior window but not the recent one has growth -100.
/// Ties go to the lower product id.
pub fn top_trend(
    recent: &BTreeMap<ProductId, f64>,
    prior: &BTreeMap<ProductId, f64>,
    names: &BTreeMap<ProductId, String>,
) -> Option<TrendRecord> {
    let mut best: Option<(ProductId, f64, f64, f64)> = None;

    for (&product_id, &prior_sales) in prior {
        if prior_sales <= 0.0 {
            continue;
        }
        let recent_sales = recent.get(&product_id).copied().unwrap_or(0.0);
        let growth = (recent_sales - prior_sales) / prior_sales * 100.0;

        // BTreeMap iterates ids ascending, so strict > keeps the lower id on ties
        if best.map_or(true, |(_, _, _, g)| growth > g) {
            best = Some((product_id, recent_sales, prior_sales, growth));
        }
    }

    best.map(|(product_id, recent_sales, prior_sales, growth)| TrendRecord {
        product_id,
        name: display_name(names, product_id),
        recent_sales,
        prior_sales,
        growth: round_to(growth, 2),
    })
}
