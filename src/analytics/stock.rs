//! Stock alerts without an inventory table.
//!
//! Stock on hand is simulated from expected demand: each product is assumed
//! to hold between 2 and 11 days of cover depending on its id, and a
//! 3-day safety minimum. The numbers are deterministic so reruns agree.

use serde::{Deserialize, Serialize};

use super::round_to;
use crate::entities::ProductId;

/// Days of cover below which an alert is `critico`.
pub const CRITICAL_DAYS: f64 = 3.0;
/// Days of demand held as safety stock.
pub const SAFETY_DAYS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockLevel {
    #[serde(rename = "critico")]
    Critical,
    #[serde(rename = "bajo")]
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAlert {
    #[serde(rename = "id_producto")]
    pub product_id: ProductId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "stock_actual")]
    pub current_stock: i64,
    #[serde(rename = "stock_minimo")]
    pub minimum_stock: i64,
    #[serde(rename = "dias_restantes")]
    pub days_remaining: f64,
    #[serde(rename = "nivel")]
    pub level: StockLevel,
}

/// Simulated `(stock on hand, minimum stock)` for a product.
pub fn simulated_stock(product_id: ProductId, daily_demand: f64) -> (i64, i64) {
    let cover_days = 2 + i64::from(product_id).rem_euclid(10);
    let current = (daily_demand * cover_days as f64).round() as i64;
    let minimum = (daily_demand * SAFETY_DAYS).ceil() as i64;
    (current, minimum)
}

/// Raises an alert when simulated stock is at or below its minimum or
/// covers fewer than `threshold_days` of demand. No demand, no alert.
pub fn stock_alert(
    product_id: ProductId,
    name: &str,
    daily_demand: f64,
    threshold_days: f64,
) -> Option<StockAlert> {
    if !daily_demand.is_finite() || daily_demand <= 0.0 {
        return None;
    }

    let (current, minimum) = simulated_stock(product_id, daily_demand);
    let days_remaining = current as f64 / daily_demand;

    if current > minimum && days_remaining >= threshold_days {
        return None;
    }

    Some(StockAlert {
        product_id,
        name: name.to_string(),
        current_stock: current,
        minimum_stock: minimum,
        days_remaining: round_to(days_remaining, 2),
        level: if days_remaining < CRITICAL_DAYS {
            StockLevel::Critical
        } else {
            StockLevel::Low
        },
    })
}
