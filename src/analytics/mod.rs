//! Derived analytics computed from sales history and forecasts.

pub mod abc;
pub mod seasonal;
pub mod stock;
pub mod suggestion;
pub mod trend;

pub use abc::{classify_abc, AbcCategory, AbcEntry};
pub use seasonal::{seasonal_alerts, Season, SeasonalAlert};
pub use stock::{stock_alert, StockAlert, StockLevel};
pub use suggestion::{suggest, Suggestion};
pub use trend::{top_trend, TrendRecord, TrendWindows};

/// Rounds to `places` decimal places.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
