/*!
 * # Forecasting
 *
 * Short-horizon demand forecasts for daily quantity series.
 *
 * A series is a list of `(ds, y)` points: the sale date and the quantity
 * sold that day. The [`ForecastEngine`] fits a [`ForecastModel`] to each
 * series and extrapolates a fixed number of days past the last observation.
 * The default model is [`DemandModel`], built on `augurs`: MSTL with a
 * weekly period once two weeks of history exist, plain AutoETS before that,
 * plus an optional holiday effect.
 */

pub mod engine;
pub mod holidays;
pub mod model;
pub mod series;

pub use engine::ForecastEngine;
pub use holidays::HolidayCalendar;
pub use model::{DemandFit, DemandModel, ForecastModel};
pub use series::{make_future_dates, ForecastPoint, SeriesPoint};

/// Error type for forecasting operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForecastError {
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid observation on {0}: value is not finite")]
    NonFiniteObservation(chrono::NaiveDate),

    #[error("Series is not strictly increasing by date at {0}")]
    UnorderedSeries(chrono::NaiveDate),

    #[error("Invalid forecast horizon: {0}")]
    InvalidHorizon(String),

    #[error("Forecast model error: {0}")]
    ModelError(String),
}
