use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One observation of a daily series: quantity `y` sold on `ds`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub ds: NaiveDate,
    pub y: f64,
}

impl SeriesPoint {
    pub fn new(ds: NaiveDate, y: f64) -> Self {
        Self { ds, y }
    }
}

/// A forecast value for one date.
///
/// `real` carries the observed quantity for historical dates and is `None`
/// for future ones. Non-finite predictions are stored as `None` and
/// serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ds: NaiveDate,
    pub yhat: Option<f64>,
    #[serde(default)]
    pub real: Option<f64>,
}

/// Maps NaN and infinities to `None`.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// The `horizon` dates immediately following `last`.
pub fn make_future_dates(last: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    (1..=horizon as i64)
        .map(|offset| last + Duration::days(offset))
        .collect()
}

/// Collapses `(date, quantity)` pairs into a date-ordered series, summing
/// quantities that share a date.
pub fn series_from_pairs<I>(pairs: I) -> Vec<SeriesPoint>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, quantity) in pairs {
        *by_date.entry(date).or_insert(0.0) += quantity;
    }
    by_date
        .into_iter()
        .map(|(ds, y)| SeriesPoint { ds, y })
        .collect()
}

/// Sums several series date by date.
pub fn sum_series<'a, I>(series: I) -> Vec<SeriesPoint>
where
    I: IntoIterator<Item = &'a [SeriesPoint]>,
{
    series_from_pairs(
        series
            .into_iter()
            .flat_map(|points| points.iter().map(|p| (p.ds, p.y))),
    )
}

pub fn total(series: &[SeriesPoint]) -> f64 {
    series.iter().map(|p| p.y).sum()
}

/// Mean quantity per observed day; 0 for an empty series.
pub fn mean(series: &[SeriesPoint]) -> f64 {
    if series.is_empty() {
        0.0
    } else {
        total(series) / series.len() as f64
    }
}

/// Mean predicted value over the future (`real == None`) part of a forecast.
pub fn future_mean(points: &[ForecastPoint]) -> Option<f64> {
    let future: Vec<f64> = points
        .iter()
        .filter(|p| p.real.is_none())
        .filter_map(|p| p.yhat)
        .collect();
    if future.is_empty() {
        None
    } else {
        Some(future.iter().sum::<f64>() / future.len() as f64)
    }
}
