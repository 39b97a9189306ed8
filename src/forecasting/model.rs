use std::collections::BTreeMap;

use augurs::{
    ets::AutoETS,
    forecaster::{transforms::LinearInterpolator, Forecaster, Transformer},
    mstl::MSTLModel,
    prelude::Fit,
    Forecast,
};
use chrono::{Duration, NaiveDate};
use tracing::debug;

use super::holidays::HolidayCalendar;
use super::series::SeriesPoint;
use super::ForecastError;

/// A model that can be fit to a daily series and evaluated at arbitrary dates.
pub trait ForecastModel: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Fits the model to `history` and returns one raw prediction per entry
    /// of `dates`. Values may be non-finite; callers normalise them.
    fn fit_predict(
        &self,
        history: &[SeriesPoint],
        dates: &[NaiveDate],
    ) -> Result<Vec<f64>, ForecastError>;
}

/// Days of gap-filled history needed before weekly seasonality is modelled.
pub const WEEKLY_MIN_SPAN_DAYS: usize = 14;

/// Shorter gap-filled series, and constant ones, are held at their mean level.
pub const MIN_MODEL_DAYS: usize = 7;

const WEEKLY_PERIOD: usize = 7;

/// Level requested from augurs; only the point forecast is used.
const INTERVAL_LEVEL: f64 = 0.95;

/// Daily demand model backed by `augurs`.
///
/// Series spanning two weeks or more go through MSTL with a weekly period and
/// a non-seasonal AutoETS trend; from one week up they use AutoETS alone. Holiday dates
/// are masked out of the fit (the interpolator fills them) and their mean
/// residual is added back on every covered date. Output is clamped at zero.
#[derive(Debug, Clone, Default)]
pub struct DemandModel {
    holidays: Option<HolidayCalendar>,
}

impl DemandModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_holidays(mut self, calendar: HolidayCalendar) -> Self {
        if !calendar.is_empty() {
            self.holidays = Some(calendar);
        }
        self
    }

    /// Fits `history` and forecasts `steps` days past its last date.
    pub fn fit(&self, history: &[SeriesPoint], steps: usize) -> Result<DemandFit, ForecastError> {
        validate_history(history)?;
        let DailyFrame { origin, observed } = DailyFrame::from_history(history);

        let masked = self.masked_values(origin, &observed);
        let seasonal = observed.len() >= WEEKLY_MIN_SPAN_DAYS;

        let (fitted, future) = if observed.len() < MIN_MODEL_DAYS || is_flat(&observed) {
            let level = observed.iter().sum::<f64>() / observed.len() as f64;
            (vec![level; observed.len()], vec![level; steps])
        } else if seasonal {
            let trend = AutoETS::non_seasonal().into_trend_model();
            run_forecaster(MSTLModel::new(vec![WEEKLY_PERIOD], trend), &masked, steps)?
        } else {
            run_forecaster(AutoETS::non_seasonal(), &masked, steps)?
        };

        let holiday_effect = match &self.holidays {
            Some(calendar) => {
                let residuals: Vec<f64> = observed
                    .iter()
                    .zip(&fitted)
                    .enumerate()
                    .filter(|(i, _)| calendar.covers(origin + Duration::days(*i as i64)))
                    .map(|(_, (y, f))| y - f)
                    .filter(|r| r.is_finite())
                    .collect();
                if residuals.is_empty() {
                    0.0
                } else {
                    residuals.iter().sum::<f64>() / residuals.len() as f64
                }
            }
            None => 0.0,
        };

        debug!(
            days = observed.len(),
            seasonal,
            holiday_effect,
            "demand model fitted"
        );

        Ok(DemandFit {
            origin,
            fitted,
            future,
            seasonal,
            holiday_effect,
            holidays: self.holidays.clone(),
        })
    }

    /// Interior holiday dates become NaN so the interpolator bridges them.
    /// The first and last day stay observed to keep the series anchored.
    fn masked_values(&self, origin: NaiveDate, observed: &[f64]) -> Vec<f64> {
        let Some(calendar) = &self.holidays else {
            return observed.to_vec();
        };
        let last = observed.len().saturating_sub(1);
        observed
            .iter()
            .enumerate()
            .map(|(i, y)| {
                let date = origin + Duration::days(i as i64);
                if i > 0 && i < last && calendar.covers(date) {
                    f64::NAN
                } else {
                    *y
                }
            })
            .collect()
    }
}

impl ForecastModel for DemandModel {
    fn name(&self) -> &str {
        "augurs"
    }

    fn fit_predict(
        &self,
        history: &[SeriesPoint],
        dates: &[NaiveDate],
    ) -> Result<Vec<f64>, ForecastError> {
        let last = history.last().map(|p| p.ds);
        let steps = match last {
            Some(last) => dates
                .iter()
                .filter(|d| **d > last)
                .map(|d| (*d - last).num_days() as usize)
                .max()
                .unwrap_or(0),
            None => 0,
        };
        Ok(self.fit(history, steps)?.predict(dates))
    }
}

/// A fitted [`DemandModel`]: one value per history day plus the forecast tail.
#[derive(Debug, Clone)]
pub struct DemandFit {
    pub origin: NaiveDate,
    pub fitted: Vec<f64>,
    pub future: Vec<f64>,
    pub seasonal: bool,
    pub holiday_effect: f64,
    holidays: Option<HolidayCalendar>,
}

impl DemandFit {
    /// Last date of the gap-filled history.
    pub fn last_date(&self) -> NaiveDate {
        self.origin + Duration::days(self.fitted.len() as i64 - 1)
    }

    /// One value per entry of `dates`. Dates outside the fitted range are NaN.
    pub fn predict(&self, dates: &[NaiveDate]) -> Vec<f64> {
        dates.iter().map(|date| self.value_at(*date)).collect()
    }

    fn value_at(&self, date: NaiveDate) -> f64 {
        let last = self.last_date();
        let base = if date > last {
            let idx = (date - last).num_days() as usize - 1;
            self.future.get(idx).copied().unwrap_or(f64::NAN)
        } else if date >= self.origin {
            self.fitted[(date - self.origin).num_days() as usize]
        } else {
            f64::NAN
        };
        let adjusted = match &self.holidays {
            Some(calendar) if calendar.covers(date) => base + self.holiday_effect,
            _ => base,
        };
        clamp(adjusted)
    }
}

/// Fits `model` behind a gap-filling interpolator and returns the in-sample
/// values together with `steps` future points.
fn run_forecaster<M>(
    model: M,
    values: &[f64],
    steps: usize,
) -> Result<(Vec<f64>, Vec<f64>), ForecastError>
where
    M: Fit,
{
    let transformers: Vec<Box<dyn Transformer>> = vec![Box::new(LinearInterpolator::default())];
    let mut forecaster = Forecaster::new(model).with_transformers(transformers);

    forecaster
        .fit(values)
        .map_err(|e| ForecastError::ModelError(format!("fit: {e}")))?;

    let in_sample: Forecast = forecaster
        .predict_in_sample(INTERVAL_LEVEL)
        .map_err(|e| ForecastError::ModelError(format!("in-sample: {e}")))?;

    let future = if steps == 0 {
        Vec::new()
    } else {
        forecaster
            .predict(steps, INTERVAL_LEVEL)
            .map_err(|e| ForecastError::ModelError(format!("predict: {e}")))?
            .point
    };

    Ok((in_sample.point, future))
}

fn clamp(value: f64) -> f64 {
    // Demand cannot go negative; NaN passes through untouched.
    if value < 0.0 {
        0.0
    } else {
        value
    }
}

fn is_flat(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// History laid out one value per calendar day, missing days as zero sales.
struct DailyFrame {
    origin: NaiveDate,
    observed: Vec<f64>,
}

impl DailyFrame {
    fn from_history(history: &[SeriesPoint]) -> Self {
        let by_date: BTreeMap<NaiveDate, f64> = history.iter().map(|p| (p.ds, p.y)).collect();
        let origin = history[0].ds;
        let last = history[history.len() - 1].ds;
        let mut observed = Vec::with_capacity((last - origin).num_days() as usize + 1);
        let mut current = origin;
        while current <= last {
            observed.push(by_date.get(&current).copied().unwrap_or(0.0));
            current += Duration::days(1);
        }
        Self { origin, observed }
    }
}

fn validate_history(history: &[SeriesPoint]) -> Result<(), ForecastError> {
    if history.len() < 2 {
        return Err(ForecastError::InsufficientData {
            required: 2,
            actual: history.len(),
        });
    }
    for pair in history.windows(2) {
        if pair[1].ds <= pair[0].ds {
            return Err(ForecastError::UnorderedSeries(pair[1].ds));
        }
    }
    if let Some(bad) = history.iter().find(|p| !p.y.is_finite()) {
        return Err(ForecastError::NonFiniteObservation(bad.ds));
    }
    Ok(())
}
