use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::model::ForecastModel;
use super::series::{finite, make_future_dates, ForecastPoint, SeriesPoint};
use super::ForecastError;

/// Runs a [`ForecastModel`] over one or many series with a fixed horizon.
#[derive(Clone)]
pub struct ForecastEngine {
    model: Arc<dyn ForecastModel>,
    horizon: usize,
    min_points: usize,
}

impl ForecastEngine {
    pub fn new(
        model: Arc<dyn ForecastModel>,
        horizon: usize,
        min_points: usize,
    ) -> Result<Self, ForecastError> {
        if horizon == 0 {
            return Err(ForecastError::InvalidHorizon(
                "horizon must be at least one day".to_string(),
            ));
        }
        Ok(Self {
            model,
            horizon,
            min_points: min_points.max(2),
        })
    }

    /// Forecasts one series.
    ///
    /// Returns `Ok(None)` when the series has fewer than `min_points`
    /// observations. Otherwise the result holds every historical date
    /// (with `real` set) followed by `horizon` future dates.
    pub fn forecast(
        &self,
        label: &str,
        series: &[SeriesPoint],
    ) -> Result<Option<Vec<ForecastPoint>>, ForecastError> {
        if series.len() < self.min_points {
            info!(
                entity = label,
                points = series.len(),
                "Skipping series below minimum history"
            );
            return Ok(None);
        }

        let last = series[series.len() - 1].ds;
        let mut dates: Vec<_> = series.iter().map(|p| p.ds).collect();
        dates.extend(make_future_dates(last, self.horizon));

        let predictions = self.model.fit_predict(series, &dates)?;
        if predictions.len() != dates.len() {
            return Err(ForecastError::ModelError(format!(
                "{} returned {} values for {} dates",
                self.model.name(),
                predictions.len(),
                dates.len()
            )));
        }

        let points = dates
            .into_iter()
            .zip(predictions)
            .enumerate()
            .map(|(i, (ds, yhat))| ForecastPoint {
                ds,
                yhat: finite(yhat),
                real: series.get(i).map(|p| p.y),
            })
            .collect();

        Ok(Some(points))
    }

    /// Forecasts every series in `series`. Series below the minimum are
    /// skipped; a series whose fit fails is logged and skipped so one bad
    /// entity never aborts the others.
    pub fn forecast_many<K>(
        &self,
        kind: &str,
        series: &BTreeMap<K, Vec<SeriesPoint>>,
    ) -> BTreeMap<K, Vec<ForecastPoint>>
    where
        K: Ord + Clone + Display,
    {
        let mut results = BTreeMap::new();
        for (key, points) in series {
            let label = format!("{kind}:{key}");
            match self.forecast(&label, points) {
                Ok(Some(forecast)) => {
                    results.insert(key.clone(), forecast);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(entity = %label, error = %e, "Forecast failed; entity skipped");
                }
            }
        }
        debug!(
            kind,
            requested = series.len(),
            produced = results.len(),
            "Batch forecast finished"
        );
        results
    }
}

impl std::fmt::Debug for ForecastEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastEngine")
            .field("model", &self.model.name())
            .field("horizon", &self.horizon)
            .field("min_points", &self.min_points)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    fn series(values: &[f64]) -> Vec<SeriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, y)| SeriesPoint::new(start() + Duration::days(i as i64), *y))
            .collect()
    }

    fn engine(horizon: usize) -> ForecastEngine {
        ForecastEngine::new(Arc::new(MeanModel), horizon, 2).unwrap()
    }

    struct MeanModel;

    impl ForecastModel for MeanModel {
        fn name(&self) -> &str {
            "mean"
        }

        fn fit_predict(
            &self,
            history: &[SeriesPoint],
            dates: &[NaiveDate],
        ) -> Result<Vec<f64>, ForecastError> {
            let mean = history.iter().map(|p| p.y).sum::<f64>() / history.len() as f64;
            Ok(vec![mean; dates.len()])
        }
    }

    struct FailingModel;

    impl ForecastModel for FailingModel {
        fn name(&self) -> &str {
            "failing"
        }

        fn fit_predict(
            &self,
            _history: &[SeriesPoint],
            _dates: &[NaiveDate],
        ) -> Result<Vec<f64>, ForecastError> {
            Err(ForecastError::ModelError("diverged".into()))
        }
    }

    struct NanModel;

    impl ForecastModel for NanModel {
        fn name(&self) -> &str {
            "nan"
        }

        fn fit_predict(
            &self,
            _history: &[SeriesPoint],
            dates: &[NaiveDate],
        ) -> Result<Vec<f64>, ForecastError> {
            Ok(vec![f64::NAN; dates.len()])
        }
    }

    #[test]
    fn week_of_history_yields_seven_future_days() {
        let history = series(&[10.0, 12.0, 9.0, 11.0, 14.0, 10.0, 13.0]);
        let forecast = engine(7).forecast("general", &history).unwrap().unwrap();

        assert_eq!(forecast.len(), 14);
        let future: Vec<_> = forecast.iter().filter(|p| p.real.is_none()).collect();
        assert_eq!(future.len(), 7);
        for (i, point) in future.iter().enumerate() {
            assert_eq!(point.ds, start() + Duration::days(7 + i as i64));
            assert!(point.yhat.unwrap() >= 0.0);
        }
        for (point, observed) in forecast.iter().zip(&history) {
            assert_eq!(point.ds, observed.ds);
            assert_eq!(point.real, Some(observed.y));
        }
    }

    #[test]
    fn single_point_series_is_skipped() {
        let history = series(&[5.0]);
        assert_eq!(engine(7).forecast("product:1", &history).unwrap(), None);
    }

    #[test]
    fn zero_horizon_is_rejected() {
        assert!(matches!(
            ForecastEngine::new(Arc::new(MeanModel), 0, 2),
            Err(ForecastError::InvalidHorizon(_))
        ));
    }

    #[test]
    fn non_finite_predictions_become_none() {
        let engine = ForecastEngine::new(Arc::new(NanModel), 2, 2).unwrap();
        let forecast = engine.forecast("x", &series(&[1.0, 2.0])).unwrap().unwrap();
        assert!(forecast.iter().all(|p| p.yhat.is_none()));
    }

    #[test]
    fn forecast_many_skips_short_and_failing_series() {
        let mut input = BTreeMap::new();
        input.insert(1, series(&[3.0, 4.0, 5.0]));
        input.insert(2, series(&[7.0]));
        input.insert(3, series(&[1.0, 1.0]));

        let out = engine(3).forecast_many("product", &input);
        assert_eq!(out.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(out[&1].len(), 6);

        let failing = ForecastEngine::new(Arc::new(FailingModel), 3, 2).unwrap();
        assert!(failing.forecast_many("product", &input).is_empty());
    }
}
