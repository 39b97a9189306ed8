/*!
 * # Forecast pipeline
 *
 * One batch run: extract sales history, forecast overall/product/combo
 * demand, derive analytics, optionally persist prediction rows, write the
 * JSON report.
 */

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::analytics::{
    classify_abc, seasonal_alerts, stock_alert, suggest, top_trend, AbcCategory, StockAlert,
    TrendRecord, TrendWindows,
};
use crate::config::{AppConfig, ComboSource};
use crate::db::{self, DbPool};
use crate::entities::ProductId;
use crate::errors::ServiceError;
use crate::forecasting::series::{future_mean, mean, sum_series, total};
use crate::forecasting::{
    DemandModel, ForecastEngine, ForecastPoint, HolidayCalendar, SeriesPoint,
};
use crate::report::{write_report, ForecastReport, ProductForecast};
use crate::repositories::{ComboDefinition, SalesHistory, SalesRepository};
use crate::services::{PersistSummary, PredictionRow, PredictionStore};

/// Settings for one run, resolved from [`AppConfig`] plus CLI overrides.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub output_path: PathBuf,
    pub horizon_days: usize,
    pub min_history_points: usize,
    pub paid_status_code: i32,
    pub trend_window_days: u32,
    pub persist_predictions: bool,
    pub insert_batch_size: usize,
    pub combo_source: ComboSource,
    pub static_combos: BTreeMap<String, Vec<ProductId>>,
    pub holidays: HolidayCalendar,
    pub stock_alert_days: f64,
}

impl From<&AppConfig> for PipelineOptions {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            output_path: PathBuf::from(&cfg.output_path),
            horizon_days: cfg.horizon_days as usize,
            min_history_points: cfg.min_history_points,
            paid_status_code: cfg.paid_status_code,
            trend_window_days: cfg.trend_window_days,
            persist_predictions: cfg.persist_predictions,
            insert_batch_size: cfg.insert_batch_size,
            combo_source: cfg.combo_source,
            static_combos: cfg.static_combos.clone(),
            holidays: HolidayCalendar::new(cfg.holiday_dates(), 0, cfg.holiday_upper_window),
            stock_alert_days: cfg.stock_alert_days,
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub report: ForecastReport,
    pub persisted: Option<PersistSummary>,
}

pub struct ForecastPipeline {
    db: Arc<DbPool>,
    options: PipelineOptions,
}

impl ForecastPipeline {
    pub fn new(db: Arc<DbPool>, options: PipelineOptions) -> Self {
        Self { db, options }
    }

    /// Executes the full run with `now` as the generation timestamp.
    #[instrument(skip(self), fields(run_id = %Uuid::new_v4()))]
    pub async fn run(&self, now: DateTime<Utc>) -> Result<PipelineOutcome, ServiceError> {
        let (mut report, rows) = self.build_report(now).await?;

        let persisted = if self.options.persist_predictions {
            let store = PredictionStore::new(self.db.clone(), self.options.insert_batch_size);
            let summary = store.replace_active(rows, now.naive_utc()).await?;
            report.persisted_predictions = summary.inserted;
            Some(summary)
        } else {
            None
        };

        write_report(&self.options.output_path, &report).await?;
        info!(
            path = %self.options.output_path.display(),
            products = report.by_product.len(),
            combos = report.by_combo.len(),
            persisted = report.persisted_predictions,
            "Forecast run complete"
        );

        Ok(PipelineOutcome { report, persisted })
    }

    /// Extracts, forecasts and analyses without writing anything.
    ///
    /// Returns the report (with `total_predicciones_bd` = 0) and the
    /// prediction rows that a persisting run would store.
    #[instrument(skip(self))]
    pub async fn build_report(
        &self,
        now: DateTime<Utc>,
    ) -> Result<(ForecastReport, Vec<PredictionRow>), ServiceError> {
        let opts = &self.options;
        let repo = SalesRepository::new(self.db.clone(), opts.paid_status_code);

        info!("Extracting sales history");
        let history = repo.history().await?;
        let overall = history.daily_totals();
        let by_product = history.by_product();
        let names = repo.product_names().await?;
        info!(lines = history.lines().len(), "Sales history loaded");

        let general_engine = ForecastEngine::new(
            Arc::new(DemandModel::new().with_holidays(opts.holidays.clone())),
            opts.horizon_days,
            opts.min_history_points,
        )?;
        let entity_engine = ForecastEngine::new(
            Arc::new(DemandModel::new()),
            opts.horizon_days,
            opts.min_history_points,
        )?;

        info!(days = overall.len(), "Forecasting overall demand");
        let general = general_engine
            .forecast("general", &overall)?
            .ok_or_else(|| ServiceError::InsufficientData {
                entity: "general".to_string(),
                points: overall.len(),
            })?;

        info!(products = by_product.len(), "Forecasting product demand");
        let product_forecasts = entity_engine.forecast_many("product", &by_product);

        let combos = match opts.combo_source {
            ComboSource::Database => repo.combos().await?,
            ComboSource::Static => ComboDefinition::from_static(&opts.static_combos),
        };
        let combo_series = combo_series(&combos, &by_product);
        info!(combos = combo_series.len(), "Forecasting combo demand");
        let by_combo = entity_engine.forecast_many("combo", &combo_series);

        let totals: BTreeMap<ProductId, f64> = by_product
            .iter()
            .map(|(id, series)| (*id, total(series)))
            .collect();
        let abc = classify_abc(&totals, &names);
        let categories: BTreeMap<ProductId, AbcCategory> =
            abc.iter().map(|e| (e.product_id, e.category)).collect();

        let trending_product = self.trend(&history, &overall, &names);
        let seasonal_products = seasonal_alerts(&names, now.date_naive());

        let mut report_products = BTreeMap::new();
        let mut stock_alerts: Vec<StockAlert> = Vec::new();
        let mut rows = Vec::new();

        for (product_id, forecast) in product_forecasts {
            let history = by_product
                .get(&product_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let name = names
                .get(&product_id)
                .cloned()
                .unwrap_or_else(|| format!("Producto {product_id}"));

            let historical_mean = mean(history);
            let forecast_mean = future_mean(&forecast).unwrap_or(historical_mean);

            let alert = stock_alert(product_id, &name, forecast_mean, opts.stock_alert_days);
            let suggestion = suggest(&name, alert.as_ref(), forecast_mean, historical_mean);

            rows.extend(prediction_rows(product_id, &forecast, &suggestion));

            report_products.insert(
                product_id,
                ProductForecast {
                    name,
                    abc_category: categories.get(&product_id).copied(),
                    total_sold: total(history),
                    daily_mean: crate::analytics::round_to(historical_mean, 2),
                    expected_demand: future_sum(&forecast),
                    suggestion,
                    forecast,
                },
            );
            stock_alerts.extend(alert);
        }

        info!(
            products = report_products.len(),
            alerts = stock_alerts.len(),
            rows = rows.len(),
            "Analytics computed"
        );

        let report = ForecastReport {
            general,
            by_product: report_products,
            by_combo,
            trending_product,
            seasonal_products,
            stock_alerts,
            abc_segmentation: abc,
            generated_at: now,
            persisted_predictions: 0,
        };

        Ok((report, rows))
    }

    fn trend(
        &self,
        history: &SalesHistory,
        overall: &[SeriesPoint],
        names: &BTreeMap<ProductId, String>,
    ) -> Option<TrendRecord> {
        let last = overall.last()?.ds;
        let windows = TrendWindows::ending_at(last, self.options.trend_window_days);
        let recent = history.product_totals_between(windows.recent.0, windows.recent.1);
        let prior = history.product_totals_between(windows.prior.0, windows.prior.1);

        let record = top_trend(&recent, &prior, names);
        if record.is_none() {
            warn!("No product had sales in the prior trend window");
        }
        record
    }
}

/// Connects with `cfg`, migrates when `auto_migrate` is set, runs the
/// pipeline and closes the pool whatever the outcome.
pub async fn run_with_config(
    cfg: &AppConfig,
    now: DateTime<Utc>,
) -> Result<PipelineOutcome, ServiceError> {
    let pool = db::establish_connection_from_app_config(cfg).await?;
    run_on_pool(cfg, pool, now).await
}

/// Runs against an established pool and closes it before returning.
pub async fn run_on_pool(
    cfg: &AppConfig,
    pool: DbPool,
    now: DateTime<Utc>,
) -> Result<PipelineOutcome, ServiceError> {
    let result = execute(cfg, &pool, now).await;

    if let Err(e) = db::close_pool(pool).await {
        warn!("Failed to close database pool: {}", e);
    }
    result
}

async fn execute(
    cfg: &AppConfig,
    pool: &DbPool,
    now: DateTime<Utc>,
) -> Result<PipelineOutcome, ServiceError> {
    if cfg.auto_migrate {
        db::run_migrations(pool).await?;
    }
    let pipeline = ForecastPipeline::new(Arc::new(pool.clone()), PipelineOptions::from(cfg));
    pipeline.run(now).await
}

/// Aggregated daily series for each combo: the sum of its products' series.
/// Combos none of whose products sold are left out.
pub fn combo_series(
    combos: &[ComboDefinition],
    by_product: &BTreeMap<ProductId, Vec<SeriesPoint>>,
) -> BTreeMap<String, Vec<SeriesPoint>> {
    combos
        .iter()
        .filter_map(|combo| {
            let series = sum_series(
                combo
                    .product_ids
                    .iter()
                    .filter_map(|id| by_product.get(id))
                    .map(Vec::as_slice),
            );
            (!series.is_empty()).then(|| (combo.key.clone(), series))
        })
        .collect()
}

fn future_sum(forecast: &[ForecastPoint]) -> f64 {
    let sum: f64 = forecast
        .iter()
        .filter(|p| p.real.is_none())
        .filter_map(|p| p.yhat)
        .sum();
    crate::analytics::round_to(sum, 2)
}

fn prediction_rows(
    product_id: ProductId,
    forecast: &[ForecastPoint],
    suggestion: &crate::analytics::Suggestion,
) -> Vec<PredictionRow> {
    forecast
        .iter()
        .filter(|p| p.real.is_none())
        .map(|p| PredictionRow {
            product_id,
            predicted_date: p.ds,
            predicted_demand: p.yhat.map_or(0, |y| y.round() as i32),
            suggestion_type: suggestion.kind,
            suggestion_text: suggestion.description.clone(),
        })
        .collect()
}
