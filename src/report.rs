use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::analytics::{AbcCategory, AbcEntry, SeasonalAlert, StockAlert, Suggestion, TrendRecord};
use crate::entities::ProductId;
use crate::errors::ServiceError;
use crate::forecasting::ForecastPoint;

/// The JSON document consumed by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub general: Vec<ForecastPoint>,
    #[serde(rename = "por_producto")]
    pub by_product: BTreeMap<ProductId, ProductForecast>,
    #[serde(rename = "por_combo")]
    pub by_combo: BTreeMap<String, Vec<ForecastPoint>>,
    #[serde(
        rename = "producto_tendencia",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub trending_product: Option<TrendRecord>,
    #[serde(rename = "productos_estacionales")]
    pub seasonal_products: Vec<SeasonalAlert>,
    #[serde(rename = "alertas_stock")]
    pub stock_alerts: Vec<StockAlert>,
    #[serde(rename = "segmentacion_abc")]
    pub abc_segmentation: Vec<AbcEntry>,
    #[serde(rename = "generado_en")]
    pub generated_at: DateTime<Utc>,
    #[serde(rename = "total_predicciones_bd")]
    pub persisted_predictions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductForecast {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "categoria_abc")]
    pub abc_category: Option<AbcCategory>,
    #[serde(rename = "total_vendido")]
    pub total_sold: f64,
    #[serde(rename = "promedio_diario")]
    pub daily_mean: f64,
    /// Sum of predicted quantities over the horizon.
    #[serde(rename = "demanda_prevista")]
    pub expected_demand: f64,
    #[serde(rename = "sugerencia")]
    pub suggestion: Suggestion,
    #[serde(rename = "pronostico")]
    pub forecast: Vec<ForecastPoint>,
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "forecast.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes the report as pretty-printed JSON, replacing `path` atomically.
#[instrument(skip(report), fields(path = %path.display()))]
pub async fn write_report(path: &Path, report: &ForecastReport) -> Result<(), ServiceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let body = serde_json::to_vec_pretty(report)?;
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, &body).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }

    info!(bytes = body.len(), "Forecast report written");
    Ok(())
}

/// Parses a report previously written by [`write_report`].
pub async fn read_report(path: &Path) -> Result<ForecastReport, ServiceError> {
    let body = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&body)?)
}
