use serde::{Deserialize, Serialize};

use super::stock::{StockAlert, StockLevel};
use crate::entities::prediction::SuggestionType;

/// Forecast/history ratio above which stock should grow.
pub const INCREASE_RATIO: f64 = 1.10;
/// Forecast/history ratio below which stock should shrink.
pub const REDUCE_RATIO: f64 = 0.90;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "tipo")]
    pub kind: SuggestionType,
    #[serde(rename = "descripcion")]
    pub description: String,
}

/// Restock suggestion for one product.
pub fn suggest(
    name: &str,
    alert: Option<&StockAlert>,
    forecast_mean: f64,
    historical_mean: f64,
) -> Suggestion {
    if let Some(alert) = alert.filter(|a| a.level == StockLevel::Critical) {
        return Suggestion {
            kind: SuggestionType::CriticalStock,
            description: format!(
                "Stock crítico de {name}: quedan {:.1} días de cobertura, reponer de inmediato.",
                alert.days_remaining
            ),
        };
    }

    if historical_mean <= 0.0 {
        return if forecast_mean > 0.0 {
            Suggestion {
                kind: SuggestionType::IncreaseStock,
                description: format!("Se espera demanda nueva de {name}, incrementar el stock."),
            }
        } else {
            keep(name)
        };
    }

    let ratio = forecast_mean / historical_mean;
    let change = (ratio - 1.0) * 100.0;
    if ratio > INCREASE_RATIO {
        Suggestion {
            kind: SuggestionType::IncreaseStock,
            description: format!(
                "Se espera un aumento de la demanda de {name} ({change:+.0}%), incrementar el stock."
            ),
        }
    } else if ratio < REDUCE_RATIO {
        Suggestion {
            kind: SuggestionType::ReduceStock,
            description: format!(
                "Se espera una caída de la demanda de {name} ({change:+.0}%), reducir el stock."
            ),
        }
    } else {
        keep(name)
    }
}

fn keep(name: &str) -> Suggestion {
    Suggestion {
        kind: SuggestionType::KeepStock,
        description: format!("Demanda estable para {name}, mantener el stock actual."),
    }
}
