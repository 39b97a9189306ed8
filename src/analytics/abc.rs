use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::round_to;
use crate::entities::ProductId;

/// Cumulative share of total sales (percent) up to which products are `A`.
pub const A_THRESHOLD: f64 = 70.0;
/// Cumulative share up to which products are `B`; the rest are `C`.
pub const B_THRESHOLD: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbcCategory {
    A,
    B,
    C,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcEntry {
    #[serde(rename = "id_producto")]
    pub product_id: ProductId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "total_vendido")]
    pub total_sold: f64,
    #[serde(rename = "porcentaje")]
    pub share: f64,
    #[serde(rename = "porcentaje_acumulado")]
    pub cumulative_share: f64,
    #[serde(rename = "categoria")]
    pub category: AbcCategory,
}

/// Pareto segmentation of products by total quantity sold.
///
/// Products are ranked by total descending (ties by ascending id). A product
/// is `A` while the cumulative share including it is at most 70%, `B` up to
/// 90%, `C` beyond. With a zero grand total every product is `C`.
pub fn classify_abc(
    totals: &BTreeMap<ProductId, f64>,
    names: &BTreeMap<ProductId, String>,
) -> Vec<AbcEntry> {
    let mut ranked: Vec<(ProductId, f64)> = totals.iter().map(|(id, t)| (*id, *t)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let grand_total: f64 = ranked.iter().map(|(_, t)| t).sum();
    let mut running = 0.0;

    ranked
        .into_iter()
        .map(|(product_id, total_sold)| {
            running += total_sold;
            let (share, cumulative_share, category) = if grand_total > 0.0 {
                // compare without dividing so exact boundaries stay exact
                let category = if running * 100.0 <= A_THRESHOLD * grand_total {
                    AbcCategory::A
                } else if running * 100.0 <= B_THRESHOLD * grand_total {
                    AbcCategory::B
                } else {
                    AbcCategory::C
                };
                (
                    total_sold / grand_total * 100.0,
                    running / grand_total * 100.0,
                    category,
                )
            } else {
                (0.0, 0.0, AbcCategory::C)
            };

            AbcEntry {
                product_id,
                name: display_name(names, product_id),
                total_sold,
                share: round_to(share, 2),
                cumulative_share: round_to(cumulative_share, 2),
                category,
            }
        })
        .collect()
}

pub(crate) fn display_name(names: &BTreeMap<ProductId, String>, id: ProductId) -> String {
    names
        .get(&id)
        .cloned()
        .unwrap_or_else(|| format!("Producto {id}"))
}
