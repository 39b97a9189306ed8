use chrono::{Duration, NaiveDate, NaiveDateTime};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::entities::{combo, combo_item, order, order_line, product, ProductId};
use crate::errors::AppError;
use crate::forecasting::series::series_from_pairs;
use crate::forecasting::SeriesPoint;
use crate::repositories::Repository;

use super::BaseRepository;

/// One valid sale line: an order line on a paid, non-deleted order.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct SaleLine {
    pub registered_at: NaiveDateTime,
    pub product_id: ProductId,
    pub quantity: i32,
}

impl SaleLine {
    pub fn sale_date(&self) -> NaiveDate {
        self.registered_at.date()
    }
}

/// A named group of products forecast as one aggregated series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboDefinition {
    pub key: String,
    pub name: String,
    pub product_ids: Vec<ProductId>,
}

impl ComboDefinition {
    /// Builds combos from the configured `key -> product ids` table.
    pub fn from_static(combos: &BTreeMap<String, Vec<ProductId>>) -> Vec<Self> {
        combos
            .iter()
            .map(|(key, ids)| {
                let ids: BTreeSet<ProductId> = ids.iter().copied().collect();
                Self {
                    key: key.clone(),
                    name: key.clone(),
                    product_ids: ids.into_iter().collect(),
                }
            })
            .collect()
    }
}

/// Read access to order history, products and combos.
#[derive(Debug, Clone)]
pub struct SalesRepository {
    base: BaseRepository,
    paid_status: i32,
}

impl SalesRepository {
    pub fn new(db: Arc<DatabaseConnection>, paid_status: i32) -> Self {
        Self {
            base: BaseRepository::new(db),
            paid_status,
        }
    }

    /// Sale lines of paid orders, optionally restricted to `[from, to]`
    /// (inclusive calendar days). Deleted orders and deleted lines are
    /// excluded, as are orders without a registration timestamp.
    #[instrument(skip(self))]
    pub async fn sale_lines(
        &self,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<SaleLine>, AppError> {
        let mut query = order_line::Entity::find()
            .select_only()
            .column_as(order::Column::RegisteredAt, "registered_at")
            .column_as(order_line::Column::ProductId, "product_id")
            .column_as(order_line::Column::Quantity, "quantity")
            .join(JoinType::InnerJoin, order_line::Relation::Order.def())
            .filter(order::Column::Status.eq(self.paid_status))
            .filter(order::Column::Deleted.eq(false))
            .filter(order_line::Column::Deleted.eq(false))
            .filter(order::Column::RegisteredAt.is_not_null());

        if let Some((from, to)) = range {
            query = query
                .filter(order::Column::RegisteredAt.gte(start_of_day(from)))
                .filter(order::Column::RegisteredAt.lt(start_of_day(to + Duration::days(1))));
        }

        let lines = query
            .order_by_asc(order::Column::RegisteredAt)
            .into_model::<SaleLine>()
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;

        debug!(lines = lines.len(), "Loaded sale lines");
        Ok(lines)
    }

    /// Every valid sale line, read once. All series and window totals of a
    /// run are derived from this snapshot.
    pub async fn history(&self) -> Result<SalesHistory, AppError> {
        Ok(SalesHistory::new(self.sale_lines(None).await?))
    }

    /// Names of all non-deleted products.
    pub async fn product_names(&self) -> Result<BTreeMap<ProductId, String>, AppError> {
        let rows: Vec<(ProductId, String)> = product::Entity::find()
            .select_only()
            .column(product::Column::Id)
            .column(product::Column::Name)
            .filter(product::Column::Deleted.eq(false))
            .order_by_asc(product::Column::Id)
            .into_tuple()
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(rows.into_iter().collect())
    }

    /// Combos defined in the database, keyed by combo id.
    pub async fn combos(&self) -> Result<Vec<ComboDefinition>, AppError> {
        let rows: Vec<(i64, String, i64)> = combo_item::Entity::find()
            .select_only()
            .column(combo_item::Column::ComboId)
            .column(combo::Column::Name)
            .column(combo_item::Column::ProductId)
            .join(JoinType::InnerJoin, combo_item::Relation::Combo.def())
            .filter(combo::Column::Deleted.eq(false))
            .order_by_asc(combo_item::Column::ComboId)
            .order_by_asc(combo_item::Column::ProductId)
            .into_tuple()
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;

        let mut grouped: BTreeMap<i64, (String, BTreeSet<ProductId>)> = BTreeMap::new();
        for (combo_id, name, product_id) in rows {
            let Ok(product_id) = ProductId::try_from(product_id) else {
                debug!(combo_id, product_id, "Ignoring out-of-range product id in combo");
                continue;
            };
            grouped
                .entry(combo_id)
                .or_insert_with(|| (name, BTreeSet::new()))
                .1
                .insert(product_id);
        }

        Ok(grouped
            .into_iter()
            .map(|(id, (name, ids))| ComboDefinition {
                key: id.to_string(),
                name,
                product_ids: ids.into_iter().collect(),
            })
            .collect())
    }
}

/// In-memory view over the sale lines of one run.
#[derive(Debug, Clone, Default)]
pub struct SalesHistory {
    lines: Vec<SaleLine>,
}

impl SalesHistory {
    pub fn new(lines: Vec<SaleLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[SaleLine] {
        &self.lines
    }

    /// Total quantity sold per calendar day across all products.
    pub fn daily_totals(&self) -> Vec<SeriesPoint> {
        series_from_pairs(
            self.lines
                .iter()
                .map(|l| (l.sale_date(), f64::from(l.quantity))),
        )
    }

    /// Quantity sold per product per calendar day.
    pub fn by_product(&self) -> BTreeMap<ProductId, Vec<SeriesPoint>> {
        group_by_product(&self.lines)
    }

    /// Total quantity sold per product within `[from, to]`.
    pub fn product_totals_between(&self, from: NaiveDate, to: NaiveDate) -> BTreeMap<ProductId, f64> {
        let mut totals = BTreeMap::new();
        for line in &self.lines {
            let date = line.sale_date();
            if date >= from && date <= to {
                *totals.entry(line.product_id).or_insert(0.0) += f64::from(line.quantity);
            }
        }
        totals
    }

    /// First and last sale dates, or `None` when there are no valid sales.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.lines.iter().map(SaleLine::sale_date).min();
        let last = self.lines.iter().map(SaleLine::sale_date).max();
        first.zip(last)
    }
}

/// Groups sale lines into one date-ordered series per product.
pub fn group_by_product(lines: &[SaleLine]) -> BTreeMap<ProductId, Vec<SeriesPoint>> {
    let mut pairs: BTreeMap<ProductId, Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for line in lines {
        pairs
            .entry(line.product_id)
            .or_default()
            .push((line.sale_date(), f64::from(line.quantity)));
    }
    pairs
        .into_iter()
        .map(|(id, pairs)| (id, series_from_pairs(pairs)))
        .collect()
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}
