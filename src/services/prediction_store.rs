use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use std::ops::Range;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::entities::prediction::{self, SuggestionType};
use crate::entities::ProductId;
use crate::errors::ServiceError;

/// One forecast row destined for the `prediccion` table.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRow {
    pub product_id: ProductId,
    pub predicted_date: NaiveDate,
    pub predicted_demand: i32,
    pub suggestion_type: SuggestionType,
    pub suggestion_text: String,
}

impl PredictionRow {
    fn into_active_model(self, generated_at: NaiveDateTime) -> prediction::ActiveModel {
        prediction::ActiveModel {
            product_id: Set(self.product_id),
            predicted_date: Set(self.predicted_date),
            generated_at: Set(Some(generated_at)),
            predicted_demand: Set(self.predicted_demand),
            suggestion_type: Set(Some(self.suggestion_type)),
            suggestion_text: Set(Some(self.suggestion_text)),
            accepted: Set(Some(false)),
            acted_by: Set(None),
            deleted: Set(Some(false)),
            ..Default::default()
        }
    }
}

/// Outcome of a [`PredictionStore::replace_active`] call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersistSummary {
    /// Previously active rows marked deleted.
    pub soft_deleted: u64,
    /// Row count of each committed batch, in order.
    pub batches: Vec<usize>,
    pub inserted: usize,
}

/// Splits `total` rows into consecutive ranges of at most `batch_size`.
pub fn plan_batches(total: usize, batch_size: usize) -> Vec<Range<usize>> {
    let size = batch_size.max(1);
    (0..total)
        .step_by(size)
        .map(|start| start..(start + size).min(total))
        .collect()
}

/// Writes forecast rows to `prediccion`.
#[derive(Debug, Clone)]
pub struct PredictionStore {
    db: Arc<DatabaseConnection>,
    batch_size: usize,
}

impl PredictionStore {
    pub fn new(db: Arc<DatabaseConnection>, batch_size: usize) -> Self {
        Self {
            db,
            batch_size: batch_size.max(1),
        }
    }

    /// Replaces the active prediction set.
    ///
    /// Active rows are soft-deleted in the same transaction as the first
    /// batch; every later batch commits on its own. A failure leaves the
    /// already committed batches in place.
    #[instrument(skip(self, rows), fields(rows = rows.len(), batch_size = self.batch_size))]
    pub async fn replace_active(
        &self,
        rows: Vec<PredictionRow>,
        generated_at: NaiveDateTime,
    ) -> Result<PersistSummary, ServiceError> {
        let db = &*self.db;
        let plan = plan_batches(rows.len(), self.batch_size);

        let txn = db.begin().await.map_err(ServiceError::db_error)?;
        let soft_deleted = prediction::Entity::update_many()
            .col_expr(prediction::Column::Deleted, Expr::value(true))
            .filter(prediction::Column::Deleted.eq(false))
            .exec(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .rows_affected;
        info!(soft_deleted, "Marked previous predictions as deleted");

        let mut summary = PersistSummary {
            soft_deleted,
            ..Default::default()
        };

        if plan.is_empty() {
            txn.commit().await.map_err(ServiceError::db_error)?;
            return Ok(summary);
        }

        let mut pending: Option<DatabaseTransaction> = Some(txn);
        let mut rows = rows.into_iter();
        for (index, range) in plan.into_iter().enumerate() {
            let txn = match pending.take() {
                Some(txn) => txn,
                None => db.begin().await.map_err(ServiceError::db_error)?,
            };

            let count = range.len();
            let models: Vec<prediction::ActiveModel> = rows
                .by_ref()
                .take(count)
                .map(|row| row.into_active_model(generated_at))
                .collect();

            prediction::Entity::insert_many(models)
                .exec(&txn)
                .await
                .map_err(ServiceError::db_error)?;
            txn.commit().await.map_err(ServiceError::db_error)?;

            summary.batches.push(count);
            summary.inserted += count;
            info!(batch = index + 1, rows = count, "Committed prediction batch");
        }

        Ok(summary)
    }

    /// Number of rows not marked deleted.
    pub async fn count_active(&self) -> Result<u64, ServiceError> {
        use sea_orm::PaginatorTrait;

        prediction::Entity::find()
            .filter(prediction::Column::Deleted.eq(false))
            .count(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_cover_every_row_once() {
        let plan = plan_batches(2500, 1000);
        let sizes: Vec<usize> = plan.iter().map(|r| r.len()).collect();
        assert_eq!(sizes, vec![1000, 1000, 500]);
        assert_eq!(plan[2], 2000..2500);
    }

    #[test]
    fn no_rows_means_no_batches() {
        assert!(plan_batches(0, 1000).is_empty());
    }

    #[test]
    fn exact_multiple_has_no_tail() {
        let sizes: Vec<usize> = plan_batches(2000, 1000).iter().map(|r| r.len()).collect();
        assert_eq!(sizes, vec![1000, 1000]);
    }

    #[test]
    fn zero_batch_size_is_treated_as_one() {
        assert_eq!(plan_batches(3, 0).len(), 3);
    }
}
