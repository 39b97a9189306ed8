#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use tempfile::TempDir;

use demand_forecast::{
    config::{AppConfig, ComboSource},
    db::{self, DbPool},
    entities::{combo, combo_item, order, order_line, product, ProductId},
    ForecastPipeline, PipelineOptions,
};

pub const PAID: i32 = 6;
pub const PENDING: i32 = 2;

/// Helper harness backed by a migrated SQLite file in a temporary directory.
pub struct TestDb {
    pub dir: TempDir,
    pub pool: Arc<DbPool>,
    pub config: AppConfig,
}

impl TestDb {
    /// Construct a fresh, migrated database.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let db_path = dir.path().join("forecast.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.output_path = dir
            .path()
            .join("storage")
            .join("forecast.json")
            .to_string_lossy()
            .into_owned();

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        Self {
            dir,
            pool: Arc::new(pool),
            config: cfg,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.config.output_path)
    }

    pub fn options(&self) -> PipelineOptions {
        PipelineOptions::from(&self.config)
    }

    pub fn pipeline(&self, options: PipelineOptions) -> ForecastPipeline {
        ForecastPipeline::new(self.pool.clone(), options)
    }

    pub async fn product(&self, name: &str) -> ProductId {
        self.product_with(name, false).await
    }

    pub async fn product_with(&self, name: &str, deleted: bool) -> ProductId {
        product::ActiveModel {
            name: Set(name.to_string()),
            description: Set(None),
            category_id: Set(Some(1)),
            price: Set(Decimal::new(1500, 2)),
            available: Set(Some(true)),
            deleted: Set(Some(deleted)),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await
        .expect("insert product")
        .id
    }

    /// Inserts an order with `(product, quantity)` lines.
    pub async fn order(
        &self,
        at: NaiveDateTime,
        status: i32,
        lines: &[(ProductId, i32)],
    ) -> i32 {
        self.order_with(at, status, false, lines, false).await
    }

    pub async fn order_with(
        &self,
        at: NaiveDateTime,
        status: i32,
        deleted: bool,
        lines: &[(ProductId, i32)],
        lines_deleted: bool,
    ) -> i32 {
        let created = order::ActiveModel {
            waiter_id: Set(1),
            registered_at: Set(Some(at)),
            status: Set(status),
            deleted: Set(Some(deleted)),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await
        .expect("insert order");

        for (product_id, quantity) in lines {
            order_line::ActiveModel {
                order_id: Set(created.id),
                product_id: Set(*product_id),
                quantity: Set(*quantity),
                comment: Set(None),
                unit_price: Set(Decimal::new(1500, 2)),
                deleted: Set(Some(lines_deleted)),
                ..Default::default()
            }
            .insert(&*self.pool)
            .await
            .expect("insert order line");
        }
        created.id
    }

    pub async fn combo(&self, name: &str, product_ids: &[ProductId], deleted: bool) -> i64 {
        let created = combo::ActiveModel {
            name: Set(name.to_string()),
            description: Set(None),
            price: Set(Decimal::new(2500, 2)),
            available: Set(true),
            deleted: Set(deleted),
            created_at: Set(None),
            updated_at: Set(None),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await
        .expect("insert combo");

        for product_id in product_ids {
            combo_item::ActiveModel {
                combo_id: Set(created.id),
                product_id: Set(i64::from(*product_id)),
                quantity: Set(1),
                created_at: Set(None),
                updated_at: Set(None),
                ..Default::default()
            }
            .insert(&*self.pool)
            .await
            .expect("insert combo item");
        }
        created.id
    }
}

/// Day `n` of the test calendar, starting Monday 2025-03-03.
pub fn day(n: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 3).unwrap() + chrono::Duration::days(n)
}

pub fn at(n: i64, hour: u32) -> NaiveDateTime {
    day(n).and_hms_opt(hour, 30, 0).unwrap()
}

pub fn run_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 20, 6, 0, 0).unwrap()
}

/// Products seeded by [`seed_history`].
pub struct SeededIds {
    pub latte: ProductId,
    pub croissant: ProductId,
    pub helado: ProductId,
}

/// Ten days of paid sales: latte doubles from 2 to 4 halfway through,
/// helado stays at 3, croissant sells once.
pub async fn seed_history(db: &TestDb) -> SeededIds {
    let latte = db.product("Latte de vainilla").await;
    let croissant = db.product("Croissant").await;
    let helado = db.product("Helado de coco").await;

    for n in 0..10 {
        let latte_qty = if n < 5 { 2 } else { 4 };
        db.order(at(n, 9), PAID, &[(latte, latte_qty), (helado, 3)])
            .await;
    }
    db.order(at(3, 16), PAID, &[(croissant, 5)]).await;

    SeededIds {
        latte,
        croissant,
        helado,
    }
}

pub fn static_combos(options: &mut PipelineOptions, combos: &[(&str, &[ProductId])]) {
    options.combo_source = ComboSource::Static;
    options.static_combos = combos
        .iter()
        .map(|(key, ids)| (key.to_string(), ids.to_vec()))
        .collect();
}
