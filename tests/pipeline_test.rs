mod common;

use assert_matches::assert_matches;
use common::{at, day, run_time, seed_history, static_combos, TestDb, PAID, PENDING};
use demand_forecast::analytics::{AbcCategory, Season};
use demand_forecast::config::AppConfig;
use demand_forecast::db;
use demand_forecast::errors::{FailureClass, ServiceError};
use demand_forecast::forecasting::series::sum_series;
use demand_forecast::forecasting::HolidayCalendar;
use demand_forecast::pipeline::{run_on_pool, run_with_config};
use demand_forecast::report::read_report;
use demand_forecast::repositories::SalesRepository;
use demand_forecast::services::PredictionStore;

#[tokio::test]
async fn forecasts_every_product_with_enough_history() {
    let db = TestDb::new().await;
    let ids = seed_history(&db).await;

    let (report, rows) = db
        .pipeline(db.options())
        .build_report(run_time())
        .await
        .unwrap();

    assert_eq!(report.general.len(), 10 + 7);
    let keys: Vec<_> = report.by_product.keys().copied().collect();
    assert_eq!(keys, vec![ids.latte, ids.helado]);
    assert!(!report.by_product.contains_key(&ids.croissant));

    let latte = &report.by_product[&ids.latte];
    assert_eq!(latte.name, "Latte de vainilla");
    assert_eq!(latte.total_sold, 30.0);
    assert_eq!(latte.forecast.len(), 17);
    let future: Vec<_> = latte.forecast.iter().filter(|p| p.real.is_none()).collect();
    assert_eq!(future.len(), 7);
    for (i, point) in future.iter().enumerate() {
        assert_eq!(point.ds, day(10 + i as i64));
        assert!(point.yhat.unwrap() >= 0.0);
    }

    // one row per product per future date
    assert_eq!(rows.len(), 14);
    assert_eq!(report.persisted_predictions, 0);
}

#[tokio::test]
async fn unpaid_and_deleted_sales_are_ignored() {
    let db = TestDb::new().await;
    let espresso = db.product("Espresso").await;

    db.order(at(0, 9), PAID, &[(espresso, 2)]).await;
    db.order(at(1, 9), PAID, &[(espresso, 3)]).await;
    db.order(at(0, 10), PENDING, &[(espresso, 100)]).await;
    db.order_with(at(0, 11), PAID, true, &[(espresso, 100)], false)
        .await;
    db.order_with(at(1, 11), PAID, false, &[(espresso, 100)], true)
        .await;

    let repo = SalesRepository::new(db.pool.clone(), PAID);
    let history = repo.history().await.unwrap();
    let totals = history.daily_totals();
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].y, 2.0);
    assert_eq!(totals[1].y, 3.0);
    assert_eq!(history.date_range(), Some((day(0), day(1))));

    let (report, _) = db
        .pipeline(db.options())
        .build_report(run_time())
        .await
        .unwrap();
    assert_eq!(report.general[0].real, Some(2.0));
    assert_eq!(report.general[1].real, Some(3.0));
}

#[tokio::test]
async fn deleted_products_have_no_name() {
    let db = TestDb::new().await;
    let kept = db.product("Capuchino").await;
    let gone = db.product_with("Mocha", true).await;

    let repo = SalesRepository::new(db.pool.clone(), PAID);
    let names = repo.product_names().await.unwrap();
    assert_eq!(names.get(&kept).map(String::as_str), Some("Capuchino"));
    assert!(!names.contains_key(&gone));
}

#[tokio::test]
async fn analytics_are_attached_to_the_report() {
    let db = TestDb::new().await;
    let ids = seed_history(&db).await;

    let mut options = db.options();
    options.trend_window_days = 5;
    let (report, _) = db
        .pipeline(options)
        .build_report(run_time())
        .await
        .unwrap();

    let trend = report.trending_product.as_ref().unwrap();
    assert_eq!(trend.product_id, ids.latte);
    assert_eq!(trend.recent_sales, 20.0);
    assert_eq!(trend.prior_sales, 10.0);
    assert_eq!(trend.growth, 100.0);

    assert_eq!(report.abc_segmentation.len(), 3);
    assert_eq!(report.abc_segmentation[0].product_id, ids.latte);
    assert_eq!(
        report.by_product[&ids.latte].abc_category,
        Some(AbcCategory::A)
    );

    assert_eq!(report.seasonal_products.len(), 1);
    let seasonal = &report.seasonal_products[0];
    assert_eq!(seasonal.product_id, ids.helado);
    assert_eq!(seasonal.season, Season::Summer);
    assert!(!seasonal.in_season);

    for alert in &report.stock_alerts {
        assert!(report.by_product.contains_key(&alert.product_id));
    }
}

#[tokio::test]
async fn trend_is_absent_without_prior_sales() {
    let db = TestDb::new().await;
    seed_history(&db).await;

    // the default 30-day window holds the whole history, so the prior one is empty
    let (report, _) = db
        .pipeline(db.options())
        .build_report(run_time())
        .await
        .unwrap();
    assert!(report.trending_product.is_none());
}

#[tokio::test]
async fn database_combos_are_forecast() {
    let db = TestDb::new().await;
    let ids = seed_history(&db).await;
    let breakfast = db
        .combo("Desayuno", &[ids.latte, ids.croissant], false)
        .await;
    db.combo("Retirado", &[ids.helado], true).await;

    let (report, _) = db
        .pipeline(db.options())
        .build_report(run_time())
        .await
        .unwrap();

    assert_eq!(report.by_combo.len(), 1);
    let points = &report.by_combo[&breakfast.to_string()];
    assert_eq!(points.len(), 17);
    // day 3 holds latte 2 + croissant 5
    assert_eq!(points[3].real, Some(7.0));
}

#[tokio::test]
async fn static_combos_use_configured_products() {
    let db = TestDb::new().await;
    let ids = seed_history(&db).await;

    let mut options = db.options();
    static_combos(
        &mut options,
        &[("combo_1", &[ids.helado][..]), ("combo_2", &[999][..])],
    );
    let (report, _) = db.pipeline(options).build_report(run_time()).await.unwrap();

    let keys: Vec<_> = report.by_combo.keys().cloned().collect();
    assert_eq!(keys, vec!["combo_1".to_string()]);
}

#[tokio::test]
async fn run_writes_a_readable_report() {
    let db = TestDb::new().await;
    let ids = seed_history(&db).await;

    let outcome = db.pipeline(db.options()).run(run_time()).await.unwrap();
    assert!(outcome.persisted.is_none());

    let back = read_report(&db.output_path()).await.unwrap();
    assert_eq!(back, outcome.report);

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(db.output_path()).unwrap()).unwrap();
    assert!(raw["por_producto"][ids.latte.to_string()]["pronostico"].is_array());
    assert_eq!(raw["total_predicciones_bd"], 0);
}

#[tokio::test]
async fn persisting_replaces_the_active_prediction_set() {
    let db = TestDb::new().await;
    seed_history(&db).await;

    let mut options = db.options();
    options.persist_predictions = true;
    options.insert_batch_size = 4;
    let pipeline = db.pipeline(options);

    let first = pipeline.run(run_time()).await.unwrap();
    let summary = first.persisted.unwrap();
    assert_eq!(summary.soft_deleted, 0);
    assert_eq!(summary.batches, vec![4, 4, 4, 2]);
    assert_eq!(first.report.persisted_predictions, 14);

    let second = pipeline.run(run_time()).await.unwrap();
    let summary = second.persisted.unwrap();
    assert_eq!(summary.soft_deleted, 14);
    assert_eq!(summary.inserted, 14);

    let store = PredictionStore::new(db.pool.clone(), 4);
    assert_eq!(store.count_active().await.unwrap(), 14);

    let back = read_report(&db.output_path()).await.unwrap();
    assert_eq!(back.persisted_predictions, 14);
}

#[tokio::test]
async fn empty_history_fails_as_insufficient_data() {
    let db = TestDb::new().await;
    db.product("Espresso").await;

    let err = db
        .pipeline(db.options())
        .run(run_time())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InsufficientData { points: 0, .. });
    assert_eq!(err.failure_class(), FailureClass::Other);
    assert!(!db.output_path().exists());
}

#[tokio::test]
async fn one_read_feeds_overall_and_product_series() {
    let db = TestDb::new().await;
    seed_history(&db).await;

    let history = SalesRepository::new(db.pool.clone(), PAID)
        .history()
        .await
        .unwrap();
    let by_product = history.by_product();
    let overall = history.daily_totals();
    assert_eq!(overall, sum_series(by_product.values().map(Vec::as_slice)));
    assert_eq!(overall.len(), 10);
    assert_eq!(overall[3].y, 10.0);
}

#[tokio::test]
async fn unreachable_database_exits_with_connectivity_code() {
    let mut cfg = AppConfig::new(
        "sqlite:///nonexistent-dir/forecast.db?mode=ro".to_string(),
        "test".to_string(),
    );
    cfg.db_connect_timeout_secs = 1;
    cfg.db_acquire_timeout_secs = 1;

    let err = run_with_config(&cfg, run_time()).await.unwrap_err();
    assert_matches!(err, ServiceError::ConnectionError(_));
    assert_eq!(err.failure_class(), FailureClass::Connectivity);
    assert_eq!(err.failure_class().exit_code(), 2);
}

#[tokio::test]
async fn pool_is_closed_when_the_run_fails() {
    let db = TestDb::new().await;
    db.product("Espresso").await;

    let pool = db::establish_connection_from_app_config(&db.config)
        .await
        .unwrap();
    let handle = pool.clone();
    db::check_connection(&handle).await.unwrap();

    let err = run_on_pool(&db.config, pool, run_time()).await.unwrap_err();
    assert_matches!(err, ServiceError::InsufficientData { points: 0, .. });
    assert!(db::check_connection(&handle).await.is_err());
}

#[tokio::test]
async fn holidays_shift_only_the_overall_forecast() {
    let db = TestDb::new().await;
    let ids = seed_history(&db).await;
    let pastel = db.product("Pastel de tres leches").await;
    db.order(at(7, 12), PAID, &[(pastel, 20)]).await;

    let mut plain = db.options();
    plain.holidays = HolidayCalendar::new(Vec::new(), 0, 0);
    let mut festive = db.options();
    festive.holidays = HolidayCalendar::new([day(7), day(12)], 0, 0);

    let (without, _) = db.pipeline(plain).build_report(run_time()).await.unwrap();
    let (with, _) = db.pipeline(festive).build_report(run_time()).await.unwrap();

    assert_eq!(with.by_product, without.by_product);
    assert!(with.by_product.contains_key(&ids.latte));

    let yhat_on = |report: &demand_forecast::report::ForecastReport| {
        report
            .general
            .iter()
            .find(|p| p.ds == day(12))
            .and_then(|p| p.yhat)
            .unwrap()
    };
    assert!(yhat_on(&with) > yhat_on(&without) + 5.0);
}
