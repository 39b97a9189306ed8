//! Seed data script - populates the database with café demo data
//!
//! Run with: cargo run --bin seed-data
//!
//! This creates:
//! - 10 menu products (coffee, cold drinks, pastries, seasonal items)
//! - 2 combos
//! - 60 days of orders, mostly paid, with a few pending and deleted ones

use chrono::{Datelike, Duration, NaiveDateTime, Utc, Weekday};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use std::time::Duration as StdDuration;
use tracing::info;

use demand_forecast::db::run_migrations;
use demand_forecast::entities::{combo, combo_item, order, order_line, product};

const PAID: i32 = 6;
const PENDING: i32 = 2;
const DAYS: i64 = 60;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("=== Demand forecast seed data ===");

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://forecast_demo.db?mode=rwc".to_string());

    let mut options = ConnectOptions::new(database_url.clone());
    options
        .max_connections(5)
        .min_connections(1)
        .connect_timeout(StdDuration::from_secs(10))
        .acquire_timeout(StdDuration::from_secs(10));

    info!("Connecting to database: {}", database_url);
    let db = Database::connect(options).await?;
    run_migrations(&db).await?;

    info!("Creating products...");
    let products = create_products(&db).await?;
    info!("  Created {} products", products.len());

    info!("Creating combos...");
    let combos = create_combos(&db, &products).await?;
    info!("  Created {} combos", combos);

    info!("Creating orders...");
    let orders = create_orders(&db, &products).await?;
    info!("  Created {} orders with lines", orders);

    info!("=== Seed data complete ===");
    info!("Run the forecast with: APP__DATABASE_URL={} cargo run --bin demand-forecast", database_url);

    Ok(())
}

async fn create_products(db: &DatabaseConnection) -> anyhow::Result<Vec<product::Model>> {
    let products_data = vec![
        ("Espresso", dec!(8.00), 1),
        ("Capuchino", dec!(14.00), 1),
        ("Latte de vainilla", dec!(16.00), 1),
        ("Americano", dec!(10.00), 1),
        ("Frappé de moka", dec!(22.00), 2),
        ("Helado de coco", dec!(12.00), 2),
        ("Chocolate caliente", dec!(15.00), 1),
        ("Cheesecake de frutilla", dec!(18.00), 3),
        ("Croissant", dec!(9.00), 3),
        ("Api morado con pastel", dec!(11.00), 3),
    ];

    let mut created = Vec::new();
    for (name, price, category) in products_data {
        let model = product::ActiveModel {
            name: Set(name.to_string()),
            description: Set(Some(format!("{name} de la casa"))),
            category_id: Set(Some(category)),
            price: Set(price),
            available: Set(Some(true)),
            deleted: Set(Some(false)),
            ..Default::default()
        }
        .insert(db)
        .await?;
        created.push(model);
    }
    Ok(created)
}

async fn create_combos(db: &DatabaseConnection, products: &[product::Model]) -> anyhow::Result<usize> {
    let now = Utc::now().naive_utc();
    let combos = [
        ("Desayuno clásico", dec!(20.00), [1usize, 8]),
        ("Tarde dulce", dec!(30.00), [4, 7]),
    ];

    for (name, price, members) in combos {
        let created = combo::ActiveModel {
            name: Set(name.to_string()),
            description: Set(None),
            price: Set(price),
            available: Set(true),
            deleted: Set(false),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(db)
        .await?;

        for idx in members {
            combo_item::ActiveModel {
                combo_id: Set(created.id),
                product_id: Set(i64::from(products[idx].id)),
                quantity: Set(1),
                created_at: Set(Some(now)),
                updated_at: Set(Some(now)),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }
    Ok(combos.len())
}

async fn create_orders(db: &DatabaseConnection, products: &[product::Model]) -> anyhow::Result<usize> {
    let today = Utc::now().date_naive();
    let mut count = 0;

    for offset in (1..=DAYS).rev() {
        let day = today - Duration::days(offset);
        let weekend = matches!(day.weekday(), Weekday::Sat | Weekday::Sun);

        for slot in 0..4u32 {
            let at = day
                .and_hms_opt(8 + slot * 3, 15, 0)
                .unwrap_or_else(|| day.and_time(chrono::NaiveTime::MIN));
            let status = if slot == 3 && offset % 5 == 0 { PENDING } else { PAID };
            let deleted = slot == 2 && offset % 11 == 0;

            let lines: Vec<(&product::Model, i32)> = products
                .iter()
                .enumerate()
                .filter(|(idx, _)| (idx + slot as usize + offset as usize) % 3 != 0)
                .map(|(idx, p)| {
                    let base = 1 + ((offset as usize * 7 + idx * 13 + slot as usize) % 4) as i32;
                    (p, if weekend { base + 2 } else { base })
                })
                .collect();

            create_order(db, at, status, deleted, &lines).await?;
            count += 1;
        }
    }
    Ok(count)
}

async fn create_order(
    db: &DatabaseConnection,
    at: NaiveDateTime,
    status: i32,
    deleted: bool,
    lines: &[(&product::Model, i32)],
) -> anyhow::Result<()> {
    let order = order::ActiveModel {
        waiter_id: Set(1),
        registered_at: Set(Some(at)),
        status: Set(status),
        deleted: Set(Some(deleted)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    for (product, quantity) in lines {
        order_line::ActiveModel {
            order_id: Set(order.id),
            product_id: Set(product.id),
            quantity: Set(*quantity),
            comment: Set(None),
            unit_price: Set(product.price),
            deleted: Set(Some(false)),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}
