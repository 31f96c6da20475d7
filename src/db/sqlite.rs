use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::{str::FromStr, time::Duration};

use crate::models::Dish;

/// Dishes of the hawker dataset.
///
/// The source lists several meal times per dish but matching uses a single
/// `meal_type`: the first listed time, with supper folded into dinner. The
/// full list is kept in `meal_times`, so a dinner request gives Hainanese
/// Chicken Rice (lunch, dinner) no meal-type bonus.
const SEED_DISHES: &str = include_str!("../../data/dishes.json");

/// Creates a SQLite connection pool
///
/// The database file is created if it does not exist. Connections are kept
/// open for the life of the pool so an in-memory database survives between
/// queries.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid database URL {database_url}"))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Applies the embedded migrations in `migrations/`
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!()
        .run(pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(())
}

/// Inserts the bundled dish dataset when the `dishes` table is empty.
///
/// Returns the number of dishes inserted, zero when the table already had rows.
pub async fn seed_catalog(pool: &SqlitePool) -> anyhow::Result<usize> {
    let mut tx = pool.begin().await?;

    let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM dishes")
        .fetch_one(&mut *tx)
        .await?;

    if existing > 0 {
        tracing::debug!(existing, "Catalog already seeded");
        return Ok(0);
    }

    let dishes: Vec<Dish> =
        serde_json::from_str(SEED_DISHES).context("Bundled dish dataset is malformed")?;

    for dish in &dishes {
        sqlx::query(
            r#"
            INSERT INTO dishes (id, name, description, price, cuisine, spiciness,
                                is_halal, is_vegetarian, meal_type, meal_times, course,
                                attributes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(dish.id)
        .bind(&dish.name)
        .bind(&dish.description)
        .bind(dish.price)
        .bind(dish.cuisine.as_str())
        .bind(i64::from(dish.spiciness))
        .bind(dish.is_halal)
        .bind(dish.is_vegetarian)
        .bind(dish.meal_type.as_str())
        .bind(serde_json::to_string(&dish.meal_times)?)
        .bind(dish.course.as_str())
        .bind(serde_json::to_string(&dish.attributes)?)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(count = dishes.len(), "Seeded dish catalog");

    Ok(dishes.len())
}
