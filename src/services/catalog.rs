use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::collections::HashSet;
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{Course, Cuisine, Dish, MealType},
};

/// Reasons a set of dishes cannot form a catalog
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("duplicate dish id {0}")]
    DuplicateId(i64),

    #[error("dish {id} has an invalid price {price}")]
    InvalidPrice { id: i64, price: f64 },

    #[error("dish {id} has spiciness {spiciness}, expected 0 to 10")]
    InvalidSpiciness { id: i64, spiciness: u8 },

    #[error("dish {0} has an empty name")]
    EmptyName(i64),

    #[error("dish {id} has an unreadable {field}: {detail}")]
    Malformed {
        id: i64,
        field: &'static str,
        detail: String,
    },
}

/// Validated, immutable snapshot of every dish, ordered by id
#[derive(Debug, Clone)]
pub struct Catalog {
    dishes: Vec<Dish>,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    pub fn new(mut dishes: Vec<Dish>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(dishes.len());

        for dish in &dishes {
            if !seen.insert(dish.id) {
                return Err(CatalogError::DuplicateId(dish.id));
            }
            if !dish.price.is_finite() || dish.price < 0.0 {
                return Err(CatalogError::InvalidPrice {
                    id: dish.id,
                    price: dish.price,
                });
            }
            if dish.spiciness > 10 {
                return Err(CatalogError::InvalidSpiciness {
                    id: dish.id,
                    spiciness: dish.spiciness,
                });
            }
            if dish.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(dish.id));
            }
        }

        dishes.sort_by_key(|dish| dish.id);

        Ok(Self {
            dishes,
            loaded_at: Utc::now(),
        })
    }

    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }

    pub fn get(&self, id: i64) -> Option<&Dish> {
        self.dishes
            .binary_search_by_key(&id, |dish| dish.id)
            .ok()
            .map(|index| &self.dishes[index])
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Source of catalog snapshots
///
/// Handlers load a fresh snapshot per request and hand it to the engine,
/// which never performs I/O itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Loads and validates every dish
    async fn load(&self) -> AppResult<Catalog>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

#[derive(Debug, FromRow)]
struct DishRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    cuisine: String,
    spiciness: i64,
    is_halal: bool,
    is_vegetarian: bool,
    meal_type: String,
    meal_times: String,
    course: String,
    attributes: String,
}

impl TryFrom<DishRow> for Dish {
    type Error = CatalogError;

    fn try_from(row: DishRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let malformed = |field: &'static str, detail: String| CatalogError::Malformed {
            id,
            field,
            detail,
        };

        Ok(Dish {
            id,
            cuisine: row
                .cuisine
                .parse::<Cuisine>()
                .map_err(|e| malformed("cuisine", e.to_string()))?,
            meal_type: row
                .meal_type
                .parse::<MealType>()
                .map_err(|e| malformed("meal_type", e.to_string()))?,
            course: row
                .course
                .parse::<Course>()
                .map_err(|e| malformed("course", e.to_string()))?,
            spiciness: u8::try_from(row.spiciness)
                .map_err(|_| malformed("spiciness", row.spiciness.to_string()))?,
            meal_times: serde_json::from_str(&row.meal_times)
                .map_err(|e| malformed("meal_times", e.to_string()))?,
            attributes: serde_json::from_str(&row.attributes)
                .map_err(|e| malformed("attributes", e.to_string()))?,
            name: row.name,
            description: row.description,
            price: row.price,
            is_halal: row.is_halal,
            is_vegetarian: row.is_vegetarian,
        })
    }
}

/// Catalog stored in the `dishes` table of a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for SqliteCatalog {
    #[instrument(skip(self))]
    async fn load(&self) -> AppResult<Catalog> {
        let rows = sqlx::query_as::<_, DishRow>(
            r#"
            SELECT id, name, description, price, cuisine, spiciness,
                   is_halal, is_vegetarian, meal_type, meal_times, course, attributes
            FROM dishes
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let dishes = rows
            .into_iter()
            .map(Dish::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = dishes.len(), "Loaded dishes");

        Catalog::new(dishes).map_err(AppError::from)
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
