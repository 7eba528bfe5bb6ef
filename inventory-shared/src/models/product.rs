/// Product model and database operations
///
/// Products are keyed by name. `quantity` is the stock count; it only ever
/// goes down through [`Product::decrement_stock`], which refuses to take it
/// below zero.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE products (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name TEXT NOT NULL UNIQUE,
///     price DOUBLE PRECISION NOT NULL,
///     quantity BIGINT NOT NULL DEFAULT 0 CHECK (quantity >= 0),
///     image TEXT,
///     extra JSONB NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use super::Extra;
use crate::query::{like_pattern, PageWindow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, types::Json, FromRow, PgExecutor, PgPool, Row};
use uuid::Uuid;

/// Product keys that never come from a client's extra fields
pub const RESERVED_PRODUCT_KEYS: &[&str] = &["name", "price", "quantity", "image"];

const PRODUCT_COLUMNS: &str = "id, name, price, quantity, image, extra, created_at";

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,

    /// Units in stock
    pub quantity: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,

    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let Json(extra): Json<Extra> = row.try_get("extra")?;

        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            quantity: row.try_get("quantity")?,
            image: row.try_get("image")?,
            extra,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Input for adding a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub image: Option<String>,
    pub extra: Extra,
}

impl Product {
    /// Inserts a product unless the name is taken
    ///
    /// Returns `None` for a duplicate name; the existing row is untouched.
    pub async fn create(pool: &PgPool, data: CreateProduct) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO products (name, price, quantity, image, extra)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO NOTHING
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Product>(&query)
            .bind(data.name)
            .bind(data.price)
            .bind(data.quantity)
            .bind(data.image)
            .bind(Json(data.extra))
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");

        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Counts products whose name contains `search` (all when `None`)
    pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM products
            WHERE ($1::text IS NULL OR name ILIKE $1 ESCAPE '\')
            "#,
        )
        .bind(search.map(like_pattern))
        .fetch_one(pool)
        .await
    }

    /// Lists one window of products matching `search`, oldest first
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        window: PageWindow,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE ($1::text IS NULL OR name ILIKE $1 ESCAPE '\')
            ORDER BY created_at, id
            LIMIT $2 OFFSET $3
            "#
        );

        sqlx::query_as::<_, Product>(&query)
            .bind(search.map(like_pattern))
            .bind(i64::try_from(window.limit).unwrap_or(i64::MAX))
            .bind(i64::try_from(window.offset).unwrap_or(i64::MAX))
            .fetch_all(pool)
            .await
    }

    /// Takes `amount` units out of stock if at least that many remain
    ///
    /// The check and the decrement are a single conditional update.
    /// Returns the updated product, or `None` when the product is missing
    /// or short on stock.
    pub async fn decrement_stock<'e, E>(
        executor: E,
        id: Uuid,
        amount: i64,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            r#"
            UPDATE products
            SET quantity = quantity - $2
            WHERE id = $1 AND quantity >= $2
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(amount)
            .fetch_optional(executor)
            .await
    }
}
