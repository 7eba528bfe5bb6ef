/// Order model, database operations and read-time enrichment
///
/// An order stores only what the customer submitted. Product name, image
/// and line total are looked up when orders are listed and never written
/// back, so a listing always reflects current product data.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE orders (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     product_id UUID NOT NULL,
///     quantity BIGINT NOT NULL CHECK (quantity > 0),
///     customer_name TEXT,
///     customer_email TEXT,
///     extra JSONB NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use super::{product::Product, Extra};
use crate::query::like_pattern;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, types::Json, FromRow, PgExecutor, PgPool, Row};
use uuid::Uuid;

/// Name shown for orders whose product no longer exists
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// Order keys that never come from a client's extra fields
///
/// Includes the derived listing fields so stored documents cannot shadow
/// them.
pub const RESERVED_ORDER_KEYS: &[&str] = &[
    "productId",
    "quantity",
    "customerName",
    "customerEmail",
    "productName",
    "productImage",
    "singleProductTotalPrice",
];

const ORDER_COLUMNS: &str =
    "o.id, o.product_id, o.quantity, o.customer_name, o.customer_email, o.extra, o.created_at";

/// A placed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,

    /// Referenced product; not enforced by the store
    pub product_id: Uuid,

    pub quantity: i64,

    #[serde(default)]
    pub customer_name: Option<String>,

    #[serde(default)]
    pub customer_email: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,

    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let Json(extra): Json<Extra> = row.try_get("extra")?;

        Ok(Self {
            id: row.try_get("id")?,
            product_id: row.try_get("product_id")?,
            quantity: row.try_get("quantity")?,
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
            extra,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Input for placing an order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateOrder {
    pub product_id: Uuid,
    pub quantity: i64,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub extra: Extra,
}

impl Order {
    /// Inserts an order row
    ///
    /// Stock is not touched here; callers pair this with
    /// [`Product::decrement_stock`] inside one transaction.
    pub async fn create<'e, E>(executor: E, data: CreateOrder) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            r#"
            INSERT INTO orders AS o (product_id, quantity, customer_name, customer_email, extra)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ORDER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Order>(&query)
            .bind(data.product_id)
            .bind(data.quantity)
            .bind(data.customer_name)
            .bind(data.customer_email)
            .bind(Json(data.extra))
            .fetch_one(executor)
            .await
    }

    /// Lists orders, oldest first
    ///
    /// With a search term, an order matches when its customer name, its
    /// customer email or the current name of its product contains the
    /// term, ignoring case.
    pub async fn list(pool: &PgPool, search: Option<&str>) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders o
            LEFT JOIN products p ON p.id = o.product_id
            WHERE $1::text IS NULL
               OR o.customer_name ILIKE $1 ESCAPE '\'
               OR o.customer_email ILIKE $1 ESCAPE '\'
               OR p.name ILIKE $1 ESCAPE '\'
            ORDER BY o.created_at, o.id
            "#
        );

        sqlx::query_as::<_, Order>(&query)
            .bind(search.map(like_pattern))
            .fetch_all(pool)
            .await
    }
}

/// An order with its product details filled in
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(flatten)]
    pub order: Order,

    pub product_name: String,

    /// Always serialized, `null` when unknown
    pub product_image: Option<String>,

    /// `price × quantity`, or 0 when the product is gone
    pub single_product_total_price: f64,
}

impl OrderLine {
    pub fn enrich(order: Order, product: Option<&Product>) -> Self {
        match product {
            Some(product) => Self {
                product_name: product.name.clone(),
                product_image: product.image.clone(),
                single_product_total_price: product.price * order.quantity as f64,
                order,
            },
            None => Self {
                product_name: UNKNOWN_PRODUCT_NAME.to_string(),
                product_image: None,
                single_product_total_price: 0.0,
                order,
            },
        }
    }
}

/// Enriched orders plus the sum of their line totals
#[derive(Debug, Clone, PartialEq)]
pub struct OrderListing {
    pub lines: Vec<OrderLine>,
    pub total_order_price: f64,
}

impl FromIterator<OrderLine> for OrderListing {
    fn from_iter<I: IntoIterator<Item = OrderLine>>(iter: I) -> Self {
        let lines: Vec<OrderLine> = iter.into_iter().collect();
        let total_order_price = lines.iter().map(|l| l.single_product_total_price).sum();

        Self {
            lines,
            total_order_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(quantity: i64) -> Order {
        Order {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity,
            customer_name: Some("Grace".to_string()),
            customer_email: Some("grace@example.com".to_string()),
            extra: Extra::new(),
            created_at: Utc::now(),
        }
    }

    fn product(price: f64) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Keyboard".to_string(),
            price,
            quantity: 10,
            image: Some("https://img.example.com/kb.png".to_string()),
            extra: Extra::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_enrich_with_product() {
        let line = OrderLine::enrich(order(3), Some(&product(12.5)));
        assert_eq!(line.product_name, "Keyboard");
        assert_eq!(line.product_image.as_deref(), Some("https://img.example.com/kb.png"));
        assert_eq!(line.single_product_total_price, 37.5);
    }

    #[test]
    fn test_enrich_missing_product() {
        let line = OrderLine::enrich(order(3), None);
        assert_eq!(line.product_name, UNKNOWN_PRODUCT_NAME);
        assert_eq!(line.product_image, None);
        assert_eq!(line.single_product_total_price, 0.0);
    }

    #[test]
    fn test_listing_total_skips_missing_products() {
        let listing: OrderListing = vec![
            OrderLine::enrich(order(2), Some(&product(10.0))),
            OrderLine::enrich(order(5), None),
            OrderLine::enrich(order(1), Some(&product(4.0))),
        ]
        .into_iter()
        .collect();

        assert_eq!(listing.lines.len(), 3);
        assert_eq!(listing.total_order_price, 24.0);
    }

    #[test]
    fn test_order_line_serialization() {
        let line = OrderLine::enrich(order(1), None);
        let json = serde_json::to_value(&line).unwrap();

        assert_eq!(json["productName"], UNKNOWN_PRODUCT_NAME);
        assert!(json["productImage"].is_null());
        assert_eq!(json["singleProductTotalPrice"], 0.0);
        assert_eq!(json["customerName"], "Grace");
        assert!(json["productId"].is_string());
        assert!(json.get("order").is_none());
    }
}
