/// Database models for the inventory service
///
/// Each model pairs its typed fields with a schemaless `extra` map stored
/// as JSONB, so clients can attach arbitrary fields to a record and get
/// them back flattened into the JSON document.
///
/// # Models
///
/// - `user`: registered users and their role marker
/// - `product`: catalog entries with price and stock count
/// - `order`: placed orders and their read-time enrichment
///
/// # Example
///
/// ```no_run
/// use inventory_shared::models::product::{CreateProduct, Product};
/// use inventory_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let created = Product::create(&pool, CreateProduct {
///     name: "Desk Lamp".to_string(),
///     price: 24.5,
///     quantity: 10,
///     image: None,
///     extra: Default::default(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod order;
pub mod product;
pub mod user;

use serde_json::{Map, Value as JsonValue};

/// Arbitrary document fields kept next to a model's typed columns
pub type Extra = Map<String, JsonValue>;

/// Keys no document may carry in its extra fields
const ALWAYS_RESERVED: &[&str] = &["id", "_id", "createdAt"];

/// Removes keys that would shadow typed fields when the document is
/// flattened back into JSON
pub fn strip_reserved(mut extra: Extra, reserved: &[&str]) -> Extra {
    for key in ALWAYS_RESERVED.iter().chain(reserved) {
        extra.remove(*key);
    }
    extra
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_reserved() {
        let extra = json!({
            "_id": "abc",
            "id": 1,
            "createdAt": "yesterday",
            "role": "admin",
            "phone": "555-0100"
        });
        let JsonValue::Object(extra) = extra else {
            unreachable!()
        };

        let stripped = strip_reserved(extra, &["role"]);
        assert_eq!(stripped.len(), 1);
        assert_eq!(stripped["phone"], "555-0100");
    }
}
