/// Order endpoints
///
/// # Endpoints
///
/// - `POST /orders` - Place an order, decrementing stock
/// - `GET /orders` - List orders with product details and a grand total

use crate::{
    app::AppState,
    de::number_or_string,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiQuery},
    response::Envelope,
};
use axum::extract::State;
use futures::future::try_join_all;
use inventory_shared::{
    models::{
        order::{CreateOrder, Order, OrderLine, OrderListing, RESERVED_ORDER_KEYS},
        product::Product,
        strip_reserved, Extra,
    },
    query::normalize_search,
    store::OrderPlacement,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;
use validator::Validate;

/// Place order request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub product_id: Option<String>,

    /// Number or numeric string
    #[serde(default, deserialize_with = "number_or_string")]
    #[validate(
        required(message = "Quantity is required"),
        range(min = 1, message = "Quantity must be at least 1")
    )]
    pub quantity: Option<i64>,

    pub customer_name: Option<String>,

    pub customer_email: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl PlaceOrderRequest {
    fn into_create(self) -> ApiResult<CreateOrder> {
        self.validate()?;

        let product_id = self
            .product_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::BadRequest("Product id is required".to_string()))?;
        let product_id = Uuid::parse_str(product_id)
            .map_err(|_| ApiError::BadRequest("Invalid product id".to_string()))?;

        Ok(CreateOrder {
            product_id,
            quantity: self.quantity.unwrap_or_default(),
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            extra: strip_reserved(self.extra, RESERVED_ORDER_KEYS),
        })
    }
}

/// Order listing query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub total_order_price: f64,
}

/// Place an order
///
/// # Endpoint
///
/// ```text
/// POST /orders
/// Content-Type: application/json
///
/// { "productId": "...", "quantity": 2, "customerName": "Grace", "customerEmail": "grace@example.com" }
/// ```
///
/// Stock is checked and decremented atomically with the order insert. A
/// short stock answers 400 and changes nothing.
pub async fn place_order(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PlaceOrderRequest>,
) -> ApiResult<Envelope<Order>> {
    let data = req.into_create()?;
    let product_id = data.product_id;
    let requested = data.quantity;

    let placement = state
        .store
        .place_order(data)
        .await
        .map_err(|e| ApiError::internal("Failed to place order", e))?;

    match placement {
        OrderPlacement::Placed(order) => {
            tracing::info!(
                order_id = %order.id,
                product_id = %product_id,
                quantity = requested,
                "Order placed"
            );
            Ok(Envelope::new("Order added successfully", order))
        }
        OrderPlacement::ProductNotFound => {
            Err(ApiError::NotFound("Product not found".to_string()))
        }
        OrderPlacement::InsufficientStock { available } => {
            tracing::warn!(
                product_id = %product_id,
                requested,
                available,
                "Order rejected for insufficient stock"
            );
            Err(ApiError::BadRequest("Not enough stock available".to_string()))
        }
    }
}

/// List orders
///
/// # Endpoint
///
/// ```text
/// GET /orders?search=grace
/// ```
///
/// The search matches customer name, customer email or the current name
/// of the ordered product. Each order carries `productName`,
/// `productImage` and `singleProductTotalPrice`; `meta.totalOrderPrice`
/// sums the line totals.
pub async fn list_orders(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListOrdersQuery>,
) -> ApiResult<Envelope<Vec<OrderLine>, OrderTotals>> {
    let search = normalize_search(query.search.as_deref());

    let orders = state
        .store
        .list_orders(search.as_deref())
        .await
        .map_err(|e| ApiError::internal("Failed to fetch orders", e))?;

    if orders.is_empty() {
        return Err(ApiError::NotFound("No orders found".to_string()));
    }

    let products = load_products(&state, &orders)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch orders", e))?;

    let listing: OrderListing = orders
        .into_iter()
        .map(|order| {
            let product = products.get(&order.product_id);
            OrderLine::enrich(order, product)
        })
        .collect();

    Ok(Envelope::with_meta(
        "Orders retrieved successfully",
        listing.lines,
        OrderTotals {
            total_order_price: listing.total_order_price,
        },
    ))
}

/// Fetches each distinct referenced product once
async fn load_products(
    state: &AppState,
    orders: &[Order],
) -> Result<HashMap<Uuid, Product>, inventory_shared::store::StoreError> {
    let ids: HashSet<Uuid> = orders.iter().map(|o| o.product_id).collect();

    let found = try_join_all(ids.into_iter().map(|id| state.store.find_product(id))).await?;

    Ok(found
        .into_iter()
        .flatten()
        .map(|product| (product.id, product))
        .collect())
}
