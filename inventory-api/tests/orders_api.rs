/// API tests for order placement and listing

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn test_place_order_decrements_stock() {
    let ctx = TestContext::new();
    let product_id = ctx.create_product("Desk Lamp", 24.5, 10).await;

    let (status, body) = ctx
        .post(
            "/orders",
            json!({
                "productId": product_id,
                "quantity": 3,
                "customerName": "Grace",
                "customerEmail": "grace@example.com",
                "note": "gift wrap"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order added successfully");
    assert_eq!(body["data"]["productId"], product_id);
    assert_eq!(body["data"]["quantity"], 3);
    assert_eq!(body["data"]["note"], "gift wrap");

    let (_, body) = ctx.get(&format!("/products/{product_id}")).await;
    assert_eq!(body["data"]["quantity"], 7);
}

#[tokio::test]
async fn test_insufficient_stock_changes_nothing() {
    let ctx = TestContext::new();
    let product_id = ctx.create_product("Desk", 180.0, 2).await;

    let (status, body) = ctx
        .post("/orders", json!({ "productId": product_id, "quantity": 3 }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Not enough stock available");

    let (_, body) = ctx.get(&format!("/products/{product_id}")).await;
    assert_eq!(body["data"]["quantity"], 2);

    let (status, _) = ctx.get("/orders").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_for_unknown_product() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .post("/orders", json!({ "productId": Uuid::new_v4(), "quantity": 1 }))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_invalid_order_requests() {
    let ctx = TestContext::new();
    let product_id = ctx.create_product("Desk", 180.0, 2).await;

    for payload in [
        json!({ "quantity": 1 }),
        json!({ "productId": "not-a-uuid", "quantity": 1 }),
        json!({ "productId": product_id, "quantity": 0 }),
        json!({ "productId": product_id }),
    ] {
        let (status, _) = ctx.post("/orders", payload.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
    }
}

#[tokio::test]
async fn test_concurrent_orders_never_oversell() {
    let ctx = Arc::new(TestContext::new());
    let product_id = ctx.create_product("Limited Print", 50.0, 5).await;

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let ctx = Arc::clone(&ctx);
            let product_id = product_id.clone();
            tokio::spawn(async move {
                ctx.post(
                    "/orders",
                    json!({ "productId": product_id, "quantity": 1, "customerName": format!("c{i}") }),
                )
                .await
                .0
            })
        })
        .collect();

    let mut placed = 0;
    for handle in handles {
        if handle.await.unwrap() == StatusCode::OK {
            placed += 1;
        }
    }
    assert_eq!(placed, 5);

    let (_, body) = ctx.get(&format!("/products/{product_id}")).await;
    assert_eq!(body["data"]["quantity"], 0);
}

#[tokio::test]
async fn test_list_orders_enriches_and_totals() {
    let ctx = TestContext::new();
    let lamp = ctx.create_product("Desk Lamp", 24.5, 10).await;
    let chair = ctx.create_product("Office Chair", 95.0, 5).await;

    ctx.post(
        "/orders",
        json!({ "productId": lamp, "quantity": 2, "customerName": "Grace" }),
    )
    .await;
    ctx.post(
        "/orders",
        json!({ "productId": chair, "quantity": 1, "customerName": "Alan" }),
    )
    .await;

    let (status, body) = ctx.get("/orders").await;

    assert_eq!(status, StatusCode::OK);
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["productName"], "Desk Lamp");
    assert_eq!(orders[0]["singleProductTotalPrice"], 49.0);
    assert!(orders[0]["productImage"].is_null());
    assert_eq!(orders[1]["productName"], "Office Chair");
    assert_eq!(body["meta"]["totalOrderPrice"], 144.0);
}

#[tokio::test]
async fn test_list_orders_search() {
    let ctx = TestContext::new();
    let lamp = ctx.create_product("Desk Lamp", 24.5, 10).await;
    let chair = ctx.create_product("Office Chair", 95.0, 5).await;

    ctx.post(
        "/orders",
        json!({ "productId": lamp, "quantity": 1, "customerName": "Grace", "customerEmail": "grace@example.com" }),
    )
    .await;
    ctx.post(
        "/orders",
        json!({ "productId": chair, "quantity": 1, "customerName": "Alan", "customerEmail": "alan@example.com" }),
    )
    .await;

    let (_, body) = ctx.get("/orders?search=GRACE").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["meta"]["totalOrderPrice"], 24.5);

    let (_, body) = ctx.get("/orders?search=chair").await;
    assert_eq!(body["data"][0]["customerName"], "Alan");

    let (status, body) = ctx.get("/orders?search=nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No orders found");
}

#[tokio::test]
async fn test_empty_order_collection_is_not_found() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/orders").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No orders found");
}

#[tokio::test]
async fn test_place_order_accepts_numeric_string_quantity() {
    let ctx = TestContext::new();
    let product_id = ctx.create_product("Desk Lamp", 24.5, 10).await;

    let (status, body) = ctx
        .post("/orders", json!({ "productId": product_id, "quantity": "2" }))
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["quantity"], 2);

    let (_, body) = ctx.get(&format!("/products/{product_id}")).await;
    assert_eq!(body["data"]["quantity"], 8);

    for quantity in ["0", "abc", "1.5"] {
        let (status, _) = ctx
            .post("/orders", json!({ "productId": product_id, "quantity": quantity }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{quantity}");
    }
}
