//! Common test utilities for API tests
//!
//! Every test gets its own router over a fresh in-memory store, so tests
//! need no database and never share state.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use inventory_api::app::{build_router, AppState};
use inventory_api::config::Config;
use inventory_shared::store::MemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::Service as _;

/// Test context holding the router and its store
pub struct TestContext {
    pub store: MemoryStore,
    pub app: axum::Router,
}

impl TestContext {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let state = AppState::new(Arc::new(store.clone()), Config::in_memory());

        Self {
            store,
            app: build_router(state),
        }
    }

    /// Sends a request and returns the status and the parsed JSON body
    ///
    /// A non-JSON body comes back as a JSON string.
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    /// Registers a user and returns its id
    pub async fn create_user(&self, email: &str) -> String {
        let (status, body) = self.post("/users", json!({ "email": email })).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Adds a product and returns its id
    pub async fn create_product(&self, name: &str, price: f64, quantity: i64) -> String {
        let (status, body) = self
            .post(
                "/products",
                json!({ "name": name, "price": price, "quantity": quantity }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }
}
