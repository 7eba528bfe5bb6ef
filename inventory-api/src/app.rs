/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use inventory_api::{app::AppState, config::Config};
/// use inventory_shared::store::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::in_memory();
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = inventory_api::app::build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch, post},
    Router,
};
use inventory_shared::store::Store;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler via Axum's `State` extractor; both fields are
/// reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend shared by all requests
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// GET    /                    # Liveness text
/// GET    /health              # Storage connectivity
/// POST   /users               # Register
/// GET    /users               # List all users
/// PATCH  /users/admin/:id     # Promote to admin
/// DELETE /users/:id           # Delete
/// GET    /isAdmin/:email      # Role check
/// POST   /currentUser         # Look up by email
/// POST   /products            # Add product
/// GET    /products            # List with ?page&size&search
/// GET    /products/:id        # Single product
/// POST   /orders              # Place order
/// GET    /orders              # List with ?search
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new()
        .route("/", get(routes::health::liveness))
        .route("/health", get(routes::health::health_check));

    let user_routes = Router::new()
        .route(
            "/users",
            post(routes::users::register).get(routes::users::list_users),
        )
        .route("/users/admin/:id", patch(routes::users::make_admin))
        .route("/users/:id", delete(routes::users::delete_user))
        .route("/isAdmin/:email", get(routes::users::is_admin))
        .route("/currentUser", post(routes::users::current_user));

    let product_routes = Router::new()
        .route(
            "/products",
            post(routes::products::create_product).get(routes::products::list_products),
        )
        .route("/products/:id", get(routes::products::get_product));

    let order_routes = Router::new().route(
        "/orders",
        post(routes::orders::place_order).get(routes::orders::list_orders),
    );

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .merge(health_routes)
        .merge(user_routes)
        .merge(product_routes)
        .merge(order_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Permissive CORS for `*`, otherwise only the listed origins
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
