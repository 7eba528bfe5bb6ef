/// Product catalog endpoints
///
/// # Endpoints
///
/// - `POST /products` - Add a product (soft duplicate on a taken name)
/// - `GET /products` - Paginated, searchable listing
/// - `GET /products/:id` - Single product

use crate::{
    app::AppState,
    de::{empty_as_none, number_or_string},
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    response::{Created, Envelope},
};
use axum::extract::State;
use inventory_shared::{
    models::{
        product::{CreateProduct, Product, RESERVED_PRODUCT_KEYS},
        strip_reserved, Extra,
    },
    query::{normalize_search, PageMeta, PageRequest, ProductQuery},
    store::Inserted,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

const NAME_AND_PRICE_REQUIRED: &str = "Product name and price are required.";

/// Add product request
///
/// Fields other than the typed ones are stored with the product.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    pub name: Option<String>,

    /// Number or numeric string
    #[serde(default, deserialize_with = "number_or_string")]
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: Option<f64>,

    /// Initial stock, 0 when omitted
    #[serde(default, deserialize_with = "number_or_string")]
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: Option<i64>,

    pub image: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl CreateProductRequest {
    /// Checks required fields and builds the store input
    ///
    /// A zero price counts as missing.
    fn into_create(self) -> ApiResult<CreateProduct> {
        self.validate()?;

        let name = self.name.filter(|n| !n.trim().is_empty());
        let price = self.price.filter(|p| *p != 0.0);

        let (Some(name), Some(price)) = (name, price) else {
            return Err(ApiError::BadRequest(NAME_AND_PRICE_REQUIRED.to_string()));
        };

        Ok(CreateProduct {
            name,
            price,
            quantity: self.quantity.unwrap_or(0),
            image: self.image,
            extra: strip_reserved(self.extra, RESERVED_PRODUCT_KEYS),
        })
    }
}

/// Listing query parameters
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListProductsQuery {
    /// `?page=` counts as absent
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 1, message = "Size must be at least 1"))]
    pub size: Option<u32>,

    pub search: Option<String>,
}

impl From<ListProductsQuery> for ProductQuery {
    fn from(query: ListProductsQuery) -> Self {
        ProductQuery {
            search: normalize_search(query.search.as_deref()),
            page: PageRequest {
                page: query.page,
                size: query.size,
            },
        }
    }
}

/// Add a product
///
/// # Endpoint
///
/// ```text
/// POST /products
/// Content-Type: application/json
///
/// { "name": "Desk Lamp", "price": 24.5, "quantity": 10, "image": "https://..." }
/// ```
///
/// A taken name answers 200 with `{ "message": "Product already exists", "insertedId": null }`
/// and leaves the existing product untouched.
pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateProductRequest>,
) -> ApiResult<Created<Product>> {
    let data = req.into_create()?;

    Ok(match state.store.insert_product(data).await? {
        Inserted::Created(product) => {
            tracing::info!(product_id = %product.id, name = %product.name, "Product added");
            Created::inserted("Product added successfully", product)
        }
        Inserted::Duplicate => Created::duplicate("Product already exists"),
    })
}

/// Fetch a single product
pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<Product>> {
    let product = state
        .store
        .find_product(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Envelope::new("Product retrieved successfully", product))
}

/// List products
///
/// # Endpoint
///
/// ```text
/// GET /products?page=2&size=10&search=lamp
/// ```
///
/// # Response
///
/// ```json
/// {
///   "message": "Products retrieved successfully",
///   "data": [ ... ],
///   "meta": { "currentPage": 2, "pageSize": 10, "totalItems": 14, "totalPages": 2 }
/// }
/// ```
pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListProductsQuery>,
) -> ApiResult<Envelope<Vec<Product>, PageMeta>> {
    query.validate()?;

    let page = state.store.list_products(&query.into()).await?;

    Ok(Envelope::with_meta(
        "Products retrieved successfully",
        page.items,
        page.meta,
    ))
}
