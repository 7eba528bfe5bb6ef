/// Storage seam between the HTTP handlers and the data
///
/// Handlers only ever talk to a `dyn Store`. Two backends implement it:
///
/// - [`PgStore`]: PostgreSQL through the model queries in `crate::models`
/// - [`MemoryStore`]: process-local collections, for development and tests
///
/// Both give the same guarantees: unique user emails and product names,
/// and an order placement that checks and decrements stock atomically.
///
/// # Example
///
/// ```
/// use inventory_shared::models::user::CreateUser;
/// use inventory_shared::store::{Inserted, MemoryStore, Store};
///
/// # async fn example() -> Result<(), inventory_shared::store::StoreError> {
/// let store = MemoryStore::new();
/// let first = store.insert_user(CreateUser {
///     email: "ada@example.com".to_string(),
///     profile: Default::default(),
/// }).await?;
/// assert!(matches!(first, Inserted::Created(_)));
/// # Ok(())
/// # }
/// ```

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::models::{
    order::{CreateOrder, Order},
    product::{CreateProduct, Product},
    user::{CreateUser, UpdateCounts, User},
};
use crate::query::{Page, ProductQuery};
use async_trait::async_trait;
use uuid::Uuid;

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures of the storage backend itself
///
/// Business outcomes (duplicates, missing products, short stock) are not
/// errors; they come back as [`Inserted`] and [`OrderPlacement`] variants.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Query or connection failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backend cannot serve requests
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of an insert guarded by a uniqueness key
#[derive(Debug, Clone, PartialEq)]
pub enum Inserted<T> {
    /// The record was stored
    Created(T),

    /// A record with the same key already existed; nothing was written
    Duplicate,
}

impl<T> Inserted<T> {
    fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Duplicate, Self::Created)
    }
}

/// Outcome of placing an order
#[derive(Debug, Clone, PartialEq)]
pub enum OrderPlacement {
    /// Stock was decremented and the order stored
    Placed(Order),

    /// No product with the requested id
    ProductNotFound,

    /// Fewer units in stock than requested; nothing was written
    InsufficientStock { available: i64 },
}

/// Operations the HTTP layer needs from a backend
///
/// Searches are case-insensitive substring matches. `MemoryStore` folds
/// case with Unicode lowercasing; `PgStore` uses `ILIKE`, whose folding
/// of non-ASCII letters follows the database's `LC_CTYPE`. The two agree
/// on ASCII and, under a UTF-8 locale, on accented Latin letters; under
/// the `C` locale PostgreSQL only folds ASCII.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name for health reporting
    fn backend(&self) -> &'static str;

    /// Verifies the backend can serve queries
    async fn ping(&self) -> StoreResult<()>;

    async fn insert_user(&self, data: CreateUser) -> StoreResult<Inserted<User>>;

    /// Every user, oldest first
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn set_user_role(&self, id: Uuid, role: &str) -> StoreResult<UpdateCounts>;

    /// Returns the number of deleted users (0 or 1)
    async fn delete_user(&self, id: Uuid) -> StoreResult<u64>;

    async fn insert_product(&self, data: CreateProduct) -> StoreResult<Inserted<Product>>;

    async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>>;

    async fn list_products(&self, query: &ProductQuery) -> StoreResult<Page<Product>>;

    /// Atomically reserves stock and records the order
    async fn place_order(&self, data: CreateOrder) -> StoreResult<OrderPlacement>;

    /// Orders matching an already normalized search term, oldest first
    async fn list_orders(&self, search: Option<&str>) -> StoreResult<Vec<Order>>;
}
