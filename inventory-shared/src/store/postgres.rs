//! PostgreSQL-backed store

use super::{Inserted, OrderPlacement, Store, StoreResult};
use crate::db::pool;
use crate::models::{
    order::{CreateOrder, Order},
    product::{CreateProduct, Product},
    user::{CreateUser, UpdateCounts, User},
};
use crate::query::{Page, PageMeta, ProductQuery};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

/// Store backed by a shared connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        pool::health_check(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(&self, data: CreateUser) -> StoreResult<Inserted<User>> {
        Ok(Inserted::from_option(User::create(&self.pool, data).await?))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(User::list_all(&self.pool).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn set_user_role(&self, id: Uuid, role: &str) -> StoreResult<UpdateCounts> {
        Ok(User::set_role(&self.pool, id, role).await?)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<u64> {
        Ok(User::delete(&self.pool, id).await?)
    }

    async fn insert_product(&self, data: CreateProduct) -> StoreResult<Inserted<Product>> {
        Ok(Inserted::from_option(Product::create(&self.pool, data).await?))
    }

    async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        Ok(Product::find_by_id(&self.pool, id).await?)
    }

    async fn list_products(&self, query: &ProductQuery) -> StoreResult<Page<Product>> {
        let search = query.search.as_deref();
        let total = u64::try_from(Product::count(&self.pool, search).await?).unwrap_or_default();
        let window = query.page.resolve(total);

        debug!(?search, offset = window.offset, limit = window.limit, "Listing products");

        let items = Product::list(&self.pool, search, window).await?;

        Ok(Page {
            items,
            meta: PageMeta::new(window, total),
        })
    }

    async fn place_order(&self, data: CreateOrder) -> StoreResult<OrderPlacement> {
        let mut tx = self.pool.begin().await?;

        let reserved = Product::decrement_stock(&mut *tx, data.product_id, data.quantity).await?;
        if reserved.is_none() {
            let existing = Product::find_by_id(&mut *tx, data.product_id).await?;
            tx.rollback().await?;

            return Ok(match existing {
                Some(product) => OrderPlacement::InsufficientStock {
                    available: product.quantity,
                },
                None => OrderPlacement::ProductNotFound,
            });
        }

        let order = Order::create(&mut *tx, data).await?;
        tx.commit().await?;

        Ok(OrderPlacement::Placed(order))
    }

    async fn list_orders(&self, search: Option<&str>) -> StoreResult<Vec<Order>> {
        Ok(Order::list(&self.pool, search).await?)
    }
}
