//! In-memory store for development and tests
//!
//! Collections keep insertion order, which doubles as creation order. Every
//! operation runs under one lock, so order placement is atomic the same way
//! the PostgreSQL transaction is.

use super::{Inserted, OrderPlacement, Store, StoreError, StoreResult};
use crate::models::{
    order::{CreateOrder, Order},
    product::{CreateProduct, Product},
    user::{CreateUser, UpdateCounts, User},
};
use crate::query::{contains_ignore_case, Page, PageMeta, ProductQuery};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    products: Vec<Product>,
    orders: Vec<Order>,
}

/// Store backed by process-local vectors. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }

    async fn insert_user(&self, data: CreateUser) -> StoreResult<Inserted<User>> {
        let mut collections = self.write()?;
        if collections.users.iter().any(|u| u.email == data.email) {
            return Ok(Inserted::Duplicate);
        }

        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            role: None,
            profile: data.profile,
            created_at: Utc::now(),
        };
        collections.users.push(user.clone());

        Ok(Inserted::Created(user))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.read()?.users.clone())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn set_user_role(&self, id: Uuid, role: &str) -> StoreResult<UpdateCounts> {
        let mut collections = self.write()?;
        let Some(user) = collections.users.iter_mut().find(|u| u.id == id) else {
            return Ok(UpdateCounts::default());
        };

        let modified = user.role.as_deref() != Some(role);
        if modified {
            user.role = Some(role.to_string());
        }

        Ok(UpdateCounts {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<u64> {
        let mut collections = self.write()?;
        let before = collections.users.len();
        collections.users.retain(|u| u.id != id);

        Ok((before - collections.users.len()) as u64)
    }

    async fn insert_product(&self, data: CreateProduct) -> StoreResult<Inserted<Product>> {
        let mut collections = self.write()?;
        if collections.products.iter().any(|p| p.name == data.name) {
            return Ok(Inserted::Duplicate);
        }

        let product = Product {
            id: Uuid::new_v4(),
            name: data.name,
            price: data.price,
            quantity: data.quantity,
            image: data.image,
            extra: data.extra,
            created_at: Utc::now(),
        };
        collections.products.push(product.clone());

        Ok(Inserted::Created(product))
    }

    async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        Ok(self.read()?.products.iter().find(|p| p.id == id).cloned())
    }

    async fn list_products(&self, query: &ProductQuery) -> StoreResult<Page<Product>> {
        let collections = self.read()?;
        let matching: Vec<&Product> = collections
            .products
            .iter()
            .filter(|p| {
                query
                    .search
                    .as_deref()
                    .map_or(true, |term| contains_ignore_case(&p.name, term))
            })
            .collect();

        let total = matching.len() as u64;
        let window = query.page.resolve(total);
        let items = matching
            .into_iter()
            .skip(usize::try_from(window.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(Page {
            items,
            meta: PageMeta::new(window, total),
        })
    }

    async fn place_order(&self, data: CreateOrder) -> StoreResult<OrderPlacement> {
        let mut collections = self.write()?;
        let Some(product) = collections
            .products
            .iter_mut()
            .find(|p| p.id == data.product_id)
        else {
            return Ok(OrderPlacement::ProductNotFound);
        };

        if product.quantity < data.quantity {
            return Ok(OrderPlacement::InsufficientStock {
                available: product.quantity,
            });
        }
        product.quantity -= data.quantity;

        let order = Order {
            id: Uuid::new_v4(),
            product_id: data.product_id,
            quantity: data.quantity,
            customer_name: data.customer_name,
            customer_email: data.customer_email,
            extra: data.extra,
            created_at: Utc::now(),
        };
        collections.orders.push(order.clone());

        Ok(OrderPlacement::Placed(order))
    }

    async fn list_orders(&self, search: Option<&str>) -> StoreResult<Vec<Order>> {
        let collections = self.read()?;
        let Some(term) = search else {
            return Ok(collections.orders.clone());
        };

        let product_name = |id: Uuid| {
            collections
                .products
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.name.as_str())
        };
        let matches = |field: Option<&str>| field.is_some_and(|f| contains_ignore_case(f, term));

        Ok(collections
            .orders
            .iter()
            .filter(|o| {
                matches(o.customer_name.as_deref())
                    || matches(o.customer_email.as_deref())
                    || matches(product_name(o.product_id))
            })
            .cloned()
            .collect())
    }
}
