//! # Inventory Shared Library
//!
//! Data layer for the inventory service: models, the storage seam the HTTP
//! handlers talk to, and the PostgreSQL plumbing behind it.
//!
//! ## Module Organization
//!
//! - `db`: connection pool and migrations
//! - `models`: users, products and orders with their PostgreSQL queries
//! - `query`: search normalization and pagination math
//! - `store`: the `Store` trait with PostgreSQL and in-memory backends

pub mod db;
pub mod models;
pub mod query;
pub mod store;

/// Current version of the inventory shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
