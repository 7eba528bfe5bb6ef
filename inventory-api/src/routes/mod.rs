/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: liveness text and storage health check
/// - `users`: registration, listing, admin promotion and lookups
/// - `products`: catalog creation and paginated listing
/// - `orders`: order placement and enriched listing

pub mod health;
pub mod orders;
pub mod products;
pub mod users;
