//! # Inventory API Server Library
//!
//! HTTP layer of the inventory service.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `de`: Lenient field deserializers
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Extractors with envelope-shaped rejections
//! - `response`: Success envelopes
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod de;
pub mod error;
pub mod extract;
pub mod response;
pub mod routes;
