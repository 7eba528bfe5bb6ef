//! Extractors whose rejections use the failure envelope
//!
//! Wrapping axum's `Json`, `Path` and `Query` keeps malformed bodies, ids
//! and query strings on the same `{ "message": ... }` shape as every other
//! client error.

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON body extractor
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameter extractor
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string extractor
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
