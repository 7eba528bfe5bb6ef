//! Success envelopes
//!
//! Every successful JSON response is `{ "message", "data"?, "meta"? }`.
//! Creations guarded by a uniqueness key answer a duplicate with a
//! success-shaped `{ "message", "insertedId": null }` instead of an error.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

/// Success envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T, M = ()> {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<M>,
}

impl<T> Envelope<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta: None,
        }
    }
}

impl<T, M> Envelope<T, M> {
    pub fn with_meta(message: impl Into<String>, data: T, meta: M) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta: Some(meta),
        }
    }
}

impl<T: Serialize, M: Serialize> IntoResponse for Envelope<T, M> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Soft duplicate body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AlreadyExists {
    message: String,

    /// Always `null`
    inserted_id: Option<Uuid>,
}

/// Response of a create endpoint
#[derive(Debug)]
pub enum Created<T> {
    /// The record was stored and is echoed back in `data`
    Inserted { message: String, data: T },

    /// A record with the same key exists; nothing was written
    Duplicate { message: String },
}

impl<T> Created<T> {
    pub fn inserted(message: impl Into<String>, data: T) -> Self {
        Self::Inserted {
            message: message.into(),
            data,
        }
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate {
            message: message.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        match self {
            Created::Inserted { message, data } => Envelope::new(message, data).into_response(),
            Created::Duplicate { message } => Json(AlreadyExists {
                message,
                inserted_id: None,
            })
            .into_response(),
        }
    }
}
