/// User endpoints
///
/// # Endpoints
///
/// - `POST /users` - Register (soft duplicate on a taken email)
/// - `GET /users` - List all users
/// - `PATCH /users/admin/:id` - Promote to admin
/// - `DELETE /users/:id` - Delete
/// - `GET /isAdmin/:email` - Role check
/// - `POST /currentUser` - Look up by email
///
/// None of these endpoints authenticate the caller.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    response::{Created, Envelope},
};
use axum::extract::State;
use inventory_shared::{
    models::{
        strip_reserved,
        user::{CreateUser, UpdateCounts, User, ADMIN_ROLE, RESERVED_PROFILE_KEYS},
        Extra,
    },
    store::Inserted,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration request
///
/// Any field besides `email` is kept on the user document as-is.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,

    #[serde(flatten)]
    pub profile: Extra,
}

/// Current user lookup request
#[derive(Debug, Deserialize)]
pub struct CurrentUserRequest {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub deleted_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IsAdminResponse {
    pub is_admin: bool,
}

fn required_email(email: Option<String>) -> ApiResult<String> {
    email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Email is required.".to_string()))
}

/// Register a user
///
/// # Endpoint
///
/// ```text
/// POST /users
/// Content-Type: application/json
///
/// { "email": "ada@example.com", "name": "Ada" }
/// ```
///
/// # Response
///
/// ```json
/// { "message": "User created successfully", "data": { "id": "...", "email": "ada@example.com", "name": "Ada", "createdAt": "..." } }
/// ```
///
/// A taken email answers 200 with `{ "message": "User already exists", "insertedId": null }`.
/// A client-supplied `role` is discarded.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<Created<User>> {
    let email = required_email(req.email)?;

    let inserted = state
        .store
        .insert_user(CreateUser {
            email,
            profile: strip_reserved(req.profile, RESERVED_PROFILE_KEYS),
        })
        .await?;

    Ok(match inserted {
        Inserted::Created(user) => {
            tracing::info!(user_id = %user.id, "User registered");
            Created::inserted("User created successfully", user)
        }
        Inserted::Duplicate => {
            tracing::debug!("Registration skipped for existing email");
            Created::duplicate("User already exists")
        }
    })
}

/// List every user, oldest first
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Envelope<Vec<User>>> {
    let users = state.store.list_users().await?;
    Ok(Envelope::new("Users retrieved successfully", users))
}

/// Promote a user to admin
///
/// An unknown id answers 200 with zero counts.
pub async fn make_admin(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<UpdateCounts>> {
    let counts = state.store.set_user_role(id, ADMIN_ROLE).await?;

    if counts.modified_count > 0 {
        tracing::info!(user_id = %id, "User promoted to admin");
    }

    Ok(Envelope::new("User role updated", counts))
}

/// Delete a user by id
pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<DeleteResponse>> {
    let deleted_count = state.store.delete_user(id).await?;

    if deleted_count > 0 {
        tracing::info!(user_id = %id, "User deleted");
    }

    Ok(Envelope::new(
        "User deletion processed",
        DeleteResponse { deleted_count },
    ))
}

/// Report whether the user with this email is an admin
pub async fn is_admin(
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> ApiResult<Envelope<IsAdminResponse>> {
    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Envelope::new(
        "Admin status retrieved",
        IsAdminResponse {
            is_admin: user.is_admin(),
        },
    ))
}

/// Look up a user by the email in the request body
pub async fn current_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CurrentUserRequest>,
) -> ApiResult<Envelope<User>> {
    let email = required_email(req.email)?;

    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::BadRequest("User doesn't exist.".to_string()))?;

    Ok(Envelope::new("User found successfully.", user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_email() {
        assert!(required_email(None).is_err());
        assert!(required_email(Some("  ".to_string())).is_err());
        assert_eq!(
            required_email(Some("ada@example.com".to_string())).unwrap(),
            "ada@example.com"
        );
    }

    #[test]
    fn test_register_request_keeps_extra_fields() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "email": "ada@example.com",
            "name": "Ada",
            "role": "admin"
        }))
        .unwrap();

        assert_eq!(req.email.as_deref(), Some("ada@example.com"));
        assert_eq!(req.profile["name"], "Ada");

        let profile = strip_reserved(req.profile, RESERVED_PROFILE_KEYS);
        assert!(!profile.contains_key("role"));
    }
}
