/// User model and database operations
///
/// Users are keyed by email. The only attribute the service interprets is
/// `role`; everything else a client registers with is kept verbatim in
/// `profile`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email TEXT NOT NULL UNIQUE,
///     role TEXT,
///     profile JSONB NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use inventory_shared::models::user::{CreateUser, User, ADMIN_ROLE};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let created = User::create(&pool, CreateUser {
///     email: "ada@example.com".to_string(),
///     profile: Default::default(),
/// }).await?;
///
/// if let Some(user) = created {
///     User::set_role(&pool, user.id, ADMIN_ROLE).await?;
/// }
/// # Ok(())
/// # }
/// ```

use super::Extra;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, types::Json, FromRow, PgPool, Row};
use uuid::Uuid;

/// Role value marking an administrator
pub const ADMIN_ROLE: &str = "admin";

/// Profile keys that never come from client input
pub const RESERVED_PROFILE_KEYS: &[&str] = &["email", "role"];

const USER_COLUMNS: &str = "id, email, role, profile, created_at";

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    /// Unique, compared case-sensitively
    pub email: String,

    /// `Some("admin")` for administrators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Arbitrary registration fields
    #[serde(flatten)]
    pub profile: Extra,

    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let Json(profile): Json<Extra> = row.try_get("profile")?;

        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            role: row.try_get("role")?,
            profile,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Input for registering a user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub profile: Extra,
}

/// Matched/modified counts of an update by id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCounts {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl User {
    /// Inserts a user unless the email is taken
    ///
    /// Returns `None` when a user with the same email already exists. The
    /// check and the insert are one statement, so concurrent registrations
    /// of one email cannot both succeed.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO users (email, profile)
            VALUES ($1, $2)
            ON CONFLICT (email) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(data.email)
            .bind(Json(data.profile))
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Lists every user, oldest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id");

        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Sets the role of a user
    ///
    /// A user that already has the role counts as matched but not
    /// modified; an unknown id yields zero for both.
    pub async fn set_role(pool: &PgPool, id: Uuid, role: &str) -> Result<UpdateCounts, sqlx::Error> {
        let (matched, modified): (i64, i64) = sqlx::query_as(
            r#"
            WITH target AS (
                SELECT id, role FROM users WHERE id = $1 FOR UPDATE
            ),
            updated AS (
                UPDATE users u
                SET role = $2
                FROM target t
                WHERE u.id = t.id AND t.role IS DISTINCT FROM $2
                RETURNING u.id
            )
            SELECT (SELECT COUNT(*) FROM target), (SELECT COUNT(*) FROM updated)
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_one(pool)
        .await?;

        Ok(UpdateCounts {
            matched_count: u64::try_from(matched).unwrap_or_default(),
            modified_count: u64::try_from(modified).unwrap_or_default(),
        })
    }

    /// Deletes a user, returning how many rows went away
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
