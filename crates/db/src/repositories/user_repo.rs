//! Repository for the `users` table.

use sqlx::PgExecutor;
use turismo_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, role, is_active, created_at, updated_at";

/// Provides the user lookups the reservation core needs.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &CreateUser) -> Result<User, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(executor)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM users WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(executor)
            .await
    }
}
