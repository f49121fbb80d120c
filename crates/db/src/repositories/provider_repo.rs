//! Repository for the `emprendedores` table.

use sqlx::PgExecutor;
use turismo_core::types::DbId;

use crate::models::provider::{CreateProvider, Provider};

const COLUMNS: &str = "id, name, user_id, created_at, updated_at";

pub struct ProviderRepo;

impl ProviderRepo {
    pub async fn create<'e, E>(executor: E, input: &CreateProvider) -> Result<Provider, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO emprendedores (name, user_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Provider>(&query)
            .bind(&input.name)
            .bind(input.user_id)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Provider>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM emprendedores WHERE id = $1");
        sqlx::query_as::<_, Provider>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all providers ordered by name.
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Provider>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM emprendedores ORDER BY name ASC, id ASC");
        sqlx::query_as::<_, Provider>(&query)
            .fetch_all(executor)
            .await
    }
}
