//! Repository for the `servicios` table (the service catalog).

use sqlx::PgExecutor;
use turismo_core::types::DbId;

use crate::models::service::{CreateService, Service};

const COLUMNS: &str = "id, provider_id, name, description, reference_price, capacity, \
    is_active, created_at, updated_at";

pub struct ServiceRepo;

impl ServiceRepo {
    /// Insert a new catalog entry. `capacity` defaults to 1.
    pub async fn create<'e, E>(executor: E, input: &CreateService) -> Result<Service, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO servicios (provider_id, name, description, reference_price, capacity)
             VALUES ($1, $2, $3, $4, COALESCE($5, 1))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(input.provider_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.reference_price)
            .bind(input.capacity)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Service>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM servicios WHERE id = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List active services ordered by name.
    pub async fn list_active<'e, E>(executor: E) -> Result<Vec<Service>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM servicios WHERE is_active ORDER BY name ASC, id ASC"
        );
        sqlx::query_as::<_, Service>(&query)
            .fetch_all(executor)
            .await
    }
}
