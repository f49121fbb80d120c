//! Service catalog model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use turismo_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `servicios` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Service {
    pub id: DbId,
    pub provider_id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Price copied onto each new line item at booking time.
    pub reference_price: Option<f64>,
    pub capacity: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a service to the catalog.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateService {
    pub provider_id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub reference_price: Option<f64>,
    /// Defaults to 1 if omitted.
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
}
