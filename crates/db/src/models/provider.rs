//! Provider ("emprendedor") model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use turismo_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `emprendedores` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Provider {
    pub id: DbId,
    pub name: String,
    /// Account that manages this provider's bookings, if any.
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a provider.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProvider {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub user_id: Option<DbId>,
}
