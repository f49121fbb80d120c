//! Ownership and provider access guards.

use sqlx::PgExecutor;
use turismo_core::error::CoreError;
use turismo_core::types::DbId;
use turismo_db::models::provider::Provider;
use turismo_db::models::reservation::Reservation;
use turismo_db::repositories::ProviderRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

/// Only the reservation's owner or an admin may act on it.
pub fn ensure_owner_or_admin(user: &AuthUser, reservation: &Reservation) -> Result<(), CoreError> {
    if user.is_admin() || reservation.user_id == user.user_id {
        return Ok(());
    }
    Err(CoreError::Forbidden(
        "You do not have access to this reservation".into(),
    ))
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), CoreError> {
    if user.is_admin() {
        return Ok(());
    }
    Err(CoreError::Forbidden("Admin role required".into()))
}

/// Load a provider and check that `user` is an admin or the account that
/// manages it.
pub async fn ensure_provider_access<'e, E>(
    executor: E,
    user: &AuthUser,
    provider_id: DbId,
) -> AppResult<Provider>
where
    E: PgExecutor<'e>,
{
    let provider = ProviderRepo::find_by_id(executor, provider_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Provider",
            id: provider_id,
        })?;

    if user.is_admin() || provider.user_id == Some(user.user_id) {
        return Ok(provider);
    }
    Err(CoreError::Forbidden("You do not manage this provider".into()).into())
}
