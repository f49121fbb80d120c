//! Line item operations for providers and admins.

use turismo_core::error::CoreError;
use turismo_core::status::LineItemStatus;
use turismo_core::types::DbId;
use turismo_db::models::line_item::{AvailabilityQuery, LineItem, LineItemView, UpdateLineItem};
use turismo_db::repositories::{LineItemRepo, ServiceRepo};
use turismo_db::DbPool;
use validator::Validate;

use super::access::{ensure_admin, ensure_provider_access};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

async fn find_line_item<'e, E>(executor: E, id: DbId) -> AppResult<LineItem>
where
    E: sqlx::PgExecutor<'e>,
{
    LineItemRepo::find_by_id(executor, id).await?.ok_or_else(|| {
        CoreError::NotFound {
            entity: "LineItem",
            id,
        }
        .into()
    })
}

/// Whether the requested slot of a service is free of committed bookings.
pub async fn check_availability(pool: &DbPool, query: &AvailabilityQuery) -> AppResult<bool> {
    let window = query.window();
    window.validate()?;

    if ServiceRepo::find_by_id(pool, query.service_id).await?.is_none() {
        return Err(CoreError::Validation(format!(
            "Service {} does not exist",
            query.service_id
        ))
        .into());
    }

    let overlapping = LineItemRepo::verify_overlap(
        pool,
        query.service_id,
        &window,
        query.exclude_line_item_id,
    )
    .await?;
    Ok(!overlapping)
}

/// Committed bookings of one provider. Admins, or the provider's managing
/// account, only.
pub async fn list_for_provider(
    pool: &DbPool,
    user: &AuthUser,
    provider_id: DbId,
) -> AppResult<Vec<LineItemView>> {
    ensure_provider_access(pool, user, provider_id).await?;
    let items = LineItemRepo::list_by_provider(pool, provider_id).await?;
    Ok(items.into_iter().map(LineItemView::from).collect())
}

/// Admin edit of a line item's window, price, quantity, notes or status.
///
/// When the window moves, the new slot is overlap-checked against every
/// other committed booking of the service.
pub async fn update(
    pool: &DbPool,
    user: &AuthUser,
    id: DbId,
    input: &UpdateLineItem,
) -> AppResult<LineItemView> {
    ensure_admin(user)?;
    input.validate()?;

    let mut tx = pool.begin().await?;
    let item = find_line_item(&mut *tx, id).await?;

    if input.touches_window() {
        let window = input.merged_window(&item);
        window.validate()?;
        LineItemRepo::lock_services(&mut tx, &[item.service_id]).await?;
        if let Some(conflict) =
            LineItemRepo::find_overlap(&mut *tx, item.service_id, &window, Some(item.id)).await?
        {
            return Err(CoreError::Conflict(format!(
                "Service {} is already booked by line item {}",
                item.service_id, conflict.id
            ))
            .into());
        }
    }

    let updated = LineItemRepo::update(&mut *tx, id, input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "LineItem",
            id,
        })?;
    tx.commit().await?;

    tracing::info!(line_item_id = id, user_id = user.user_id, "Line item updated");
    Ok(LineItemView::from(updated))
}

/// Set one item's status. Any of the five values is accepted; there is no
/// per-item transition table.
pub async fn change_status(
    pool: &DbPool,
    user: &AuthUser,
    id: DbId,
    raw_status: &str,
) -> AppResult<LineItemView> {
    let status: LineItemStatus = raw_status.parse()?;

    let mut tx = pool.begin().await?;
    let item = find_line_item(&mut *tx, id).await?;
    ensure_provider_access(&mut *tx, user, item.provider_id).await?;

    let updated = LineItemRepo::update_status(&mut *tx, id, status)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "LineItem",
            id,
        })?;
    tx.commit().await?;

    tracing::info!(
        line_item_id = id,
        from = %item.status,
        to = %status,
        user_id = user.user_id,
        "Line item status changed"
    );
    Ok(LineItemView::from(updated))
}
