//! Reservation-level operations outside the cart flow.

use std::collections::HashMap;

use turismo_core::booking_code;
use turismo_core::error::CoreError;
use turismo_core::status::{LineItemStatus, ReservationStatus};
use turismo_core::types::DbId;
use turismo_db::models::line_item::LineItem;
use turismo_db::models::reservation::{
    CreateReservation, Reservation, ReservationDetail, ReservationFilter,
};
use turismo_db::repositories::{LineItemRepo, ReservationRepo};
use turismo_db::DbPool;
use validator::Validate;

use super::access::ensure_owner_or_admin;
use super::{load_detail, prepare_line_item};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

async fn find_reservation<'e, E>(executor: E, id: DbId) -> AppResult<Reservation>
where
    E: sqlx::PgExecutor<'e>,
{
    ReservationRepo::find_by_id(executor, id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Reservation",
                id,
            }
            .into()
        })
}

/// Create a reservation straight into `pendiente`, skipping the cart.
///
/// Every item is overlap-checked, including against items earlier in the
/// same request; any failure rolls the whole reservation back.
pub async fn create_direct(
    pool: &DbPool,
    user: &AuthUser,
    input: &CreateReservation,
) -> AppResult<ReservationDetail> {
    input.validate()?;

    let mut tx = pool.begin().await?;
    let code = ReservationRepo::generate_unique_code(&mut tx, booking_code::generate_today)
        .await?
        .ok_or_else(|| {
            CoreError::Internal("Could not allocate a unique reservation code".into())
        })?;

    let reservation = ReservationRepo::create(
        &mut *tx,
        user.user_id,
        &code,
        ReservationStatus::Pending,
        input.notes.as_deref(),
    )
    .await?;

    let service_ids: Vec<DbId> = input.items.iter().map(|item| item.service_id).collect();
    LineItemRepo::lock_services(&mut tx, &service_ids).await?;

    for item in &input.items {
        let new_item =
            prepare_line_item(&mut tx, reservation.id, item, LineItemStatus::Pending).await?;
        LineItemRepo::create(&mut *tx, &new_item).await?;
    }

    let detail = load_detail(&mut *tx, reservation).await?;
    tx.commit().await?;

    tracing::info!(
        reservation_id = detail.reservation.id,
        code = %detail.reservation.code,
        items = detail.items.len(),
        user_id = user.user_id,
        "Reservation created"
    );
    Ok(detail)
}

/// Committed reservations visible to `user`: all of them for admins, the
/// caller's own otherwise. Carts are never listed.
pub async fn list(
    pool: &DbPool,
    user: &AuthUser,
    filter: &ReservationFilter,
) -> AppResult<Vec<ReservationDetail>> {
    let status = filter
        .status
        .as_deref()
        .map(str::parse::<ReservationStatus>)
        .transpose()?;

    let reservations = if user.is_admin() {
        ReservationRepo::list_all(pool, status).await?
    } else {
        ReservationRepo::list_by_user(pool, user.user_id, status).await?
    };

    let ids: Vec<DbId> = reservations.iter().map(|r| r.id).collect();
    let mut items_by_reservation: HashMap<DbId, Vec<LineItem>> = HashMap::new();
    for item in LineItemRepo::list_by_reservation_ids(pool, &ids).await? {
        items_by_reservation
            .entry(item.reservation_id)
            .or_default()
            .push(item);
    }

    Ok(reservations
        .into_iter()
        .map(|reservation| {
            let items = items_by_reservation
                .remove(&reservation.id)
                .unwrap_or_default();
            ReservationDetail::new(reservation, items)
        })
        .collect())
}

pub async fn view(pool: &DbPool, user: &AuthUser, id: DbId) -> AppResult<ReservationDetail> {
    let reservation = find_reservation(pool, id).await?;
    ensure_owner_or_admin(user, &reservation)?;
    Ok(load_detail(pool, reservation).await?)
}

/// Set a reservation's status from its wire value.
///
/// Unknown values fail with `Validation`, and `en_carrito` with
/// `InvalidState`. Moving to confirmada, cancelada or completada carries the
/// matching status onto every item.
pub async fn change_status(
    pool: &DbPool,
    user: &AuthUser,
    id: DbId,
    raw_status: &str,
) -> AppResult<ReservationDetail> {
    let status: ReservationStatus = raw_status.parse()?;
    if status == ReservationStatus::Cart {
        return Err(CoreError::InvalidState(
            "A reservation cannot be moved back into a cart".into(),
        )
        .into());
    }

    let mut tx = pool.begin().await?;
    let reservation = find_reservation(&mut *tx, id).await?;
    ensure_owner_or_admin(user, &reservation)?;
    let previous = reservation.status;

    let updated = ReservationRepo::update_status(&mut *tx, id, status)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Reservation",
            id,
        })?;
    if status.propagates_to_items() {
        LineItemRepo::set_status_for_reservation(&mut *tx, id, status.line_item_status())
            .await?;
    }

    let detail = load_detail(&mut *tx, updated).await?;
    tx.commit().await?;

    tracing::info!(
        reservation_id = id,
        from = %previous,
        to = %status,
        user_id = user.user_id,
        "Reservation status changed"
    );
    Ok(detail)
}

/// Delete a reservation and, by cascade, its items.
pub async fn delete(pool: &DbPool, user: &AuthUser, id: DbId) -> AppResult<()> {
    let reservation = find_reservation(pool, id).await?;
    ensure_owner_or_admin(user, &reservation)?;

    if !ReservationRepo::delete(pool, id).await? {
        return Err(CoreError::NotFound {
            entity: "Reservation",
            id,
        }
        .into());
    }

    tracing::info!(reservation_id = id, user_id = user.user_id, "Reservation deleted");
    Ok(())
}
