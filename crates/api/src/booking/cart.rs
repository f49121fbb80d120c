//! The per-user cart.
//!
//! A cart is a reservation in `en_carrito`. Every operation is scoped to the
//! caller's own cart; there is no cross-user cart access.

use turismo_core::booking::{find_conflict, ExistingBooking};
use turismo_core::booking_code;
use turismo_core::error::CoreError;
use turismo_core::status::{LineItemStatus, ReservationStatus};
use turismo_core::types::DbId;
use turismo_db::models::line_item::{AddToCart, LineItem};
use turismo_db::models::reservation::ReservationDetail;
use turismo_db::repositories::{LineItemRepo, ReservationRepo};
use turismo_db::DbPool;
use validator::Validate;

use super::{load_detail, prepare_line_item};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

fn code_exhausted() -> CoreError {
    CoreError::Internal("Could not allocate a unique reservation code".into())
}

fn no_cart(user: &AuthUser) -> CoreError {
    CoreError::NotFound {
        entity: "Cart for user",
        id: user.user_id,
    }
}

/// Return the caller's cart, creating an empty one on first use.
///
/// Repeated calls return the same reservation until it is confirmed or deleted.
pub async fn get_or_create(pool: &DbPool, user: &AuthUser) -> AppResult<ReservationDetail> {
    let mut conn = pool.acquire().await?;
    let cart = ReservationRepo::get_or_create_cart(
        &mut conn,
        user.user_id,
        booking_code::generate_today,
    )
    .await?
    .ok_or_else(code_exhausted)?;

    Ok(load_detail(&mut *conn, cart).await?)
}

/// Book a service into the caller's cart.
///
/// Fails with `Validation` for malformed input or an unknown service, and
/// with `Conflict` if a committed booking already holds the slot.
pub async fn add_service(
    pool: &DbPool,
    user: &AuthUser,
    input: &AddToCart,
) -> AppResult<ReservationDetail> {
    input.validate()?;

    let mut tx = pool.begin().await?;
    let cart = ReservationRepo::get_or_create_cart(
        &mut tx,
        user.user_id,
        booking_code::generate_today,
    )
    .await?
    .ok_or_else(code_exhausted)?;

    let new_item = prepare_line_item(&mut tx, cart.id, input, LineItemStatus::Cart).await?;
    let item = LineItemRepo::create(&mut *tx, &new_item).await?;
    let detail = load_detail(&mut *tx, cart).await?;
    tx.commit().await?;

    tracing::info!(
        reservation_id = detail.reservation.id,
        line_item_id = item.id,
        service_id = item.service_id,
        user_id = user.user_id,
        "Service added to cart"
    );
    Ok(detail)
}

/// Remove one item from the caller's cart.
///
/// `NotFound` if the item does not exist, `Forbidden` if it belongs to
/// another user, `InvalidState` if it has already left the cart.
pub async fn remove_service(
    pool: &DbPool,
    user: &AuthUser,
    line_item_id: DbId,
) -> AppResult<ReservationDetail> {
    let mut tx = pool.begin().await?;

    let item = LineItemRepo::find_by_id(&mut *tx, line_item_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "LineItem",
            id: line_item_id,
        })?;
    let reservation = ReservationRepo::find_by_id(&mut *tx, item.reservation_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Reservation",
            id: item.reservation_id,
        })?;

    if reservation.user_id != user.user_id {
        return Err(CoreError::Forbidden("Line item belongs to another user".into()).into());
    }
    if item.status != LineItemStatus::Cart || !reservation.is_cart() {
        return Err(CoreError::InvalidState(format!(
            "Line item {line_item_id} is no longer in the cart (status: {})",
            item.status
        ))
        .into());
    }

    LineItemRepo::delete(&mut *tx, line_item_id).await?;
    let detail = load_detail(&mut *tx, reservation).await?;
    tx.commit().await?;

    tracing::info!(
        reservation_id = detail.reservation.id,
        line_item_id,
        user_id = user.user_id,
        "Service removed from cart"
    );
    Ok(detail)
}

/// Turn the caller's cart into a pending reservation.
///
/// The header and every item move to `pendiente` together. Each item is
/// re-checked against committed bookings, which may have taken the slot
/// after the item was added, and against the other items of the same cart.
/// The services involved stay locked until the transaction ends, so
/// concurrent confirms of the same slot are serialized.
pub async fn confirm(
    pool: &DbPool,
    user: &AuthUser,
    notes: Option<&str>,
) -> AppResult<ReservationDetail> {
    let mut tx = pool.begin().await?;

    let cart = ReservationRepo::find_cart_by_user_for_update(&mut *tx, user.user_id)
        .await?
        .ok_or_else(|| no_cart(user))?;

    let items = LineItemRepo::list_by_reservation(&mut *tx, cart.id).await?;
    if items.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let service_ids: Vec<DbId> = items.iter().map(|item| item.service_id).collect();
    LineItemRepo::lock_services(&mut tx, &service_ids).await?;

    for item in &items {
        if let Some(conflict) =
            LineItemRepo::find_overlap(&mut *tx, item.service_id, &item.window(), None).await?
        {
            return Err(CoreError::Conflict(format!(
                "Service {} on {} is no longer available (taken by reservation {})",
                item.service_id, item.start_date, conflict.reservation_id
            ))
            .into());
        }
    }
    if let Some((item, sibling)) = first_clash_within(&items) {
        return Err(CoreError::Conflict(format!(
            "Line items {} and {} book service {} for overlapping times",
            sibling, item.id, item.service_id
        ))
        .into());
    }

    let reservation = ReservationRepo::update_status_and_notes(
        &mut *tx,
        cart.id,
        ReservationStatus::Pending,
        notes,
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "Reservation",
        id: cart.id,
    })?;
    LineItemRepo::set_status_for_reservation(&mut *tx, cart.id, LineItemStatus::Pending).await?;

    let detail = load_detail(&mut *tx, reservation).await?;
    tx.commit().await?;

    tracing::info!(
        reservation_id = detail.reservation.id,
        code = %detail.reservation.code,
        items = detail.items.len(),
        user_id = user.user_id,
        "Cart confirmed"
    );
    Ok(detail)
}

/// First pair of items in one cart that book the same service for
/// overlapping windows. Siblings are treated as committed, since confirm
/// commits them together.
fn first_clash_within(items: &[LineItem]) -> Option<(&LineItem, DbId)> {
    items.iter().enumerate().find_map(|(index, item)| {
        let earlier: Vec<ExistingBooking> = items[..index]
            .iter()
            .filter(|sibling| sibling.service_id == item.service_id)
            .map(|sibling| ExistingBooking {
                status: LineItemStatus::Pending,
                ..sibling.as_existing()
            })
            .collect();
        find_conflict(&earlier, &item.window(), None).map(|clash| (item, clash.line_item_id))
    })
}

/// Delete every item of the caller's cart. The cart itself remains.
pub async fn empty(pool: &DbPool, user: &AuthUser) -> AppResult<ReservationDetail> {
    let mut tx = pool.begin().await?;

    let cart = ReservationRepo::find_cart_by_user_for_update(&mut *tx, user.user_id)
        .await?
        .ok_or_else(|| no_cart(user))?;

    let removed = LineItemRepo::delete_for_reservation(&mut *tx, cart.id).await?;
    let detail = load_detail(&mut *tx, cart).await?;
    tx.commit().await?;

    tracing::info!(
        reservation_id = detail.reservation.id,
        removed,
        user_id = user.user_id,
        "Cart emptied"
    );
    Ok(detail)
}
