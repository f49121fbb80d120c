//! Booking orchestration.
//!
//! Operations here span several repositories and carry the access rules:
//!
//! - [`cart`] -- the per-user cart (get-or-create, add, remove, confirm, empty).
//! - [`reservations`] -- direct creation, listing, viewing, status changes, deletion.
//! - [`line_items`] -- availability checks and provider/admin item management.
//! - [`access`] -- ownership and provider guards.
//!
//! Every mutation runs inside one transaction; an early `?` drops the
//! transaction and rolls it back. The authenticated principal is always
//! passed in explicitly.

pub mod access;
pub mod cart;
pub mod line_items;
pub mod reservations;

use sqlx::{PgConnection, PgExecutor};
use turismo_core::error::CoreError;
use turismo_core::status::LineItemStatus;
use turismo_core::types::DbId;
use turismo_db::models::line_item::{AddToCart, NewLineItem};
use turismo_db::models::reservation::{Reservation, ReservationDetail};
use turismo_db::repositories::{LineItemRepo, ServiceRepo};

use crate::error::AppResult;

/// Attach a reservation's items and aggregates.
pub(crate) async fn load_detail<'e, E>(
    executor: E,
    reservation: Reservation,
) -> Result<ReservationDetail, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let items = LineItemRepo::list_by_reservation(executor, reservation.id).await?;
    Ok(ReservationDetail::new(reservation, items))
}

/// Resolve a booking request into an insertable line item.
///
/// Checks the window, that the service exists and belongs to the given
/// provider, and that no committed booking of the service overlaps. The
/// service is locked for the rest of the transaction. The price is copied
/// from the service's reference price at this moment.
pub(crate) async fn prepare_line_item(
    conn: &mut PgConnection,
    reservation_id: DbId,
    input: &AddToCart,
    status: LineItemStatus,
) -> AppResult<NewLineItem> {
    let window = input.window();
    window.validate()?;

    let service = ServiceRepo::find_by_id(&mut *conn, input.service_id)
        .await?
        .filter(|s| s.is_active)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Service {} does not exist or is not bookable",
                input.service_id
            ))
        })?;

    if let Some(provider_id) = input.provider_id {
        if provider_id != service.provider_id {
            return Err(CoreError::Validation(format!(
                "Service {} is offered by provider {}, not {provider_id}",
                service.id, service.provider_id
            ))
            .into());
        }
    }

    LineItemRepo::lock_services(conn, &[service.id]).await?;
    if let Some(conflict) =
        LineItemRepo::find_overlap(&mut *conn, service.id, &window, None).await?
    {
        return Err(CoreError::Conflict(format!(
            "Service {} is already booked from {} to {} between {} and {}",
            service.id,
            conflict.start_date,
            conflict.end_date.unwrap_or(conflict.start_date),
            conflict.start_time,
            conflict.end_time,
        ))
        .into());
    }

    Ok(NewLineItem {
        reservation_id,
        service_id: service.id,
        provider_id: service.provider_id,
        window,
        end_date: input.end_date,
        duration_minutes: input
            .duration_minutes
            .unwrap_or_else(|| window.daily_minutes()),
        quantity: input.quantity.unwrap_or(1),
        price: service.reference_price,
        status,
        client_notes: input.client_notes.clone(),
    })
}
