//! Reservation ("reserva") model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use turismo_core::status::ReservationStatus;
use turismo_core::summary::ReservationSummary;
use turismo_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::models::line_item::{AddToCart, LineItem, LineItemView};

/// A row from the `reservas` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reservation {
    pub id: DbId,
    pub user_id: DbId,
    pub code: String,
    #[sqlx(try_from = "String")]
    pub status: ReservationStatus,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Reservation {
    pub fn is_cart(&self) -> bool {
        self.status == ReservationStatus::Cart
    }
}

/// A reservation with its line items and derived aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationDetail {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub items: Vec<LineItemView>,
    #[serde(flatten)]
    pub summary: ReservationSummary,
}

impl ReservationDetail {
    pub fn new(reservation: Reservation, items: Vec<LineItem>) -> Self {
        let summary = ReservationSummary::from_items(items.iter().map(LineItem::figures));
        Self {
            reservation,
            items: items.into_iter().map(LineItemView::from).collect(),
            summary,
        }
    }
}

/// Request body for creating a reservation directly (bypassing the cart).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReservation {
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    #[validate(length(min = 1), nested)]
    pub items: Vec<AddToCart>,
}

/// Request body for `POST /reservas/carrito/confirmar`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ConfirmCart {
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Request body for `PUT /reservas/{id}/estado`.
///
/// Kept as a string so unknown values surface as a validation error with
/// the list of accepted statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeReservationStatus {
    pub status: String,
}

/// Query parameters for listing reservations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationFilter {
    pub status: Option<String>,
}
