//! Line item ("reserva servicio") model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use turismo_core::booking::{BookingWindow, ExistingBooking};
use turismo_core::status::LineItemStatus;
use turismo_core::summary::{subtotal, ItemFigures};
use turismo_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `reserva_servicios` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LineItem {
    pub id: DbId,
    pub reservation_id: DbId,
    pub service_id: DbId,
    pub provider_id: DbId,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: i32,
    pub quantity: i32,
    pub price: Option<f64>,
    #[sqlx(try_from = "String")]
    pub status: LineItemStatus,
    pub client_notes: Option<String>,
    pub provider_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LineItem {
    pub fn window(&self) -> BookingWindow {
        BookingWindow::new(self.start_date, self.end_date, self.start_time, self.end_time)
    }

    pub fn subtotal(&self) -> f64 {
        subtotal(self.price, self.quantity)
    }

    pub fn figures(&self) -> ItemFigures {
        ItemFigures {
            start_date: self.start_date,
            end_date: self.end_date,
            price: self.price,
            quantity: self.quantity,
        }
    }

    pub fn as_existing(&self) -> ExistingBooking {
        ExistingBooking {
            line_item_id: self.id,
            status: self.status,
            window: self.window(),
        }
    }
}

/// A line item as returned by the API, with its derived subtotal.
#[derive(Debug, Clone, Serialize)]
pub struct LineItemView {
    #[serde(flatten)]
    pub item: LineItem,
    pub subtotal: f64,
}

impl From<LineItem> for LineItemView {
    fn from(item: LineItem) -> Self {
        let subtotal = item.subtotal();
        Self { item, subtotal }
    }
}

/// Request body describing one service booking, used both for
/// add-to-cart and for each item of a directly created reservation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddToCart {
    pub service_id: DbId,
    /// Must match the service's own provider when given.
    pub provider_id: Option<DbId>,
    pub start_date: NaiveDate,
    /// Defaults to `start_date`.
    pub end_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Defaults to the minutes between `start_time` and `end_time`.
    #[validate(range(min = 0))]
    pub duration_minutes: Option<i32>,
    /// Defaults to 1.
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    #[validate(length(max = 2000))]
    pub client_notes: Option<String>,
}

impl AddToCart {
    pub fn window(&self) -> BookingWindow {
        BookingWindow::new(self.start_date, self.end_date, self.start_time, self.end_time)
    }
}

/// Fully resolved values for inserting a line item.
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub reservation_id: DbId,
    pub service_id: DbId,
    pub provider_id: DbId,
    pub window: BookingWindow,
    /// Stored as NULL when the booking is a single day.
    pub end_date: Option<NaiveDate>,
    pub duration_minutes: i32,
    pub quantity: i32,
    pub price: Option<f64>,
    pub status: LineItemStatus,
    pub client_notes: Option<String>,
}

/// Admin edit of a line item. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLineItem {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    #[validate(range(min = 0))]
    pub duration_minutes: Option<i32>,
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub status: Option<LineItemStatus>,
    #[validate(length(max = 2000))]
    pub client_notes: Option<String>,
    #[validate(length(max = 2000))]
    pub provider_notes: Option<String>,
}

impl UpdateLineItem {
    /// Whether any field of the booking window is being changed.
    pub fn touches_window(&self) -> bool {
        self.start_date.is_some()
            || self.end_date.is_some()
            || self.start_time.is_some()
            || self.end_time.is_some()
    }

    /// The window that results from applying this edit to `item`.
    pub fn merged_window(&self, item: &LineItem) -> BookingWindow {
        BookingWindow::new(
            self.start_date.unwrap_or(item.start_date),
            self.end_date.or(item.end_date),
            self.start_time.unwrap_or(item.start_time),
            self.end_time.unwrap_or(item.end_time),
        )
    }
}

/// Request body for `PUT /reserva-servicios/{id}/estado`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeLineItemStatus {
    pub status: String,
}

/// Request body for the availability check.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub service_id: DbId,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub exclude_line_item_id: Option<DbId>,
}

impl AvailabilityQuery {
    pub fn window(&self) -> BookingWindow {
        BookingWindow::new(self.start_date, self.end_date, self.start_time, self.end_time)
    }
}
