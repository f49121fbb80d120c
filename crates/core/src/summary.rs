//! Derived, read-only aggregates over a reservation's line items.

use chrono::NaiveDate;
use serde::Serialize;

/// The figures of one line item that feed the aggregates.
#[derive(Debug, Clone, Copy)]
pub struct ItemFigures {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub price: Option<f64>,
    pub quantity: i32,
}

/// Price times quantity; an unpriced item contributes nothing.
pub fn subtotal(price: Option<f64>, quantity: i32) -> f64 {
    price.unwrap_or(0.0) * f64::from(quantity)
}

/// Round a currency amount to cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Aggregates computed on read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReservationSummary {
    pub total_services: usize,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_price: f64,
}

impl ReservationSummary {
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = ItemFigures>,
    {
        let mut summary = ReservationSummary {
            total_services: 0,
            start_date: None,
            end_date: None,
            total_price: 0.0,
        };

        for item in items {
            summary.total_services += 1;
            summary.total_price += subtotal(item.price, item.quantity);

            let last_day = item.end_date.unwrap_or(item.start_date);
            summary.start_date = Some(match summary.start_date {
                Some(current) => current.min(item.start_date),
                None => item.start_date,
            });
            summary.end_date = Some(match summary.end_date {
                Some(current) => current.max(last_day),
                None => last_day,
            });
        }

        summary.total_price = round_cents(summary.total_price);
        summary
    }
}
