//! Booking windows and the overlap predicate.
//!
//! A booking covers every day in `[start_date, end_date]` during
//! `[start_time, end_time)` on each of those days. Two bookings of the same
//! service conflict when their date ranges share a day and their daily time
//! ranges share a minute.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::LineItemStatus;
use crate::types::DbId;

/// The date and time span a line item occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl BookingWindow {
    /// Build a window; a missing `end_date` means a single-day booking.
    pub fn new(
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            start_date,
            end_date: end_date.unwrap_or(start_date),
            start_time,
            end_time,
        }
    }

    /// Reject windows that end before they start.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.end_date < self.start_date {
            return Err(CoreError::Validation(format!(
                "end_date {} is before start_date {}",
                self.end_date, self.start_date
            )));
        }
        if self.end_time <= self.start_time {
            return Err(CoreError::Validation(format!(
                "end_time {} must be after start_time {}",
                self.end_time, self.start_time
            )));
        }
        Ok(())
    }

    /// Inclusive on both date bounds.
    pub fn dates_intersect(&self, other: &BookingWindow) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }

    /// Half-open: a booking ending at 12:00 leaves 12:00 free for the next.
    pub fn times_intersect(&self, other: &BookingWindow) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }

    pub fn overlaps(&self, other: &BookingWindow) -> bool {
        self.dates_intersect(other) && self.times_intersect(other)
    }

    /// Minutes between `start_time` and `end_time` on a single day.
    pub fn daily_minutes(&self) -> i32 {
        let minutes = (self.end_time - self.start_time).num_minutes();
        i32::try_from(minutes.max(0)).unwrap_or(i32::MAX)
    }
}

/// An already-booked line item as seen by the overlap check.
#[derive(Debug, Clone, Copy)]
pub struct ExistingBooking {
    pub line_item_id: DbId,
    pub status: LineItemStatus,
    pub window: BookingWindow,
}

/// Return the first existing booking that blocks `proposed`.
///
/// Items still in a cart are provisional and never block. `exclude` skips the
/// item being edited so it cannot conflict with itself.
pub fn find_conflict<'a, I>(
    existing: I,
    proposed: &BookingWindow,
    exclude: Option<DbId>,
) -> Option<&'a ExistingBooking>
where
    I: IntoIterator<Item = &'a ExistingBooking>,
{
    existing.into_iter().find(|booking| {
        booking.status != LineItemStatus::Cart
            && Some(booking.line_item_id) != exclude
            && booking.window.overlaps(proposed)
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn window(from: &str, to: &str, start: &str, end: &str) -> BookingWindow {
        BookingWindow::new(date(from), Some(date(to)), time(start), time(end))
    }

    fn booking(id: DbId, status: LineItemStatus, window: BookingWindow) -> ExistingBooking {
        ExistingBooking {
            line_item_id: id,
            status,
            window,
        }
    }

    #[test]
    fn missing_end_date_defaults_to_start_date() {
        let w = BookingWindow::new(date("2024-08-15"), None, time("09:00"), time("17:00"));
        assert_eq!(w.end_date, date("2024-08-15"));
    }

    #[test]
    fn cart_items_never_block() {
        let existing = [booking(
            1,
            LineItemStatus::Cart,
            window("2024-08-15", "2024-08-15", "09:00", "17:00"),
        )];
        let proposed = window("2024-08-15", "2024-08-15", "10:00", "16:00");
        assert!(find_conflict(&existing, &proposed, None).is_none());
    }

    #[test]
    fn confirmed_item_blocks_overlapping_dates_and_times() {
        let existing = [booking(
            7,
            LineItemStatus::Confirmed,
            window("2024-08-15", "2024-08-20", "09:00", "17:00"),
        )];
        let proposed = window("2024-08-18", "2024-08-25", "10:00", "16:00");
        let conflict = find_conflict(&existing, &proposed, None);
        assert_matches!(conflict, Some(b) if b.line_item_id == 7);
    }

    #[test]
    fn disjoint_dates_do_not_block() {
        let existing = [booking(
            7,
            LineItemStatus::Confirmed,
            window("2024-08-15", "2024-08-20", "09:00", "17:00"),
        )];
        let proposed = window("2024-08-25", "2024-08-25", "10:00", "16:00");
        assert!(find_conflict(&existing, &proposed, None).is_none());
    }

    #[test]
    fn disjoint_times_on_same_day_do_not_block() {
        let existing = [booking(
            3,
            LineItemStatus::Pending,
            window("2024-08-15", "2024-08-15", "09:00", "12:00"),
        )];
        let proposed = window("2024-08-15", "2024-08-15", "13:00", "17:00");
        assert!(find_conflict(&existing, &proposed, None).is_none());
    }

    #[test]
    fn touching_dates_overlap_touching_times_do_not() {
        let a = window("2024-08-15", "2024-08-20", "09:00", "12:00");
        let same_last_day = window("2024-08-20", "2024-08-22", "10:00", "11:00");
        assert!(a.overlaps(&same_last_day));

        let back_to_back = window("2024-08-15", "2024-08-15", "12:00", "15:00");
        assert!(!a.overlaps(&back_to_back));
    }

    #[test]
    fn excluded_item_does_not_conflict_with_itself() {
        let w = window("2024-08-15", "2024-08-20", "09:00", "17:00");
        let existing = [booking(11, LineItemStatus::Confirmed, w)];
        assert!(find_conflict(&existing, &w, Some(11)).is_none());
        assert!(find_conflict(&existing, &w, Some(12)).is_some());
    }

    #[test]
    fn validate_rejects_inverted_ranges() {
        let dates = window("2024-08-20", "2024-08-15", "09:00", "10:00");
        assert_matches!(dates.validate(), Err(CoreError::Validation(_)));

        let times = window("2024-08-15", "2024-08-15", "10:00", "10:00");
        assert_matches!(times.validate(), Err(CoreError::Validation(_)));

        let ok = window("2024-08-15", "2024-08-15", "10:00", "10:30");
        assert!(ok.validate().is_ok());
        assert_eq!(ok.daily_minutes(), 30);
    }
}
