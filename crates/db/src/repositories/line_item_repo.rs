//! Repository for the `reserva_servicios` table.

use sqlx::{PgConnection, PgExecutor};
use turismo_core::booking::{find_conflict, BookingWindow, ExistingBooking};
use turismo_core::status::LineItemStatus;
use turismo_core::types::DbId;

use crate::models::line_item::{LineItem, NewLineItem, UpdateLineItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, reservation_id, service_id, provider_id, start_date, end_date, \
    start_time, end_time, duration_minutes, quantity, price, status, client_notes, \
    provider_notes, created_at, updated_at";

/// Ordering used wherever items of a reservation are listed.
const ORDER: &str = "ORDER BY start_date ASC, start_time ASC, id ASC";

/// Provides persistence for line items and the overlap query.
pub struct LineItemRepo;

impl LineItemRepo {
    /// Insert a line item, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &NewLineItem) -> Result<LineItem, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO reserva_servicios
                (reservation_id, service_id, provider_id, start_date, end_date,
                 start_time, end_time, duration_minutes, quantity, price, status, client_notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LineItem>(&query)
            .bind(input.reservation_id)
            .bind(input.service_id)
            .bind(input.provider_id)
            .bind(input.window.start_date)
            .bind(input.end_date)
            .bind(input.window.start_time)
            .bind(input.window.end_time)
            .bind(input.duration_minutes)
            .bind(input.quantity)
            .bind(input.price)
            .bind(input.status.as_str())
            .bind(&input.client_notes)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<LineItem>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM reserva_servicios WHERE id = $1");
        sqlx::query_as::<_, LineItem>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// All items of one reservation, in calendar order.
    pub async fn list_by_reservation<'e, E>(
        executor: E,
        reservation_id: DbId,
    ) -> Result<Vec<LineItem>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query =
            format!("SELECT {COLUMNS} FROM reserva_servicios WHERE reservation_id = $1 {ORDER}");
        sqlx::query_as::<_, LineItem>(&query)
            .bind(reservation_id)
            .fetch_all(executor)
            .await
    }

    /// Items of several reservations in one round trip, for list endpoints.
    pub async fn list_by_reservation_ids<'e, E>(
        executor: E,
        reservation_ids: &[DbId],
    ) -> Result<Vec<LineItem>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM reserva_servicios WHERE reservation_id = ANY($1) {ORDER}"
        );
        sqlx::query_as::<_, LineItem>(&query)
            .bind(reservation_ids)
            .fetch_all(executor)
            .await
    }

    /// Committed bookings of a provider (cart items excluded), in calendar order.
    pub async fn list_by_provider<'e, E>(
        executor: E,
        provider_id: DbId,
    ) -> Result<Vec<LineItem>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM reserva_servicios
             WHERE provider_id = $1 AND status <> 'en_carrito'
             {ORDER}"
        );
        sqlx::query_as::<_, LineItem>(&query)
            .bind(provider_id)
            .fetch_all(executor)
            .await
    }

    /// Non-cart items of `service_id` whose date range touches `window`.
    ///
    /// Time-of-day filtering is left to [`find_conflict`].
    pub async fn list_blocking_for_service<'e, E>(
        executor: E,
        service_id: DbId,
        window: &BookingWindow,
    ) -> Result<Vec<LineItem>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM reserva_servicios
             WHERE service_id = $1
               AND status <> 'en_carrito'
               AND start_date <= $3
               AND COALESCE(end_date, start_date) >= $2
             {ORDER}"
        );
        sqlx::query_as::<_, LineItem>(&query)
            .bind(service_id)
            .bind(window.start_date)
            .bind(window.end_date)
            .fetch_all(executor)
            .await
    }

    /// Return the first committed item of `service_id` that overlaps `window`.
    ///
    /// `exclude` skips the item being edited.
    pub async fn find_overlap<'e, E>(
        executor: E,
        service_id: DbId,
        window: &BookingWindow,
        exclude: Option<DbId>,
    ) -> Result<Option<LineItem>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let candidates = Self::list_blocking_for_service(executor, service_id, window).await?;
        let existing: Vec<ExistingBooking> =
            candidates.iter().map(LineItem::as_existing).collect();
        let conflict_id =
            find_conflict(&existing, window, exclude).map(|booking| booking.line_item_id);
        Ok(conflict_id.and_then(|id| candidates.into_iter().find(|item| item.id == id)))
    }

    /// Whether booking `window` on `service_id` would overlap a committed item.
    pub async fn verify_overlap<'e, E>(
        executor: E,
        service_id: DbId,
        window: &BookingWindow,
        exclude: Option<DbId>,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        Ok(Self::find_overlap(executor, service_id, window, exclude)
            .await?
            .is_some())
    }

    /// Set every item of a reservation to `status`. Returns the row count.
    pub async fn set_status_for_reservation<'e, E>(
        executor: E,
        reservation_id: DbId,
        status: LineItemStatus,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("UPDATE reserva_servicios SET status = $2 WHERE reservation_id = $1")
                .bind(reservation_id)
                .bind(status.as_str())
                .execute(executor)
                .await?;
        Ok(result.rows_affected())
    }

    /// Apply an admin edit. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdateLineItem,
    ) -> Result<Option<LineItem>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE reserva_servicios SET
                start_date = COALESCE($2, start_date),
                end_date = COALESCE($3, end_date),
                start_time = COALESCE($4, start_time),
                end_time = COALESCE($5, end_time),
                duration_minutes = COALESCE($6, duration_minutes),
                quantity = COALESCE($7, quantity),
                price = COALESCE($8, price),
                status = COALESCE($9, status),
                client_notes = COALESCE($10, client_notes),
                provider_notes = COALESCE($11, provider_notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LineItem>(&query)
            .bind(id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.duration_minutes)
            .bind(input.quantity)
            .bind(input.price)
            .bind(input.status.map(LineItemStatus::as_str))
            .bind(&input.client_notes)
            .bind(&input.provider_notes)
            .fetch_optional(executor)
            .await
    }

    /// Set one item's status. Returns `None` if no row with `id` exists.
    pub async fn update_status<'e, E>(
        executor: E,
        id: DbId,
        status: LineItemStatus,
    ) -> Result<Option<LineItem>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query =
            format!("UPDATE reserva_servicios SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, LineItem>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Delete one item. Returns `true` if a row was removed.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM reserva_servicios WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Take a transaction-scoped advisory lock on each service.
    ///
    /// Callers that check overlap and then write must hold these locks so two
    /// transactions cannot both see a slot as free. Ids are locked in
    /// ascending order to keep concurrent callers from deadlocking.
    pub async fn lock_services(
        conn: &mut PgConnection,
        service_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut ids = service_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        for id in ids {
            sqlx::query("SELECT pg_advisory_xact_lock($1)")
                .bind(id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    /// Delete every item of a reservation. Returns the row count.
    pub async fn delete_for_reservation<'e, E>(
        executor: E,
        reservation_id: DbId,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM reserva_servicios WHERE reservation_id = $1")
            .bind(reservation_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
