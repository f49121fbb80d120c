//! Repository for the `reservas` table.

use sqlx::{PgConnection, PgExecutor};
use turismo_core::status::ReservationStatus;
use turismo_core::types::DbId;

use crate::models::reservation::Reservation;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, code, status, notes, created_at, updated_at";

/// Upper bound on collision retries when generating a reservation code.
pub const MAX_CODE_ATTEMPTS: usize = 16;

/// Provides persistence for reservation headers.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Insert a reservation in the given status, returning the created row.
    pub async fn create<'e, E>(
        executor: E,
        user_id: DbId,
        code: &str,
        status: ReservationStatus,
        notes: Option<&str>,
    ) -> Result<Reservation, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO reservas (user_id, code, status, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(user_id)
            .bind(code)
            .bind(status.as_str())
            .bind(notes)
            .fetch_one(executor)
            .await
    }

    /// Insert an empty cart for `user_id` unless one already exists.
    ///
    /// Guarded by the `uq_reservas_cart_per_user` partial index: when another
    /// request created the cart first this returns `None` instead of failing.
    pub async fn insert_cart_if_absent<'e, E>(
        executor: E,
        user_id: DbId,
        code: &str,
    ) -> Result<Option<Reservation>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO reservas (user_id, code, status)
             VALUES ($1, $2, 'en_carrito')
             ON CONFLICT (user_id) WHERE status = 'en_carrito' DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(user_id)
            .bind(code)
            .fetch_optional(executor)
            .await
    }

    /// Find a reservation by its internal ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Reservation>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM reservas WHERE id = $1");
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find the open cart of a user, if any.
    pub async fn find_cart_by_user<'e, E>(
        executor: E,
        user_id: DbId,
    ) -> Result<Option<Reservation>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM reservas WHERE user_id = $1 AND status = 'en_carrito'"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// Same as [`Self::find_cart_by_user`] but takes a row lock for the
    /// remainder of the enclosing transaction.
    pub async fn find_cart_by_user_for_update<'e, E>(
        executor: E,
        user_id: DbId,
    ) -> Result<Option<Reservation>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM reservas
             WHERE user_id = $1 AND status = 'en_carrito'
             FOR UPDATE"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// Whether any reservation already uses `code`.
    pub async fn code_exists<'e, E>(executor: E, code: &str) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM reservas WHERE code = $1)")
                .bind(code)
                .fetch_one(executor)
                .await?;
        Ok(exists)
    }

    /// Draw codes from `next` until one is not yet stored.
    ///
    /// Returns `None` if [`MAX_CODE_ATTEMPTS`] candidates all collided.
    pub async fn generate_unique_code<F>(
        conn: &mut PgConnection,
        mut next: F,
    ) -> Result<Option<String>, sqlx::Error>
    where
        F: FnMut() -> String,
    {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let candidate = next();
            if !Self::code_exists(&mut *conn, &candidate).await? {
                return Ok(Some(candidate));
            }
            tracing::debug!(attempt, code = %candidate, "Reservation code collision, retrying");
        }
        Ok(None)
    }

    /// Return the user's cart, creating an empty one if none exists.
    ///
    /// Two concurrent callers both end up with the same row: the loser of the
    /// insert race re-reads the winner's cart. Returns `None` only if no
    /// unique code could be drawn from `next`.
    pub async fn get_or_create_cart<F>(
        conn: &mut PgConnection,
        user_id: DbId,
        next: F,
    ) -> Result<Option<Reservation>, sqlx::Error>
    where
        F: FnMut() -> String,
    {
        if let Some(cart) = Self::find_cart_by_user(&mut *conn, user_id).await? {
            return Ok(Some(cart));
        }

        let Some(code) = Self::generate_unique_code(&mut *conn, next).await? else {
            return Ok(None);
        };

        match Self::insert_cart_if_absent(&mut *conn, user_id, &code).await? {
            Some(cart) => {
                tracing::info!(reservation_id = cart.id, user_id, code = %cart.code, "Cart created");
                Ok(Some(cart))
            }
            None => Self::find_cart_by_user(&mut *conn, user_id).await,
        }
    }

    /// List a user's reservations (carts excluded), newest first.
    pub async fn list_by_user<'e, E>(
        executor: E,
        user_id: DbId,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<Reservation>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM reservas
             WHERE user_id = $1
               AND status <> 'en_carrito'
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(user_id)
            .bind(status.map(ReservationStatus::as_str))
            .fetch_all(executor)
            .await
    }

    /// List every user's reservations (carts excluded), newest first.
    pub async fn list_all<'e, E>(
        executor: E,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<Reservation>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM reservas
             WHERE status <> 'en_carrito'
               AND ($1::TEXT IS NULL OR status = $1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(status.map(ReservationStatus::as_str))
            .fetch_all(executor)
            .await
    }

    /// Set the header status. Returns `None` if no row with `id` exists.
    pub async fn update_status<'e, E>(
        executor: E,
        id: DbId,
        status: ReservationStatus,
    ) -> Result<Option<Reservation>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE reservas SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Set the header status and, when given, replace the notes.
    pub async fn update_status_and_notes<'e, E>(
        executor: E,
        id: DbId,
        status: ReservationStatus,
        notes: Option<&str>,
    ) -> Result<Option<Reservation>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE reservas SET status = $2, notes = COALESCE($3, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(notes)
            .fetch_optional(executor)
            .await
    }

    /// Delete a reservation; its line items go with it via `ON DELETE CASCADE`.
    /// Returns `true` if a row was removed.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM reservas WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
