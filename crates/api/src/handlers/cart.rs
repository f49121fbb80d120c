//! Handlers for the caller's cart under `/reservas/carrito`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use turismo_core::types::DbId;
use turismo_db::models::line_item::AddToCart;
use turismo_db::models::reservation::{ConfirmCart, ReservationDetail};
use validator::Validate;

use crate::booking::cart;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/reservas/carrito
///
/// Creates the cart on first access.
pub async fn show(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ReservationDetail>> {
    let detail = cart::get_or_create(&state.pool, &user).await?;
    Ok(Json(detail))
}

/// POST /api/v1/reservas/carrito/agregar
pub async fn add(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<AddToCart>,
) -> AppResult<Json<ReservationDetail>> {
    let detail = cart::add_service(&state.pool, &user, &input).await?;
    Ok(Json(detail))
}

/// DELETE /api/v1/reservas/carrito/servicio/{id}
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ReservationDetail>> {
    let detail = cart::remove_service(&state.pool, &user, id).await?;
    Ok(Json(detail))
}

/// POST /api/v1/reservas/carrito/confirmar
///
/// Body: `{ "notes": "..." }`; send `{}` for no notes.
pub async fn confirm(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ConfirmCart>,
) -> AppResult<(StatusCode, Json<ReservationDetail>)> {
    input.validate()?;
    let detail = cart::confirm(&state.pool, &user, input.notes.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// DELETE /api/v1/reservas/carrito/vaciar
pub async fn empty(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ReservationDetail>> {
    let detail = cart::empty(&state.pool, &user).await?;
    Ok(Json(detail))
}
