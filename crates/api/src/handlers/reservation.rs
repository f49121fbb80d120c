//! Handlers for the `/reservas` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use turismo_core::types::DbId;
use turismo_db::models::reservation::{
    ChangeReservationStatus, CreateReservation, ReservationDetail, ReservationFilter,
};

use crate::booking::reservations;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/reservas
///
/// Admins see every committed reservation; other users see their own.
/// Optional `?status=` filter.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filter): Query<ReservationFilter>,
) -> AppResult<Json<DataResponse<Vec<ReservationDetail>>>> {
    let data = reservations::list(&state.pool, &user, &filter).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/reservas
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateReservation>,
) -> AppResult<(StatusCode, Json<ReservationDetail>)> {
    let detail = reservations::create_direct(&state.pool, &user, &input).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/reservas/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ReservationDetail>> {
    let detail = reservations::view(&state.pool, &user, id).await?;
    Ok(Json(detail))
}

/// PUT /api/v1/reservas/{id}/estado
pub async fn change_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeReservationStatus>,
) -> AppResult<Json<ReservationDetail>> {
    let detail = reservations::change_status(&state.pool, &user, id, &input.status).await?;
    Ok(Json(detail))
}

/// DELETE /api/v1/reservas/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    reservations::delete(&state.pool, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
