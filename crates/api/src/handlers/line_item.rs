//! Handlers for the `/reserva-servicios` resource.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use turismo_core::types::DbId;
use turismo_db::models::line_item::{
    AvailabilityQuery, ChangeLineItemStatus, LineItemView, UpdateLineItem,
};

use crate::booking::line_items;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

/// POST /api/v1/reserva-servicios/verificar-disponibilidad
pub async fn check_availability(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(query): Json<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    let available = line_items::check_availability(&state.pool, &query).await?;
    Ok(Json(AvailabilityResponse { available }))
}

/// GET /api/v1/reserva-servicios/emprendedor/{provider_id}
pub async fn list_by_provider(
    State(state): State<AppState>,
    user: AuthUser,
    Path(provider_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<LineItemView>>>> {
    let data = line_items::list_for_provider(&state.pool, &user, provider_id).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/reserva-servicios/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLineItem>,
) -> AppResult<Json<LineItemView>> {
    let item = line_items::update(&state.pool, &user, id, &input).await?;
    Ok(Json(item))
}

/// PUT /api/v1/reserva-servicios/{id}/estado
pub async fn change_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeLineItemStatus>,
) -> AppResult<Json<LineItemView>> {
    let item = line_items::change_status(&state.pool, &user, id, &input.status).await?;
    Ok(Json(item))
}
