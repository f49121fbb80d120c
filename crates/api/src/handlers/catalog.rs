//! Handlers for the service catalog (`/servicios`) and providers
//! (`/emprendedores`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use turismo_core::error::CoreError;
use turismo_core::types::DbId;
use turismo_db::models::provider::{CreateProvider, Provider};
use turismo_db::models::service::{CreateService, Service};
use turismo_db::repositories::{ProviderRepo, ServiceRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/servicios
pub async fn list_services(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Service>>>> {
    let data = ServiceRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/servicios/{id}
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Service>> {
    let service = ServiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Service",
            id,
        }))?;
    Ok(Json(service))
}

/// POST /api/v1/servicios
pub async fn create_service(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateService>,
) -> AppResult<(StatusCode, Json<Service>)> {
    input.validate()?;
    if ProviderRepo::find_by_id(&state.pool, input.provider_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Provider {} does not exist",
            input.provider_id
        ))));
    }

    let service = ServiceRepo::create(&state.pool, &input).await?;
    tracing::info!(service_id = service.id, user_id = admin.user_id, "Service created");
    Ok((StatusCode::CREATED, Json(service)))
}

/// GET /api/v1/emprendedores
pub async fn list_providers(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Provider>>>> {
    let data = ProviderRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/emprendedores
pub async fn create_provider(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateProvider>,
) -> AppResult<(StatusCode, Json<Provider>)> {
    input.validate()?;
    let provider = ProviderRepo::create(&state.pool, &input).await?;
    tracing::info!(provider_id = provider.id, user_id = admin.user_id, "Provider created");
    Ok((StatusCode::CREATED, Json(provider)))
}
