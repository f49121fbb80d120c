//! Route definitions for the service catalog and providers.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/servicios`.
///
/// ```text
/// GET  /       list_services
/// POST /       create_service (admin)
/// GET  /{id}   get_service
/// ```
pub fn services_router() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::list_services).post(catalog::create_service))
        .route("/{id}", get(catalog::get_service))
}

/// Routes mounted at `/emprendedores`.
///
/// ```text
/// GET  /   list_providers
/// POST /   create_provider (admin)
/// ```
pub fn providers_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(catalog::list_providers).post(catalog::create_provider),
    )
}
