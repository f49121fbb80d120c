//! Route definitions for the `/reserva-servicios` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::line_item;
use crate::state::AppState;

/// Routes mounted at `/reserva-servicios`.
///
/// ```text
/// POST /verificar-disponibilidad     check_availability
/// GET  /emprendedor/{provider_id}    list_by_provider
/// PUT  /{id}                         update (admin)
/// PUT  /{id}/estado                  change_status (provider or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/verificar-disponibilidad",
            post(line_item::check_availability),
        )
        .route(
            "/emprendedor/{provider_id}",
            get(line_item::list_by_provider),
        )
        .route("/{id}", put(line_item::update))
        .route("/{id}/estado", put(line_item::change_status))
}
