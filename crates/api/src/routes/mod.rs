pub mod auth;
pub mod catalog;
pub mod health;
pub mod line_item;
pub mod reservation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/me                                         current user
///
/// /servicios                                       list (public), create (admin)
/// /servicios/{id}                                  get (public)
/// /emprendedores                                   list (public), create (admin)
///
/// /reservas                                        list, create direct
/// /reservas/carrito                                get-or-create cart
/// /reservas/carrito/agregar                        add service (POST)
/// /reservas/carrito/servicio/{id}                  remove item (DELETE)
/// /reservas/carrito/confirmar                      confirm (POST)
/// /reservas/carrito/vaciar                         empty (DELETE)
/// /reservas/{id}                                   get, delete
/// /reservas/{id}/estado                            change status (PUT)
///
/// /reserva-servicios/verificar-disponibilidad      availability check (POST)
/// /reserva-servicios/emprendedor/{provider_id}     provider bookings
/// /reserva-servicios/{id}                          admin edit (PUT)
/// /reserva-servicios/{id}/estado                   change item status (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/servicios", catalog::services_router())
        .nest("/emprendedores", catalog::providers_router())
        .nest("/reservas", reservation::router())
        .nest("/reserva-servicios", line_item::router())
}
