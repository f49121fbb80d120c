//! Route definitions for the `/reservas` resource, including the cart.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{cart, reservation};
use crate::state::AppState;

/// Routes mounted at `/reservas`.
///
/// ```text
/// GET    /                         list
/// POST   /                         create
/// GET    /carrito                  cart::show
/// POST   /carrito/agregar          cart::add
/// DELETE /carrito/servicio/{id}    cart::remove
/// POST   /carrito/confirmar        cart::confirm
/// DELETE /carrito/vaciar           cart::empty
/// GET    /{id}                     get_by_id
/// DELETE /{id}                     delete
/// PUT    /{id}/estado              change_status
/// ```
pub fn router() -> Router<AppState> {
    let cart_routes = Router::new()
        .route("/", get(cart::show))
        .route("/agregar", post(cart::add))
        .route("/servicio/{id}", delete(cart::remove))
        .route("/confirmar", post(cart::confirm))
        .route("/vaciar", delete(cart::empty));

    Router::new()
        .route("/", get(reservation::list).post(reservation::create))
        .nest("/carrito", cart_routes)
        .route(
            "/{id}",
            get(reservation::get_by_id).delete(reservation::delete),
        )
        .route("/{id}/estado", put(reservation::change_status))
}
