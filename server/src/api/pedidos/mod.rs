//! Módulo de pedidos
//!
//! El alta, el seguimiento y la cancelación por código son públicos; la
//! gestión vive bajo `/admin` con permiso "ventas".

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{PERMISO_VENTAS, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/pedidos", post(handler::create))
        .route("/api/pedidos/seguimiento/{codigo}", get(handler::seguimiento))
        .route("/api/pedidos/cancelar/{codigo}", put(handler::cancelar_publico))
        .nest("/api/pedidos/admin", admin_routes())
}

fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/estadisticas", get(handler::estadisticas))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/estado", put(handler::cambiar_estado))
        .layer(middleware::from_fn(require_permission(PERMISO_VENTAS)))
}
