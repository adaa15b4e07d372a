//! Módulo de ventas (permiso "ventas")

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::{PERMISO_VENTAS, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/ventas", venta_routes())
}

fn venta_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/del-dia", get(handler::del_dia))
        .route("/estadisticas", get(handler::estadisticas))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/cancelar", put(handler::cancelar))
        .layer(middleware::from_fn(require_permission(PERMISO_VENTAS)))
}
