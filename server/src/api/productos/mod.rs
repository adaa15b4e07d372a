//! Módulo de productos
//!
//! Lectura para cualquier usuario autenticado; escritura con permiso
//! "productos".

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{PERMISO_PRODUCTOS, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/productos", read_routes().merge(write_routes()))
}

fn read_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/buscar", get(handler::buscar))
        .route("/stock-bajo", get(handler::stock_bajo))
        .route("/{id}", get(handler::get_by_id))
}

fn write_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .layer(middleware::from_fn(require_permission(PERMISO_PRODUCTOS)))
}
