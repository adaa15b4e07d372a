//! Módulo de clientes (permiso "clientes")

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::{PERMISO_CLIENTES, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/clientes", cliente_routes())
}

fn cliente_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/buscar", get(handler::buscar))
        .route("/frecuentes", get(handler::frecuentes))
        .route("/inactivos", get(handler::inactivos))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/estadisticas", get(handler::estadisticas))
        .layer(middleware::from_fn(require_permission(PERMISO_CLIENTES)))
}
