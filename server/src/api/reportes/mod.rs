//! Módulo de reportes (permiso "reportes")
//!
//! Las cifras de ganancia y margen solo se incluyen para el propietario.

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::{PERMISO_REPORTES, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reportes", reporte_routes())
}

fn reporte_routes() -> Router<ServerState> {
    Router::new()
        .route("/dashboard", get(handler::dashboard))
        .route("/ventas", get(handler::ventas))
        .route("/inventario", get(handler::inventario))
        .route("/clientes", get(handler::clientes))
        .layer(middleware::from_fn(require_permission(PERMISO_REPORTES)))
}
