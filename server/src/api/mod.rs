//! Rutas del API
//!
//! # Estructura
//!
//! - [`auth`] - registro, login, perfil, códigos de verificación
//! - [`productos`] - catálogo interno (CRUD + búsqueda + stock bajo)
//! - [`clientes`] - fichas de cliente y estadísticas
//! - [`ventas`] - ventas de mostrador
//! - [`pedidos`] - pedidos de la tienda pública y su administración
//! - [`reportes`] - dashboard y reportes (ganancia solo propietario)
//! - [`publico`] - catálogo de la tienda pública
//! - [`imagenes`] - imágenes de producto
//! - [`health`] - comprobación de estado

pub mod auth;
pub mod clientes;
pub mod health;
pub mod imagenes;
pub mod pedidos;
pub mod productos;
pub mod publico;
pub mod reportes;
pub mod ventas;

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

/// Log de acceso HTTP
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();
    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Construye la aplicación completa
///
/// `require_auth` se aplica a nivel de router; internamente deja pasar las
/// rutas públicas.
pub fn build_app(state: ServerState) -> Router {
    Router::<ServerState>::new()
        .merge(auth::router())
        .merge(productos::router())
        .merge(clientes::router())
        .merge(ventas::router())
        .merge(pedidos::router())
        .merge(reportes::router())
        .merge(publico::router())
        .merge(imagenes::router())
        .merge(health::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
}
