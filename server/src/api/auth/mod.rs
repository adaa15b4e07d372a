//! Módulo de autenticación

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", auth_routes())
}

fn auth_routes() -> Router<ServerState> {
    Router::new()
        // Públicas (exentas en el middleware de autenticación)
        .route("/registro", post(handler::registro))
        .route("/login", post(handler::login))
        .route("/registroCliente", post(handler::registro_cliente))
        .route("/solicitar-codigo", post(handler::solicitar_codigo))
        .route("/verificar-codigo", post(handler::verificar_codigo))
        .route("/restablecer-password", put(handler::restablecer_password))
        // Privadas
        .route("/perfil", get(handler::perfil).put(handler::actualizar_perfil))
        .route("/cambiar-password", put(handler::cambiar_password))
        .route("/verificar-token", get(handler::verificar_token))
}
