//! Fiesta Server - backend de gestión para tienda de artículos de fiesta
//!
//! # Módulos
//!
//! ```text
//! server/src/
//! ├── core/          # Config, estado, servidor HTTP
//! ├── auth/          # JWT, permisos, middleware
//! ├── db/            # SurrealDB embebido: modelos y repositorios
//! ├── fulfillment/   # Ciclo de vida de ventas y pedidos (stock, numeración)
//! ├── api/           # Rutas y handlers HTTP
//! ├── services/      # Correo transaccional, imágenes
//! └── utils/         # Logger, validación
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod fulfillment;
pub mod services;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use shared::{AppError, AppResult, ErrorCode};
pub use utils::logger::init_logger;

/// Log de eventos de seguridad (target dedicado "security")
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ______ _           __
   / ____/(_)__  _____/ /_____ _
  / /_   / / _ \/ ___/ __/ __ `/
 / __/  / /  __(__  ) /_/ /_/ /
/_/    /_/\___/____/\__/\__,_/
        "#
    );
}
