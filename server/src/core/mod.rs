//! Núcleo del servidor - configuración, estado y arranque
//!
//! - [`Config`] - configuración por variables de entorno
//! - [`ServerState`] - estado compartido (db, jwt, correo)
//! - [`Server`] - servidor HTTP

pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
