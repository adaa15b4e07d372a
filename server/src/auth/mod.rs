//! Autenticación y autorización
//!
//! - [`JwtService`] - emisión y validación de tokens
//! - [`CurrentUser`] - contexto del usuario autenticado
//! - [`require_auth`] - middleware de autenticación
//! - [`require_permission`] - middleware de autorización por flag

pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_permission};
pub use permissions::{
    PERMISO_CLIENTES, PERMISO_PRODUCTOS, PERMISO_REPORTES, PERMISO_VENTAS, default_permissions,
};
