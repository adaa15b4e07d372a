//! Shared wire contract for the Fiesta retail backend.
//!
//! Types in this crate are serialized exactly as the HTTP API exposes them,
//! so the SPA frontend (and any future desktop client) can bind against a
//! single definition:
//!
//! - [`error`] - unified error codes, [`AppError`] and its HTTP mapping
//! - [`pagination`] - `page`/`limit` query convention and paged responses
//! - [`auth`] - authentication request/response DTOs

pub mod auth;
pub mod error;
pub mod pagination;

pub use error::{AppError, AppResult, ErrorCode};
pub use pagination::{PageQuery, Paginated};
