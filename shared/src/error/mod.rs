//! Unified error system
//!
//! - [`ErrorCode`]: standardized error codes with numeric ranges
//! - [`AppError`]: rich error type with code, message and details
//! - HTTP status mapping and the `{ error, message, details? }` wire body
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::InsufficientStock)
//!     .with_detail("producto", "producto:abc")
//!     .with_detail("faltante", 2);
//! assert_eq!(err.http_status().as_u16(), 422);
//! ```

mod codes;
mod http;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
