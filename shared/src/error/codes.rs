//! Unified error codes for the Fiesta backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Verification code errors
//! - 4xxx: Product errors
//! - 5xxx: Client errors
//! - 6xxx: Sale errors
//! - 7xxx: Order errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Codes serialize as u16 values for cross-language compatibility
/// (Rust backend, TypeScript frontend). The HTTP error body exposes the
/// short label from [`ErrorCode::label`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Business rule violation
    BusinessRule = 6,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is deactivated
    AccountDisabled = 1005,
    /// Email is already registered
    EmailExists = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Owner role required
    OwnerRequired = 2002,

    // ==================== 3xxx: Verification codes ====================
    /// Verification code is invalid
    VerificationCodeInvalid = 3001,
    /// Verification code has expired
    VerificationCodeExpired = 3002,
    /// Verification code was already used
    VerificationCodeUsed = 3003,
    /// Too many failed attempts for this code
    VerificationCodeAttempts = 3004,

    // ==================== 4xxx: Products ====================
    /// Product not found
    ProductNotFound = 4001,
    /// Product is inactive
    ProductInactive = 4002,
    /// Requested quantity exceeds current stock
    InsufficientStock = 4003,
    /// Negative price rejected
    InvalidPrice = 4004,
    /// Category-specific fields missing or misplaced
    CategoryDetailMismatch = 4005,

    // ==================== 5xxx: Clients ====================
    /// Client not found
    ClientNotFound = 5001,
    /// Phone already registered for an active client
    ClientPhoneExists = 5002,

    // ==================== 6xxx: Sales ====================
    /// Sale not found
    SaleNotFound = 6001,
    /// Sale was already cancelled
    SaleAlreadyCancelled = 6002,

    // ==================== 7xxx: Orders ====================
    /// Order not found
    OrderNotFound = 7001,
    /// Order was already cancelled
    OrderAlreadyCancelled = 7002,
    /// Order was already delivered
    OrderDelivered = 7003,
    /// Status transition not allowed
    InvalidStatusTransition = 7004,
    /// Tracking code collision persisted after retry
    TrackingCodeCollision = 7005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Outbound mail delivery failed
    MailError = 9003,
}

impl ErrorCode {
    /// Short machine-readable label, exposed as the `error` field of the
    /// HTTP error body.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::BusinessRule => "BUSINESS_RULE",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenInvalid => "TOKEN_INVALID",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::EmailExists => "EMAIL_EXISTS",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::OwnerRequired => "OWNER_REQUIRED",
            Self::VerificationCodeInvalid => "CODE_INVALID",
            Self::VerificationCodeExpired => "CODE_EXPIRED",
            Self::VerificationCodeUsed => "CODE_USED",
            Self::VerificationCodeAttempts => "CODE_ATTEMPTS_EXCEEDED",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::ProductInactive => "PRODUCT_INACTIVE",
            Self::InsufficientStock => "INSUFFICIENT_STOCK",
            Self::InvalidPrice => "INVALID_PRICE",
            Self::CategoryDetailMismatch => "CATEGORY_DETAIL_MISMATCH",
            Self::ClientNotFound => "CLIENT_NOT_FOUND",
            Self::ClientPhoneExists => "CLIENT_PHONE_EXISTS",
            Self::SaleNotFound => "SALE_NOT_FOUND",
            Self::SaleAlreadyCancelled => "SALE_ALREADY_CANCELLED",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::OrderAlreadyCancelled => "ORDER_ALREADY_CANCELLED",
            Self::OrderDelivered => "ORDER_DELIVERED",
            Self::InvalidStatusTransition => "INVALID_STATUS_TRANSITION",
            Self::TrackingCodeCollision => "TRACKING_CODE_COLLISION",
            Self::InternalError => "INTERNAL_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::MailError => "MAIL_ERROR",
        }
    }

    /// Default human-readable message (Spanish, the application's operating
    /// language; the frontend surfaces it directly).
    pub fn message(&self) -> &'static str {
        match self {
            Self::Unknown => "Error desconocido",
            Self::ValidationFailed => "Datos inválidos",
            Self::NotFound => "Recurso no encontrado",
            Self::AlreadyExists => "El recurso ya existe",
            Self::InvalidRequest => "Solicitud inválida",
            Self::BusinessRule => "Operación no permitida",
            Self::NotAuthenticated => "Debe iniciar sesión",
            Self::InvalidCredentials => "Email o contraseña incorrectos",
            Self::TokenExpired => "La sesión ha expirado",
            Self::TokenInvalid => "Token inválido",
            Self::AccountDisabled => "La cuenta está desactivada",
            Self::EmailExists => "El email ya está registrado",
            Self::PermissionDenied => "No tiene permiso para esta operación",
            Self::OwnerRequired => "Solo el propietario puede realizar esta operación",
            Self::VerificationCodeInvalid => "Código de verificación incorrecto",
            Self::VerificationCodeExpired => "El código de verificación ha expirado",
            Self::VerificationCodeUsed => "El código de verificación ya fue utilizado",
            Self::VerificationCodeAttempts => "Demasiados intentos, solicite un nuevo código",
            Self::ProductNotFound => "Producto no encontrado",
            Self::ProductInactive => "El producto no está disponible",
            Self::InsufficientStock => "Stock insuficiente",
            Self::InvalidPrice => "El precio no puede ser negativo",
            Self::CategoryDetailMismatch => "Atributos no válidos para la categoría",
            Self::ClientNotFound => "Cliente no encontrado",
            Self::ClientPhoneExists => "Ya existe un cliente activo con ese teléfono",
            Self::SaleNotFound => "Venta no encontrada",
            Self::SaleAlreadyCancelled => "La venta ya fue cancelada",
            Self::OrderNotFound => "Pedido no encontrado",
            Self::OrderAlreadyCancelled => "El pedido ya fue cancelado",
            Self::OrderDelivered => "Un pedido entregado no puede modificarse",
            Self::InvalidStatusTransition => "Cambio de estado no permitido",
            Self::TrackingCodeCollision => "No se pudo generar el código de seguimiento",
            Self::InternalError => "Error interno del servidor",
            Self::DatabaseError => "Error de base de datos",
            Self::MailError => "No se pudo enviar el correo",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error produced when deserializing an out-of-range u16
#[derive(Debug, Clone)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::BusinessRule,
            1001 => Self::NotAuthenticated,
            1002 => Self::InvalidCredentials,
            1003 => Self::TokenExpired,
            1004 => Self::TokenInvalid,
            1005 => Self::AccountDisabled,
            1006 => Self::EmailExists,
            2001 => Self::PermissionDenied,
            2002 => Self::OwnerRequired,
            3001 => Self::VerificationCodeInvalid,
            3002 => Self::VerificationCodeExpired,
            3003 => Self::VerificationCodeUsed,
            3004 => Self::VerificationCodeAttempts,
            4001 => Self::ProductNotFound,
            4002 => Self::ProductInactive,
            4003 => Self::InsufficientStock,
            4004 => Self::InvalidPrice,
            4005 => Self::CategoryDetailMismatch,
            5001 => Self::ClientNotFound,
            5002 => Self::ClientPhoneExists,
            6001 => Self::SaleNotFound,
            6002 => Self::SaleAlreadyCancelled,
            7001 => Self::OrderNotFound,
            7002 => Self::OrderAlreadyCancelled,
            7003 => Self::OrderDelivered,
            7004 => Self::InvalidStatusTransition,
            7005 => Self::TrackingCodeCollision,
            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9003 => Self::MailError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
