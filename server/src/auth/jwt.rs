//! Servicio de tokens JWT
//!
//! Generación, validación y decodificación de tokens de acceso.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::auth::Rol;
use thiserror::Error;

/// Configuración JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secreto de firma (mínimo 32 bytes)
    pub secret: String,
    /// Expiración del token en minutos
    pub expiration_minutes: i64,
    /// Emisor
    pub issuer: String,
    /// Audiencia
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) if s.len() >= 32 => s,
            Ok(_) => {
                #[cfg(not(debug_assertions))]
                panic!("JWT_SECRET must be at least 32 characters long");
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT_SECRET too short, generating a temporary key");
                    generate_dev_secret()
                }
            }
            Err(_) => {
                #[cfg(not(debug_assertions))]
                panic!("JWT_SECRET environment variable must be set in production");
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT_SECRET not set, generating a temporary key");
                    generate_dev_secret()
                }
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "fiesta-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "fiesta-app".to_string()),
        }
    }
}

/// Genera un secreto aleatorio imprimible (solo entornos de desarrollo)
#[cfg(debug_assertions)]
fn generate_dev_secret() -> String {
    use rand::Rng;
    const CHARSET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*-_=+";
    let mut rng = rand::thread_rng();
    (0..64)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Claims almacenados en el token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// ID de usuario (subject)
    pub sub: String,
    /// Nombre del usuario
    pub nombre: String,
    /// Email
    pub email: String,
    /// Rol (propietario | empleado | cliente)
    pub rol: String,
    /// Permisos concedidos (separados por coma)
    pub permisos: String,
    /// Expiración (timestamp)
    pub exp: i64,
    /// Emisión (timestamp)
    pub iat: i64,
    /// Emisor
    pub iss: String,
    /// Audiencia
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token inválido: {0}")]
    InvalidToken(String),

    #[error("Token expirado")]
    ExpiredToken,

    #[error("Firma inválida")]
    InvalidSignature,

    #[error("No se pudo generar el token: {0}")]
    GenerationFailed(String),
}

/// Servicio JWT
///
/// Las claves de jsonwebtoken no exponen `Debug`; el servicio tampoco.
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Genera un token para un usuario
    pub fn generate_token(
        &self,
        user_id: &str,
        nombre: &str,
        email: &str,
        rol: Rol,
        permisos: &[String],
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            nombre: nombre.to_string(),
            email: email.to_string(),
            rol: rol.as_str().to_string(),
            permisos: permisos.join(","),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Valida y decodifica un token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extrae el token del header Authorization
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Usuario actual (resuelto desde los claims por el middleware)
///
/// El middleware de autenticación lo inyecta en las extensiones del request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub nombre: String,
    pub email: String,
    pub rol: Rol,
    pub permisos: Vec<String>,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        let permisos = if claims.permisos.is_empty() {
            vec![]
        } else {
            claims.permisos.split(',').map(|s| s.to_string()).collect()
        };

        Self {
            id: claims.sub,
            nombre: claims.nombre,
            email: claims.email,
            rol: Rol::parse(&claims.rol).unwrap_or(Rol::Cliente),
            permisos,
        }
    }
}

impl CurrentUser {
    /// El propietario satisface cualquier verificación de permiso
    pub fn is_owner(&self) -> bool {
        self.rol == Rol::Propietario
    }

    /// Verificación única de capacidad: rol propietario o flag concedido
    pub fn has_permission(&self, permiso: &str) -> bool {
        if self.is_owner() {
            return true;
        }
        self.permisos.iter().any(|p| p == permiso)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "una-clave-de-prueba-suficientemente-larga-123456".to_string(),
            expiration_minutes: 60,
            issuer: "fiesta-server".to_string(),
            audience: "fiesta-app".to_string(),
        })
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = test_service();
        let permisos = vec!["ventas".to_string(), "productos".to_string()];

        let token = service
            .generate_token("usuario:abc", "Ana", "ana@fiesta.local", Rol::Empleado, &permisos)
            .expect("Failed to generate test token");

        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "usuario:abc");
        assert_eq!(claims.rol, "empleado");
        assert_eq!(claims.permisos, "ventas,productos");
    }

    #[test]
    fn test_rejects_foreign_signature() {
        let service = test_service();
        let other = JwtService::with_config(JwtConfig {
            secret: "otra-clave-distinta-igual-de-larga-abcdef-789012".to_string(),
            ..service.config.clone()
        });

        let token = other
            .generate_token("usuario:x", "X", "x@fiesta.local", Rol::Empleado, &[])
            .unwrap();

        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_owner_bypasses_permission_flags() {
        let owner = CurrentUser {
            id: "usuario:1".to_string(),
            nombre: "Dueña".to_string(),
            email: "duena@fiesta.local".to_string(),
            rol: Rol::Propietario,
            permisos: vec![],
        };

        assert!(owner.has_permission("ventas"));
        assert!(owner.has_permission("configuracion"));
        assert!(owner.is_owner());
    }

    #[test]
    fn test_employee_limited_to_granted_flags() {
        let empleado = CurrentUser {
            id: "usuario:2".to_string(),
            nombre: "Luis".to_string(),
            email: "luis@fiesta.local".to_string(),
            rol: Rol::Empleado,
            permisos: vec!["ventas".to_string()],
        };

        assert!(empleado.has_permission("ventas"));
        assert!(!empleado.has_permission("reportes"));
        assert!(!empleado.is_owner());
    }
}
