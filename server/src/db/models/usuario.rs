//! Modelo de usuario

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::auth::{Permisos, Rol, UserInfo};
use surrealdb::RecordId;

use super::serde_helpers;

pub type UsuarioId = RecordId;

/// Cuenta de usuario del sistema
///
/// El hash de contraseña nunca se serializa hacia el API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<UsuarioId>,
    pub nombre: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub rol: Rol,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub permisos: Permisos,
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub activo: bool,
    #[serde(default)]
    pub ultimo_acceso: Option<DateTime<Utc>>,
    pub creado_en: DateTime<Utc>,
}

/// Campos editables del perfil propio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
}

impl Usuario {
    /// Verifica la contraseña con argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hashea una contraseña con argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// Proyección pública (sin hash)
    pub fn to_user_info(&self) -> UserInfo {
        UserInfo {
            id: self.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            nombre: self.nombre.clone(),
            email: self.email.clone(),
            rol: self.rol,
            telefono: self.telefono.clone(),
            permisos: self.permisos.clone(),
            activo: self.activo,
            ultimo_acceso: self.ultimo_acceso,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let hash = Usuario::hash_password("secreto123").unwrap();
        let usuario = Usuario {
            id: None,
            nombre: "Ana".to_string(),
            email: "ana@fiesta.local".to_string(),
            password_hash: hash,
            rol: Rol::Empleado,
            telefono: None,
            permisos: Permisos::default(),
            activo: true,
            ultimo_acceso: None,
            creado_en: Utc::now(),
        };

        assert!(usuario.verify_password("secreto123").unwrap());
        assert!(!usuario.verify_password("otra").unwrap());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let usuario = Usuario {
            id: None,
            nombre: "Ana".to_string(),
            email: "ana@fiesta.local".to_string(),
            password_hash: "hash-secreto".to_string(),
            rol: Rol::Cliente,
            telefono: None,
            permisos: Permisos::default(),
            activo: true,
            ultimo_acceso: None,
            creado_en: Utc::now(),
        };

        let json = serde_json::to_string(&usuario).unwrap();
        assert!(!json.contains("hash-secreto"));
    }
}
