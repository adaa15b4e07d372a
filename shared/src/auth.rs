//! Authentication DTOs shared between the API and its clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rol {
    Propietario,
    Empleado,
    Cliente,
}

impl Rol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rol::Propietario => "propietario",
            Rol::Empleado => "empleado",
            Rol::Cliente => "cliente",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "propietario" => Some(Rol::Propietario),
            "empleado" => Some(Rol::Empleado),
            "cliente" => Some(Rol::Cliente),
            _ => None,
        }
    }
}

/// Per-employee permission flags. Owners hold every permission implicitly,
/// regardless of what is stored here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Permisos {
    pub ventas: bool,
    pub productos: bool,
    pub clientes: bool,
    pub servicios: bool,
    pub reportes: bool,
    pub configuracion: bool,
}

impl Permisos {
    /// All flags granted (the default set for a newly created owner)
    pub fn todos() -> Self {
        Self {
            ventas: true,
            productos: true,
            clientes: true,
            servicios: true,
            reportes: true,
            configuracion: true,
        }
    }

    /// Flag lookup by name; unknown names are never granted
    pub fn tiene(&self, permiso: &str) -> bool {
        match permiso {
            "ventas" => self.ventas,
            "productos" => self.productos,
            "clientes" => self.clientes,
            "servicios" => self.servicios,
            "reportes" => self.reportes,
            "configuracion" => self.configuracion,
            _ => false,
        }
    }

    /// Granted flag names, used to embed permissions into JWT claims
    pub fn lista(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (nombre, activo) in [
            ("ventas", self.ventas),
            ("productos", self.productos),
            ("clientes", self.clientes),
            ("servicios", self.servicios),
            ("reportes", self.reportes),
            ("configuracion", self.configuracion),
        ] {
            if activo {
                out.push(nombre.to_string());
            }
        }
        out
    }
}

// ==================== Requests ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Staff registration. `rol` may request `empleado`; `propietario` is only
/// ever assigned automatically to the very first account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub telefono: Option<String>,
    pub rol: Option<Rol>,
}

/// Public self-registration for storefront customers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientRequest {
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub telefono: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub nombre: Option<String>,
    pub telefono: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub password_actual: String,
    pub password_nueva: String,
}

/// Verification-code purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Proposito {
    Verificacion,
    Recuperacion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestCodeRequest {
    pub email: String,
    pub proposito: Proposito,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub codigo: String,
    pub proposito: Proposito,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub codigo: String,
    pub password_nueva: String,
}

// ==================== Responses ====================

/// Public view of a user account (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub nombre: String,
    pub email: String,
    pub rol: Rol,
    pub telefono: Option<String>,
    pub permisos: Permisos,
    pub activo: bool,
    pub ultimo_acceso: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub usuario: UserInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permisos_lista_roundtrip() {
        let p = Permisos {
            ventas: true,
            reportes: true,
            ..Default::default()
        };
        assert_eq!(p.lista(), vec!["ventas".to_string(), "reportes".to_string()]);
        assert!(p.tiene("ventas"));
        assert!(!p.tiene("productos"));
        assert!(!p.tiene("inventada"));
    }

    #[test]
    fn test_rol_wire_format() {
        assert_eq!(
            serde_json::to_string(&Rol::Propietario).unwrap(),
            "\"propietario\""
        );
        assert_eq!(Rol::parse("empleado"), Some(Rol::Empleado));
        assert_eq!(Rol::parse("admin"), None);
    }
}
