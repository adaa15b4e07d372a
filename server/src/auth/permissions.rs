//! Definición de permisos
//!
//! Autorización por flags de módulo. El propietario no necesita flags;
//! empleados y clientes solo acceden a los módulos concedidos.

use shared::auth::{Permisos, Rol};

/// Flags de permiso que protegen rutas
pub const PERMISO_VENTAS: &str = "ventas";
pub const PERMISO_PRODUCTOS: &str = "productos";
pub const PERMISO_CLIENTES: &str = "clientes";
pub const PERMISO_REPORTES: &str = "reportes";

/// Permisos por defecto según rol
///
/// - propietario: todos (y además el rol puentea cualquier verificación)
/// - empleado: operación diaria sin reportes ni configuración
/// - cliente: ninguno
pub fn default_permissions(rol: Rol) -> Permisos {
    match rol {
        Rol::Propietario => Permisos::todos(),
        Rol::Empleado => Permisos {
            ventas: true,
            productos: true,
            clientes: true,
            servicios: true,
            reportes: false,
            configuracion: false,
        },
        Rol::Cliente => Permisos::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_gets_all_flags() {
        let p = default_permissions(Rol::Propietario);
        assert!(p.ventas && p.productos && p.clientes);
        assert!(p.servicios && p.reportes && p.configuracion);
    }

    #[test]
    fn test_employee_excludes_sensitive_flags() {
        let p = default_permissions(Rol::Empleado);
        assert!(p.ventas);
        assert!(!p.reportes);
        assert!(!p.configuracion);
    }

    #[test]
    fn test_client_gets_none() {
        let p = default_permissions(Rol::Cliente);
        assert!(p.lista().is_empty());
    }
}
