//! Validación de entrada
//!
//! Límites de longitud y formatos comunes, centralizados para los handlers.

use shared::AppError;

// ── Límites de longitud ─────────────────────────────────────────────

/// Nombres de entidades: producto, cliente, usuario
pub const MAX_NAME_LEN: usize = 200;

/// Notas, descripciones, motivos
pub const MAX_NOTE_LEN: usize = 500;

/// Textos cortos: teléfono, tipo de servicio, colores
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Direcciones de correo (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Contraseñas (antes de hashear)
pub const MAX_PASSWORD_LEN: usize = 128;
/// Longitud mínima de contraseña
pub const MIN_PASSWORD_LEN: usize = 8;

/// Direcciones postales
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Helpers ─────────────────────────────────────────────────────────

/// Texto obligatorio: no vacío y dentro del límite
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} no puede estar vacío")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} es demasiado largo ({} caracteres, máximo {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Texto opcional: si está presente, dentro del límite
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} es demasiado largo ({} caracteres, máximo {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Formato mínimo de email: algo@algo.algo, sin espacios
pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    let valido = email.contains('@')
        && !email.starts_with('@')
        && !email.ends_with('@')
        && email.rsplit('@').next().is_some_and(|d| d.contains('.'))
        && !email.contains(char::is_whitespace);
    if !valido {
        return Err(AppError::validation("Formato de email inválido"));
    }
    Ok(())
}

/// Teléfono: dígitos, espacios y separadores habituales, 7 a 20 caracteres
pub fn validate_telefono(telefono: &str) -> Result<(), AppError> {
    let limpio: String = telefono
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '+'))
        .collect();
    if limpio.len() < 7 || limpio.len() > 20 || !limpio.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::validation("Formato de teléfono inválido"));
    }
    Ok(())
}

/// Contraseña dentro de los límites de longitud
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "La contraseña debe tener al menos {MIN_PASSWORD_LEN} caracteres"
        )));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "La contraseña no puede superar {MAX_PASSWORD_LEN} caracteres"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Globos", "nombre", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "nombre", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "nombre", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("ana@fiesta.local").is_ok());
        assert!(validate_email("sin-arroba").is_err());
        assert!(validate_email("@empieza.mal").is_err());
        assert!(validate_email("con espacios@mal.com").is_err());
        assert!(validate_email("sin@punto").is_err());
    }

    #[test]
    fn test_telefono() {
        assert!(validate_telefono("612345678").is_ok());
        assert!(validate_telefono("+34 612-345-678").is_ok());
        assert!(validate_telefono("123").is_err());
        assert!(validate_telefono("no-es-numero").is_err());
    }

    #[test]
    fn test_password() {
        assert!(validate_password("ochocar8").is_ok());
        assert!(validate_password("corta").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }
}
