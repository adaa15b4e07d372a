//! Códigos de verificación por correo

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shared::auth::Proposito;
use surrealdb::RecordId;

use super::serde_helpers;

/// Vigencia del código
pub const CODIGO_TTL_MINUTOS: i64 = 15;
/// Intentos de verificación permitidos
pub const MAX_INTENTOS: u32 = 5;

/// Código de un solo uso para verificación de email o recuperación de
/// contraseña
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodigoVerificacion {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub email: String,
    pub codigo: String,
    pub proposito: Proposito,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub usado: bool,
    #[serde(default)]
    pub intentos: u32,
    pub creado: DateTime<Utc>,
    pub expira: DateTime<Utc>,
}

impl CodigoVerificacion {
    pub fn nuevo(email: String, codigo: String, proposito: Proposito) -> Self {
        let ahora = Utc::now();
        Self {
            id: None,
            email,
            codigo,
            proposito,
            usado: false,
            intentos: 0,
            creado: ahora,
            expira: ahora + Duration::minutes(CODIGO_TTL_MINUTOS),
        }
    }

    pub fn expirado(&self) -> bool {
        Utc::now() > self.expira
    }

    pub fn agotado(&self) -> bool {
        self.intentos >= MAX_INTENTOS
    }
}

/// Genera un código numérico de seis dígitos
pub fn generar_codigo() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    format!("{:06}", rng.gen_range(0..1_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codigo_formato() {
        for _ in 0..50 {
            let codigo = generar_codigo();
            assert_eq!(codigo.len(), 6);
            assert!(codigo.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_vigencia_y_agotamiento() {
        let mut cv = CodigoVerificacion::nuevo(
            "ana@fiesta.local".to_string(),
            "123456".to_string(),
            Proposito::Recuperacion,
        );
        assert!(!cv.expirado());
        assert!(!cv.agotado());

        cv.intentos = MAX_INTENTOS;
        assert!(cv.agotado());

        cv.expira = Utc::now() - Duration::minutes(1);
        assert!(cv.expirado());
    }
}
