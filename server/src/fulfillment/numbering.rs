//! Numeración visible y códigos de seguimiento

use chrono::{DateTime, Datelike, TimeZone, Utc};

/// Prefijo de número de venta
pub const PREFIJO_VENTA: char = 'V';
/// Prefijo de número de pedido
pub const PREFIJO_PEDIDO: char = 'P';

/// Número visible: prefijo + fecha compacta + correlativo diario
///
/// `formato_numero('V', 2025-03-07, 3)` produce `"V20250307-0003"`.
pub fn formato_numero(prefijo: char, fecha: DateTime<Utc>, secuencia: u64) -> String {
    format!("{}{}-{:04}", prefijo, fecha.format("%Y%m%d"), secuencia)
}

/// Medianoche UTC del día del instante dado (corte del correlativo)
pub fn inicio_del_dia(instante: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(instante.year(), instante.month(), instante.day(), 0, 0, 0)
        .single()
        .unwrap_or(instante)
}

/// Código de seguimiento: seis dígitos ASCII
pub fn generar_codigo_seguimiento() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    format!("{:06}", rng.gen_range(0..1_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formato_numero() {
        let fecha = Utc.with_ymd_and_hms(2025, 3, 7, 15, 30, 0).unwrap();
        assert_eq!(formato_numero('V', fecha, 3), "V20250307-0003");
        assert_eq!(formato_numero('P', fecha, 1234), "P20250307-1234");
    }

    #[test]
    fn test_secuencia_con_relleno() {
        let fecha = Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 1).unwrap();
        assert_eq!(formato_numero('V', fecha, 1), "V20251231-0001");
        // Más de 9999 operaciones en un día desborda el relleno sin truncar
        assert_eq!(formato_numero('V', fecha, 10000), "V20251231-10000");
    }

    #[test]
    fn test_inicio_del_dia() {
        let instante = Utc.with_ymd_and_hms(2025, 3, 7, 23, 59, 59).unwrap();
        let inicio = inicio_del_dia(instante);
        assert_eq!(inicio, Utc.with_ymd_and_hms(2025, 3, 7, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_codigo_seguimiento_formato() {
        for _ in 0..100 {
            let codigo = generar_codigo_seguimiento();
            assert_eq!(codigo.len(), 6);
            assert!(codigo.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
