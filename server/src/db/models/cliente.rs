//! Modelo de cliente

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

pub type ClienteId = RecordId;

/// Ventas acumuladas a partir de las cuales un cliente pasa a `frecuente`
pub const FRECUENTE_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TipoCliente {
    Individual,
    Frecuente,
    Evento,
    Empresa,
}

/// Preferencias registradas para personalizar pedidos
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferencias {
    #[serde(default)]
    pub colores: Vec<String>,
    #[serde(default)]
    pub tipos_globo: Vec<String>,
    #[serde(default)]
    pub ocasiones: Vec<String>,
}

/// Acumulados de compra del cliente
///
/// `promedio_compra` se mantiene siempre como `total_compras / numero_ventas`
/// (0 cuando no hay ventas). La cancelación de una venta revierte estos
/// campos exactamente una vez, sin bajar de cero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstadisticasCliente {
    #[serde(default)]
    pub total_compras: f64,
    #[serde(default)]
    pub numero_ventas: u32,
    #[serde(default)]
    pub promedio_compra: f64,
    #[serde(default)]
    pub ultima_compra: Option<DateTime<Utc>>,
}

impl EstadisticasCliente {
    /// Registra una venta completada
    pub fn aplicar_venta(&mut self, total: f64, fecha: DateTime<Utc>) {
        self.total_compras += total;
        self.numero_ventas += 1;
        self.promedio_compra = self.total_compras / self.numero_ventas as f64;
        self.ultima_compra = Some(fecha);
    }

    /// Revierte una venta cancelada, con suelo en cero
    pub fn revertir_venta(&mut self, total: f64) {
        self.total_compras = (self.total_compras - total).max(0.0);
        self.numero_ventas = self.numero_ventas.saturating_sub(1);
        self.promedio_compra = if self.numero_ventas == 0 {
            0.0
        } else {
            self.total_compras / self.numero_ventas as f64
        };
    }
}

/// Cliente registrado
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ClienteId>,
    pub nombre: String,
    /// Único entre clientes activos (verificación a nivel de aplicación)
    pub telefono: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    pub tipo: TipoCliente,
    #[serde(default)]
    pub preferencias: Preferencias,
    #[serde(default)]
    pub notas: Option<String>,
    #[serde(default)]
    pub estadisticas: EstadisticasCliente,
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub activo: bool,
    pub creado_en: DateTime<Utc>,
}

/// Alta de cliente
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClienteCreate {
    pub nombre: String,
    pub telefono: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub tipo: Option<TipoCliente>,
    #[serde(default)]
    pub preferencias: Option<Preferencias>,
    #[serde(default)]
    pub notas: Option<String>,
}

/// Modificación parcial de cliente
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClienteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo: Option<TipoCliente>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferencias: Option<Preferencias>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estadisticas_aplicar_y_revertir() {
        let mut stats = EstadisticasCliente::default();
        let ahora = Utc::now();

        stats.aplicar_venta(100.0, ahora);
        stats.aplicar_venta(50.0, ahora);
        assert_eq!(stats.numero_ventas, 2);
        assert_eq!(stats.total_compras, 150.0);
        assert_eq!(stats.promedio_compra, 75.0);

        stats.revertir_venta(50.0);
        assert_eq!(stats.numero_ventas, 1);
        assert_eq!(stats.total_compras, 100.0);
        assert_eq!(stats.promedio_compra, 100.0);
    }

    #[test]
    fn test_revertir_nunca_negativo() {
        let mut stats = EstadisticasCliente::default();
        stats.revertir_venta(999.0);
        assert_eq!(stats.total_compras, 0.0);
        assert_eq!(stats.numero_ventas, 0);
        assert_eq!(stats.promedio_compra, 0.0);
    }
}
