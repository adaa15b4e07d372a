//! Modelo de venta (mostrador)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

pub type VentaId = RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EstadoVenta {
    Completada,
    Cancelada,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetodoPago {
    Efectivo,
    Tarjeta,
    Transferencia,
}

/// Línea de venta con precio capturado al momento de la operación
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VentaItem {
    #[serde(with = "serde_helpers::record_id")]
    pub producto: RecordId,
    pub nombre: String,
    pub precio_unitario: f64,
    pub cantidad: i64,
    pub subtotal: f64,
    #[serde(default)]
    pub servicios_extra: Vec<ServicioAdicional>,
}

/// Servicio puntual cobrado junto a la venta (inflado, armado, entrega)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicioAdicional {
    pub descripcion: String,
    pub precio: f64,
}

/// Comprador sin ficha de cliente
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClienteOcasional {
    pub nombre: String,
    #[serde(default)]
    pub telefono: Option<String>,
}

/// Venta registrada
///
/// Nace `completada`; la única transición posible es a `cancelada`, que
/// restituye stock y revierte estadísticas del cliente una sola vez.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venta {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<VentaId>,
    /// Número visible con formato VYYYYMMDD-NNNN
    pub numero: String,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub cliente: Option<RecordId>,
    #[serde(default)]
    pub cliente_ocasional: Option<ClienteOcasional>,
    #[serde(with = "serde_helpers::record_id")]
    pub vendedor: RecordId,
    pub items: Vec<VentaItem>,
    #[serde(default)]
    pub servicios: Vec<ServicioAdicional>,
    pub subtotal: f64,
    #[serde(default)]
    pub descuento: f64,
    pub total: f64,
    pub metodo_pago: MetodoPago,
    pub estado: EstadoVenta,
    #[serde(default)]
    pub tipo_venta: Option<String>,
    #[serde(default)]
    pub notas: Option<String>,
    pub fecha: DateTime<Utc>,
    #[serde(default)]
    pub fecha_entrega: Option<DateTime<Utc>>,
}

/// Línea del carrito tal como llega del API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VentaItemRequest {
    /// ID de producto "producto:xyz"
    pub producto: String,
    pub cantidad: i64,
    /// Sobrescribe el precio de venta del producto (solo ventas)
    #[serde(default)]
    pub precio_unitario: Option<f64>,
    #[serde(default)]
    pub servicios_extra: Vec<ServicioAdicional>,
}

/// Alta de venta
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VentaCreate {
    #[serde(default)]
    pub cliente: Option<String>,
    #[serde(default)]
    pub cliente_ocasional: Option<ClienteOcasional>,
    pub items: Vec<VentaItemRequest>,
    #[serde(default)]
    pub servicios: Vec<ServicioAdicional>,
    #[serde(default)]
    pub descuento: f64,
    pub metodo_pago: MetodoPago,
    #[serde(default)]
    pub tipo_venta: Option<String>,
    #[serde(default)]
    pub notas: Option<String>,
    #[serde(default)]
    pub fecha_entrega: Option<DateTime<Utc>>,
}
