//! Modelo de pedido (tienda pública)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

pub type PedidoId = RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EstadoPedido {
    EnProceso,
    Cancelado,
    ListoParaEntrega,
    Entregado,
}

impl EstadoPedido {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnProceso => "en-proceso",
            Self::Cancelado => "cancelado",
            Self::ListoParaEntrega => "listo-para-entrega",
            Self::Entregado => "entregado",
        }
    }
}

/// Datos de contacto capturados al crear el pedido
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatosCliente {
    pub nombre: String,
    pub telefono: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
}

/// Línea de pedido con precio capturado
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PedidoItem {
    #[serde(with = "serde_helpers::record_id")]
    pub producto: RecordId,
    pub nombre: String,
    pub cantidad: i64,
    pub precio_unitario: f64,
    pub subtotal: f64,
    #[serde(default)]
    pub imagen: Option<String>,
}

/// Pedido de la tienda pública
///
/// El cliente lo sigue y puede cancelarlo con `codigo_seguimiento`;
/// el personal lo administra por la rama /api/pedidos/admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pedido {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<PedidoId>,
    /// Número visible con formato PYYYYMMDD-NNNN
    pub numero: String,
    /// Seis dígitos, único (índice de base de datos)
    pub codigo_seguimiento: String,
    pub datos_cliente: DatosCliente,
    pub items: Vec<PedidoItem>,
    pub subtotal: f64,
    pub total: f64,
    pub estado: EstadoPedido,
    #[serde(default)]
    pub notas_cliente: Option<String>,
    #[serde(default)]
    pub notas_admin: Option<String>,
    pub fecha: DateTime<Utc>,
    #[serde(default)]
    pub fecha_cambio_estado: Option<DateTime<Utc>>,
}

/// Línea de pedido tal como llega del formulario público
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PedidoItemRequest {
    /// ID de producto "producto:xyz"
    pub producto: String,
    pub cantidad: i64,
}

/// Alta de pedido (endpoint público)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PedidoCreate {
    pub datos_cliente: DatosCliente,
    pub items: Vec<PedidoItemRequest>,
    #[serde(default)]
    pub notas_cliente: Option<String>,
}

/// Cambio de estado (rama admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CambioEstadoRequest {
    pub estado: EstadoPedido,
    #[serde(default)]
    pub notas_admin: Option<String>,
}

/// Cancelación pública por código de seguimiento
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelacionPublica {
    #[serde(default)]
    pub motivo: Option<String>,
}
