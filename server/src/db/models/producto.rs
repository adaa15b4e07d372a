//! Modelo de producto

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

pub type ProductoId = RecordId;

/// Categorías del catálogo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoriaProducto {
    Globos,
    Decoracion,
    ArticulosFiesta,
    Servicios,
    Otros,
}

impl CategoriaProducto {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Globos => "globos",
            Self::Decoracion => "decoracion",
            Self::ArticulosFiesta => "articulos-fiesta",
            Self::Servicios => "servicios",
            Self::Otros => "otros",
        }
    }
}

/// Atributos específicos de globos (obligatorio si categoria = globos)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetalleGlobo {
    pub tipo: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub tamano: Option<String>,
}

/// Producto del catálogo
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Producto {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProductoId>,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    pub categoria: CategoriaProducto,
    pub precio_compra: f64,
    pub precio_venta: f64,
    pub stock: i64,
    #[serde(default)]
    pub stock_minimo: i64,
    /// Nombre de fichero bajo work_dir/uploads/images
    #[serde(default)]
    pub imagen: Option<String>,
    /// Obligatorio si categoria = globos
    #[serde(default)]
    pub detalle_globo: Option<DetalleGlobo>,
    /// Obligatorio si categoria = servicios
    #[serde(default)]
    pub tipo_servicio: Option<String>,
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub activo: bool,
    pub creado_en: DateTime<Utc>,
    #[serde(default)]
    pub actualizado_en: Option<DateTime<Utc>>,
}

impl Producto {
    /// Stock en o por debajo del mínimo configurado
    pub fn stock_bajo(&self) -> bool {
        self.stock <= self.stock_minimo
    }
}

/// Alta de producto
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductoCreate {
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    pub categoria: CategoriaProducto,
    pub precio_compra: f64,
    pub precio_venta: f64,
    pub stock: i64,
    #[serde(default)]
    pub stock_minimo: Option<i64>,
    #[serde(default)]
    pub detalle_globo: Option<DetalleGlobo>,
    #[serde(default)]
    pub tipo_servicio: Option<String>,
}

/// Modificación parcial de producto
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria: Option<CategoriaProducto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio_compra: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio_venta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_minimo: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalle_globo: Option<DetalleGlobo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_servicio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
}
