//! Catálogo público de la tienda
//!
//! Sin autenticación. La proyección omite el precio de compra y los campos
//! internos de inventario.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::models::{CategoriaProducto, DetalleGlobo, Producto};
use crate::db::repository::ProductoRepository;
use shared::AppError;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/publico/productos", get(catalogo))
}

/// Producto tal como lo ve el comprador anónimo
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductoPublico {
    id: Option<String>,
    nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    descripcion: Option<String>,
    categoria: CategoriaProducto,
    precio: f64,
    disponible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    imagen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detalle_globo: Option<DetalleGlobo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tipo_servicio: Option<String>,
}

impl From<Producto> for ProductoPublico {
    fn from(p: Producto) -> Self {
        Self {
            id: p.id.map(|id| id.to_string()),
            nombre: p.nombre,
            descripcion: p.descripcion,
            categoria: p.categoria,
            precio: p.precio_venta,
            disponible: p.stock > 0,
            imagen: p.imagen,
            detalle_globo: p.detalle_globo,
            tipo_servicio: p.tipo_servicio,
        }
    }
}

async fn catalogo(
    State(state): State<ServerState>,
) -> Result<Json<Vec<ProductoPublico>>, AppError> {
    let productos = ProductoRepository::new(state.get_db())
        .catalogo_publico()
        .await
        .map_err(AppError::from)?;
    Ok(Json(productos.into_iter().map(Into::into).collect()))
}
