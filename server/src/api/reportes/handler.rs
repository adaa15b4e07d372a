//! Handlers de reportes
//!
//! Todos agregan en memoria sobre los repositorios; la ganancia se estima
//! con el precio de compra vigente de cada producto.

use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{EstadoPedido, EstadoVenta, MetodoPago, Venta};
use crate::db::repository::{
    ClienteRepository, PedidoRepository, ProductoRepository, VentaRepository,
};
use crate::fulfillment::numbering::inicio_del_dia;
use shared::AppError;

pub async fn dashboard(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let db = state.get_db();
    let ahora = Utc::now();

    let ventas_hoy = VentaRepository::new(db.clone())
        .find_entre(inicio_del_dia(ahora), ahora)
        .await
        .map_err(AppError::from)?;
    let completadas: Vec<&Venta> = ventas_hoy
        .iter()
        .filter(|v| v.estado == EstadoVenta::Completada)
        .collect();
    let ingresos_hoy: f64 = completadas.iter().map(|v| v.total).sum();

    let pedidos_pendientes = PedidoRepository::new(db.clone())
        .count(Some(EstadoPedido::EnProceso))
        .await
        .map_err(AppError::from)?;
    let productos = ProductoRepository::new(db.clone());
    let stock_bajo = productos.stock_bajo().await.map_err(AppError::from)?;
    let clientes_activos = ClienteRepository::new(db.clone())
        .count_active()
        .await
        .map_err(AppError::from)?;

    let mut reporte = json!({
        "fecha": ahora,
        "ventasHoy": completadas.len(),
        "ingresosHoy": ingresos_hoy,
        "pedidosEnProceso": pedidos_pendientes,
        "productosStockBajo": stock_bajo.len(),
        "clientesActivos": clientes_activos,
    });

    if user.is_owner() {
        let coste = coste_de_ventas(&productos, &completadas).await?;
        reporte["gananciaHoy"] = json!(ingresos_hoy - coste);
    }

    Ok(Json(reporte))
}

#[derive(serde::Deserialize)]
pub struct RangoQuery {
    desde: Option<DateTime<Utc>>,
    hasta: Option<DateTime<Utc>>,
}

/// Reporte de ventas del rango pedido (por defecto, los últimos 30 días)
pub async fn ventas(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(rango): Query<RangoQuery>,
) -> Result<Json<Value>, AppError> {
    let ahora = Utc::now();
    let hasta = rango.hasta.unwrap_or(ahora);
    let desde = rango.desde.unwrap_or(hasta - Duration::days(30));
    if desde >= hasta {
        return Err(AppError::validation("El rango de fechas es inválido"));
    }

    let db = state.get_db();
    let todas = VentaRepository::new(db.clone())
        .find_entre(desde, hasta)
        .await
        .map_err(AppError::from)?;
    let completadas: Vec<&Venta> = todas
        .iter()
        .filter(|v| v.estado == EstadoVenta::Completada)
        .collect();

    let ingresos: f64 = completadas.iter().map(|v| v.total).sum();
    let descuentos: f64 = completadas.iter().map(|v| v.descuento).sum();
    let promedio = if completadas.is_empty() {
        0.0
    } else {
        ingresos / completadas.len() as f64
    };

    let por_metodo = |metodo: MetodoPago| -> f64 {
        completadas
            .iter()
            .filter(|v| v.metodo_pago == metodo)
            .map(|v| v.total)
            .sum()
    };

    let mut reporte = json!({
        "desde": desde,
        "hasta": hasta,
        "numeroVentas": completadas.len(),
        "canceladas": todas.len() - completadas.len(),
        "ingresos": ingresos,
        "descuentos": descuentos,
        "promedioVenta": promedio,
        "porMetodoPago": {
            "efectivo": por_metodo(MetodoPago::Efectivo),
            "tarjeta": por_metodo(MetodoPago::Tarjeta),
            "transferencia": por_metodo(MetodoPago::Transferencia),
        },
    });

    if user.is_owner() {
        let coste = coste_de_ventas(&ProductoRepository::new(db), &completadas).await?;
        reporte["costeEstimado"] = json!(coste);
        reporte["gananciaEstimada"] = json!(ingresos - coste);
    }

    Ok(Json(reporte))
}

pub async fn inventario(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let repo = ProductoRepository::new(state.get_db());
    let productos = repo.find_all_active().await.map_err(AppError::from)?;
    let bajo = repo.stock_bajo().await.map_err(AppError::from)?;

    let unidades: i64 = productos.iter().map(|p| p.stock).sum();
    let valor_venta: f64 = productos
        .iter()
        .map(|p| p.precio_venta * p.stock as f64)
        .sum();

    let stock_bajo: Vec<Value> = bajo
        .iter()
        .map(|p| {
            json!({
                "id": p.id.as_ref().map(|id| id.to_string()),
                "nombre": p.nombre,
                "stock": p.stock,
                "stockMinimo": p.stock_minimo,
            })
        })
        .collect();

    let mut reporte = json!({
        "totalProductos": productos.len(),
        "unidadesEnStock": unidades,
        "valorVenta": valor_venta,
        "stockBajo": stock_bajo,
    });

    if user.is_owner() {
        let valor_compra: f64 = productos
            .iter()
            .map(|p| p.precio_compra * p.stock as f64)
            .sum();
        reporte["valorCompra"] = json!(valor_compra);
        reporte["margenPotencial"] = json!(valor_venta - valor_compra);
    }

    Ok(Json(reporte))
}

pub async fn clientes(State(state): State<ServerState>) -> Result<Json<Value>, AppError> {
    let repo = ClienteRepository::new(state.get_db());
    let activos = repo.count_active().await.map_err(AppError::from)?;
    let frecuentes = repo.frecuentes().await.map_err(AppError::from)?;
    let inactivos = repo.inactivos().await.map_err(AppError::from)?;
    let top = repo.top_compradores(5).await.map_err(AppError::from)?;

    let top_compradores: Vec<Value> = top
        .iter()
        .map(|c| {
            json!({
                "id": c.id.as_ref().map(|id| id.to_string()),
                "nombre": c.nombre,
                "tipo": c.tipo,
                "totalCompras": c.estadisticas.total_compras,
                "numeroVentas": c.estadisticas.numero_ventas,
            })
        })
        .collect();

    Ok(Json(json!({
        "clientesActivos": activos,
        "frecuentes": frecuentes.len(),
        "inactivos": inactivos.len(),
        "topCompradores": top_compradores,
    })))
}

/// Coste estimado de las ventas con el precio de compra vigente; los
/// productos ya eliminados cuestan cero
async fn coste_de_ventas(
    productos: &ProductoRepository,
    ventas: &[&Venta],
) -> Result<f64, AppError> {
    let mut precios: HashMap<String, f64> = HashMap::new();
    let mut coste = 0.0;

    for venta in ventas {
        for item in &venta.items {
            let clave = item.producto.to_string();
            let precio_compra = match precios.get(&clave) {
                Some(p) => *p,
                None => {
                    let p = productos
                        .find_by_id(&clave)
                        .await
                        .map_err(AppError::from)?
                        .map(|p| p.precio_compra)
                        .unwrap_or(0.0);
                    precios.insert(clave, p);
                    p
                }
            };
            coste += precio_compra * item.cantidad as f64;
        }
    }

    Ok(coste)
}
