//! Handlers de ventas

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{EstadoVenta, Venta, VentaCreate};
use crate::db::repository::VentaRepository;
use crate::fulfillment::VentaService;
use crate::fulfillment::numbering::inicio_del_dia;
use shared::{AppError, ErrorCode, PageQuery, Paginated};

pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(data): Json<VentaCreate>,
) -> Result<Json<Venta>, AppError> {
    let vendedor: RecordId = user
        .id
        .parse()
        .map_err(|_| AppError::internal("Sesión con ID inválido"))?;
    let venta = VentaService::new(state.get_db()).crear(vendedor, data).await?;
    Ok(Json(venta))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<Venta>>, AppError> {
    let repo = VentaRepository::new(state.get_db());
    let items = repo
        .find_page(query.offset(), query.limit())
        .await
        .map_err(AppError::from)?;
    let total = repo.count().await.map_err(AppError::from)?;
    Ok(Json(Paginated::new(items, &query, total as usize)))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Venta>, AppError> {
    VentaRepository::new(state.get_db())
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .map(Json)
        .ok_or_else(|| AppError::new(ErrorCode::SaleNotFound))
}

pub async fn del_dia(State(state): State<ServerState>) -> Result<Json<Vec<Venta>>, AppError> {
    let ahora = Utc::now();
    let ventas = VentaRepository::new(state.get_db())
        .find_entre(inicio_del_dia(ahora), ahora)
        .await
        .map_err(AppError::from)?;
    Ok(Json(ventas))
}

#[derive(serde::Deserialize)]
pub struct RangoQuery {
    desde: Option<DateTime<Utc>>,
    hasta: Option<DateTime<Utc>>,
}

/// Agregados del rango pedido; sin rango, los del día en curso
pub async fn estadisticas(
    State(state): State<ServerState>,
    Query(rango): Query<RangoQuery>,
) -> Result<Json<Value>, AppError> {
    let ahora = Utc::now();
    let desde = rango.desde.unwrap_or_else(|| inicio_del_dia(ahora));
    let hasta = rango.hasta.unwrap_or(ahora);
    if desde >= hasta {
        return Err(AppError::validation("El rango de fechas es inválido"));
    }

    let ventas = VentaRepository::new(state.get_db())
        .find_entre(desde, hasta)
        .await
        .map_err(AppError::from)?;

    let completadas: Vec<&Venta> = ventas
        .iter()
        .filter(|v| v.estado == EstadoVenta::Completada)
        .collect();
    let monto_total: f64 = completadas.iter().map(|v| v.total).sum();
    let numero_ventas = completadas.len();
    let promedio = if numero_ventas > 0 {
        monto_total / numero_ventas as f64
    } else {
        0.0
    };
    let canceladas = ventas.len() - numero_ventas;

    Ok(Json(json!({
        "desde": desde,
        "hasta": hasta,
        "numeroVentas": numero_ventas,
        "montoTotal": monto_total,
        "promedioVenta": promedio,
        "canceladas": canceladas,
    })))
}

pub async fn cancelar(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Venta>, AppError> {
    let venta = VentaService::new(state.get_db()).cancelar(&id).await?;
    Ok(Json(venta))
}
