//! Handlers de pedidos

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::db::models::{CambioEstadoRequest, CancelacionPublica, EstadoPedido, Pedido, PedidoCreate};
use crate::db::repository::PedidoRepository;
use crate::fulfillment::PedidoService;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
    validate_telefono,
};
use shared::{AppError, ErrorCode, PageQuery, Paginated};

/// Alta pública de pedido
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<PedidoCreate>,
) -> Result<Json<Pedido>, AppError> {
    validate_required_text(&data.datos_cliente.nombre, "nombre", MAX_NAME_LEN)?;
    validate_telefono(&data.datos_cliente.telefono)?;
    validate_optional_text(&data.datos_cliente.direccion, "direccion", MAX_ADDRESS_LEN)?;
    validate_optional_text(&data.notas_cliente, "notasCliente", MAX_NOTE_LEN)?;

    let pedido = PedidoService::new(state.get_db()).crear(data).await?;
    Ok(Json(pedido))
}

/// Consulta pública por código de seguimiento
pub async fn seguimiento(
    State(state): State<ServerState>,
    Path(codigo): Path<String>,
) -> Result<Json<Pedido>, AppError> {
    let pedido = PedidoService::new(state.get_db()).seguimiento(&codigo).await?;
    Ok(Json(pedido))
}

/// Cancelación pública por código de seguimiento
///
/// El cuerpo con el motivo es opcional; un PUT sin cuerpo cancela igual.
pub async fn cancelar_publico(
    State(state): State<ServerState>,
    Path(codigo): Path<String>,
    data: Option<Json<CancelacionPublica>>,
) -> Result<Json<Pedido>, AppError> {
    let motivo = data.and_then(|Json(d)| d.motivo);
    validate_optional_text(&motivo, "motivo", MAX_NOTE_LEN)?;
    let pedido = PedidoService::new(state.get_db())
        .cancelar_por_codigo(&codigo, motivo)
        .await?;
    Ok(Json(pedido))
}

#[derive(serde::Deserialize)]
pub struct EstadoQuery {
    estado: Option<EstadoPedido>,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(filtro): Query<EstadoQuery>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<Pedido>>, AppError> {
    let repo = PedidoRepository::new(state.get_db());
    let items = repo
        .find_page(filtro.estado, query.offset(), query.limit())
        .await
        .map_err(AppError::from)?;
    let total = repo.count(filtro.estado).await.map_err(AppError::from)?;
    Ok(Json(Paginated::new(items, &query, total as usize)))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Pedido>, AppError> {
    PedidoRepository::new(state.get_db())
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .map(Json)
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))
}

pub async fn cambiar_estado(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<CambioEstadoRequest>,
) -> Result<Json<Pedido>, AppError> {
    validate_optional_text(&req.notas_admin, "notasAdmin", MAX_NOTE_LEN)?;
    let pedido = PedidoService::new(state.get_db())
        .cambiar_estado(&id, req)
        .await?;
    Ok(Json(pedido))
}

/// Recuento por estado para el panel de administración
pub async fn estadisticas(State(state): State<ServerState>) -> Result<Json<Value>, AppError> {
    let repo = PedidoRepository::new(state.get_db());
    let total = repo.count(None).await.map_err(AppError::from)?;
    let en_proceso = repo
        .count(Some(EstadoPedido::EnProceso))
        .await
        .map_err(AppError::from)?;
    let listos = repo
        .count(Some(EstadoPedido::ListoParaEntrega))
        .await
        .map_err(AppError::from)?;
    let entregados = repo
        .count(Some(EstadoPedido::Entregado))
        .await
        .map_err(AppError::from)?;
    let cancelados = repo
        .count(Some(EstadoPedido::Cancelado))
        .await
        .map_err(AppError::from)?;

    Ok(Json(json!({
        "total": total,
        "enProceso": en_proceso,
        "listoParaEntrega": listos,
        "entregados": entregados,
        "cancelados": cancelados,
    })))
}
