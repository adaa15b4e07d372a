//! Handlers de clientes

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::db::models::{Cliente, ClienteCreate, ClienteUpdate};
use crate::db::repository::{ClienteRepository, RepoError};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
    validate_telefono,
};
use shared::{AppError, ErrorCode, PageQuery, Paginated};

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<Cliente>>, AppError> {
    let repo = ClienteRepository::new(state.get_db());
    let items = repo
        .find_page(query.offset(), query.limit())
        .await
        .map_err(AppError::from)?;
    let total = repo.count_active().await.map_err(AppError::from)?;
    Ok(Json(Paginated::new(items, &query, total as usize)))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Cliente>, AppError> {
    buscar_cliente(&state, &id).await.map(Json)
}

#[derive(serde::Deserialize)]
pub struct BuscarQuery {
    q: String,
}

pub async fn buscar(
    State(state): State<ServerState>,
    Query(query): Query<BuscarQuery>,
) -> Result<Json<Vec<Cliente>>, AppError> {
    if query.q.trim().is_empty() {
        return Err(AppError::validation("El término de búsqueda no puede estar vacío"));
    }
    let clientes = ClienteRepository::new(state.get_db())
        .buscar(query.q.trim())
        .await
        .map_err(AppError::from)?;
    Ok(Json(clientes))
}

pub async fn frecuentes(State(state): State<ServerState>) -> Result<Json<Vec<Cliente>>, AppError> {
    let clientes = ClienteRepository::new(state.get_db())
        .frecuentes()
        .await
        .map_err(AppError::from)?;
    Ok(Json(clientes))
}

pub async fn inactivos(State(state): State<ServerState>) -> Result<Json<Vec<Cliente>>, AppError> {
    let clientes = ClienteRepository::new(state.get_db())
        .inactivos()
        .await
        .map_err(AppError::from)?;
    Ok(Json(clientes))
}

pub async fn estadisticas(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let cliente = buscar_cliente(&state, &id).await?;
    Ok(Json(json!({
        "cliente": cliente.nombre,
        "tipo": cliente.tipo,
        "estadisticas": cliente.estadisticas,
    })))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<ClienteCreate>,
) -> Result<Json<Cliente>, AppError> {
    validate_required_text(&data.nombre, "nombre", MAX_NAME_LEN)?;
    validate_telefono(&data.telefono)?;
    validate_optional_text(&data.direccion, "direccion", MAX_ADDRESS_LEN)?;
    validate_optional_text(&data.notas, "notas", MAX_NOTE_LEN)?;

    let creado = ClienteRepository::new(state.get_db())
        .create(data)
        .await
        .map_err(map_phone_duplicate)?;

    tracing::info!(nombre = %creado.nombre, "Cliente creado");
    Ok(Json(creado))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(data): Json<ClienteUpdate>,
) -> Result<Json<Cliente>, AppError> {
    if let Some(nombre) = &data.nombre {
        validate_required_text(nombre, "nombre", MAX_NAME_LEN)?;
    }
    if let Some(telefono) = &data.telefono {
        validate_telefono(telefono)?;
    }
    validate_optional_text(&data.direccion, "direccion", MAX_ADDRESS_LEN)?;
    validate_optional_text(&data.notas, "notas", MAX_NOTE_LEN)?;

    let actualizado = ClienteRepository::new(state.get_db())
        .update(&id, data)
        .await
        .map_err(map_phone_duplicate)?;
    Ok(Json(actualizado))
}

/// Baja lógica (el historial de ventas se conserva)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let cliente = buscar_cliente(&state, &id).await?;
    ClienteRepository::new(state.get_db())
        .delete(&id)
        .await
        .map_err(AppError::from)?;
    tracing::info!(nombre = %cliente.nombre, "Cliente dado de baja");
    Ok(Json(json!({ "eliminado": true })))
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn buscar_cliente(state: &ServerState, id: &str) -> Result<Cliente, AppError> {
    ClienteRepository::new(state.get_db())
        .find_by_id(id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::ClientNotFound))
}

fn map_phone_duplicate(e: RepoError) -> AppError {
    match e {
        RepoError::Duplicate(_) => AppError::new(ErrorCode::ClientPhoneExists),
        other => AppError::from(other),
    }
}
