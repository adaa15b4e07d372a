//! Servido de imágenes de producto
//!
//! Público; todas las imágenes guardadas son JPEG reencodados.

use axum::{
    Router,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::core::ServerState;
use crate::services::ImageStore;
use shared::AppError;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/imagenes/{filename}", get(servir))
}

async fn servir(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let path = ImageStore::new(state.config.images_dir()).resolve(&filename)?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::internal(format!("No se pudo leer la imagen: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/jpeg"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        bytes,
    )
        .into_response())
}
