//! Errores de arranque del servidor
//!
//! Los handlers HTTP usan `shared::AppError`; este tipo cubre únicamente la
//! inicialización (base de datos, directorio de trabajo, bind del socket).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Error de base de datos: {0}")]
    Database(String),

    #[error("Error de configuración: {0}")]
    Config(String),

    #[error("Error interno: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
