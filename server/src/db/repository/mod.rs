//! Repositorios
//!
//! Operaciones CRUD por tabla sobre la conexión embebida.

pub mod cliente;
pub mod codigo_verificacion;
pub mod pedido;
pub mod producto;
pub mod usuario;
pub mod venta;

pub use cliente::ClienteRepository;
pub use codigo_verificacion::CodigoVerificacionRepository;
pub use pedido::PedidoRepository;
pub use producto::ProductoRepository;
pub use usuario::UsuarioRepository;
pub use venta::VentaRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Errores de repositorio
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("No encontrado: {0}")]
    NotFound(String),

    #[error("Duplicado: {0}")]
    Duplicate(String),

    #[error("Error de base de datos: {0}")]
    Database(String),

    #[error("Error de validación: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for shared::AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => shared::AppError::not_found(msg),
            RepoError::Duplicate(msg) => {
                shared::AppError::with_message(shared::ErrorCode::AlreadyExists, msg)
            }
            RepoError::Validation(msg) => shared::AppError::validation(msg),
            RepoError::Database(msg) => shared::AppError::database(msg),
        }
    }
}

// =============================================================================
// Convención de IDs: "tabla:id" en toda la pila
// =============================================================================
//
// surrealdb::RecordId maneja todos los IDs:
//   - parsear: let id: RecordId = "producto:abc".parse()?;
//   - tabla: id.table() / clave: id.key().to_string()
//   - CRUD: db.select(id) / db.delete(id) aceptan RecordId directamente

/// Repositorio base con la referencia a la conexión
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
