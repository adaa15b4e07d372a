//! Base de datos
//!
//! SurrealDB embebido (RocksDB en producción, motor en memoria en tests),
//! modelos y repositorios por tabla.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use shared::AppError;

const NAMESPACE: &str = "fiesta";
const DATABASE: &str = "principal";

/// Servicio de base de datos - posee la conexión embebida
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Abre (o crea) la base de datos en disco
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("No se pudo abrir la base de datos: {e}")))?;

        let service = Self::setup(db).await?;
        tracing::info!("Database ready at {}", db_path);
        Ok(service)
    }

    /// Base de datos en memoria (tests)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("No se pudo crear la base en memoria: {e}")))?;
        Self::setup(db).await
    }

    async fn setup(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("use_ns/use_db: {e}")))?;

        define_schema(&db).await?;
        Ok(Self { db })
    }
}

/// Índices que el motor debe garantizar.
///
/// Las columnas usan los nombres serializados (camelCase), igual que todo
/// identificador en las consultas de los repositorios.
///
/// - `usuario.email` único (registro duplicado rechazado)
/// - `pedido.codigoSeguimiento` único (la creación reintenta una vez ante
///   colisión)
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE INDEX IF NOT EXISTS idx_usuario_email ON TABLE usuario COLUMNS email UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_pedido_codigo ON TABLE pedido COLUMNS codigoSeguimiento UNIQUE;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("No se pudo definir el esquema: {e}")))?;
    Ok(())
}
