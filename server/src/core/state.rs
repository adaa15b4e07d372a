use std::path::PathBuf;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{JwtConfig, JwtService};
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::services::MailerService;

/// Estado compartido del servidor
///
/// Referencia barata de clonar (Arc internos) que viaja como `State` de Axum
/// hacia middleware y handlers.
///
/// | Campo | Tipo | Descripción |
/// |-------|------|-------------|
/// | config | Config | Configuración (inmutable) |
/// | db | Surreal<Db> | Base de datos embebida |
/// | jwt_service | Arc<JwtService> | Emisión/validación de tokens |
/// | mailer | MailerService | Correo transaccional (best-effort) |
#[derive(Clone)]
pub struct ServerState {
    /// Configuración del servidor
    pub config: Config,
    /// Base de datos embebida (SurrealDB)
    pub db: Surreal<Db>,
    /// Servicio JWT (propiedad compartida vía Arc)
    pub jwt_service: Arc<JwtService>,
    /// Servicio de correo transaccional
    pub mailer: MailerService,
}

impl ServerState {
    /// Construcción manual; normalmente se usa [`ServerState::initialize`]
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        mailer: MailerService,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            mailer,
        }
    }

    /// Inicializa el estado del servidor
    ///
    /// 1. Crea la estructura del directorio de trabajo
    /// 2. Abre la base de datos en `work_dir/database/fiesta.db`
    /// 3. Construye los servicios (JWT, correo)
    pub async fn initialize(config: &Config) -> Result<Self> {
        ensure_work_dir_structure(config)
            .map_err(|e| ServerError::Config(format!("No se pudo crear work_dir: {e}")))?;

        let db_path = config.database_path();
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        let jwt_service = Arc::new(JwtService::with_config(JwtConfig::default()));
        let mailer = MailerService::new(config);

        Ok(Self::new(config.clone(), db_service.db, jwt_service, mailer))
    }

    /// Estado con base de datos en memoria (tests)
    pub async fn initialize_in_memory(config: &Config) -> Result<Self> {
        let db_service = DbService::memory()
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        let jwt_service = Arc::new(JwtService::with_config(JwtConfig {
            secret: "clave-de-pruebas-en-memoria-0123456789abcdef".to_string(),
            expiration_minutes: 60,
            issuer: "fiesta-server".to_string(),
            audience: "fiesta-app".to_string(),
        }));
        let mailer = MailerService::new(config);

        Ok(Self::new(config.clone(), db_service.db, jwt_service, mailer))
    }

    /// Lanza las tareas de fondo (purga de códigos de verificación)
    ///
    /// Debe llamarse antes de `Server::run()`
    pub fn start_background_tasks(&self) {
        crate::core::tasks::spawn_verification_code_purge(self.clone());
    }

    /// Conexión a la base de datos
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// Directorio de trabajo
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// Servicio JWT
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}

/// Crea los subdirectorios del directorio de trabajo si no existen
fn ensure_work_dir_structure(config: &Config) -> std::io::Result<()> {
    let work_dir = PathBuf::from(&config.work_dir);
    std::fs::create_dir_all(work_dir.join("database"))?;
    std::fs::create_dir_all(config.images_dir())?;
    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;
    }
    Ok(())
}
