use crate::auth::JwtConfig;

/// Configuración del servidor
///
/// # Variables de entorno
///
/// | Variable | Valor por defecto | Descripción |
/// |----------|-------------------|-------------|
/// | WORK_DIR | ./data | Directorio de trabajo (db, imágenes, logs) |
/// | HTTP_PORT | 4000 | Puerto HTTP |
/// | ENVIRONMENT | development | Entorno de ejecución |
/// | LOG_LEVEL | info | Nivel de log |
/// | LOG_DIR | (sin archivo) | Directorio para logs rotativos diarios |
/// | MAIL_API_URL | (deshabilitado) | Endpoint del servicio de correo |
/// | MAIL_API_KEY | (vacío) | Credencial del servicio de correo |
/// | MAIL_FROM | no-reply@fiesta.local | Remitente |
///
/// # Ejemplo
///
/// ```ignore
/// WORK_DIR=/var/lib/fiesta HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Directorio de trabajo: base de datos, imágenes subidas, logs
    pub work_dir: String,
    /// Puerto del API HTTP
    pub http_port: u16,
    /// Configuración JWT
    pub jwt: JwtConfig,
    /// Entorno: development | staging | production
    pub environment: String,
    /// Nivel de log (trace|debug|info|warn|error)
    pub log_level: String,
    /// Directorio de logs rotativos; None = solo stdout
    pub log_dir: Option<String>,

    // === Correo transaccional ===
    /// URL del API de correo; None deshabilita el envío
    pub mail_api_url: Option<String>,
    /// Clave del API de correo
    pub mail_api_key: String,
    /// Dirección remitente
    pub mail_from: String,
}

impl Config {
    /// Carga la configuración desde variables de entorno, con defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            mail_api_url: std::env::var("MAIL_API_URL").ok(),
            mail_api_key: std::env::var("MAIL_API_KEY").unwrap_or_default(),
            mail_from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "no-reply@fiesta.local".into()),
        }
    }

    /// Sobrescribe valores puntuales (escenarios de test)
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Directorio donde se persisten las imágenes de productos
    pub fn images_dir(&self) -> std::path::PathBuf {
        std::path::PathBuf::from(&self.work_dir).join("uploads/images")
    }

    /// Ruta del fichero de base de datos embebida
    pub fn database_path(&self) -> std::path::PathBuf {
        std::path::PathBuf::from(&self.work_dir).join("database/fiesta.db")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
