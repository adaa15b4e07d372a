//! Tareas de fondo

use std::time::Duration;

use crate::core::ServerState;
use crate::db::repository::CodigoVerificacionRepository;

/// Intervalo de purga de códigos de verificación expirados
const PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Lanza la purga horaria de códigos de verificación expirados o consumidos
pub fn spawn_verification_code_purge(state: ServerState) {
    tokio::spawn(async move {
        let repo = CodigoVerificacionRepository::new(state.get_db());
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        // El primer tick es inmediato; purga también al arrancar
        loop {
            interval.tick().await;
            match repo.purge_expired().await {
                Ok(n) if n > 0 => {
                    tracing::info!(purged = n, "Expired verification codes purged")
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Verification code purge failed: {}", e),
            }
        }
    });
}
