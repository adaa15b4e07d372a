//! Repositorio de códigos de verificación

use chrono::Utc;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::CodigoVerificacion;
use shared::auth::Proposito;

#[derive(Clone)]
pub struct CodigoVerificacionRepository {
    base: BaseRepository,
}

impl CodigoVerificacionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Guarda un código nuevo invalidando los anteriores del mismo email y
    /// propósito
    pub async fn create(&self, codigo: CodigoVerificacion) -> RepoResult<CodigoVerificacion> {
        self.base
            .db()
            .query("DELETE codigo_verificacion WHERE email = $email AND proposito = $proposito")
            .bind(("email", codigo.email.clone()))
            .bind(("proposito", codigo.proposito))
            .await?;

        let created: Option<CodigoVerificacion> = self
            .base
            .db()
            .create("codigo_verificacion")
            .content(codigo)
            .await?;
        created.ok_or_else(|| RepoError::Database("No se pudo guardar el código".to_string()))
    }

    /// Último código vigente para un email y propósito
    pub async fn find_current(
        &self,
        email: &str,
        proposito: Proposito,
    ) -> RepoResult<Option<CodigoVerificacion>> {
        let email_owned = email.to_lowercase();
        let mut result = self
            .base
            .db()
            .query(
                r#"SELECT * FROM codigo_verificacion
                   WHERE email = $email AND proposito = $proposito
                   ORDER BY creado DESC LIMIT 1"#,
            )
            .bind(("email", email_owned))
            .bind(("proposito", proposito))
            .await?;
        let codigos: Vec<CodigoVerificacion> = result.take(0)?;
        Ok(codigos.into_iter().next())
    }

    pub async fn increment_intentos(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET intentos += 1")
            .bind(("thing", id.clone()))
            .await?;
        Ok(())
    }

    pub async fn mark_used(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET usado = true")
            .bind(("thing", id.clone()))
            .await?;
        Ok(())
    }

    /// Elimina códigos expirados o ya consumidos; devuelve cuántos borró
    pub async fn purge_expired(&self) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query(
                r#"SELECT count() AS total FROM codigo_verificacion
                   WHERE expira < $ahora OR usado = true GROUP ALL"#,
            )
            .bind(("ahora", Utc::now()))
            .await?;
        #[derive(serde::Deserialize)]
        struct Row {
            total: u64,
        }
        let row: Option<Row> = result.take(0)?;
        let total = row.map(|r| r.total).unwrap_or(0);

        self.base
            .db()
            .query("DELETE codigo_verificacion WHERE expira < $ahora OR usado = true")
            .bind(("ahora", Utc::now()))
            .await?;

        Ok(total)
    }
}
