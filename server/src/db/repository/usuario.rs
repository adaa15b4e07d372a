//! Repositorio de usuarios

use chrono::Utc;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Usuario, UsuarioUpdate};
use shared::auth::{Permisos, Rol};

#[derive(Clone)]
pub struct UsuarioRepository {
    base: BaseRepository,
}

impl UsuarioRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Total de cuentas registradas (regla del primer usuario)
    pub async fn count(&self) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM usuario GROUP ALL")
            .await?;
        #[derive(serde::Deserialize)]
        struct Row {
            total: u64,
        }
        let row: Option<Row> = result.take(0)?;
        Ok(row.map(|r| r.total).unwrap_or(0))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Usuario>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("ID inválido: {}", id)))?;
        let usuario: Option<Usuario> = self.base.db().select(thing).await?;
        Ok(usuario)
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Usuario>> {
        let email_owned = email.to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM usuario WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let usuarios: Vec<Usuario> = result.take(0)?;
        Ok(usuarios.into_iter().next())
    }

    /// Alta de usuario con el hash ya calculado
    ///
    /// El email se normaliza a minúsculas; el índice único lo respalda.
    pub async fn create(
        &self,
        nombre: String,
        email: String,
        password_hash: String,
        rol: Rol,
        telefono: Option<String>,
        permisos: Permisos,
    ) -> RepoResult<Usuario> {
        let email = email.to_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "El email '{}' ya está registrado",
                email
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE usuario SET
                    nombre = $nombre,
                    email = $email,
                    passwordHash = $password_hash,
                    rol = $rol,
                    telefono = $telefono,
                    permisos = $permisos,
                    activo = true,
                    ultimoAcceso = NONE,
                    creadoEn = $creado_en
                RETURN AFTER"#,
            )
            .bind(("nombre", nombre))
            .bind(("email", email))
            .bind(("password_hash", password_hash))
            .bind(("rol", rol))
            .bind(("telefono", telefono))
            .bind(("permisos", permisos))
            .bind(("creado_en", Utc::now()))
            .await?;

        let created: Option<Usuario> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("No se pudo crear el usuario".to_string()))
    }

    /// Actualiza los campos de perfil presentes
    pub async fn update_profile(&self, id: &str, data: UsuarioUpdate) -> RepoResult<Usuario> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("ID inválido: {}", id)))?;

        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Usuario {} no encontrado", id)))
    }

    pub async fn update_password(&self, id: &str, password_hash: String) -> RepoResult<()> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("ID inválido: {}", id)))?;
        self.base
            .db()
            .query("UPDATE $thing SET passwordHash = $password_hash")
            .bind(("thing", thing))
            .bind(("password_hash", password_hash))
            .await?;
        Ok(())
    }

    pub async fn update_password_by_email(
        &self,
        email: &str,
        password_hash: String,
    ) -> RepoResult<()> {
        let email_owned = email.to_lowercase();
        self.base
            .db()
            .query("UPDATE usuario SET passwordHash = $password_hash WHERE email = $email")
            .bind(("password_hash", password_hash))
            .bind(("email", email_owned))
            .await?;
        Ok(())
    }

    pub async fn touch_ultimo_acceso(&self, id: &str) -> RepoResult<()> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("ID inválido: {}", id)))?;
        self.base
            .db()
            .query("UPDATE $thing SET ultimoAcceso = $ahora")
            .bind(("thing", thing))
            .bind(("ahora", Utc::now()))
            .await?;
        Ok(())
    }
}
