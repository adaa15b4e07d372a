//! Repositorio de pedidos

use chrono::{DateTime, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{EstadoPedido, Pedido};

#[derive(Clone)]
pub struct PedidoRepository {
    base: BaseRepository,
}

#[derive(serde::Deserialize)]
struct CountRow {
    total: u64,
}

impl PedidoRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Inserta el pedido; el índice único sobre el código de seguimiento
    /// convierte una colisión en error de duplicado
    pub async fn create(&self, pedido: Pedido) -> RepoResult<Pedido> {
        let created: Option<Pedido> = self
            .base
            .db()
            .create("pedido")
            .content(pedido)
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("idx_pedido_codigo") {
                    RepoError::Duplicate("Código de seguimiento en uso".to_string())
                } else {
                    RepoError::Database(msg)
                }
            })?;
        created.ok_or_else(|| RepoError::Database("No se pudo crear el pedido".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Pedido>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("ID inválido: {}", id)))?;
        let pedido: Option<Pedido> = self.base.db().select(thing).await?;
        Ok(pedido)
    }

    pub async fn find_by_codigo(&self, codigo: &str) -> RepoResult<Option<Pedido>> {
        let codigo_owned = codigo.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM pedido WHERE codigoSeguimiento = $codigo LIMIT 1")
            .bind(("codigo", codigo_owned))
            .await?;
        let pedidos: Vec<Pedido> = result.take(0)?;
        Ok(pedidos.into_iter().next())
    }

    /// Listado administrativo paginado, opcionalmente filtrado por estado
    pub async fn find_page(
        &self,
        estado: Option<EstadoPedido>,
        start: usize,
        limit: usize,
    ) -> RepoResult<Vec<Pedido>> {
        let pedidos: Vec<Pedido> = match estado {
            Some(estado) => self
                .base
                .db()
                .query("SELECT * FROM pedido WHERE estado = $estado ORDER BY fecha DESC LIMIT $limit START $start")
                .bind(("estado", estado))
                .bind(("limit", limit))
                .bind(("start", start))
                .await?
                .take(0)?,
            None => self
                .base
                .db()
                .query("SELECT * FROM pedido ORDER BY fecha DESC LIMIT $limit START $start")
                .bind(("limit", limit))
                .bind(("start", start))
                .await?
                .take(0)?,
        };
        Ok(pedidos)
    }

    pub async fn count(&self, estado: Option<EstadoPedido>) -> RepoResult<u64> {
        let mut result = match estado {
            Some(estado) => {
                self.base
                    .db()
                    .query("SELECT count() AS total FROM pedido WHERE estado = $estado GROUP ALL")
                    .bind(("estado", estado))
                    .await?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT count() AS total FROM pedido GROUP ALL")
                    .await?
            }
        };
        let row: Option<CountRow> = result.take(0)?;
        Ok(row.map(|r| r.total).unwrap_or(0))
    }

    /// Pedidos registrados desde un instante (numeración diaria)
    pub async fn count_desde(&self, desde: DateTime<Utc>) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM pedido WHERE fecha >= $desde GROUP ALL")
            .bind(("desde", desde))
            .await?;
        let row: Option<CountRow> = result.take(0)?;
        Ok(row.map(|r| r.total).unwrap_or(0))
    }

    /// Aplica la transición y sella la fecha del cambio.
    ///
    /// Las notas llegan ya con su valor final (el servicio anexa sobre las
    /// previas); `NONE` conserva las existentes.
    pub async fn set_estado(
        &self,
        id: &RecordId,
        estado: EstadoPedido,
        notas_admin: Option<String>,
        notas_cliente: Option<String>,
    ) -> RepoResult<Pedido> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    estado = $estado,
                    fechaCambioEstado = $ahora,
                    notasAdmin = $notas_admin ?? notasAdmin,
                    notasCliente = $notas_cliente ?? notasCliente
                RETURN AFTER"#,
            )
            .bind(("thing", id.clone()))
            .bind(("estado", estado))
            .bind(("ahora", Utc::now()))
            .bind(("notas_admin", notas_admin))
            .bind(("notas_cliente", notas_cliente))
            .await?;
        result
            .take::<Option<Pedido>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Pedido {} no encontrado", id)))
    }

    pub async fn delete(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", id.clone()))
            .await?;
        Ok(())
    }
}
