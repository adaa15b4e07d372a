//! Repositorio de ventas

use chrono::{DateTime, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{EstadoVenta, Venta};

#[derive(Clone)]
pub struct VentaRepository {
    base: BaseRepository,
}

#[derive(serde::Deserialize)]
struct CountRow {
    total: u64,
}

impl VentaRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, venta: Venta) -> RepoResult<Venta> {
        let created: Option<Venta> = self.base.db().create("venta").content(venta).await?;
        created.ok_or_else(|| RepoError::Database("No se pudo crear la venta".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Venta>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("ID inválido: {}", id)))?;
        let venta: Option<Venta> = self.base.db().select(thing).await?;
        Ok(venta)
    }

    /// Listado paginado, de más reciente a más antigua
    pub async fn find_page(&self, start: usize, limit: usize) -> RepoResult<Vec<Venta>> {
        let ventas: Vec<Venta> = self
            .base
            .db()
            .query("SELECT * FROM venta ORDER BY fecha DESC LIMIT $limit START $start")
            .bind(("limit", limit))
            .bind(("start", start))
            .await?
            .take(0)?;
        Ok(ventas)
    }

    pub async fn count(&self) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM venta GROUP ALL")
            .await?;
        let row: Option<CountRow> = result.take(0)?;
        Ok(row.map(|r| r.total).unwrap_or(0))
    }

    /// Ventas registradas desde un instante (numeración diaria)
    pub async fn count_desde(&self, desde: DateTime<Utc>) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM venta WHERE fecha >= $desde GROUP ALL")
            .bind(("desde", desde))
            .await?;
        let row: Option<CountRow> = result.take(0)?;
        Ok(row.map(|r| r.total).unwrap_or(0))
    }

    /// Ventas dentro de un rango de fechas
    pub async fn find_entre(
        &self,
        desde: DateTime<Utc>,
        hasta: DateTime<Utc>,
    ) -> RepoResult<Vec<Venta>> {
        let ventas: Vec<Venta> = self
            .base
            .db()
            .query("SELECT * FROM venta WHERE fecha >= $desde AND fecha < $hasta ORDER BY fecha DESC")
            .bind(("desde", desde))
            .bind(("hasta", hasta))
            .await?
            .take(0)?;
        Ok(ventas)
    }

    pub async fn set_estado(&self, id: &RecordId, estado: EstadoVenta) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET estado = $estado")
            .bind(("thing", id.clone()))
            .bind(("estado", estado))
            .await?;
        Ok(())
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
