//! Repositorio de clientes

use chrono::{Duration, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{
    Cliente, ClienteCreate, ClienteUpdate, EstadisticasCliente, TipoCliente,
};

/// Días sin compras a partir de los cuales un cliente se considera inactivo
const DIAS_INACTIVIDAD: i64 = 90;

#[derive(Clone)]
pub struct ClienteRepository {
    base: BaseRepository,
}

#[derive(serde::Deserialize)]
struct CountRow {
    total: u64,
}

impl ClienteRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_page(&self, start: usize, limit: usize) -> RepoResult<Vec<Cliente>> {
        let clientes: Vec<Cliente> = self
            .base
            .db()
            .query("SELECT * FROM cliente WHERE activo = true ORDER BY nombre LIMIT $limit START $start")
            .bind(("limit", limit))
            .bind(("start", start))
            .await?
            .take(0)?;
        Ok(clientes)
    }

    pub async fn count_active(&self) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM cliente WHERE activo = true GROUP ALL")
            .await?;
        let row: Option<CountRow> = result.take(0)?;
        Ok(row.map(|r| r.total).unwrap_or(0))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Cliente>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("ID inválido: {}", id)))?;
        let cliente: Option<Cliente> = self.base.db().select(thing).await?;
        Ok(cliente)
    }

    /// Teléfono entre clientes activos (unicidad a nivel de aplicación)
    pub async fn find_active_by_telefono(&self, telefono: &str) -> RepoResult<Option<Cliente>> {
        let telefono_owned = telefono.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM cliente WHERE activo = true AND telefono = $telefono LIMIT 1")
            .bind(("telefono", telefono_owned))
            .await?;
        let clientes: Vec<Cliente> = result.take(0)?;
        Ok(clientes.into_iter().next())
    }

    /// Búsqueda por nombre o teléfono
    pub async fn buscar(&self, termino: &str) -> RepoResult<Vec<Cliente>> {
        let q = termino.to_lowercase();
        let clientes: Vec<Cliente> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM cliente WHERE activo = true
                   AND (string::lowercase(nombre) CONTAINS $q OR telefono CONTAINS $q)
                   ORDER BY nombre"#,
            )
            .bind(("q", q))
            .await?
            .take(0)?;
        Ok(clientes)
    }

    pub async fn frecuentes(&self) -> RepoResult<Vec<Cliente>> {
        let clientes: Vec<Cliente> = self
            .base
            .db()
            .query("SELECT * FROM cliente WHERE activo = true AND tipo = 'frecuente' ORDER BY nombre")
            .await?
            .take(0)?;
        Ok(clientes)
    }

    /// Clientes sin compras recientes (o sin compras)
    pub async fn inactivos(&self) -> RepoResult<Vec<Cliente>> {
        let corte = Utc::now() - Duration::days(DIAS_INACTIVIDAD);
        let clientes: Vec<Cliente> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM cliente WHERE activo = true
                   AND (estadisticas.ultimaCompra IS NONE OR estadisticas.ultimaCompra < $corte)
                   ORDER BY nombre"#,
            )
            .bind(("corte", corte))
            .await?
            .take(0)?;
        Ok(clientes)
    }

    /// Mejores compradores por monto acumulado (reportes)
    pub async fn top_compradores(&self, limite: usize) -> RepoResult<Vec<Cliente>> {
        let clientes: Vec<Cliente> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM cliente WHERE activo = true AND estadisticas.numeroVentas > 0
                   ORDER BY estadisticas.totalCompras DESC LIMIT $limite"#,
            )
            .bind(("limite", limite))
            .await?
            .take(0)?;
        Ok(clientes)
    }

    pub async fn create(&self, data: ClienteCreate) -> RepoResult<Cliente> {
        if self
            .find_active_by_telefono(&data.telefono)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Ya existe un cliente activo con el teléfono '{}'",
                data.telefono
            )));
        }

        let cliente = Cliente {
            id: None,
            nombre: data.nombre,
            telefono: data.telefono,
            email: data.email,
            direccion: data.direccion,
            tipo: data.tipo.unwrap_or(TipoCliente::Individual),
            preferencias: data.preferencias.unwrap_or_default(),
            notas: data.notas,
            estadisticas: EstadisticasCliente::default(),
            activo: true,
            creado_en: Utc::now(),
        };

        let created: Option<Cliente> = self.base.db().create("cliente").content(cliente).await?;
        created.ok_or_else(|| RepoError::Database("No se pudo crear el cliente".to_string()))
    }

    pub async fn update(&self, id: &str, data: ClienteUpdate) -> RepoResult<Cliente> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("ID inválido: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Cliente {} no encontrado", id)))?;

        if let Some(ref nuevo_telefono) = data.telefono
            && nuevo_telefono != &existing.telefono
            && self.find_active_by_telefono(nuevo_telefono).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Ya existe un cliente activo con el teléfono '{}'",
                nuevo_telefono
            )));
        }

        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Cliente {} no encontrado", id)))
    }

    /// Baja lógica
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("ID inválido: {}", id)))?;
        self.base
            .db()
            .query("UPDATE $thing SET activo = false")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }

    /// Persiste estadísticas y tipo (promoción a frecuente incluida)
    pub async fn update_estadisticas(
        &self,
        id: &RecordId,
        estadisticas: EstadisticasCliente,
        tipo: TipoCliente,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET estadisticas = $estadisticas, tipo = $tipo")
            .bind(("thing", id.clone()))
            .bind(("estadisticas", estadisticas))
            .bind(("tipo", tipo))
            .await?;
        Ok(())
    }
}
