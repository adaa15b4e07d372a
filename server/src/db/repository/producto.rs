//! Repositorio de productos

use chrono::Utc;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Producto, ProductoCreate, ProductoUpdate};

#[derive(Clone)]
pub struct ProductoRepository {
    base: BaseRepository,
}

#[derive(serde::Deserialize)]
struct CountRow {
    total: u64,
}

impl ProductoRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Productos activos, paginados
    pub async fn find_page(&self, start: usize, limit: usize) -> RepoResult<Vec<Producto>> {
        let productos: Vec<Producto> = self
            .base
            .db()
            .query("SELECT * FROM producto WHERE activo = true ORDER BY nombre LIMIT $limit START $start")
            .bind(("limit", limit))
            .bind(("start", start))
            .await?
            .take(0)?;
        Ok(productos)
    }

    /// Todos los productos activos (reportes de inventario)
    pub async fn find_all_active(&self) -> RepoResult<Vec<Producto>> {
        let productos: Vec<Producto> = self
            .base
            .db()
            .query("SELECT * FROM producto WHERE activo = true ORDER BY nombre")
            .await?
            .take(0)?;
        Ok(productos)
    }

    pub async fn count_active(&self) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM producto WHERE activo = true GROUP ALL")
            .await?;
        let row: Option<CountRow> = result.take(0)?;
        Ok(row.map(|r| r.total).unwrap_or(0))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Producto>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("ID inválido: {}", id)))?;
        let producto: Option<Producto> = self.base.db().select(thing).await?;
        Ok(producto)
    }

    /// Búsqueda por nombre o descripción (subcadena, sin mayúsculas)
    pub async fn buscar(&self, termino: &str) -> RepoResult<Vec<Producto>> {
        let q = termino.to_lowercase();
        let productos: Vec<Producto> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM producto WHERE activo = true
                   AND (string::lowercase(nombre) CONTAINS $q
                        OR string::lowercase(descripcion ?? '') CONTAINS $q)
                   ORDER BY nombre"#,
            )
            .bind(("q", q))
            .await?
            .take(0)?;
        Ok(productos)
    }

    /// Productos activos con stock en o bajo su mínimo
    pub async fn stock_bajo(&self) -> RepoResult<Vec<Producto>> {
        let productos: Vec<Producto> = self
            .base
            .db()
            .query("SELECT * FROM producto WHERE activo = true AND stock <= stockMinimo ORDER BY stock")
            .await?
            .take(0)?;
        Ok(productos)
    }

    /// Catálogo público: activos con stock disponible
    pub async fn catalogo_publico(&self) -> RepoResult<Vec<Producto>> {
        let productos: Vec<Producto> = self
            .base
            .db()
            .query("SELECT * FROM producto WHERE activo = true AND stock > 0 ORDER BY nombre")
            .await?
            .take(0)?;
        Ok(productos)
    }

    pub async fn create(&self, data: ProductoCreate, imagen: Option<String>) -> RepoResult<Producto> {
        let producto = Producto {
            id: None,
            nombre: data.nombre,
            descripcion: data.descripcion,
            categoria: data.categoria,
            precio_compra: data.precio_compra,
            precio_venta: data.precio_venta,
            stock: data.stock,
            stock_minimo: data.stock_minimo.unwrap_or(0),
            imagen,
            detalle_globo: data.detalle_globo,
            tipo_servicio: data.tipo_servicio,
            activo: true,
            creado_en: Utc::now(),
            actualizado_en: None,
        };

        let created: Option<Producto> = self.base.db().create("producto").content(producto).await?;
        created.ok_or_else(|| RepoError::Database("No se pudo crear el producto".to_string()))
    }

    pub async fn update(&self, id: &str, data: ProductoUpdate) -> RepoResult<Producto> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("ID inválido: {}", id)))?;

        self.base
            .db()
            .query("UPDATE $thing MERGE $data SET actualizadoEn = $ahora")
            .bind(("thing", thing))
            .bind(("data", data))
            .bind(("ahora", Utc::now()))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Producto {} no encontrado", id)))
    }

    /// Quita los campos específicos de categoría que dejaron de aplicar
    /// tras un cambio de categoría
    pub async fn clear_detalles(
        &self,
        id: &str,
        quitar_detalle_globo: bool,
        quitar_tipo_servicio: bool,
    ) -> RepoResult<()> {
        let mut sets: Vec<&str> = Vec::new();
        if quitar_detalle_globo {
            sets.push("detalleGlobo = NONE");
        }
        if quitar_tipo_servicio {
            sets.push("tipoServicio = NONE");
        }
        if sets.is_empty() {
            return Ok(());
        }

        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("ID inválido: {}", id)))?;
        self.base
            .db()
            .query(format!("UPDATE $thing SET {}", sets.join(", ")))
            .bind(("thing", thing))
            .await?;
        Ok(())
    }

    pub async fn set_imagen(&self, id: &str, imagen: Option<String>) -> RepoResult<()> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("ID inválido: {}", id)))?;
        self.base
            .db()
            .query("UPDATE $thing SET imagen = $imagen")
            .bind(("thing", thing))
            .bind(("imagen", imagen))
            .await?;
        Ok(())
    }

    /// Borrado definitivo
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("ID inválido: {}", id)))?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }

    /// Descuento condicional de stock
    ///
    /// Solo descuenta si hay existencias suficientes; devuelve false si la
    /// condición no se cumplió (otro proceso consumió el stock primero).
    pub async fn decrement_stock(&self, id: &RecordId, cantidad: i64) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET stock -= $cantidad
                   WHERE activo = true AND stock >= $cantidad
                   RETURN AFTER"#,
            )
            .bind(("thing", id.clone()))
            .bind(("cantidad", cantidad))
            .await?;
        let updated: Vec<Producto> = result.take(0)?;
        Ok(!updated.is_empty())
    }

    /// Restituye stock (cancelaciones y compensación)
    pub async fn increment_stock(&self, id: &RecordId, cantidad: i64) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET stock += $cantidad")
            .bind(("thing", id.clone()))
            .bind(("cantidad", cantidad))
            .await?;
        Ok(())
    }
}
