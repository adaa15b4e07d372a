//! Handlers de productos
//!
//! El alta y la modificación llegan como multipart: un campo `datos` con el
//! JSON del producto y un campo `imagen` opcional con el fichero.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::db::models::{CategoriaProducto, Producto, ProductoCreate, ProductoUpdate};
use crate::db::repository::ProductoRepository;
use crate::services::ImageStore;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use shared::{AppError, ErrorCode, PageQuery, Paginated};

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<Producto>>, AppError> {
    let repo = ProductoRepository::new(state.get_db());
    let items = repo
        .find_page(query.offset(), query.limit())
        .await
        .map_err(AppError::from)?;
    let total = repo.count_active().await.map_err(AppError::from)?;
    Ok(Json(Paginated::new(items, &query, total as usize)))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Producto>, AppError> {
    ProductoRepository::new(state.get_db())
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .map(Json)
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))
}

#[derive(serde::Deserialize)]
pub struct BuscarQuery {
    q: String,
}

pub async fn buscar(
    State(state): State<ServerState>,
    Query(query): Query<BuscarQuery>,
) -> Result<Json<Vec<Producto>>, AppError> {
    if query.q.trim().is_empty() {
        return Err(AppError::validation("El término de búsqueda no puede estar vacío"));
    }
    let productos = ProductoRepository::new(state.get_db())
        .buscar(query.q.trim())
        .await
        .map_err(AppError::from)?;
    Ok(Json(productos))
}

pub async fn stock_bajo(
    State(state): State<ServerState>,
) -> Result<Json<Vec<Producto>>, AppError> {
    let productos = ProductoRepository::new(state.get_db())
        .stock_bajo()
        .await
        .map_err(AppError::from)?;
    Ok(Json(productos))
}

pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> Result<Json<Producto>, AppError> {
    let (datos, imagen) = leer_multipart(multipart).await?;
    let data: ProductoCreate = serde_json::from_slice(&datos)
        .map_err(|e| AppError::validation(format!("Campo 'datos' inválido: {}", e)))?;

    validar_producto_create(&data)?;

    let store = ImageStore::new(state.config.images_dir());
    let filename = match imagen {
        Some((bytes, nombre)) => Some(store.save(&bytes, &nombre)?),
        None => None,
    };

    let creado = ProductoRepository::new(state.get_db())
        .create(data, filename.clone())
        .await
        .map_err(|e| {
            // La imagen ya guardada no debe quedar huérfana
            if let Some(f) = &filename {
                store.delete(f);
            }
            AppError::from(e)
        })?;

    tracing::info!(nombre = %creado.nombre, "Producto creado");
    Ok(Json(creado))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Producto>, AppError> {
    let repo = ProductoRepository::new(state.get_db());
    let existente = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    let (datos, imagen) = leer_multipart(multipart).await?;
    let data: ProductoUpdate = serde_json::from_slice(&datos)
        .map_err(|e| AppError::validation(format!("Campo 'datos' inválido: {}", e)))?;

    validar_producto_update(&existente, &data)?;

    let categoria_final = data.categoria.unwrap_or(existente.categoria);
    let mut actualizado = repo.update(&id, data).await.map_err(AppError::from)?;

    // Un cambio de categoría deja huérfanos los campos específicos previos
    let quitar_detalle = categoria_final != CategoriaProducto::Globos
        && actualizado.detalle_globo.is_some();
    let quitar_servicio = categoria_final != CategoriaProducto::Servicios
        && actualizado.tipo_servicio.is_some();
    if quitar_detalle || quitar_servicio {
        repo.clear_detalles(&id, quitar_detalle, quitar_servicio)
            .await
            .map_err(AppError::from)?;
        actualizado = repo
            .find_by_id(&id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    }

    // La imagen nueva reemplaza (y borra) la anterior
    if let Some((bytes, nombre)) = imagen {
        let store = ImageStore::new(state.config.images_dir());
        let filename = store.save(&bytes, &nombre)?;
        if let Some(anterior) = &existente.imagen {
            store.delete(anterior);
        }
        repo.set_imagen(&id, Some(filename))
            .await
            .map_err(AppError::from)?;
        return repo
            .find_by_id(&id)
            .await
            .map_err(AppError::from)?
            .map(Json)
            .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound));
    }

    Ok(Json(actualizado))
}

/// Borrado definitivo; elimina también la imagen almacenada
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let repo = ProductoRepository::new(state.get_db());
    let existente = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    repo.delete(&id).await.map_err(AppError::from)?;

    if let Some(imagen) = &existente.imagen {
        ImageStore::new(state.config.images_dir()).delete(imagen);
    }

    tracing::info!(nombre = %existente.nombre, "Producto eliminado");
    Ok(Json(json!({ "eliminado": true })))
}

// ── Helpers ─────────────────────────────────────────────────────────

type ImagenSubida = (Vec<u8>, String);

/// Extrae el campo `datos` (JSON) y el campo `imagen` opcional
async fn leer_multipart(
    mut multipart: Multipart,
) -> Result<(Vec<u8>, Option<ImagenSubida>), AppError> {
    let mut datos: Option<Vec<u8>> = None;
    let mut imagen: Option<ImagenSubida> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart inválido: {}", e)))?
    {
        match field.name() {
            Some("datos") => {
                datos = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Multipart inválido: {}", e)))?
                        .to_vec(),
                );
            }
            Some("imagen") => {
                let nombre = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| AppError::validation("El campo 'imagen' no trae fichero"))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart inválido: {}", e)))?
                    .to_vec();
                imagen = Some((bytes, nombre));
            }
            _ => {}
        }
    }

    let datos = datos.ok_or_else(|| AppError::validation("Falta el campo 'datos'"))?;
    Ok((datos, imagen))
}

fn validar_producto_create(data: &ProductoCreate) -> Result<(), AppError> {
    validate_required_text(&data.nombre, "nombre", MAX_NAME_LEN)?;
    validate_optional_text(&data.descripcion, "descripcion", MAX_NOTE_LEN)?;
    if data.precio_compra < 0.0 || data.precio_venta < 0.0 {
        return Err(AppError::new(ErrorCode::InvalidPrice));
    }
    if data.stock < 0 {
        return Err(AppError::validation("El stock no puede ser negativo"));
    }
    validar_detalle_categoria(
        data.categoria,
        data.detalle_globo.is_some(),
        data.tipo_servicio.is_some(),
    )
}

fn validar_producto_update(existente: &Producto, data: &ProductoUpdate) -> Result<(), AppError> {
    if let Some(nombre) = &data.nombre {
        validate_required_text(nombre, "nombre", MAX_NAME_LEN)?;
    }
    validate_optional_text(&data.descripcion, "descripcion", MAX_NOTE_LEN)?;
    if data.precio_compra.is_some_and(|p| p < 0.0) || data.precio_venta.is_some_and(|p| p < 0.0) {
        return Err(AppError::new(ErrorCode::InvalidPrice));
    }
    if data.stock.is_some_and(|s| s < 0) {
        return Err(AppError::validation("El stock no puede ser negativo"));
    }

    let categoria = data.categoria.unwrap_or(existente.categoria);
    // Un campo específico enviado en la petición debe corresponder a la
    // categoría final; los que solo persisten de antes se limpian tras el
    // MERGE (ver update)
    let tiene_detalle = match categoria {
        CategoriaProducto::Globos => {
            data.detalle_globo.is_some() || existente.detalle_globo.is_some()
        }
        _ => data.detalle_globo.is_some(),
    };
    let tiene_servicio = match categoria {
        CategoriaProducto::Servicios => {
            data.tipo_servicio.is_some() || existente.tipo_servicio.is_some()
        }
        _ => data.tipo_servicio.is_some(),
    };
    validar_detalle_categoria(categoria, tiene_detalle, tiene_servicio)
}

/// Los globos llevan detalle de globo y los servicios tipo de servicio;
/// cualquier otra combinación se rechaza
fn validar_detalle_categoria(
    categoria: CategoriaProducto,
    tiene_detalle_globo: bool,
    tiene_tipo_servicio: bool,
) -> Result<(), AppError> {
    let (requiere_detalle, requiere_servicio) = match categoria {
        CategoriaProducto::Globos => (true, false),
        CategoriaProducto::Servicios => (false, true),
        _ => (false, false),
    };
    if tiene_detalle_globo != requiere_detalle || tiene_tipo_servicio != requiere_servicio {
        return Err(AppError::new(ErrorCode::CategoryDetailMismatch)
            .with_detail("categoria", categoria.as_str()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::DetalleGlobo;
    use chrono::Utc;

    fn base_create(categoria: CategoriaProducto) -> ProductoCreate {
        ProductoCreate {
            nombre: "Arco de globos".to_string(),
            descripcion: None,
            categoria,
            precio_compra: 5.0,
            precio_venta: 12.0,
            stock: 4,
            stock_minimo: None,
            detalle_globo: None,
            tipo_servicio: None,
        }
    }

    fn detalle() -> DetalleGlobo {
        DetalleGlobo {
            tipo: "látex".to_string(),
            color: None,
            tamano: None,
        }
    }

    #[test]
    fn test_globos_exigen_detalle() {
        assert!(validar_producto_create(&base_create(CategoriaProducto::Globos)).is_err());

        let mut data = base_create(CategoriaProducto::Globos);
        data.detalle_globo = Some(detalle());
        assert!(validar_producto_create(&data).is_ok());
    }

    #[test]
    fn test_detalle_ajeno_a_la_categoria_rechazado() {
        let mut data = base_create(CategoriaProducto::Decoracion);
        data.detalle_globo = Some(detalle());
        assert!(validar_producto_create(&data).is_err());

        let mut data = base_create(CategoriaProducto::Globos);
        data.detalle_globo = Some(detalle());
        data.tipo_servicio = Some("montaje".to_string());
        assert!(validar_producto_create(&data).is_err());

        let mut data = base_create(CategoriaProducto::Servicios);
        data.tipo_servicio = Some("montaje".to_string());
        assert!(validar_producto_create(&data).is_ok());
    }

    #[test]
    fn test_update_permite_cambiar_de_categoria() {
        let existente = Producto {
            id: None,
            nombre: "Globo metálico".to_string(),
            descripcion: None,
            categoria: CategoriaProducto::Globos,
            precio_compra: 1.0,
            precio_venta: 3.0,
            stock: 10,
            stock_minimo: 0,
            imagen: None,
            detalle_globo: Some(detalle()),
            tipo_servicio: None,
            activo: true,
            creado_en: Utc::now(),
            actualizado_en: None,
        };

        // El detalle persistido no bloquea la salida de la categoría globos
        let cambio = ProductoUpdate {
            categoria: Some(CategoriaProducto::Decoracion),
            ..ProductoUpdate::default()
        };
        assert!(validar_producto_update(&existente, &cambio).is_ok());

        // Pero enviarlo junto con una categoría que no lo admite sí falla
        let cambio = ProductoUpdate {
            categoria: Some(CategoriaProducto::Decoracion),
            detalle_globo: Some(detalle()),
            ..ProductoUpdate::default()
        };
        assert!(validar_producto_update(&existente, &cambio).is_err());
    }
}
