//! Validación de carrito y movimiento de stock
//!
//! Toda operación que consume stock valida el carrito completo antes de
//! tocar la base, y descuenta línea a línea con descuento condicional.
//! Si una línea falla a mitad de camino se restituyen las anteriores.

use surrealdb::RecordId;

use crate::db::models::Producto;
use crate::db::repository::ProductoRepository;
use shared::{AppError, AppResult, ErrorCode};

/// Línea de carrito ya resuelta contra el producto vivo
#[derive(Debug, Clone)]
pub struct LineaValidada {
    pub producto_id: RecordId,
    pub producto: Producto,
    pub cantidad: i64,
    pub precio_unitario: f64,
    pub subtotal: f64,
}

/// Entrada cruda de una línea (id en texto + cantidad + precio opcional)
#[derive(Debug, Clone)]
pub struct LineaSolicitada {
    pub producto: String,
    pub cantidad: i64,
    pub precio_unitario: Option<f64>,
}

/// Valida todas las líneas contra el catálogo vivo
///
/// Falla la solicitud completa ante la primera línea con producto
/// inexistente, inactivo o sin stock suficiente; `details` identifica el
/// producto y el faltante.
pub async fn validar_lineas(
    productos: &ProductoRepository,
    lineas: &[LineaSolicitada],
) -> AppResult<Vec<LineaValidada>> {
    if lineas.is_empty() {
        return Err(AppError::validation("La operación no tiene líneas"));
    }

    let mut validadas = Vec::with_capacity(lineas.len());

    for linea in lineas {
        if linea.cantidad < 1 {
            return Err(AppError::validation("La cantidad debe ser al menos 1")
                .with_detail("producto", linea.producto.clone()));
        }

        let producto_id: RecordId = linea.producto.parse().map_err(|_| {
            AppError::with_message(
                ErrorCode::ProductNotFound,
                format!("Producto '{}' no encontrado", linea.producto),
            )
            .with_detail("producto", linea.producto.clone())
        })?;

        let producto = productos
            .find_by_id(&linea.producto)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ProductNotFound,
                    format!("Producto '{}' no encontrado", linea.producto),
                )
                .with_detail("producto", linea.producto.clone())
            })?;

        if !producto.activo {
            return Err(AppError::with_message(
                ErrorCode::ProductInactive,
                format!("El producto '{}' no está disponible", producto.nombre),
            )
            .with_detail("producto", linea.producto.clone()));
        }

        if producto.stock < linea.cantidad {
            return Err(AppError::new(ErrorCode::InsufficientStock)
                .with_detail("producto", linea.producto.clone())
                .with_detail("nombre", producto.nombre.clone())
                .with_detail("disponible", producto.stock)
                .with_detail("solicitado", linea.cantidad));
        }

        let precio_unitario = match linea.precio_unitario {
            Some(p) if p < 0.0 => {
                return Err(AppError::new(ErrorCode::InvalidPrice)
                    .with_detail("producto", linea.producto.clone()));
            }
            Some(p) => p,
            None => producto.precio_venta,
        };

        let subtotal = precio_unitario * linea.cantidad as f64;
        validadas.push(LineaValidada {
            producto_id,
            producto,
            cantidad: linea.cantidad,
            precio_unitario,
            subtotal,
        });
    }

    Ok(validadas)
}

/// Par (producto, cantidad) para mover stock
pub type MovimientoStock = (RecordId, i64);

/// Descuenta stock línea a línea, todo o nada
///
/// Cada línea usa el descuento condicional del repositorio; si alguna falla
/// (el stock cambió desde la validación) se restituyen las líneas ya
/// descontadas y se devuelve el error de stock con el producto afectado.
pub async fn descontar_stock(
    productos: &ProductoRepository,
    movimientos: &[MovimientoStock],
) -> AppResult<()> {
    let mut descontados: Vec<&MovimientoStock> = Vec::with_capacity(movimientos.len());

    for movimiento in movimientos {
        let (id, cantidad) = movimiento;
        let ok = productos
            .decrement_stock(id, *cantidad)
            .await
            .map_err(AppError::from)?;

        if !ok {
            // Compensación: devolver lo ya descontado
            for (prev_id, prev_cantidad) in descontados {
                if let Err(e) = productos.increment_stock(prev_id, *prev_cantidad).await {
                    tracing::error!(
                        producto = %prev_id,
                        cantidad = *prev_cantidad,
                        "Stock compensation failed: {}", e
                    );
                }
            }
            return Err(AppError::new(ErrorCode::InsufficientStock)
                .with_detail("producto", id.to_string())
                .with_detail("solicitado", *cantidad));
        }

        descontados.push(movimiento);
    }

    Ok(())
}

/// Restituye stock de todas las líneas (cancelaciones)
pub async fn restituir_stock(
    productos: &ProductoRepository,
    movimientos: &[MovimientoStock],
) -> AppResult<()> {
    for (id, cantidad) in movimientos {
        productos
            .increment_stock(id, *cantidad)
            .await
            .map_err(AppError::from)?;
    }
    Ok(())
}
