//! Ciclo de vida de pedidos
//!
//! Máquina de estados: `en-proceso` → `listo-para-entrega` → `entregado`
//! (terminal). Desde los dos primeros se puede cancelar; la cancelación
//! restituye stock una sola vez. Reactivar un pedido cancelado revalida y
//! vuelve a descontar todas las líneas, manteniendo los precios capturados.

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{
    CambioEstadoRequest, EstadoPedido, Pedido, PedidoCreate, PedidoItem,
};
use crate::db::repository::{PedidoRepository, ProductoRepository, RepoError};
use crate::fulfillment::carrito::{self, LineaSolicitada, MovimientoStock};
use crate::fulfillment::numbering::{
    PREFIJO_PEDIDO, formato_numero, generar_codigo_seguimiento, inicio_del_dia,
};
use shared::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct PedidoService {
    productos: ProductoRepository,
    pedidos: PedidoRepository,
}

impl PedidoService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            productos: ProductoRepository::new(db.clone()),
            pedidos: PedidoRepository::new(db),
        }
    }

    /// Alta pública de pedido
    ///
    /// Precios siempre del catálogo (sin sobrescritura). El código de
    /// seguimiento es único por índice; ante colisión se reintenta una vez.
    pub async fn crear(&self, data: PedidoCreate) -> AppResult<Pedido> {
        let solicitadas: Vec<LineaSolicitada> = data
            .items
            .iter()
            .map(|item| LineaSolicitada {
                producto: item.producto.clone(),
                cantidad: item.cantidad,
                precio_unitario: None,
            })
            .collect();
        let lineas = carrito::validar_lineas(&self.productos, &solicitadas).await?;

        let items: Vec<PedidoItem> = lineas
            .iter()
            .map(|linea| PedidoItem {
                producto: linea.producto_id.clone(),
                nombre: linea.producto.nombre.clone(),
                cantidad: linea.cantidad,
                precio_unitario: linea.precio_unitario,
                subtotal: linea.subtotal,
                imagen: linea.producto.imagen.clone(),
            })
            .collect();
        let subtotal: f64 = items.iter().map(|i| i.subtotal).sum();

        let ahora = Utc::now();
        let secuencia = self
            .pedidos
            .count_desde(inicio_del_dia(ahora))
            .await
            .map_err(AppError::from)?
            + 1;
        let numero = formato_numero(PREFIJO_PEDIDO, ahora, secuencia);

        let plantilla = Pedido {
            id: None,
            numero,
            codigo_seguimiento: generar_codigo_seguimiento(),
            datos_cliente: data.datos_cliente,
            items,
            subtotal,
            total: subtotal,
            estado: EstadoPedido::EnProceso,
            notas_cliente: data.notas_cliente,
            notas_admin: None,
            fecha: ahora,
            fecha_cambio_estado: None,
        };

        // Un reintento ante colisión del código de seguimiento
        let creado = match self.pedidos.create(plantilla.clone()).await {
            Ok(pedido) => pedido,
            Err(RepoError::Duplicate(_)) => {
                let reintento = Pedido {
                    codigo_seguimiento: generar_codigo_seguimiento(),
                    ..plantilla
                };
                self.pedidos.create(reintento).await.map_err(|e| match e {
                    RepoError::Duplicate(_) => AppError::new(ErrorCode::TrackingCodeCollision),
                    other => AppError::from(other),
                })?
            }
            Err(e) => return Err(AppError::from(e)),
        };

        let movimientos: Vec<MovimientoStock> = lineas
            .iter()
            .map(|l| (l.producto_id.clone(), l.cantidad))
            .collect();
        if let Err(e) = carrito::descontar_stock(&self.productos, &movimientos).await {
            if let Some(id) = &creado.id {
                let _ = self.pedidos.delete(id).await;
            }
            return Err(e);
        }

        tracing::info!(
            numero = %creado.numero,
            codigo = %creado.codigo_seguimiento,
            "Pedido registrado"
        );
        Ok(creado)
    }

    /// Consulta pública por código de seguimiento
    pub async fn seguimiento(&self, codigo: &str) -> AppResult<Pedido> {
        self.pedidos
            .find_by_codigo(codigo)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))
    }

    /// Transición administrativa de estado
    pub async fn cambiar_estado(&self, id: &str, req: CambioEstadoRequest) -> AppResult<Pedido> {
        let pedido = self
            .pedidos
            .find_by_id(id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

        let destino = req.estado;
        validar_transicion(pedido.estado, destino)?;

        let pedido_id = pedido
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Pedido sin ID"))?;

        match (pedido.estado, destino) {
            // Cancelación administrativa: stock de vuelta
            (_, EstadoPedido::Cancelado) => {
                let movimientos = movimientos_de(&pedido);
                carrito::restituir_stock(&self.productos, &movimientos).await?;
            }
            // Reactivación: revalidar y volver a descontar, todo o nada
            (EstadoPedido::Cancelado, _) => {
                self.revalidar_y_descontar(&pedido).await?;
            }
            _ => {}
        }

        let notas_admin = anexar_nota(pedido.notas_admin.as_deref(), req.notas_admin.as_deref());
        let actualizado = self
            .pedidos
            .set_estado(&pedido_id, destino, notas_admin, None)
            .await
            .map_err(AppError::from)?;

        tracing::info!(
            numero = %actualizado.numero,
            estado = destino.as_str(),
            "Estado de pedido actualizado"
        );
        Ok(actualizado)
    }

    /// Cancelación pública por código de seguimiento
    ///
    /// Permitida mientras el pedido no esté cancelado ni entregado; el motivo
    /// se añade a las notas del cliente.
    pub async fn cancelar_por_codigo(
        &self,
        codigo: &str,
        motivo: Option<String>,
    ) -> AppResult<Pedido> {
        let pedido = self.seguimiento(codigo).await?;

        match pedido.estado {
            EstadoPedido::Cancelado => {
                return Err(AppError::new(ErrorCode::OrderAlreadyCancelled));
            }
            EstadoPedido::Entregado => {
                return Err(AppError::new(ErrorCode::OrderDelivered));
            }
            _ => {}
        }

        let pedido_id = pedido
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Pedido sin ID"))?;

        let movimientos = movimientos_de(&pedido);
        carrito::restituir_stock(&self.productos, &movimientos).await?;

        let motivo = motivo
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(|m| format!("Cancelación: {}", m));
        let notas_cliente = anexar_nota(pedido.notas_cliente.as_deref(), motivo.as_deref());

        let actualizado = self
            .pedidos
            .set_estado(&pedido_id, EstadoPedido::Cancelado, None, notas_cliente)
            .await
            .map_err(AppError::from)?;

        tracing::info!(numero = %actualizado.numero, "Pedido cancelado por el cliente");
        Ok(actualizado)
    }

    /// Revalida cada línea del pedido cancelado y descuenta de nuevo,
    /// manteniendo los precios capturados originalmente
    async fn revalidar_y_descontar(&self, pedido: &Pedido) -> AppResult<()> {
        let solicitadas: Vec<LineaSolicitada> = pedido
            .items
            .iter()
            .map(|item| LineaSolicitada {
                producto: item.producto.to_string(),
                cantidad: item.cantidad,
                precio_unitario: None,
            })
            .collect();
        // La validación usa el catálogo vivo; los precios del pedido no cambian
        carrito::validar_lineas(&self.productos, &solicitadas).await?;

        let movimientos = movimientos_de(pedido);
        carrito::descontar_stock(&self.productos, &movimientos).await
    }
}

/// Anexa una nota nueva a las previas; `None` (o una nota vacía) las deja
/// intactas
fn anexar_nota(previas: Option<&str>, nueva: Option<&str>) -> Option<String> {
    let nueva = nueva.map(str::trim).filter(|n| !n.is_empty())?;
    Some(match previas {
        Some(previas) => format!("{}\n{}", previas, nueva),
        None => nueva.to_string(),
    })
}

fn movimientos_de(pedido: &Pedido) -> Vec<MovimientoStock> {
    pedido
        .items
        .iter()
        .map(|i| (i.producto.clone(), i.cantidad))
        .collect()
}

/// Transiciones de estado válidas
fn validar_transicion(actual: EstadoPedido, destino: EstadoPedido) -> AppResult<()> {
    use EstadoPedido::*;

    if actual == Entregado {
        return Err(AppError::new(ErrorCode::OrderDelivered));
    }
    if actual == destino {
        return Err(transicion_invalida(actual, destino));
    }

    let valida = matches!(
        (actual, destino),
        (EnProceso, ListoParaEntrega)
            | (EnProceso, Cancelado)
            | (ListoParaEntrega, Entregado)
            | (ListoParaEntrega, Cancelado)
            | (Cancelado, _)
    );

    if valida {
        Ok(())
    } else {
        Err(transicion_invalida(actual, destino))
    }
}

fn transicion_invalida(actual: EstadoPedido, destino: EstadoPedido) -> AppError {
    AppError::new(ErrorCode::InvalidStatusTransition)
        .with_detail("actual", actual.as_str())
        .with_detail("destino", destino.as_str())
}
