//! Ciclo de vida de ventas
//!
//! Una venta nace `completada` con los precios capturados al momento de la
//! operación; la única transición posible es la cancelación, que restituye
//! stock y revierte las estadísticas del cliente exactamente una vez.

use chrono::Utc;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{
    Cliente, EstadoVenta, FRECUENTE_THRESHOLD, TipoCliente, Venta, VentaCreate, VentaItem,
};
use crate::db::repository::{ClienteRepository, ProductoRepository, VentaRepository};
use crate::fulfillment::carrito::{self, LineaSolicitada, MovimientoStock};
use crate::fulfillment::numbering::{PREFIJO_VENTA, formato_numero, inicio_del_dia};
use shared::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct VentaService {
    productos: ProductoRepository,
    clientes: ClienteRepository,
    ventas: VentaRepository,
}

impl VentaService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            productos: ProductoRepository::new(db.clone()),
            clientes: ClienteRepository::new(db.clone()),
            ventas: VentaRepository::new(db),
        }
    }

    /// Registra una venta
    ///
    /// 1. Valida el carrito completo contra el catálogo vivo
    /// 2. Persiste con número visible VYYYYMMDD-NNNN
    /// 3. Descuenta stock todo-o-nada (la venta se elimina si falla)
    /// 4. Aplica estadísticas y promoción al cliente registrado
    pub async fn crear(&self, vendedor: RecordId, data: VentaCreate) -> AppResult<Venta> {
        let cliente = self.resolver_cliente(data.cliente.as_deref()).await?;

        let solicitadas: Vec<LineaSolicitada> = data
            .items
            .iter()
            .map(|item| LineaSolicitada {
                producto: item.producto.clone(),
                cantidad: item.cantidad,
                precio_unitario: item.precio_unitario,
            })
            .collect();
        let lineas = carrito::validar_lineas(&self.productos, &solicitadas).await?;

        let items: Vec<VentaItem> = lineas
            .iter()
            .zip(data.items.iter())
            .map(|(linea, req)| VentaItem {
                producto: linea.producto_id.clone(),
                nombre: linea.producto.nombre.clone(),
                precio_unitario: linea.precio_unitario,
                cantidad: linea.cantidad,
                subtotal: linea.subtotal,
                servicios_extra: req.servicios_extra.clone(),
            })
            .collect();

        let subtotal_items: f64 = items.iter().map(|i| i.subtotal).sum();
        let subtotal_servicios: f64 = data
            .items
            .iter()
            .flat_map(|i| i.servicios_extra.iter())
            .chain(data.servicios.iter())
            .map(|s| s.precio)
            .sum();
        let subtotal = subtotal_items + subtotal_servicios;

        if data.descuento < 0.0 || data.descuento > subtotal {
            return Err(AppError::validation(
                "El descuento debe estar entre 0 y el subtotal",
            ));
        }
        let total = subtotal - data.descuento;

        let ahora = Utc::now();
        let secuencia = self
            .ventas
            .count_desde(inicio_del_dia(ahora))
            .await
            .map_err(AppError::from)?
            + 1;

        let venta = Venta {
            id: None,
            numero: formato_numero(PREFIJO_VENTA, ahora, secuencia),
            cliente: cliente.as_ref().and_then(|c| c.id.clone()),
            cliente_ocasional: data.cliente_ocasional,
            vendedor,
            items,
            servicios: data.servicios,
            subtotal,
            descuento: data.descuento,
            total,
            metodo_pago: data.metodo_pago,
            estado: EstadoVenta::Completada,
            tipo_venta: data.tipo_venta,
            notas: data.notas,
            fecha: ahora,
            fecha_entrega: data.fecha_entrega,
        };

        let creada = self.ventas.create(venta).await.map_err(AppError::from)?;

        let movimientos: Vec<MovimientoStock> = lineas
            .iter()
            .map(|l| (l.producto_id.clone(), l.cantidad))
            .collect();
        if let Err(e) = carrito::descontar_stock(&self.productos, &movimientos).await {
            // El stock cambió entre validación y descuento: la venta no existe
            if let Some(id) = &creada.id {
                let _ = self.ventas.delete(id).await;
            }
            return Err(e);
        }

        if let Some(cliente) = cliente {
            self.aplicar_estadisticas(&cliente, creada.total).await?;
        }

        tracing::info!(numero = %creada.numero, total = creada.total, "Venta registrada");
        Ok(creada)
    }

    /// Cancela una venta (transición única `completada` → `cancelada`)
    ///
    /// Restituye stock y revierte las estadísticas del cliente una sola vez.
    pub async fn cancelar(&self, id: &str) -> AppResult<Venta> {
        let venta = self
            .ventas
            .find_by_id(id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::new(ErrorCode::SaleNotFound))?;

        if venta.estado == EstadoVenta::Cancelada {
            return Err(AppError::new(ErrorCode::SaleAlreadyCancelled));
        }

        let venta_id = venta
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Venta sin ID"))?;
        self.ventas
            .set_estado(&venta_id, EstadoVenta::Cancelada)
            .await
            .map_err(AppError::from)?;

        let movimientos: Vec<MovimientoStock> = venta
            .items
            .iter()
            .map(|i| (i.producto.clone(), i.cantidad))
            .collect();
        carrito::restituir_stock(&self.productos, &movimientos).await?;

        if let Some(cliente_id) = &venta.cliente {
            self.revertir_estadisticas(cliente_id, venta.total).await?;
        }

        tracing::info!(numero = %venta.numero, "Venta cancelada");
        self.ventas
            .find_by_id(id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::new(ErrorCode::SaleNotFound))
    }

    async fn resolver_cliente(&self, id: Option<&str>) -> AppResult<Option<Cliente>> {
        match id {
            None => Ok(None),
            Some(id) => {
                let cliente = self
                    .clientes
                    .find_by_id(id)
                    .await
                    .map_err(AppError::from)?
                    .ok_or_else(|| AppError::new(ErrorCode::ClientNotFound))?;
                Ok(Some(cliente))
            }
        }
    }

    async fn aplicar_estadisticas(&self, cliente: &Cliente, total: f64) -> AppResult<()> {
        let Some(cliente_id) = &cliente.id else {
            return Ok(());
        };

        let mut estadisticas = cliente.estadisticas.clone();
        estadisticas.aplicar_venta(total, Utc::now());

        // Promoción automática a frecuente
        let tipo = if cliente.tipo == TipoCliente::Individual
            && estadisticas.numero_ventas >= FRECUENTE_THRESHOLD
        {
            TipoCliente::Frecuente
        } else {
            cliente.tipo
        };

        self.clientes
            .update_estadisticas(cliente_id, estadisticas, tipo)
            .await
            .map_err(AppError::from)
    }

    async fn revertir_estadisticas(&self, cliente_id: &RecordId, total: f64) -> AppResult<()> {
        let Some(cliente) = self
            .clientes
            .find_by_id(&cliente_id.to_string())
            .await
            .map_err(AppError::from)?
        else {
            // El cliente pudo haberse dado de baja; la cancelación sigue
            return Ok(());
        };

        let mut estadisticas = cliente.estadisticas.clone();
        estadisticas.revertir_venta(total);

        self.clientes
            .update_estadisticas(cliente_id, estadisticas, cliente.tipo)
            .await
            .map_err(AppError::from)
    }
}
