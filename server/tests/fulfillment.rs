//! Pruebas de integración del motor de cumplimiento con base en memoria

use fiesta_server::db::DbService;
use fiesta_server::db::models::{
    CategoriaProducto, ClienteCreate, DatosCliente, EstadoPedido, EstadoVenta, MetodoPago,
    PedidoCreate, PedidoItemRequest, Producto, ProductoCreate, TipoCliente, VentaCreate,
    VentaItemRequest,
};
use fiesta_server::db::repository::{ClienteRepository, ProductoRepository, VentaRepository};
use fiesta_server::fulfillment::{PedidoService, VentaService};
use shared::ErrorCode;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

async fn base_en_memoria() -> Surreal<Db> {
    DbService::memory().await.expect("base en memoria").db
}

async fn crear_producto(db: &Surreal<Db>, nombre: &str, stock: i64, precio: f64) -> Producto {
    ProductoRepository::new(db.clone())
        .create(
            ProductoCreate {
                nombre: nombre.to_string(),
                descripcion: None,
                categoria: CategoriaProducto::Decoracion,
                precio_compra: precio / 2.0,
                precio_venta: precio,
                stock,
                stock_minimo: Some(2),
                detalle_globo: None,
                tipo_servicio: None,
            },
            None,
        )
        .await
        .expect("producto de prueba")
}

async fn stock_actual(db: &Surreal<Db>, producto: &Producto) -> i64 {
    ProductoRepository::new(db.clone())
        .find_by_id(&producto.id.clone().unwrap().to_string())
        .await
        .unwrap()
        .unwrap()
        .stock
}

fn venta_de(producto: &Producto, cantidad: i64, cliente: Option<String>) -> VentaCreate {
    VentaCreate {
        cliente,
        cliente_ocasional: None,
        items: vec![VentaItemRequest {
            producto: producto.id.clone().unwrap().to_string(),
            cantidad,
            precio_unitario: None,
            servicios_extra: vec![],
        }],
        servicios: vec![],
        descuento: 0.0,
        metodo_pago: MetodoPago::Efectivo,
        tipo_venta: None,
        notas: None,
        fecha_entrega: None,
    }
}

fn pedido_de(producto: &Producto, cantidad: i64) -> PedidoCreate {
    PedidoCreate {
        datos_cliente: DatosCliente {
            nombre: "Laura Gómez".to_string(),
            telefono: "5551234567".to_string(),
            email: None,
            direccion: None,
        },
        items: vec![PedidoItemRequest {
            producto: producto.id.clone().unwrap().to_string(),
            cantidad,
        }],
        notas_cliente: None,
    }
}

fn vendedor() -> surrealdb::RecordId {
    "usuario:vendedor".parse().unwrap()
}

#[tokio::test]
async fn test_venta_descuenta_y_restituye_stock() {
    let db = base_en_memoria().await;
    let producto = crear_producto(&db, "Guirnalda dorada", 10, 4.0).await;
    let servicio = VentaService::new(db.clone());

    let venta = servicio
        .crear(vendedor(), venta_de(&producto, 3, None))
        .await
        .expect("venta");
    assert_eq!(venta.estado, EstadoVenta::Completada);
    assert_eq!(venta.total, 12.0);
    assert_eq!(stock_actual(&db, &producto).await, 7);

    let id = venta.id.clone().unwrap().to_string();
    let cancelada = servicio.cancelar(&id).await.expect("cancelación");
    assert_eq!(cancelada.estado, EstadoVenta::Cancelada);
    assert_eq!(stock_actual(&db, &producto).await, 10);

    // La cancelación es única: el stock no se restituye dos veces
    let err = servicio.cancelar(&id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::SaleAlreadyCancelled);
    assert_eq!(stock_actual(&db, &producto).await, 10);
}

#[tokio::test]
async fn test_venta_todo_o_nada() {
    let db = base_en_memoria().await;
    let abundante = crear_producto(&db, "Platos de cartón", 50, 1.5).await;
    let escaso = crear_producto(&db, "Piñata unicornio", 1, 25.0).await;
    let servicio = VentaService::new(db.clone());

    let data = VentaCreate {
        items: vec![
            VentaItemRequest {
                producto: abundante.id.clone().unwrap().to_string(),
                cantidad: 10,
                precio_unitario: None,
                servicios_extra: vec![],
            },
            VentaItemRequest {
                producto: escaso.id.clone().unwrap().to_string(),
                cantidad: 3,
                precio_unitario: None,
                servicios_extra: vec![],
            },
        ],
        ..venta_de(&abundante, 1, None)
    };

    let err = servicio.crear(vendedor(), data).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);

    // Ninguna línea llegó a descontarse y no quedó venta registrada
    assert_eq!(stock_actual(&db, &abundante).await, 50);
    assert_eq!(stock_actual(&db, &escaso).await, 1);
    assert_eq!(VentaRepository::new(db.clone()).count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_numeracion_diaria_de_ventas() {
    let db = base_en_memoria().await;
    let producto = crear_producto(&db, "Serpentinas", 100, 2.0).await;
    let servicio = VentaService::new(db.clone());

    let primera = servicio
        .crear(vendedor(), venta_de(&producto, 1, None))
        .await
        .unwrap();
    let segunda = servicio
        .crear(vendedor(), venta_de(&producto, 1, None))
        .await
        .unwrap();

    assert!(primera.numero.starts_with('V'));
    assert!(primera.numero.ends_with("-0001"));
    assert!(segunda.numero.ends_with("-0002"));
}

#[tokio::test]
async fn test_promocion_a_cliente_frecuente() {
    let db = base_en_memoria().await;
    let producto = crear_producto(&db, "Globo metálico estrella", 100, 5.0).await;
    let clientes = ClienteRepository::new(db.clone());
    let cliente = clientes
        .create(ClienteCreate {
            nombre: "Marta Ruiz".to_string(),
            telefono: "5559876543".to_string(),
            email: None,
            direccion: None,
            tipo: None,
            preferencias: None,
            notas: None,
        })
        .await
        .unwrap();
    let cliente_id = cliente.id.clone().unwrap().to_string();
    let servicio = VentaService::new(db.clone());

    let mut ultima = None;
    for _ in 0..5 {
        ultima = Some(
            servicio
                .crear(vendedor(), venta_de(&producto, 2, Some(cliente_id.clone())))
                .await
                .unwrap(),
        );
    }

    let actualizado = clientes.find_by_id(&cliente_id).await.unwrap().unwrap();
    assert_eq!(actualizado.tipo, TipoCliente::Frecuente);
    assert_eq!(actualizado.estadisticas.numero_ventas, 5);
    assert_eq!(actualizado.estadisticas.total_compras, 50.0);
    assert_eq!(actualizado.estadisticas.promedio_compra, 10.0);

    // Cancelar revierte cifras pero no degrada el tipo
    let venta = ultima.unwrap();
    servicio
        .cancelar(&venta.id.clone().unwrap().to_string())
        .await
        .unwrap();
    let revertido = clientes.find_by_id(&cliente_id).await.unwrap().unwrap();
    assert_eq!(revertido.tipo, TipoCliente::Frecuente);
    assert_eq!(revertido.estadisticas.numero_ventas, 4);
    assert_eq!(revertido.estadisticas.total_compras, 40.0);
}

#[tokio::test]
async fn test_pedido_ciclo_completo() {
    let db = base_en_memoria().await;
    let producto = crear_producto(&db, "Arco de globos", 8, 30.0).await;
    let servicio = PedidoService::new(db.clone());

    let pedido = servicio.crear(pedido_de(&producto, 2)).await.unwrap();
    assert_eq!(pedido.estado, EstadoPedido::EnProceso);
    assert_eq!(pedido.codigo_seguimiento.len(), 6);
    assert!(pedido.codigo_seguimiento.chars().all(|c| c.is_ascii_digit()));
    assert!(pedido.numero.starts_with('P'));
    assert_eq!(stock_actual(&db, &producto).await, 6);

    let consultado = servicio.seguimiento(&pedido.codigo_seguimiento).await.unwrap();
    assert_eq!(consultado.numero, pedido.numero);

    let id = pedido.id.clone().unwrap().to_string();

    // Entregar sin pasar por preparación no está permitido
    let err = servicio
        .cambiar_estado(
            &id,
            fiesta_server::db::models::CambioEstadoRequest {
                estado: EstadoPedido::Entregado,
                notas_admin: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidStatusTransition);

    let listo = servicio
        .cambiar_estado(
            &id,
            fiesta_server::db::models::CambioEstadoRequest {
                estado: EstadoPedido::ListoParaEntrega,
                notas_admin: Some("Listo en mostrador".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(listo.estado, EstadoPedido::ListoParaEntrega);

    let entregado = servicio
        .cambiar_estado(
            &id,
            fiesta_server::db::models::CambioEstadoRequest {
                estado: EstadoPedido::Entregado,
                notas_admin: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(entregado.estado, EstadoPedido::Entregado);

    // Entregado es terminal, incluso para la cancelación pública
    let err = servicio
        .cancelar_por_codigo(&pedido.codigo_seguimiento, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderDelivered);
    assert_eq!(stock_actual(&db, &producto).await, 6);
}

#[tokio::test]
async fn test_pedido_cancelacion_publica() {
    let db = base_en_memoria().await;
    let producto = crear_producto(&db, "Centro de mesa", 5, 12.0).await;
    let servicio = PedidoService::new(db.clone());

    let pedido = servicio.crear(pedido_de(&producto, 4)).await.unwrap();
    assert_eq!(stock_actual(&db, &producto).await, 1);

    let cancelado = servicio
        .cancelar_por_codigo(
            &pedido.codigo_seguimiento,
            Some("Ya no lo necesito".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(cancelado.estado, EstadoPedido::Cancelado);
    assert!(
        cancelado
            .notas_cliente
            .as_deref()
            .unwrap()
            .contains("Ya no lo necesito")
    );
    assert_eq!(stock_actual(&db, &producto).await, 5);

    let err = servicio
        .cancelar_por_codigo(&pedido.codigo_seguimiento, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderAlreadyCancelled);
    assert_eq!(stock_actual(&db, &producto).await, 5);
}

#[tokio::test]
async fn test_pedido_reactivacion_revalida_stock() {
    let db = base_en_memoria().await;
    let producto = crear_producto(&db, "Cortina de flecos", 6, 8.0).await;
    let servicio = PedidoService::new(db.clone());

    let pedido = servicio.crear(pedido_de(&producto, 4)).await.unwrap();
    let id = pedido.id.clone().unwrap().to_string();
    servicio
        .cancelar_por_codigo(&pedido.codigo_seguimiento, None)
        .await
        .unwrap();
    assert_eq!(stock_actual(&db, &producto).await, 6);

    // La reactivación vuelve a descontar todas las líneas
    let reactivado = servicio
        .cambiar_estado(
            &id,
            fiesta_server::db::models::CambioEstadoRequest {
                estado: EstadoPedido::EnProceso,
                notas_admin: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(reactivado.estado, EstadoPedido::EnProceso);
    assert_eq!(stock_actual(&db, &producto).await, 2);

    // Sin stock suficiente la reactivación se rechaza completa
    servicio
        .cancelar_por_codigo(&pedido.codigo_seguimiento, None)
        .await
        .unwrap();
    ProductoRepository::new(db.clone())
        .update(
            &producto.id.clone().unwrap().to_string(),
            fiesta_server::db::models::ProductoUpdate {
                stock: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = servicio
        .cambiar_estado(
            &id,
            fiesta_server::db::models::CambioEstadoRequest {
                estado: EstadoPedido::EnProceso,
                notas_admin: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert_eq!(stock_actual(&db, &producto).await, 1);
}

#[tokio::test]
async fn test_codigos_de_seguimiento_distintos() {
    let db = base_en_memoria().await;
    let producto = crear_producto(&db, "Vela número", 50, 3.0).await;
    let servicio = PedidoService::new(db.clone());

    let primero = servicio.crear(pedido_de(&producto, 1)).await.unwrap();
    let segundo = servicio.crear(pedido_de(&producto, 1)).await.unwrap();
    assert_ne!(primero.codigo_seguimiento, segundo.codigo_seguimiento);
}

#[tokio::test]
async fn test_producto_inactivo_no_se_vende() {
    let db = base_en_memoria().await;
    let producto = crear_producto(&db, "Confeti biodegradable", 20, 4.5).await;
    let repo = ProductoRepository::new(db.clone());
    repo.update(
        &producto.id.clone().unwrap().to_string(),
        fiesta_server::db::models::ProductoUpdate {
            activo: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let err = VentaService::new(db.clone())
        .crear(vendedor(), venta_de(&producto, 1, None))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ProductInactive);
    assert_eq!(stock_actual(&db, &producto).await, 20);
}
