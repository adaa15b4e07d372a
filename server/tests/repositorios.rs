//! Pruebas de persistencia: lo escrito con los nombres serializados debe
//! poder consultarse y filtrarse con esos mismos nombres

use chrono::{Duration, Utc};
use fiesta_server::db::DbService;
use fiesta_server::db::models::{
    CambioEstadoRequest, CategoriaProducto, ClienteCreate, DatosCliente, DetalleGlobo,
    EstadoPedido, Pedido, PedidoCreate, PedidoItemRequest, Producto, ProductoCreate,
};
use fiesta_server::db::repository::{
    ClienteRepository, PedidoRepository, ProductoRepository, RepoError, UsuarioRepository,
};
use fiesta_server::fulfillment::PedidoService;
use shared::auth::{Permisos, Rol};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

async fn base_en_memoria() -> Surreal<Db> {
    DbService::memory().await.expect("base en memoria").db
}

async fn crear_producto(db: &Surreal<Db>, nombre: &str, stock: i64, minimo: i64) -> Producto {
    ProductoRepository::new(db.clone())
        .create(
            ProductoCreate {
                nombre: nombre.to_string(),
                descripcion: None,
                categoria: CategoriaProducto::Decoracion,
                precio_compra: 1.0,
                precio_venta: 3.0,
                stock,
                stock_minimo: Some(minimo),
                detalle_globo: None,
                tipo_servicio: None,
            },
            None,
        )
        .await
        .expect("producto de prueba")
}

async fn crear_pedido(db: &Surreal<Db>, producto: &Producto) -> Pedido {
    PedidoService::new(db.clone())
        .crear(PedidoCreate {
            datos_cliente: DatosCliente {
                nombre: "Laura Gómez".to_string(),
                telefono: "5551234567".to_string(),
                email: None,
                direccion: None,
            },
            items: vec![PedidoItemRequest {
                producto: producto.id.clone().unwrap().to_string(),
                cantidad: 1,
            }],
            notas_cliente: None,
        })
        .await
        .expect("pedido de prueba")
}

fn cliente_de(nombre: &str, telefono: &str) -> ClienteCreate {
    ClienteCreate {
        nombre: nombre.to_string(),
        telefono: telefono.to_string(),
        email: None,
        direccion: None,
        tipo: None,
        preferencias: None,
        notas: None,
    }
}

#[tokio::test]
async fn test_usuario_persistido_conserva_hash_y_fechas() {
    let db = base_en_memoria().await;
    let repo = UsuarioRepository::new(db);

    let hash = fiesta_server::db::models::Usuario::hash_password("secreto-123").unwrap();
    let creado = repo
        .create(
            "Ana Torres".to_string(),
            "ana@fiesta.local".to_string(),
            hash,
            Rol::Empleado,
            None,
            Permisos::default(),
        )
        .await
        .expect("alta de usuario");
    assert!(creado.activo);
    assert!(creado.ultimo_acceso.is_none());

    // La relectura recupera el hash tal como se guardó
    let leido = repo
        .find_by_email("ana@fiesta.local")
        .await
        .unwrap()
        .expect("usuario recién creado");
    assert!(leido.verify_password("secreto-123").unwrap());
    assert_eq!(leido.creado_en, creado.creado_en);

    let id = leido.id.clone().unwrap().to_string();
    repo.touch_ultimo_acceso(&id).await.unwrap();
    let tras_login = repo.find_by_id(&id).await.unwrap().unwrap();
    assert!(tras_login.ultimo_acceso.is_some());
}

#[tokio::test]
async fn test_pedido_se_localiza_por_su_codigo() {
    let db = base_en_memoria().await;
    let producto = crear_producto(&db, "Guirnalda plateada", 5, 1).await;
    let pedido = crear_pedido(&db, &producto).await;

    let repo = PedidoRepository::new(db);
    let encontrado = repo
        .find_by_codigo(&pedido.codigo_seguimiento)
        .await
        .unwrap()
        .expect("el pedido debe encontrarse por su propio código");
    assert_eq!(encontrado.numero, pedido.numero);

    assert!(repo.find_by_codigo("000000").await.unwrap().is_none());
}

#[tokio::test]
async fn test_indice_rechaza_codigo_duplicado() {
    let db = base_en_memoria().await;
    let repo = PedidoRepository::new(db);

    let plantilla = Pedido {
        id: None,
        numero: "P20260823-0001".to_string(),
        codigo_seguimiento: "482913".to_string(),
        datos_cliente: DatosCliente {
            nombre: "Marta".to_string(),
            telefono: "5559998877".to_string(),
            email: None,
            direccion: None,
        },
        items: vec![],
        subtotal: 0.0,
        total: 0.0,
        estado: EstadoPedido::EnProceso,
        notas_cliente: None,
        notas_admin: None,
        fecha: Utc::now(),
        fecha_cambio_estado: None,
    };

    repo.create(plantilla.clone()).await.expect("primer pedido");
    let err = repo
        .create(Pedido {
            numero: "P20260823-0002".to_string(),
            ..plantilla
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn test_stock_bajo_usa_el_minimo() {
    let db = base_en_memoria().await;
    let escaso = crear_producto(&db, "Velas número", 1, 5).await;
    crear_producto(&db, "Platos de cartón", 10, 2).await;

    let listado = ProductoRepository::new(db).stock_bajo().await.unwrap();
    assert_eq!(listado.len(), 1);
    assert_eq!(listado[0].nombre, escaso.nombre);
}

#[tokio::test]
async fn test_inactivos_y_top_compradores() {
    let db = base_en_memoria().await;
    let repo = ClienteRepository::new(db);

    let comprador = repo
        .create(cliente_de("Lucía Pérez", "5551110001"))
        .await
        .unwrap();
    let dormido = repo
        .create(cliente_de("Jorge Ruiz", "5551110002"))
        .await
        .unwrap();

    let mut estadisticas = comprador.estadisticas.clone();
    estadisticas.aplicar_venta(80.0, Utc::now());
    repo.update_estadisticas(
        comprador.id.as_ref().unwrap(),
        estadisticas,
        comprador.tipo,
    )
    .await
    .unwrap();

    let mut antiguas = dormido.estadisticas.clone();
    antiguas.aplicar_venta(15.0, Utc::now() - Duration::days(200));
    repo.update_estadisticas(dormido.id.as_ref().unwrap(), antiguas, dormido.tipo)
        .await
        .unwrap();

    let inactivos = repo.inactivos().await.unwrap();
    let nombres: Vec<&str> = inactivos.iter().map(|c| c.nombre.as_str()).collect();
    assert!(nombres.contains(&"Jorge Ruiz"));
    assert!(!nombres.contains(&"Lucía Pérez"));

    let top = repo.top_compradores(5).await.unwrap();
    assert_eq!(top[0].nombre, "Lucía Pérez");
    assert_eq!(top[0].estadisticas.total_compras, 80.0);
}

#[tokio::test]
async fn test_cambio_estado_sella_fecha_y_anexa_notas() {
    let db = base_en_memoria().await;
    let producto = crear_producto(&db, "Centro de mesa", 5, 1).await;
    let pedido = crear_pedido(&db, &producto).await;
    assert!(pedido.fecha_cambio_estado.is_none());

    let servicio = PedidoService::new(db);
    let id = pedido.id.clone().unwrap().to_string();

    let listo = servicio
        .cambiar_estado(
            &id,
            CambioEstadoRequest {
                estado: EstadoPedido::ListoParaEntrega,
                notas_admin: Some("Preparado".to_string()),
            },
        )
        .await
        .unwrap();
    assert!(listo.fecha_cambio_estado.is_some());
    assert_eq!(listo.notas_admin.as_deref(), Some("Preparado"));

    // La nota nueva se anexa a la anterior, no la reemplaza
    let entregado = servicio
        .cambiar_estado(
            &id,
            CambioEstadoRequest {
                estado: EstadoPedido::Entregado,
                notas_admin: Some("Recogido en tienda".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        entregado.notas_admin.as_deref(),
        Some("Preparado\nRecogido en tienda")
    );
    assert!(entregado.fecha_cambio_estado > listo.fecha_cambio_estado);
}

#[tokio::test]
async fn test_cambio_de_categoria_limpia_detalles() {
    let db = base_en_memoria().await;
    let repo = ProductoRepository::new(db);

    let globo = repo
        .create(
            ProductoCreate {
                nombre: "Globo metálico estrella".to_string(),
                descripcion: None,
                categoria: CategoriaProducto::Globos,
                precio_compra: 1.0,
                precio_venta: 3.5,
                stock: 8,
                stock_minimo: None,
                detalle_globo: Some(DetalleGlobo {
                    tipo: "metálico".to_string(),
                    color: Some("plata".to_string()),
                    tamano: None,
                }),
                tipo_servicio: None,
            },
            None,
        )
        .await
        .unwrap();
    let id = globo.id.clone().unwrap().to_string();

    repo.clear_detalles(&id, true, false).await.unwrap();
    let limpio = repo.find_by_id(&id).await.unwrap().unwrap();
    assert!(limpio.detalle_globo.is_none());
}
