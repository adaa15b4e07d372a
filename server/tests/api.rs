//! Pruebas de integración del API sobre el router completo

use axum::Router;
use axum::body::{Body, to_bytes};
use fiesta_server::api::build_app;
use fiesta_server::core::{Config, ServerState};
use fiesta_server::db::models::{CategoriaProducto, ProductoCreate};
use fiesta_server::db::repository::{ProductoRepository, UsuarioRepository};
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use shared::auth::{Permisos, Rol};
use tempfile::TempDir;
use tower::ServiceExt;

async fn app_de_pruebas() -> (Router, ServerState, TempDir) {
    let work_dir = tempfile::tempdir().expect("directorio temporal");
    let config = Config::with_overrides(work_dir.path().to_string_lossy(), 0);
    let state = ServerState::initialize_in_memory(&config)
        .await
        .expect("estado en memoria");
    (build_app(state.clone()), state, work_dir)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    enviar(app, "POST", uri, Some(body), None).await
}

async fn get_con_token(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    enviar(app, "GET", uri, None, Some(token)).await
}

async fn enviar(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = builder
        .body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn registro(nombre: &str, email: &str, rol: Option<&str>) -> Value {
    let mut body = json!({
        "nombre": nombre,
        "email": email,
        "password": "contrasena-larga-1",
    });
    if let Some(rol) = rol {
        body["rol"] = json!(rol);
    }
    body
}

#[tokio::test]
async fn test_health_es_publico() {
    let (app, _state, _dir) = app_de_pruebas().await;
    let (status, body) = enviar(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_rutas_privadas_exigen_token() {
    let (app, _state, _dir) = app_de_pruebas().await;
    let (status, body) = enviar(&app, "GET", "/api/productos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NOT_AUTHENTICATED");
}

#[tokio::test]
async fn test_primer_usuario_es_propietario() {
    let (app, _state, _dir) = app_de_pruebas().await;

    let (status, body) = post_json(
        &app,
        "/api/auth/registro",
        registro("Ana Torres", "ana@fiesta.local", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usuario"]["rol"], "propietario");
    assert_eq!(body["usuario"]["permisos"]["reportes"], true);
    assert!(body["token"].as_str().is_some());

    // Los siguientes registros no pueden reclamar propietario
    let (status, body) = post_json(
        &app,
        "/api/auth/registro",
        registro("Luis Vega", "luis@fiesta.local", Some("propietario")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usuario"]["rol"], "empleado");
    assert_eq!(body["usuario"]["permisos"]["ventas"], true);
    assert_eq!(body["usuario"]["permisos"]["reportes"], false);
}

#[tokio::test]
async fn test_registro_cliente_fuerza_rol() {
    let (app, _state, _dir) = app_de_pruebas().await;

    post_json(
        &app,
        "/api/auth/registro",
        registro("Dueña", "duena@fiesta.local", None),
    )
    .await;

    let (status, body) = post_json(
        &app,
        "/api/auth/registroCliente",
        json!({
            "nombre": "Comprador Web",
            "email": "comprador@example.com",
            "password": "contrasena-larga-1",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usuario"]["rol"], "cliente");
}

#[tokio::test]
async fn test_email_duplicado_rechazado() {
    let (app, _state, _dir) = app_de_pruebas().await;

    post_json(
        &app,
        "/api/auth/registro",
        registro("Ana", "ana@fiesta.local", None),
    )
    .await;
    let (status, body) = post_json(
        &app,
        "/api/auth/registro",
        registro("Otra Ana", "ANA@fiesta.local", None),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "EMAIL_EXISTS");
}

#[tokio::test]
async fn test_login_cuenta_desactivada() {
    let (app, state, _dir) = app_de_pruebas().await;

    post_json(
        &app,
        "/api/auth/registro",
        registro("Ana", "ana@fiesta.local", None),
    )
    .await;
    post_json(
        &app,
        "/api/auth/registro",
        registro("Ex Empleado", "ex@fiesta.local", None),
    )
    .await;

    state
        .get_db()
        .query("UPDATE usuario SET activo = false WHERE email = $email")
        .bind(("email", "ex@fiesta.local".to_string()))
        .await
        .unwrap();

    let (status, body) = post_json(
        &app,
        "/api/auth/login",
        json!({ "email": "ex@fiesta.local", "password": "contrasena-larga-1" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "ACCOUNT_DISABLED");
}

#[tokio::test]
async fn test_permiso_insuficiente_devuelve_403() {
    let (app, _state, _dir) = app_de_pruebas().await;

    post_json(
        &app,
        "/api/auth/registro",
        registro("Dueña", "duena@fiesta.local", None),
    )
    .await;
    let (_, body) = post_json(
        &app,
        "/api/auth/registro",
        registro("Empleado", "empleado@fiesta.local", None),
    )
    .await;
    let token = body["token"].as_str().unwrap().to_string();

    // Empleado por defecto: sin permiso de reportes
    let (status, body) = get_con_token(&app, "/api/reportes/dashboard", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "PERMISSION_DENIED");

    // Pero sí puede listar productos
    let (status, _) = get_con_token(&app, "/api/productos", &token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_ganancia_solo_para_propietario() {
    let (app, state, _dir) = app_de_pruebas().await;

    let (_, body) = post_json(
        &app,
        "/api/auth/registro",
        registro("Dueña", "duena@fiesta.local", None),
    )
    .await;
    let token_propietario = body["token"].as_str().unwrap().to_string();

    // Empleado con permiso de reportes concedido explícitamente
    let empleado = UsuarioRepository::new(state.get_db())
        .create(
            "Analista".to_string(),
            "analista@fiesta.local".to_string(),
            "$argon2id$sin-login".to_string(),
            Rol::Empleado,
            None,
            Permisos {
                reportes: true,
                ..Permisos::default()
            },
        )
        .await
        .unwrap();
    let token_empleado = state
        .get_jwt_service()
        .generate_token(
            &empleado.id.clone().unwrap().to_string(),
            "Analista",
            "analista@fiesta.local",
            Rol::Empleado,
            &["reportes".to_string()],
        )
        .unwrap();

    let (status, reporte) = get_con_token(&app, "/api/reportes/ventas", &token_empleado).await;
    assert_eq!(status, StatusCode::OK);
    assert!(reporte.get("gananciaEstimada").is_none());
    assert!(reporte.get("costeEstimado").is_none());

    let (status, reporte) = get_con_token(&app, "/api/reportes/ventas", &token_propietario).await;
    assert_eq!(status, StatusCode::OK);
    assert!(reporte.get("gananciaEstimada").is_some());

    let (status, inventario) =
        get_con_token(&app, "/api/reportes/inventario", &token_empleado).await;
    assert_eq!(status, StatusCode::OK);
    assert!(inventario.get("valorCompra").is_none());
}

#[tokio::test]
async fn test_pedido_publico_sin_token() {
    let (app, state, _dir) = app_de_pruebas().await;

    let producto = ProductoRepository::new(state.get_db())
        .create(
            ProductoCreate {
                nombre: "Globo látex azul".to_string(),
                descripcion: None,
                categoria: CategoriaProducto::Decoracion,
                precio_compra: 0.5,
                precio_venta: 1.5,
                stock: 20,
                stock_minimo: None,
                detalle_globo: None,
                tipo_servicio: None,
            },
            None,
        )
        .await
        .unwrap();

    let (status, pedido) = post_json(
        &app,
        "/api/pedidos",
        json!({
            "datosCliente": { "nombre": "Laura", "telefono": "5551112233" },
            "items": [
                { "producto": producto.id.clone().unwrap().to_string(), "cantidad": 4 }
            ],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pedido["estado"], "en-proceso");
    let codigo = pedido["codigoSeguimiento"].as_str().unwrap().to_string();

    // Seguimiento y cancelación públicos, también sin token
    let (status, seguido) =
        enviar(&app, "GET", &format!("/api/pedidos/seguimiento/{codigo}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seguido["numero"], pedido["numero"]);

    let (status, cancelado) = enviar(
        &app,
        "PUT",
        &format!("/api/pedidos/cancelar/{codigo}"),
        Some(json!({ "motivo": "Cambio de planes" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelado["estado"], "cancelado");

    // La rama administrativa sigue protegida
    let (status, _) = enviar(&app, "GET", "/api/pedidos/admin", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cancelacion_publica_sin_cuerpo() {
    let (app, state, _dir) = app_de_pruebas().await;

    let producto = ProductoRepository::new(state.get_db())
        .create(
            ProductoCreate {
                nombre: "Serpentina dorada".to_string(),
                descripcion: None,
                categoria: CategoriaProducto::Decoracion,
                precio_compra: 0.3,
                precio_venta: 1.0,
                stock: 10,
                stock_minimo: None,
                detalle_globo: None,
                tipo_servicio: None,
            },
            None,
        )
        .await
        .unwrap();

    let (_, pedido) = post_json(
        &app,
        "/api/pedidos",
        json!({
            "datosCliente": { "nombre": "Marta", "telefono": "5554443322" },
            "items": [
                { "producto": producto.id.clone().unwrap().to_string(), "cantidad": 2 }
            ],
        }),
    )
    .await;
    let codigo = pedido["codigoSeguimiento"].as_str().unwrap().to_string();

    // Un PUT pelado, sin cuerpo ni content-type, cancela igual
    let (status, cancelado) = enviar(
        &app,
        "PUT",
        &format!("/api/pedidos/cancelar/{codigo}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelado["estado"], "cancelado");
}

#[tokio::test]
async fn test_catalogo_publico_oculta_costes() {
    let (app, state, _dir) = app_de_pruebas().await;

    ProductoRepository::new(state.get_db())
        .create(
            ProductoCreate {
                nombre: "Piñata estrella".to_string(),
                descripcion: None,
                categoria: CategoriaProducto::ArticulosFiesta,
                precio_compra: 8.0,
                precio_venta: 20.0,
                stock: 3,
                stock_minimo: None,
                detalle_globo: None,
                tipo_servicio: None,
            },
            None,
        )
        .await
        .unwrap();

    let (status, catalogo) = enviar(&app, "GET", "/api/publico/productos", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let items = catalogo.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["precio"], 20.0);
    assert!(items[0].get("precioCompra").is_none());
    assert!(items[0].get("stock").is_none());
}

#[tokio::test]
async fn test_token_invalido_rechazado() {
    let (app, _state, _dir) = app_de_pruebas().await;
    let (status, body) = get_con_token(&app, "/api/productos", "no-es-un-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "TOKEN_INVALID");
}
