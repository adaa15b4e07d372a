//! Handlers de autenticación
//!
//! Registro, login, perfil y el flujo de códigos de verificación.

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde_json::{Value, json};

use crate::auth::{CurrentUser, default_permissions};
use crate::core::ServerState;
use crate::db::models::{CodigoVerificacion, Usuario, UsuarioUpdate, generar_codigo};
use crate::db::repository::{CodigoVerificacionRepository, UsuarioRepository};
use crate::utils::validation::{
    MAX_NAME_LEN, validate_email, validate_password, validate_required_text, validate_telefono,
};
use shared::auth::{
    ChangePasswordRequest, LoginRequest, LoginResponse, Proposito, RegisterClientRequest,
    RegisterRequest, RequestCodeRequest, ResetPasswordRequest, Rol, UpdateProfileRequest,
    UserInfo, VerifyCodeRequest,
};
use shared::{AppError, ErrorCode};

/// Retardo fijo en autenticación contra ataques de temporización
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Registro de personal
///
/// La primera cuenta del sistema es siempre `propietario`; las siguientes
/// no pueden reclamar ese rol y por defecto son `empleado`.
pub async fn registro(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_required_text(&req.nombre, "nombre", MAX_NAME_LEN)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    if let Some(telefono) = &req.telefono {
        validate_telefono(telefono)?;
    }

    let usuarios = UsuarioRepository::new(state.get_db());

    let rol = if usuarios.count().await.map_err(AppError::from)? == 0 {
        // Primera cuenta del sistema
        Rol::Propietario
    } else {
        match req.rol {
            Some(Rol::Propietario) | None => Rol::Empleado,
            Some(rol) => rol,
        }
    };

    let password_hash = Usuario::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("No se pudo hashear la contraseña: {}", e)))?;

    let usuario = usuarios
        .create(
            req.nombre,
            req.email,
            password_hash,
            rol,
            req.telefono,
            default_permissions(rol),
        )
        .await
        .map_err(|e| match e {
            crate::db::repository::RepoError::Duplicate(_) => {
                AppError::new(ErrorCode::EmailExists)
            }
            other => AppError::from(other),
        })?;

    tracing::info!(email = %usuario.email, rol = rol.as_str(), "Usuario registrado");
    emitir_sesion(&state, usuario)
}

/// Autorregistro público de clientes (rol forzado a `cliente`)
pub async fn registro_cliente(
    State(state): State<ServerState>,
    Json(req): Json<RegisterClientRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_required_text(&req.nombre, "nombre", MAX_NAME_LEN)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    if let Some(telefono) = &req.telefono {
        validate_telefono(telefono)?;
    }

    let usuarios = UsuarioRepository::new(state.get_db());

    // La regla del primer usuario también aplica aquí
    let rol = if usuarios.count().await.map_err(AppError::from)? == 0 {
        Rol::Propietario
    } else {
        Rol::Cliente
    };

    let password_hash = Usuario::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("No se pudo hashear la contraseña: {}", e)))?;

    let usuario = usuarios
        .create(
            req.nombre,
            req.email,
            password_hash,
            rol,
            req.telefono,
            default_permissions(rol),
        )
        .await
        .map_err(|e| match e {
            crate::db::repository::RepoError::Duplicate(_) => {
                AppError::new(ErrorCode::EmailExists)
            }
            other => AppError::from(other),
        })?;

    tracing::info!(email = %usuario.email, "Cliente registrado");
    emitir_sesion(&state, usuario)
}

/// Login
///
/// Mensaje unificado ante credenciales incorrectas para no filtrar qué
/// emails existen. Las cuentas desactivadas no pueden entrar.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let usuarios = UsuarioRepository::new(state.get_db());
    let usuario = usuarios
        .find_by_email(&req.email)
        .await
        .map_err(AppError::from)?;

    // Retardo fijo antes de evaluar el resultado
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let usuario = match usuario {
        Some(u) => {
            if !u.activo {
                return Err(AppError::new(ErrorCode::AccountDisabled));
            }
            let password_valid = u.verify_password(&req.password).map_err(|e| {
                AppError::internal(format!("Fallo verificando la contraseña: {}", e))
            })?;
            if !password_valid {
                tracing::warn!(email = %req.email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }
            u
        }
        None => {
            tracing::warn!(email = %req.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    if let Some(id) = &usuario.id {
        usuarios
            .touch_ultimo_acceso(&id.to_string())
            .await
            .map_err(AppError::from)?;
    }

    tracing::info!(email = %usuario.email, rol = usuario.rol.as_str(), "User logged in");
    emitir_sesion(&state, usuario)
}

/// Perfil del usuario autenticado (datos frescos de base)
pub async fn perfil(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserInfo>, AppError> {
    let usuario = usuario_actual(&state, &user).await?;
    Ok(Json(usuario.to_user_info()))
}

/// Actualiza nombre y teléfono del perfil propio
pub async fn actualizar_perfil(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserInfo>, AppError> {
    if let Some(nombre) = &req.nombre {
        validate_required_text(nombre, "nombre", MAX_NAME_LEN)?;
    }
    if let Some(telefono) = &req.telefono {
        validate_telefono(telefono)?;
    }

    let usuarios = UsuarioRepository::new(state.get_db());
    let actualizado = usuarios
        .update_profile(
            &user.id,
            UsuarioUpdate {
                nombre: req.nombre,
                telefono: req.telefono,
            },
        )
        .await
        .map_err(AppError::from)?;

    Ok(Json(actualizado.to_user_info()))
}

/// Cambio de contraseña con verificación de la actual
pub async fn cambiar_password(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    validate_password(&req.password_nueva)?;

    let usuario = usuario_actual(&state, &user).await?;
    let valida = usuario
        .verify_password(&req.password_actual)
        .map_err(|e| AppError::internal(format!("Fallo verificando la contraseña: {}", e)))?;
    if !valida {
        return Err(AppError::invalid_credentials());
    }

    let password_hash = Usuario::hash_password(&req.password_nueva)
        .map_err(|e| AppError::internal(format!("No se pudo hashear la contraseña: {}", e)))?;
    UsuarioRepository::new(state.get_db())
        .update_password(&user.id, password_hash)
        .await
        .map_err(AppError::from)?;

    tracing::info!(user_id = %user.id, "Password changed");
    Ok(Json(json!({ "mensaje": "Contraseña actualizada" })))
}

/// Confirma que el token sigue siendo válido y la cuenta activa
pub async fn verificar_token(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let usuario = usuario_actual(&state, &user).await?;
    Ok(Json(json!({
        "valido": true,
        "usuario": usuario.to_user_info(),
    })))
}

/// Solicita un código de verificación o recuperación por correo
///
/// Responde igual exista o no la cuenta, para no filtrar emails. El envío
/// de correo es best-effort y su resultado viaja en la respuesta.
pub async fn solicitar_codigo(
    State(state): State<ServerState>,
    Json(req): Json<RequestCodeRequest>,
) -> Result<Json<Value>, AppError> {
    validate_email(&req.email)?;

    let usuarios = UsuarioRepository::new(state.get_db());
    let existe = usuarios
        .find_by_email(&req.email)
        .await
        .map_err(AppError::from)?
        .is_some();

    let correo = if existe {
        let codigo = generar_codigo();
        let registro = CodigoVerificacion::nuevo(
            req.email.to_lowercase(),
            codigo.clone(),
            req.proposito,
        );
        CodigoVerificacionRepository::new(state.get_db())
            .create(registro)
            .await
            .map_err(AppError::from)?;

        let asunto = match req.proposito {
            Proposito::Verificacion => "Código de verificación",
            Proposito::Recuperacion => "Recuperación de contraseña",
        };
        Some(state.mailer.send_codigo(&req.email, &codigo, asunto).await)
    } else {
        tracing::warn!(email = %req.email, "Code requested for unknown email");
        None
    };

    Ok(Json(json!({
        "mensaje": "Si el email está registrado, recibirás un código",
        "correo": correo,
    })))
}

/// Comprueba un código sin consumirlo más allá del intento
pub async fn verificar_codigo(
    State(state): State<ServerState>,
    Json(req): Json<VerifyCodeRequest>,
) -> Result<Json<Value>, AppError> {
    let repo = CodigoVerificacionRepository::new(state.get_db());
    validar_codigo(&repo, &req.email, &req.codigo, req.proposito).await?;
    Ok(Json(json!({ "valido": true })))
}

/// Restablece la contraseña con un código de recuperación válido
pub async fn restablecer_password(
    State(state): State<ServerState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    validate_password(&req.password_nueva)?;

    let repo = CodigoVerificacionRepository::new(state.get_db());
    let codigo = validar_codigo(&repo, &req.email, &req.codigo, Proposito::Recuperacion).await?;

    let password_hash = Usuario::hash_password(&req.password_nueva)
        .map_err(|e| AppError::internal(format!("No se pudo hashear la contraseña: {}", e)))?;
    UsuarioRepository::new(state.get_db())
        .update_password_by_email(&req.email, password_hash)
        .await
        .map_err(AppError::from)?;

    if let Some(id) = &codigo.id {
        repo.mark_used(id).await.map_err(AppError::from)?;
    }

    tracing::info!(email = %req.email, "Password reset via recovery code");
    Ok(Json(json!({ "mensaje": "Contraseña restablecida" })))
}

// ── Helpers ─────────────────────────────────────────────────────────

fn emitir_sesion(state: &ServerState, usuario: Usuario) -> Result<Json<LoginResponse>, AppError> {
    let user_id = usuario
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();

    let token = state
        .get_jwt_service()
        .generate_token(
            &user_id,
            &usuario.nombre,
            &usuario.email,
            usuario.rol,
            &usuario.permisos.lista(),
        )
        .map_err(|e| AppError::internal(format!("No se pudo generar el token: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        usuario: usuario.to_user_info(),
    }))
}

async fn usuario_actual(state: &ServerState, user: &CurrentUser) -> Result<Usuario, AppError> {
    UsuarioRepository::new(state.get_db())
        .find_by_id(&user.id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("Usuario"))
}

/// Valida un código: existencia, uso previo, expiración y tope de intentos.
/// Cada comprobación fallida del código en sí consume un intento.
async fn validar_codigo(
    repo: &CodigoVerificacionRepository,
    email: &str,
    codigo: &str,
    proposito: Proposito,
) -> Result<CodigoVerificacion, AppError> {
    let registro = repo
        .find_current(email, proposito)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::VerificationCodeInvalid))?;

    if registro.usado {
        return Err(AppError::new(ErrorCode::VerificationCodeUsed));
    }
    if registro.expirado() {
        return Err(AppError::new(ErrorCode::VerificationCodeExpired));
    }
    if registro.agotado() {
        return Err(AppError::new(ErrorCode::VerificationCodeAttempts));
    }

    if registro.codigo != codigo {
        if let Some(id) = &registro.id {
            repo.increment_intentos(id).await.map_err(AppError::from)?;
        }
        return Err(AppError::new(ErrorCode::VerificationCodeInvalid));
    }

    Ok(registro)
}
