//! Middleware de autenticación
//!
//! Verifica el Bearer token del request e inyecta el par verificado
//! (user_id, rol) como extensión. El resto del sistema confía en ese
//! par; los roles se rechazan en el borde del router.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::models::user::{AuthUser, UserRole};
use crate::services::jwt_service::JwtService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Middleware de autenticación: Bearer token → AuthUser
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Falta el header Authorization".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("El header Authorization debe ser Bearer".to_string())
    })?;

    let jwt = JwtService::new(&state.config.jwt_secret);
    let auth_user = jwt.verify(token)?;

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// Middleware para verificar si el usuario es admin
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    require_role(request, next, UserRole::Admin).await
}

/// Middleware para verificar si el usuario es conductor
pub async fn require_driver(request: Request, next: Next) -> Result<Response, AppError> {
    require_role(request, next, UserRole::Driver).await
}

async fn require_role(
    request: Request,
    next: Next,
    required_role: UserRole,
) -> Result<Response, AppError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| AppError::Unauthorized("No autenticado".to_string()))?;

    if auth_user.role != required_role {
        return Err(AppError::Forbidden(format!(
            "Esta operación requiere rol {}",
            required_role.as_str()
        )));
    }

    Ok(next.run(request).await)
}
