//! Verificación de JWT
//!
//! La emisión de tokens vive en el servicio de autenticación externo;
//! aquí solo se verifica la firma HS256 y se extrae el par
//! (user_id, rol) que el resto del sistema da por confiable.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use uuid::Uuid;

use crate::models::user::{AuthUser, JwtClaims, UserRole};
use crate::utils::errors::{AppError, AppResult};

pub struct JwtService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Verifica el token y devuelve el usuario autenticado
    pub fn verify(&self, token: &str) -> AppResult<AuthUser> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Unauthorized(format!("Token inválido: {}", e)))?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthorized("Token inválido: sub no es un UUID".to_string()))?;

        let role = UserRole::from_str(&data.claims.role)
            .ok_or_else(|| AppError::Unauthorized("Token inválido: rol desconocido".to_string()))?;

        Ok(AuthUser { user_id, role })
    }
}
