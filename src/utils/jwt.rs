//! Utilidades JWT
//!
//! Decodificación de la sesión del dashboard. El token lo emite la API de
//! Colibrí; aquí solo se leen sus claims para decidir qué mostrar, sin
//! verificar la firma (el rol es informativo, la API aplica los permisos).

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::{
    models::auth::{CurrentUser, SessionClaims, SessionPayload, UserRole},
    utils::errors::AppError,
};

/// Validar formato de token (básico)
pub fn validate_token_format(token: &str) -> Result<(), AppError> {
    if token.is_empty() {
        return Err(AppError::Session("Token no puede estar vacío".to_string()));
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(AppError::Session(
            "Token debe tener 3 partes separadas por puntos".to_string(),
        ));
    }

    Ok(())
}

/// Decodificar los claims del token sin verificar firma ni expiración
pub fn decode_claims(token: &str) -> Result<SessionClaims, AppError> {
    validate_token_format(token)?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<SessionClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::Session(format!("Token inválido: {}", e)))
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| {
            AppError::Session("Header Authorization debe comenzar con 'Bearer '".to_string())
        })?
        .trim();

    if token.is_empty() {
        return Err(AppError::Session("Token no puede estar vacío".to_string()));
    }

    Ok(token)
}

/// Construir el usuario actual a partir de la sesión guardada.
///
/// El id directo de la sesión gana; si falta, se toma del token. El rol por
/// defecto es ADMIN. Un token ilegible no invalida la sesión.
pub fn current_user_from_session(session: SessionPayload) -> CurrentUser {
    let claims = session.token.as_deref().and_then(|token| match decode_claims(token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            log::warn!("⚠️ No se pudo decodificar el token de sesión: {}", e);
            None
        }
    });

    let id = session
        .id
        .filter(|id| !id.is_empty())
        .or_else(|| claims.as_ref().and_then(|c| c.id.clone().or_else(|| c.sub.clone())));

    let role = session
        .role
        .or_else(|| claims.as_ref().and_then(|c| c.role.clone()))
        .map(|label| UserRole::from_label(&label))
        .unwrap_or(UserRole::Admin);

    CurrentUser {
        id,
        email: session
            .email
            .or_else(|| claims.as_ref().and_then(|c| c.email.clone())),
        role,
    }
}

/// Usuario actual a partir de un token suelto
pub fn current_user_from_token(token: &str) -> Result<CurrentUser, AppError> {
    let claims = decode_claims(token)?;
    Ok(CurrentUser {
        id: claims.id.or(claims.sub),
        email: claims.email,
        role: claims
            .role
            .map(|label| UserRole::from_label(&label))
            .unwrap_or(UserRole::Admin),
    })
}
