//! Extracción del usuario actual
//!
//! El front envía la sesión guardada (`colibri:user`) en el header
//! `X-Colibri-User` o el token en `Authorization: Bearer`. El usuario resultante
//! solo decide qué rutas se muestran; la API de Colibrí aplica los permisos.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use std::convert::Infallible;

use crate::models::auth::{CurrentUser, SessionPayload};
use crate::utils::jwt::{current_user_from_session, current_user_from_token, extract_token_from_header};

pub const SESSION_HEADER: &str = "x-colibri-user";

/// Usuario actual a partir de los headers; ante cualquier problema, ADMIN
pub fn current_user_from_headers(headers: &HeaderMap) -> CurrentUser {
    if let Some(raw) = headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok()) {
        match serde_json::from_str::<SessionPayload>(raw) {
            Ok(session) => return current_user_from_session(session),
            Err(e) => tracing::warn!("⚠️ Sesión ilegible en {}: {}", SESSION_HEADER, e),
        }
    }

    if let Some(auth_header) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        match extract_token_from_header(auth_header).and_then(current_user_from_token) {
            Ok(user) => return user,
            Err(e) => tracing::warn!("⚠️ Token de sesión ignorado: {}", e),
        }
    }

    CurrentUser::default()
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(current_user_from_headers(&parts.headers))
    }
}
