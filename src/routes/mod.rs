//! Router HTTP del dashboard

use axum::{extract::State, http::Uri, routing::get, Json, Router};
use serde_json::json;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors::cors_for;
use crate::models::auth::CurrentUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub mod assistant_routes;
pub mod route_routes;

/// Router completo con estado, CORS, compresión y trazas
pub fn create_app(state: AppState) -> Router {
    let cors = cors_for(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .route("/api/me", get(current_user))
        .nest("/api/routes", route_routes::create_route_router())
        .nest("/api/assistant", assistant_routes::create_assistant_router())
        .fallback(not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "service": "colibri-dashboard",
        "status": "healthy",
        "environment": state.config.environment,
        "location_cache_enabled": state.location_cache.is_enabled(),
        "cached_locations": state.location_cache.len().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Usuario actual según la sesión enviada por el front
async fn current_user(user: CurrentUser) -> Json<CurrentUser> {
    Json(user)
}

/// Rutas desconocidas responden con el cuerpo de error JSON
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No existe el endpoint {}", uri.path()))
}
