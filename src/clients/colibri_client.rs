//! Cliente HTTP para la API de Colibrí
//!
//! Este módulo contiene el cliente de la API REST que guarda rutas,
//! reservas y el asistente. El dashboard solo lee; nada se escribe de vuelta.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::models::{AiQueryRequest, AiQueryResponse, Reservation, Route};
use crate::utils::errors::{external_api_error, AppResult};

/// Colaborador remoto con los datos del negocio
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET /routes`
    async fn list_routes(&self) -> AppResult<Vec<Route>>;

    /// `GET /reservations/route/{routeId}`
    async fn reservations_by_route(&self, route_id: &str) -> AppResult<Vec<Reservation>>;

    /// `GET /reservations`
    async fn list_reservations(&self) -> AppResult<Vec<Reservation>>;

    /// `POST /ai/query`
    async fn ai_query(&self, request: &AiQueryRequest) -> AppResult<AiQueryResponse>;
}

/// Decodificar una lista elemento por elemento; lo que no es un objeto
/// legible se descarta con un warning en lugar de invalidar toda la lista
pub fn decode_list<T: DeserializeOwned>(raw: Option<serde_json::Value>, what: &str) -> Vec<T> {
    let items = match raw {
        Some(serde_json::Value::Array(items)) => items,
        Some(serde_json::Value::Null) | None => return Vec::new(),
        Some(other) => {
            tracing::warn!("⚠️ Respuesta de {} no es una lista: {}", what, other);
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<T>(item) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("⚠️ {} #{} ignorado: {}", what, index, e);
                None
            }
        })
        .collect()
}

/// Cliente HTTP para la API de Colibrí
pub struct ColibriApiClient {
    client: Client,
    base_url: String,
}

impl ColibriApiClient {
    /// Crear nuevo cliente con URL base configurable
    pub fn new(base_url: String, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let url = self.url(path);
        tracing::debug!("🌐 GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(external_api_error("Colibrí API", status));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl DashboardApi for ColibriApiClient {
    async fn list_routes(&self) -> AppResult<Vec<Route>> {
        let raw: Option<serde_json::Value> = self.get_json("/routes").await?;
        Ok(decode_list(raw, "route"))
    }

    async fn reservations_by_route(&self, route_id: &str) -> AppResult<Vec<Reservation>> {
        let path = format!("/reservations/route/{}", urlencoding::encode(route_id));
        let raw: Option<serde_json::Value> = self.get_json(&path).await?;
        Ok(decode_list(raw, "reservation"))
    }

    async fn list_reservations(&self) -> AppResult<Vec<Reservation>> {
        let raw: Option<serde_json::Value> = self.get_json("/reservations").await?;
        Ok(decode_list(raw, "reservation"))
    }

    async fn ai_query(&self, request: &AiQueryRequest) -> AppResult<AiQueryResponse> {
        let url = self.url("/ai/query");
        tracing::debug!("🌐 POST {}", url);

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(external_api_error("Colibrí AI", status));
        }

        Ok(response.json::<AiQueryResponse>().await?)
    }
}
