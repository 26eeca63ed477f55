//! Cliente de geocodificación inversa (Nominatim)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::GeocodingConfig;
use crate::models::Point;
use crate::utils::errors::{external_api_error, AppResult};

/// Respuesta de `/reverse?format=json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReverseGeocodeResponse {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Option<NominatimAddress>,
}

/// Detalle de dirección (`addressdetails=1`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub highway: Option<String>,
    #[serde(default)]
    pub suburb: Option<String>,
    #[serde(default)]
    pub neighbourhood: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub municipality: Option<String>,
}

impl NominatimAddress {
    pub fn locality(&self) -> Option<&str> {
        first_present(&[&self.city, &self.town, &self.village, &self.municipality])
    }

    pub fn district(&self) -> Option<&str> {
        first_present(&[&self.suburb, &self.neighbourhood])
    }

    pub fn street(&self) -> Option<&str> {
        first_present(&[&self.road, &self.highway])
    }
}

fn first_present<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .filter_map(Option::as_deref)
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Servicio externo que traduce coordenadas a una dirección
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, point: &Point) -> AppResult<ReverseGeocodeResponse>;
}

pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(config: &GeocodingConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn reverse(&self, point: &Point) -> AppResult<ReverseGeocodeResponse> {
        let url = format!("{}/reverse", self.base_url);
        let lat = point.latitude.to_string();
        let lon = point.longitude.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "json"),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("zoom", "18"),
                ("addressdetails", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        log::debug!("📡 Nominatim ({}, {}) -> {}", lat, lon, status);

        if !status.is_success() {
            return Err(external_api_error("Nominatim", status));
        }

        Ok(response.json::<ReverseGeocodeResponse>().await?)
    }
}
