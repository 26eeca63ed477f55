//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;
use tokio::sync::watch;

use crate::cache::{CacheConfig, LocationCache};
use crate::clients::{ColibriApiClient, DashboardApi, NominatimClient, ReverseGeocoder};
use crate::config::environment::EnvironmentConfig;
use crate::services::{AssistantService, GeocodingService, RouteEnrichmentService};
use crate::utils::errors::AppResult;

/// Señal de apagado que observan los pipelines en curso
#[derive(Clone)]
pub struct ShutdownSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }

    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub location_cache: LocationCache,
    pub enrichment: RouteEnrichmentService,
    pub assistant: Arc<AssistantService>,
    pub shutdown: ShutdownSignal,
}

impl AppState {
    /// Estado con los clientes HTTP reales
    pub fn new(config: EnvironmentConfig) -> AppResult<Self> {
        let api = Arc::new(ColibriApiClient::new(
            config.api_base_url.clone(),
            config.api_timeout,
        )?);
        let geocoder = Arc::new(NominatimClient::new(&config.geocoding)?);

        Ok(Self::with_collaborators(config, api, geocoder))
    }

    /// Estado con colaboradores inyectados
    pub fn with_collaborators(
        config: EnvironmentConfig,
        api: Arc<dyn DashboardApi>,
        geocoder: Arc<dyn ReverseGeocoder>,
    ) -> Self {
        let location_cache = LocationCache::new(CacheConfig {
            enabled: config.geocoding.cache_enabled,
            ..CacheConfig::default()
        });
        let geocoding = Arc::new(GeocodingService::new(
            geocoder,
            location_cache.clone(),
            config.geocoding.clone(),
        ));
        let enrichment = RouteEnrichmentService::new(api.clone(), geocoding, &config.enrichment);

        Self {
            assistant: Arc::new(AssistantService::new(api)),
            config,
            location_cache,
            enrichment,
            shutdown: ShutdownSignal::new(),
        }
    }
}
