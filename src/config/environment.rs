//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno: servidor, API de Colibrí,
//! servicio de geocodificación y límites del pipeline de enriquecimiento.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Política para elegir el horario cuando una ruta tiene varias reservas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SchedulePolicy {
    /// La primera reserva devuelta por la API gana
    #[default]
    FirstReturned,
    /// La reserva con el pickup más temprano gana
    EarliestPickup,
}

impl FromStr for SchedulePolicy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "first_returned" | "first" => Ok(Self::FirstReturned),
            "earliest_pickup" | "earliest" => Ok(Self::EarliestPickup),
            other => Err(anyhow!("SCHEDULE_POLICY desconocida: {}", other)),
        }
    }
}

/// Configuración del cliente de geocodificación inversa
#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub max_concurrency: usize,
    pub cache_enabled: bool,
    pub fallback_label: String,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "ColibriDashboard/1.0".to_string(),
            timeout: Duration::from_secs(5),
            max_concurrency: 4,
            cache_enabled: true,
            fallback_label: "unknown location".to_string(),
        }
    }
}

/// Configuración del pipeline de enriquecimiento de rutas
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    pub max_concurrency: usize,
    pub schedule_policy: SchedulePolicy,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            schedule_policy: SchedulePolicy::FirstReturned,
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub log_level: String,
    pub cors_origins: Vec<String>,
    pub api_base_url: String,
    pub api_timeout: Duration,
    pub geocoding: GeocodingConfig,
    pub enrichment: EnrichmentConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            log_level: "debug".to_string(),
            cors_origins: Vec::new(),
            api_base_url: "http://localhost:5001/api".to_string(),
            api_timeout: Duration::from_secs(15),
            geocoding: GeocodingConfig::default(),
            enrichment: EnrichmentConfig::default(),
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración desde variables de entorno, con valores por defecto
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let geocoding = GeocodingConfig {
            base_url: env_or("GEOCODING_BASE_URL", defaults.geocoding.base_url),
            user_agent: env_or("GEOCODING_USER_AGENT", defaults.geocoding.user_agent),
            timeout: Duration::from_secs(parse_env(
                "GEOCODING_TIMEOUT_SECS",
                defaults.geocoding.timeout.as_secs(),
            )?),
            max_concurrency: parse_env(
                "GEOCODING_MAX_CONCURRENCY",
                defaults.geocoding.max_concurrency,
            )?
            .max(1),
            cache_enabled: parse_env("GEOCODING_CACHE_ENABLED", defaults.geocoding.cache_enabled)?,
            fallback_label: env_or("GEOCODING_FALLBACK_LABEL", defaults.geocoding.fallback_label),
        };

        let enrichment = EnrichmentConfig {
            max_concurrency: parse_env(
                "ENRICHMENT_MAX_CONCURRENCY",
                defaults.enrichment.max_concurrency,
            )?
            .max(1),
            schedule_policy: parse_env("SCHEDULE_POLICY", defaults.enrichment.schedule_policy)?,
        };

        Ok(Self {
            environment: env_or("ENVIRONMENT", defaults.environment),
            port: parse_env("PORT", defaults.port)?,
            host: env_or("HOST", defaults.host),
            log_level: env_or("LOG_LEVEL", defaults.log_level),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| split_origins(&origins))
                .unwrap_or_default(),
            api_base_url: env_or("API_BASE_URL", defaults.api_base_url)
                .trim_end_matches('/')
                .to_string(),
            api_timeout: Duration::from_secs(parse_env(
                "API_TIMEOUT_SECS",
                defaults.api_timeout.as_secs(),
            )?),
            geocoding,
            enrichment,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Nivel de logging para tracing-subscriber
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::DEBUG)
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(default)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} tiene un valor inválido '{}': {}", key, raw, e)),
        _ => Ok(default),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
