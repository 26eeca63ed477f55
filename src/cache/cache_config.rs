//! Configuración de cache
//!
//! Este módulo contiene la configuración del cache de nombres de ubicación.

use serde::{Deserialize, Serialize};

/// Configuración del cache en memoria
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Decimales con que se redondean las coordenadas de la clave
    pub precision_decimals: u32,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            precision_decimals: 5, // ~1 metro
            max_entries: 10_000,
        }
    }
}
