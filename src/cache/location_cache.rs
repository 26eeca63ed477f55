//! Cache de nombres de ubicación
//!
//! Memoriza el nombre legible de cada coordenada mientras viva el proceso.
//! No hay persistencia: reiniciar el servicio vacía el cache.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::cache_config::CacheConfig;
use crate::models::Point;

/// Clave: coordenadas redondeadas a `precision_decimals`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinateKey {
    lng: i64,
    lat: i64,
}

impl CoordinateKey {
    pub fn new(point: &Point, precision_decimals: u32) -> Self {
        let factor = 10f64.powi(precision_decimals as i32);
        Self {
            lng: (point.longitude * factor).round() as i64,
            lat: (point.latitude * factor).round() as i64,
        }
    }
}

#[derive(Clone)]
pub struct LocationCache {
    config: CacheConfig,
    entries: Arc<RwLock<HashMap<CoordinateKey, String>>>,
}

impl LocationCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn key(&self, point: &Point) -> CoordinateKey {
        CoordinateKey::new(point, self.config.precision_decimals)
    }

    pub async fn get(&self, point: &Point) -> Option<String> {
        if !self.config.enabled {
            return None;
        }
        self.entries.read().await.get(&self.key(point)).cloned()
    }

    pub async fn set(&self, point: &Point, name: String) {
        if !self.config.enabled {
            return;
        }

        let key = self.key(point);
        let mut entries = self.entries.write().await;

        // Al llenarse se vacía completo: los nombres se vuelven a pedir
        if entries.len() >= self.config.max_entries && !entries.contains_key(&key) {
            log::info!("🧹 Cache de ubicaciones lleno ({} entradas), limpiando", entries.len());
            entries.clear();
        }

        entries.insert(key, name);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
