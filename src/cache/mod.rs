//! Cache
//!
//! Este módulo contiene el cache en memoria de nombres de ubicación.

pub mod cache_config;
pub mod location_cache;

pub use cache_config::CacheConfig;
pub use location_cache::{CoordinateKey, LocationCache};
