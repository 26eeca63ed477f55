use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};

use crate::cache::{CoordinateKey, LocationCache};
use crate::clients::{ReverseGeocodeResponse, ReverseGeocoder};
use crate::config::GeocodingConfig;
use crate::models::Point;

/// Etiqueta corta a partir de la respuesta de geocodificación inversa.
///
/// Preferencia: calle + ciudad, colonia + ciudad, primer segmento de
/// `display_name`. Si nada sirve, `None`.
pub fn label_from_response(response: &ReverseGeocodeResponse) -> Option<String> {
    if let Some(address) = &response.address {
        if let Some(city) = address.locality() {
            if let Some(road) = address.street() {
                return Some(format!("{}, {}", road, city));
            }
            if let Some(suburb) = address.district() {
                return Some(format!("{}, {}", suburb, city));
            }
        }
    }

    response
        .display_name
        .as_deref()
        .and_then(|name| name.split(',').next())
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Traduce coordenadas a nombres legibles. Nunca falla: ante cualquier error
/// devuelve la etiqueta de respaldo.
pub struct GeocodingService {
    geocoder: Arc<dyn ReverseGeocoder>,
    cache: LocationCache,
    limiter: Semaphore,
    /// Un candado por coordenada: los pedidos simultáneos del mismo punto
    /// esperan al primero y leen el cache
    in_flight: Mutex<HashMap<CoordinateKey, Arc<Mutex<()>>>>,
    config: GeocodingConfig,
}

impl GeocodingService {
    pub fn new(
        geocoder: Arc<dyn ReverseGeocoder>,
        cache: LocationCache,
        config: GeocodingConfig,
    ) -> Self {
        Self {
            geocoder,
            cache,
            limiter: Semaphore::new(config.max_concurrency.max(1)),
            in_flight: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub async fn name_location(&self, point: &Point) -> String {
        if let Some(name) = self.cache.get(point).await {
            log::debug!("✅ Ubicación en cache: ({}, {})", point.latitude, point.longitude);
            return name;
        }

        let key = self.cache.key(point);
        let slot = self
            .in_flight
            .lock()
            .await
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let name = {
            let _guard = slot.lock().await;
            match self.cache.get(point).await {
                Some(name) => name,
                None => self.lookup(point).await,
            }
        };

        let mut in_flight = self.in_flight.lock().await;
        if in_flight.get(&key).is_some_and(|current| Arc::ptr_eq(current, &slot))
            && Arc::strong_count(&slot) == 2
        {
            in_flight.remove(&key);
        }

        name
    }

    /// Consulta al geocodificador (con semáforo y timeout); memoriza el resultado
    async fn lookup(&self, point: &Point) -> String {
        let response = {
            // El semáforo nunca se cierra
            let _permit = match self.limiter.acquire().await {
                Ok(permit) => permit,
                Err(_) => return self.config.fallback_label.clone(),
            };
            tokio::time::timeout(self.config.timeout, self.geocoder.reverse(point)).await
        };

        match response {
            Ok(Ok(response)) => match label_from_response(&response) {
                Some(label) => {
                    self.cache.set(point, label.clone()).await;
                    label
                }
                None => self.config.fallback_label.clone(),
            },
            Ok(Err(e)) => {
                log::warn!(
                    "⚠️ Error obteniendo nombre de ubicación ({}, {}): {}",
                    point.latitude,
                    point.longitude,
                    e
                );
                self.config.fallback_label.clone()
            }
            Err(_) => {
                log::warn!(
                    "⏱️ Geocodificación excedió {:?} para ({}, {})",
                    self.config.timeout,
                    point.latitude,
                    point.longitude
                );
                self.config.fallback_label.clone()
            }
        }
    }

    /// Nombre para un punto que puede faltar
    pub async fn name_optional(&self, point: Option<&Point>) -> String {
        match point {
            Some(point) => self.name_location(point).await,
            None => self.config.fallback_label.clone(),
        }
    }
}
