//! Pipeline de enriquecimiento de rutas
//!
//! Rutas → horario (reservas) → estado efectivo → [mapa] nombres de lugar.
//! El fan-out por ruta está acotado por `max_concurrency` y conserva el orden
//! de la API. La lista solo se publica cuando todas las rutas terminaron.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::sync::watch;

use crate::clients::DashboardApi;
use crate::config::EnrichmentConfig;
use crate::models::{EnrichedRoute, LocationNames, Route};
use crate::services::geocoding_service::GeocodingService;
use crate::services::route_status::derive_effective_status;
use crate::services::schedule_service::ScheduleResolver;
use crate::utils::errors::{AppError, AppResult};

/// Qué se calcula además del estado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnrichmentOptions {
    /// Geocodificar origen y destino (vista de mapa)
    pub resolve_names: bool,
}

impl EnrichmentOptions {
    pub fn map_view() -> Self {
        Self { resolve_names: true }
    }

    pub fn schedule_only() -> Self {
        Self { resolve_names: false }
    }
}

/// Se resuelve cuando la señal pasa a `true`; si el emisor desaparece,
/// nunca se resuelve.
async fn cancelled(mut signal: watch::Receiver<bool>) {
    loop {
        if *signal.borrow_and_update() {
            return;
        }
        if signal.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[derive(Clone)]
pub struct RouteEnrichmentService {
    api: Arc<dyn DashboardApi>,
    schedules: ScheduleResolver,
    geocoding: Arc<GeocodingService>,
    max_concurrency: usize,
}

impl RouteEnrichmentService {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        geocoding: Arc<GeocodingService>,
        config: &EnrichmentConfig,
    ) -> Self {
        Self {
            schedules: ScheduleResolver::new(api.clone(), config.schedule_policy),
            api,
            geocoding,
            max_concurrency: config.max_concurrency.max(1),
        }
    }

    /// `GET /routes`; un fallo se registra y se trata como lista vacía
    pub async fn fetch_routes(&self) -> Vec<Route> {
        match self.api.list_routes().await {
            Ok(routes) => {
                log::info!("📦 {} rutas obtenidas de la API", routes.len());
                routes
            }
            Err(e) => {
                log::error!("❌ Error cargando rutas: {}", e);
                Vec::new()
            }
        }
    }

    /// Enriquecer una ruta. Horario y nombres se piden en paralelo.
    pub async fn enrich_one(
        &self,
        route: Route,
        now: DateTime<Utc>,
        options: EnrichmentOptions,
    ) -> EnrichedRoute {
        let names = async {
            if !options.resolve_names {
                return None;
            }
            let (origin, destination) = futures::join!(
                self.geocoding.name_optional(route.origin.as_ref()),
                self.geocoding.name_optional(route.destination.as_ref()),
            );
            Some(LocationNames { origin, destination })
        };

        let (schedule, names) = futures::join!(self.schedules.resolve(&route), names);
        let status = derive_effective_status(route.status, schedule, now);

        EnrichedRoute::new(route, schedule, status, names)
    }

    /// Enriquecer un lote completo contra un mismo instante `now`
    pub async fn enrich_routes_at(
        &self,
        routes: Vec<Route>,
        now: DateTime<Utc>,
        options: EnrichmentOptions,
    ) -> Vec<EnrichedRoute> {
        stream::iter(routes)
            .map(|route| self.enrich_one(route, now, options))
            .buffered(self.max_concurrency)
            .collect()
            .await
    }

    /// Pipeline completo. Si llega la señal de apagado, las peticiones en
    /// vuelo se descartan y se devuelve 503.
    pub async fn enrich_all(
        &self,
        options: EnrichmentOptions,
        shutdown: watch::Receiver<bool>,
    ) -> AppResult<Vec<EnrichedRoute>> {
        let pipeline = async {
            let routes = self.fetch_routes().await;
            let now = Utc::now();
            self.enrich_routes_at(routes, now, options).await
        };

        tokio::select! {
            enriched = pipeline => {
                log::info!("✅ {} rutas enriquecidas", enriched.len());
                Ok(enriched)
            }
            _ = cancelled(shutdown) => {
                log::warn!("🛑 Enriquecimiento cancelado por apagado del servidor");
                Err(AppError::ServiceUnavailable(
                    "El servidor se está apagando".to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, LocationCache};
    use crate::clients::{NominatimAddress, ReverseGeocodeResponse, ReverseGeocoder};
    use crate::config::{GeocodingConfig, SchedulePolicy};
    use crate::models::{AiQueryRequest, AiQueryResponse, Point, Reservation, RouteStatus};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FakeApi {
        routes: Vec<Route>,
        reservations: HashMap<String, Vec<Reservation>>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl DashboardApi for FakeApi {
        async fn list_routes(&self) -> AppResult<Vec<Route>> {
            Ok(self.routes.clone())
        }

        async fn reservations_by_route(&self, route_id: &str) -> AppResult<Vec<Reservation>> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(self.reservations.get(route_id).cloned().unwrap_or_default())
        }

        async fn list_reservations(&self) -> AppResult<Vec<Reservation>> {
            Ok(Vec::new())
        }

        async fn ai_query(&self, _request: &AiQueryRequest) -> AppResult<AiQueryResponse> {
            Ok(AiQueryResponse::default())
        }
    }

    struct CityGeocoder;

    #[async_trait]
    impl ReverseGeocoder for CityGeocoder {
        async fn reverse(&self, point: &Point) -> AppResult<ReverseGeocodeResponse> {
            Ok(ReverseGeocodeResponse {
                display_name: None,
                address: Some(NominatimAddress {
                    road: Some(format!("Calle {}", point.longitude)),
                    city: Some("Querétaro".to_string()),
                    ..Default::default()
                }),
            })
        }
    }

    fn route(id: &str, status: RouteStatus, schedule: Option<DateTime<Utc>>) -> Route {
        Route {
            id: id.to_string(),
            driver_id: Some("d1".to_string()),
            status,
            origin: Some(Point::new(1.0, 20.0)),
            destination: Some(Point::new(2.0, 21.0)),
            stops: Vec::new(),
            available_seats: 3,
            prices: Vec::new(),
            schedule,
        }
    }

    fn service(api: Arc<FakeApi>, max_concurrency: usize) -> RouteEnrichmentService {
        let geocoding = Arc::new(GeocodingService::new(
            Arc::new(CityGeocoder),
            LocationCache::new(CacheConfig::default()),
            GeocodingConfig::default(),
        ));
        RouteEnrichmentService::new(
            api,
            geocoding,
            &EnrichmentConfig {
                max_concurrency,
                schedule_policy: SchedulePolicy::FirstReturned,
            },
        )
    }

    fn fake_api(routes: Vec<Route>) -> Arc<FakeApi> {
        Arc::new(FakeApi {
            routes,
            reservations: HashMap::new(),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_map_enrichment_names_and_status() {
        let past = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let api = fake_api(vec![route("r1", RouteStatus::Available, Some(past))]);
        let enrichment = service(api, 4);

        let routes = enrichment.fetch_routes().await;
        let enriched = enrichment
            .enrich_routes_at(routes, now, EnrichmentOptions::map_view())
            .await;

        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].status, RouteStatus::Cancelled);
        assert_eq!(enriched[0].declared_status, RouteStatus::Available);
        assert_eq!(enriched[0].schedule, Some(past));
        assert_eq!(enriched[0].origin_name.as_deref(), Some("Calle 1, Querétaro"));
        assert_eq!(enriched[0].destination_name.as_deref(), Some("Calle 2, Querétaro"));
    }

    #[tokio::test]
    async fn test_schedule_only_skips_names() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let api = fake_api(vec![route("r1", RouteStatus::InProgress, None)]);
        let enrichment = service(api, 4);

        let routes = enrichment.fetch_routes().await;
        let enriched = enrichment
            .enrich_routes_at(routes, now, EnrichmentOptions::schedule_only())
            .await;

        assert_eq!(enriched[0].status, RouteStatus::InProgress);
        assert!(enriched[0].origin_name.is_none());
    }

    #[tokio::test]
    async fn test_fan_out_is_bounded_and_ordered() {
        let routes: Vec<Route> = (0..12)
            .map(|i| route(&format!("r{}", i), RouteStatus::Available, None))
            .collect();
        let api = fake_api(routes);
        let enrichment = service(api.clone(), 3);

        let now = Utc::now();
        let routes = enrichment.fetch_routes().await;
        let enriched = enrichment
            .enrich_routes_at(routes, now, EnrichmentOptions::schedule_only())
            .await;

        let ids: Vec<String> = enriched.into_iter().map(|r| r.id).collect();
        let expected: Vec<String> = (0..12).map(|i| format!("r{}", i)).collect();
        assert_eq!(ids, expected);
        assert!(api.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_pipeline() {
        let api = fake_api(vec![route("r1", RouteStatus::Available, None)]);
        let enrichment = service(api, 1);
        let (tx, rx) = watch::channel(true);

        let result = enrichment.enrich_all(EnrichmentOptions::map_view(), rx).await;
        assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
        drop(tx);
    }

    #[tokio::test]
    async fn test_dropped_shutdown_sender_never_cancels() {
        let api = fake_api(vec![route("r1", RouteStatus::Available, None)]);
        let enrichment = service(api, 1);
        let (tx, rx) = watch::channel(false);
        drop(tx);

        let result = enrichment.enrich_all(EnrichmentOptions::map_view(), rx).await;
        assert_eq!(result.unwrap().len(), 1);
    }
}
