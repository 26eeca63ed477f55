use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use colibri_dashboard::cache::{CacheConfig, LocationCache};
use colibri_dashboard::clients::{
    DashboardApi, NominatimAddress, ReverseGeocodeResponse, ReverseGeocoder,
};
use colibri_dashboard::config::{EnrichmentConfig, GeocodingConfig, SchedulePolicy};
use colibri_dashboard::models::{
    AiQueryRequest, AiQueryResponse, Point, Reservation, Route, RouteStatus,
};
use colibri_dashboard::services::{
    apply_status_filter, EnrichmentOptions, GeocodingService, RouteEnrichmentService,
    StatusFilter,
};
use colibri_dashboard::utils::errors::{AppError, AppResult};

struct ScenarioApi {
    routes: Vec<Route>,
    reservations: HashMap<String, Vec<Reservation>>,
}

#[async_trait]
impl DashboardApi for ScenarioApi {
    async fn list_routes(&self) -> AppResult<Vec<Route>> {
        Ok(self.routes.clone())
    }

    async fn reservations_by_route(&self, route_id: &str) -> AppResult<Vec<Reservation>> {
        match self.reservations.get(route_id) {
            Some(reservations) => Ok(reservations.clone()),
            None => Err(AppError::ExternalApi(format!("sin reservas para {}", route_id))),
        }
    }

    async fn list_reservations(&self) -> AppResult<Vec<Reservation>> {
        Ok(Vec::new())
    }

    async fn ai_query(&self, _request: &AiQueryRequest) -> AppResult<AiQueryResponse> {
        Ok(AiQueryResponse::default())
    }
}

struct CountingGeocoder {
    calls: AtomicUsize,
}

#[async_trait]
impl ReverseGeocoder for CountingGeocoder {
    async fn reverse(&self, point: &Point) -> AppResult<ReverseGeocodeResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if point.latitude > 80.0 {
            return Err(AppError::ExternalApi("Nominatim no disponible".to_string()));
        }
        Ok(ReverseGeocodeResponse {
            display_name: Some("Jalpan de Serra, Querétaro, México".to_string()),
            address: Some(NominatimAddress {
                suburb: Some("Centro".to_string()),
                town: Some("Jalpan de Serra".to_string()),
                ..Default::default()
            }),
        })
    }
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
}

fn route(id: &str, status: RouteStatus, schedule: Option<DateTime<Utc>>) -> Route {
    Route {
        id: id.to_string(),
        driver_id: Some("driver-1".to_string()),
        status,
        origin: Some(Point::new(-99.63, 21.22)),
        destination: Some(Point::new(-100.39, 20.59)),
        stops: Vec::new(),
        available_seats: 4,
        prices: Vec::new(),
        schedule,
    }
}

fn pickup(at: DateTime<Utc>) -> Reservation {
    Reservation {
        route_id: None,
        pickup_at: Some(at),
        status: Some("pending".to_string()),
        price: None,
    }
}

fn pipeline(
    api: ScenarioApi,
    geocoder: Arc<CountingGeocoder>,
    policy: SchedulePolicy,
) -> RouteEnrichmentService {
    let geocoding = Arc::new(GeocodingService::new(
        geocoder,
        LocationCache::new(CacheConfig::default()),
        GeocodingConfig::default(),
    ));
    RouteEnrichmentService::new(
        Arc::new(api),
        geocoding,
        &EnrichmentConfig {
            max_concurrency: 4,
            schedule_policy: policy,
        },
    )
}

fn geocoder() -> Arc<CountingGeocoder> {
    Arc::new(CountingGeocoder {
        calls: AtomicUsize::new(0),
    })
}

#[tokio::test]
async fn test_expired_available_route_is_shown_as_cancelled() {
    let api = ScenarioApi {
        routes: vec![route("r1", RouteStatus::Available, Some(at(1, 8)))],
        reservations: HashMap::from([("r1".to_string(), Vec::new())]),
    };
    let service = pipeline(api, geocoder(), SchedulePolicy::FirstReturned);

    let routes = service.fetch_routes().await;
    let enriched = service
        .enrich_routes_at(routes, at(15, 0), EnrichmentOptions::map_view())
        .await;

    assert_eq!(enriched[0].status, RouteStatus::Cancelled);
    assert_eq!(enriched[0].declared_status, RouteStatus::Available);
    assert_eq!(enriched[0].origin_name.as_deref(), Some("Centro, Jalpan de Serra"));

    let cancelled_only = StatusFilter {
        available: false,
        ..StatusFilter::default()
    };
    assert_eq!(apply_status_filter(&enriched, &cancelled_only).len(), 1);

    let available_only = StatusFilter {
        cancelled: false,
        ..StatusFilter::default()
    };
    assert!(apply_status_filter(&enriched, &available_only).is_empty());
}

#[tokio::test]
async fn test_reservation_pickup_overrides_declared_schedule() {
    let api = ScenarioApi {
        routes: vec![route("r1", RouteStatus::Available, Some(at(1, 8)))],
        reservations: HashMap::from([(
            "r1".to_string(),
            vec![pickup(at(20, 9)), pickup(at(18, 7))],
        )]),
    };
    let first = pipeline(api, geocoder(), SchedulePolicy::FirstReturned);
    let routes = first.fetch_routes().await;
    let enriched = first
        .enrich_routes_at(routes, at(15, 0), EnrichmentOptions::schedule_only())
        .await;

    assert_eq!(enriched[0].schedule, Some(at(20, 9)));
    assert_eq!(enriched[0].status, RouteStatus::Available);
    assert!(enriched[0].origin_name.is_none());

    let api = ScenarioApi {
        routes: vec![route("r1", RouteStatus::Available, Some(at(1, 8)))],
        reservations: HashMap::from([(
            "r1".to_string(),
            vec![pickup(at(20, 9)), pickup(at(18, 7))],
        )]),
    };
    let earliest = pipeline(api, geocoder(), SchedulePolicy::EarliestPickup);
    let routes = earliest.fetch_routes().await;
    let enriched = earliest
        .enrich_routes_at(routes, at(15, 0), EnrichmentOptions::schedule_only())
        .await;

    assert_eq!(enriched[0].schedule, Some(at(18, 7)));
}

#[tokio::test]
async fn test_reservation_without_pickup_keeps_declared_status() {
    let mut undated = pickup(at(1, 1));
    undated.pickup_at = None;
    let api = ScenarioApi {
        routes: vec![route("r1", RouteStatus::Available, Some(at(1, 8)))],
        reservations: HashMap::from([("r1".to_string(), vec![undated])]),
    };
    let service = pipeline(api, geocoder(), SchedulePolicy::FirstReturned);

    let routes = service.fetch_routes().await;
    let enriched = service
        .enrich_routes_at(routes, at(15, 0), EnrichmentOptions::schedule_only())
        .await;

    assert_eq!(enriched[0].schedule, None);
    assert_eq!(enriched[0].status, RouteStatus::Available);
}

#[tokio::test]
async fn test_reservation_lookup_failure_uses_declared_schedule() {
    let api = ScenarioApi {
        routes: vec![
            route("sin-reservas", RouteStatus::InProgress, Some(at(1, 8))),
            route("sin-horario", RouteStatus::InProgress, None),
        ],
        reservations: HashMap::new(),
    };
    let service = pipeline(api, geocoder(), SchedulePolicy::FirstReturned);

    let routes = service.fetch_routes().await;
    let enriched = service
        .enrich_routes_at(routes, at(15, 0), EnrichmentOptions::schedule_only())
        .await;

    assert_eq!(enriched[0].schedule, Some(at(1, 8)));
    assert_eq!(enriched[0].status, RouteStatus::Cancelled);

    // Sin reservas ni horario declarado, el estado declarado se conserva
    assert_eq!(enriched[1].schedule, None);
    assert_eq!(enriched[1].status, RouteStatus::InProgress);
}

#[tokio::test]
async fn test_geocoder_failure_falls_back_without_caching() {
    let mut unreachable = route("r1", RouteStatus::Completed, None);
    unreachable.origin = Some(Point::new(0.0, 85.0));
    let api = ScenarioApi {
        routes: vec![unreachable],
        reservations: HashMap::from([("r1".to_string(), Vec::new())]),
    };
    let counter = geocoder();
    let service = pipeline(api, counter.clone(), SchedulePolicy::FirstReturned);

    for _ in 0..2 {
        let routes = service.fetch_routes().await;
        let enriched = service
            .enrich_routes_at(routes, at(15, 0), EnrichmentOptions::map_view())
            .await;
        assert_eq!(enriched[0].origin_name.as_deref(), Some("unknown location"));
        assert_eq!(enriched[0].destination_name.as_deref(), Some("Centro, Jalpan de Serra"));
    }

    // El destino se cachea; el origen fallido se vuelve a pedir
    assert_eq!(counter.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_enrichment_is_idempotent_for_fixed_now() {
    let api = ScenarioApi {
        routes: vec![
            route("r1", RouteStatus::Available, Some(at(1, 8))),
            route("r2", RouteStatus::Completed, Some(at(2, 8))),
            route("r3", RouteStatus::Available, Some(at(30, 8))),
        ],
        reservations: HashMap::from([
            ("r1".to_string(), Vec::new()),
            ("r2".to_string(), Vec::new()),
            ("r3".to_string(), Vec::new()),
        ]),
    };
    let service = pipeline(api, geocoder(), SchedulePolicy::FirstReturned);
    let now = at(15, 0);

    let first = service
        .enrich_routes_at(service.fetch_routes().await, now, EnrichmentOptions::map_view())
        .await;
    let second = service
        .enrich_routes_at(service.fetch_routes().await, now, EnrichmentOptions::map_view())
        .await;

    assert_eq!(first, second);
    let statuses: Vec<RouteStatus> = first.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![RouteStatus::Cancelled, RouteStatus::Completed, RouteStatus::Available]
    );
}
