//! Modelo de Route
//!
//! Este módulo contiene el struct Route tal como lo entrega la API de Colibrí
//! y la ruta enriquecida que se muestra en el mapa y en la vista mensual.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::validation::{
    lenient_count, lenient_decimal_list, lenient_string, lenient_timestamp,
};

/// Estado de la ruta declarado por la API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Available,
    InProgress,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl Default for RouteStatus {
    fn default() -> Self {
        RouteStatus::Unknown
    }
}

impl RouteStatus {
    /// Estados que nunca se sobrescriben
    pub fn is_terminal(&self) -> bool {
        matches!(self, RouteStatus::Completed | RouteStatus::Cancelled)
    }

    /// Etiqueta para el operador
    pub fn label(&self) -> &'static str {
        match self {
            RouteStatus::Available => "Disponible",
            RouteStatus::InProgress => "En Progreso",
            RouteStatus::Completed => "Completada",
            RouteStatus::Cancelled => "Cancelada",
            RouteStatus::Unknown => "Desconocido",
        }
    }

    /// Color de la polilínea y de la etiqueta
    pub fn color(&self) -> &'static str {
        match self {
            RouteStatus::Available => "#28a745",
            RouteStatus::InProgress => "#ffc107",
            RouteStatus::Completed => "#007bff",
            RouteStatus::Cancelled => "#dc3545",
            RouteStatus::Unknown => "#6c757d",
        }
    }
}

/// Punto geográfico en formato GeoJSON: `coordinates = [lng, lat]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub longitude: f64,
    pub latitude: f64,
}

impl Point {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }

    /// Par `[lat, lng]` como lo espera el mapa
    pub fn lat_lng(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

/// Estados nulos, desconocidos o de otro tipo quedan en `Unknown`
fn lenient_status<'de, D>(deserializer: D) -> Result<RouteStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|value| serde_json::from_value::<RouteStatus>(value).ok())
        .unwrap_or_default())
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
struct RawPoint {
    #[serde(default)]
    coordinates: Option<Vec<Option<f64>>>,
}

/// Los puntos sin coordenadas válidas se descartan en lugar de fallar
fn lenient_point<'de, D>(deserializer: D) -> Result<Option<Point>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|value| serde_json::from_value::<RawPoint>(value).ok())
        .and_then(point_from_raw))
}

fn lenient_points<'de, D>(deserializer: D) -> Result<Vec<Point>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|value| serde_json::from_value::<RawPoint>(value).ok())
        .filter_map(point_from_raw)
        .collect())
}

fn point_from_raw(raw: RawPoint) -> Option<Point> {
    match raw.coordinates.as_deref() {
        Some([Some(lng), Some(lat), ..]) => Some(Point::new(*lng, *lat)),
        _ => None,
    }
}

/// Route tal como la devuelve `GET /routes`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Route {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(
        rename = "driverId",
        alias = "driver_id",
        default,
        deserialize_with = "lenient_string"
    )]
    pub driver_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: RouteStatus,
    #[serde(default, deserialize_with = "lenient_point")]
    pub origin: Option<Point>,
    #[serde(default, deserialize_with = "lenient_point")]
    pub destination: Option<Point>,
    #[serde(default, deserialize_with = "lenient_points")]
    pub stops: Vec<Point>,
    #[serde(
        rename = "availableSeats",
        alias = "available_seats",
        default,
        deserialize_with = "lenient_count"
    )]
    pub available_seats: u32,
    #[serde(default, deserialize_with = "lenient_decimal_list")]
    pub prices: Vec<Decimal>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub schedule: Option<DateTime<Utc>>,
}

impl Route {
    /// Recorrido `[lat, lng]`: origen, paradas y destino
    pub fn path(&self) -> Vec<[f64; 2]> {
        self.origin
            .iter()
            .chain(self.stops.iter())
            .chain(self.destination.iter())
            .map(Point::lat_lng)
            .collect()
    }
}

/// Nombres legibles de origen y destino (solo vista de mapa)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationNames {
    pub origin: String,
    pub destination: String,
}

/// Ruta enriquecida, derivada en cada consulta
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRoute {
    pub id: String,
    pub driver_id: Option<String>,
    pub declared_status: RouteStatus,
    pub status: RouteStatus,
    pub status_label: &'static str,
    pub status_color: &'static str,
    /// Horario resuelto; decide el estado efectivo
    pub schedule: Option<DateTime<Utc>>,
    /// Horario mostrado y usado por la vista mensual: el resuelto o, si falta,
    /// el declarado por la ruta
    pub display_schedule: Option<DateTime<Utc>>,
    pub origin: Option<Point>,
    pub destination: Option<Point>,
    pub stops: Vec<Point>,
    pub path: Vec<[f64; 2]>,
    pub available_seats: u32,
    pub prices: Vec<Decimal>,
    pub base_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_name: Option<String>,
}

impl EnrichedRoute {
    pub fn new(
        route: Route,
        schedule: Option<DateTime<Utc>>,
        status: RouteStatus,
        names: Option<LocationNames>,
    ) -> Self {
        let path = route.path();
        let (origin_name, destination_name) = match names {
            Some(names) => (Some(names.origin), Some(names.destination)),
            None => (None, None),
        };

        Self {
            id: route.id,
            driver_id: route.driver_id,
            declared_status: route.status,
            status,
            status_label: status.label(),
            status_color: status.color(),
            schedule,
            display_schedule: schedule.or(route.schedule),
            origin: route.origin,
            destination: route.destination,
            stops: route.stops,
            path,
            available_seats: route.available_seats,
            base_price: route.prices.first().copied(),
            prices: route.prices,
            origin_name,
            destination_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_route_deserialization_from_api() {
        let raw = json!({
            "_id": "64f1a2b3c4d5e6f7a8b9c0d1",
            "driverId": "driver-123",
            "status": "in_progress",
            "origin": { "type": "Point", "coordinates": [-100.3161, 20.6595] },
            "destination": { "type": "Point", "coordinates": [-99.6236, 21.5539] },
            "stops": [
                { "type": "Point", "coordinates": [-100.0, 21.0] },
                { "type": "Point", "coordinates": [] }
            ],
            "availableSeats": 4,
            "prices": [120, "80.50", null],
            "schedule": "2024-01-01T08:00:00.000Z"
        });

        let route: Route = serde_json::from_value(raw).unwrap();
        assert_eq!(route.id, "64f1a2b3c4d5e6f7a8b9c0d1");
        assert_eq!(route.driver_id.as_deref(), Some("driver-123"));
        assert_eq!(route.status, RouteStatus::InProgress);
        assert_eq!(route.origin, Some(Point::new(-100.3161, 20.6595)));
        assert_eq!(route.stops.len(), 1);
        assert_eq!(route.available_seats, 4);
        assert_eq!(route.prices, vec![Decimal::from(120), Decimal::new(8050, 2)]);
        assert_eq!(route.schedule, Some(Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()));
    }

    #[test]
    fn test_route_defaults_missing_fields() {
        let route: Route = serde_json::from_value(json!({
            "_id": "r1",
            "status": "archived",
            "origin": null,
            "schedule": "not-a-date"
        }))
        .unwrap();

        assert_eq!(route.status, RouteStatus::Unknown);
        assert!(route.origin.is_none());
        assert!(route.destination.is_none());
        assert!(route.stops.is_empty());
        assert_eq!(route.available_seats, 0);
        assert!(route.prices.is_empty());
        assert!(route.schedule.is_none());
    }

    #[test]
    fn test_wrong_typed_fields_do_not_break_the_list() {
        let routes: Vec<Route> = serde_json::from_value(json!([
            { "_id": "ok", "status": "available", "prices": [100] },
            { "_id": "estado-numerico", "status": 3 },
            { "_id": "estado-objeto", "status": { "code": "available" } },
            { "_id": "precio-suelto", "status": "completed", "prices": 150 },
            { "_id": "paradas-texto", "stops": "ninguna", "origin": [1, 2] }
        ]))
        .unwrap();

        let ids: Vec<&str> = routes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["ok", "estado-numerico", "estado-objeto", "precio-suelto", "paradas-texto"]
        );
        assert_eq!(routes[0].prices, vec![Decimal::from(100)]);
        assert_eq!(routes[1].status, RouteStatus::Unknown);
        assert_eq!(routes[2].status, RouteStatus::Unknown);
        assert_eq!(routes[3].status, RouteStatus::Completed);
        assert!(routes[3].prices.is_empty());
        assert!(routes[4].stops.is_empty());
        assert!(routes[4].origin.is_none());
    }

    #[test]
    fn test_path_order() {
        let route = Route {
            id: "r1".to_string(),
            driver_id: None,
            status: RouteStatus::Available,
            origin: Some(Point::new(1.0, 2.0)),
            destination: Some(Point::new(5.0, 6.0)),
            stops: vec![Point::new(3.0, 4.0)],
            available_seats: 3,
            prices: vec![],
            schedule: None,
        };

        assert_eq!(route.path(), vec![[2.0, 1.0], [4.0, 3.0], [6.0, 5.0]]);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(RouteStatus::Completed.is_terminal());
        assert!(RouteStatus::Cancelled.is_terminal());
        assert!(!RouteStatus::Available.is_terminal());
        assert!(!RouteStatus::InProgress.is_terminal());
        assert!(!RouteStatus::Unknown.is_terminal());
    }
}
