//! Modelo de Reservation
//!
//! Vista parcial de una reserva: solo lo que usan el resolvedor de horarios
//! y el resumen del asistente.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::utils::validation::{lenient_decimal, lenient_string, lenient_timestamp};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reservation {
    #[serde(default, alias = "routeId", deserialize_with = "lenient_string")]
    pub route_id: Option<String>,
    #[serde(default, alias = "pickupAt", deserialize_with = "lenient_timestamp")]
    pub pickup_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
}

impl Reservation {
    /// Compara el estado sin distinguir mayúsculas
    pub fn has_status(&self, status: &str) -> bool {
        self.status
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case(status))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_reservation_deserialization() {
        let reservation: Reservation = serde_json::from_value(json!({
            "route_id": "r1",
            "pickup_at": "2024-02-10T14:30:00Z",
            "status": "COMPLETED",
            "price": "85.00"
        }))
        .unwrap();

        assert_eq!(reservation.route_id.as_deref(), Some("r1"));
        assert_eq!(
            reservation.pickup_at,
            Some(Utc.with_ymd_and_hms(2024, 2, 10, 14, 30, 0).unwrap())
        );
        assert!(reservation.has_status("completed"));
        assert_eq!(reservation.price, Some(Decimal::new(8500, 2)));
    }

    #[test]
    fn test_reservation_tolerates_garbage() {
        let reservation: Reservation = serde_json::from_value(json!({
            "pickup_at": null,
            "price": "n/a",
            "status": null
        }))
        .unwrap();

        assert!(reservation.pickup_at.is_none());
        assert!(reservation.price.is_none());
        assert!(!reservation.has_status("pending"));
    }
}
