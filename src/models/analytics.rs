//! Modelos de Analytics
//!
//! Resumen del negocio que alimenta al asistente y los tipos del
//! endpoint remoto `/ai/query`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::reservation::Reservation;

/// Resumen de reservas e ingresos
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BusinessSummary {
    pub total_reservations: usize,
    pub total_revenue: Decimal,
    pub active_routes: usize,
    pub completed_trips: usize,
    pub pending_reservations: usize,
    pub cancelled_reservations: usize,
}

impl BusinessSummary {
    /// Ingresos = suma de precios de reservas completadas (precio inválido = 0)
    pub fn from_reservations(reservations: &[Reservation]) -> Self {
        let completed: Vec<&Reservation> = reservations
            .iter()
            .filter(|r| r.has_status("completed"))
            .collect();

        let total_revenue = completed
            .iter()
            .map(|r| r.price.unwrap_or(Decimal::ZERO))
            .sum();

        let active_routes = reservations
            .iter()
            .map(|r| r.route_id.as_deref())
            .collect::<HashSet<_>>()
            .len();

        Self {
            total_reservations: reservations.len(),
            total_revenue,
            active_routes,
            completed_trips: completed.len(),
            pending_reservations: reservations.iter().filter(|r| r.has_status("pending")).count(),
            cancelled_reservations: reservations
                .iter()
                .filter(|r| r.has_status("cancelled"))
                .count(),
        }
    }

    /// Tarifa promedio por viaje completado
    pub fn average_fare(&self) -> Decimal {
        self.total_revenue / Decimal::from(self.completed_trips.max(1))
    }

    /// Porcentaje de reservas completadas
    pub fn conversion_rate(&self) -> Decimal {
        Decimal::from(self.completed_trips) * Decimal::ONE_HUNDRED
            / Decimal::from(self.total_reservations.max(1))
    }

    /// Contexto que se envía al asistente remoto
    pub fn to_context(&self) -> String {
        format!(
            "Datos reales:\n- Reservas: {}\n- Completadas: {}\n- Ingresos: ${:.2} MXN\n- Rutas activas: {}",
            self.total_reservations, self.completed_trips, self.total_revenue, self.active_routes
        )
    }
}

/// Request a `POST /ai/query`
#[derive(Debug, Clone, Serialize)]
pub struct AiQueryRequest {
    pub message: String,
    pub context: String,
}

/// Respuesta de `POST /ai/query`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiQueryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub fallback: Option<String>,
}

/// Origen de la respuesta del asistente
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantSource {
    Remote,
    RemoteFallback,
    Local,
}

/// Respuesta del asistente hacia el dashboard
#[derive(Debug, Clone, Serialize)]
pub struct AssistantReply {
    pub response: String,
    pub source: AssistantSource,
    pub summary: BusinessSummary,
}
