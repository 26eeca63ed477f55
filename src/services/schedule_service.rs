//! Resolución del horario de pickup de una ruta
//!
//! La reserva manda sobre el horario declarado por la ruta. Cualquier fallo al
//! consultar reservas se trata como "sin reservas": este servicio nunca
//! devuelve error.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::clients::DashboardApi;
use crate::config::SchedulePolicy;
use crate::models::{Reservation, Route};

/// Elegir el horario a partir de las reservas y el horario declarado.
///
/// El horario declarado solo se usa si la ruta no tiene reservas. Una reserva
/// sin pickup deja el horario ausente.
pub fn pick_schedule(
    reservations: &[Reservation],
    declared: Option<DateTime<Utc>>,
    policy: SchedulePolicy,
) -> Option<DateTime<Utc>> {
    if reservations.is_empty() {
        return declared;
    }

    match policy {
        SchedulePolicy::FirstReturned => reservations.first().and_then(|r| r.pickup_at),
        SchedulePolicy::EarliestPickup => reservations.iter().filter_map(|r| r.pickup_at).min(),
    }
}

#[derive(Clone)]
pub struct ScheduleResolver {
    api: Arc<dyn DashboardApi>,
    policy: SchedulePolicy,
}

impl ScheduleResolver {
    pub fn new(api: Arc<dyn DashboardApi>, policy: SchedulePolicy) -> Self {
        Self { api, policy }
    }

    pub async fn resolve(&self, route: &Route) -> Option<DateTime<Utc>> {
        if route.id.is_empty() {
            return route.schedule;
        }

        match self.api.reservations_by_route(&route.id).await {
            Ok(reservations) => pick_schedule(&reservations, route.schedule, self.policy),
            Err(e) => {
                log::warn!("⚠️ Error obteniendo horario de la ruta {}: {}", route.id, e);
                route.schedule
            }
        }
    }
}
