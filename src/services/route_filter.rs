//! Filtros y proyecciones sobre rutas enriquecidas
//!
//! Todo es puro y síncrono: no hay I/O en este módulo.

use serde::{Deserialize, Serialize};

use crate::models::{EnrichedRoute, RouteStatus};
use crate::utils::validation::YearMonth;

fn enabled() -> bool {
    true
}

/// Estados visibles en el mapa (todos activos por defecto)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFilter {
    #[serde(default = "enabled")]
    pub available: bool,
    #[serde(default = "enabled")]
    pub in_progress: bool,
    #[serde(default = "enabled")]
    pub completed: bool,
    #[serde(default = "enabled")]
    pub cancelled: bool,
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self {
            available: true,
            in_progress: true,
            completed: true,
            cancelled: true,
        }
    }
}

impl StatusFilter {
    pub fn allows(&self, status: RouteStatus) -> bool {
        match status {
            RouteStatus::Available => self.available,
            RouteStatus::InProgress => self.in_progress,
            RouteStatus::Completed => self.completed,
            RouteStatus::Cancelled => self.cancelled,
            RouteStatus::Unknown => false,
        }
    }
}

/// Rutas cuyo estado efectivo está habilitado
pub fn apply_status_filter(routes: &[EnrichedRoute], filter: &StatusFilter) -> Vec<EnrichedRoute> {
    routes
        .iter()
        .filter(|route| filter.allows(route.status))
        .cloned()
        .collect()
}

/// Rutas con horario mostrado dentro del mes; las rutas sin horario se descartan
pub fn filter_by_month(routes: &[EnrichedRoute], month: YearMonth) -> Vec<EnrichedRoute> {
    routes
        .iter()
        .filter(|route| {
            route
                .display_schedule
                .map(|s| month.contains(&s))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// Solo las rutas de un conductor
pub fn scope_to_driver(routes: Vec<EnrichedRoute>, driver_id: Option<&str>) -> Vec<EnrichedRoute> {
    match driver_id {
        Some(driver_id) => routes
            .into_iter()
            .filter(|route| route.driver_id.as_deref() == Some(driver_id))
            .collect(),
        None => routes,
    }
}

/// Conteos por estado para las tarjetas de la vista mensual
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthStats {
    pub total: usize,
    pub available: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl MonthStats {
    pub fn from_routes(routes: &[EnrichedRoute]) -> Self {
        let count = |status: RouteStatus| routes.iter().filter(|r| r.status == status).count();

        Self {
            total: routes.len(),
            available: count(RouteStatus::Available),
            in_progress: count(RouteStatus::InProgress),
            completed: count(RouteStatus::Completed),
            cancelled: count(RouteStatus::Cancelled),
        }
    }
}
