use chrono::{DateTime, Utc};

use crate::models::RouteStatus;

/// Estado efectivo de una ruta.
///
/// Completadas y canceladas no cambian. Cualquier otra ruta cuyo pickup ya
/// pasó se muestra como cancelada. `now` se lee una sola vez por lote.
pub fn derive_effective_status(
    declared: RouteStatus,
    schedule: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> RouteStatus {
    if declared.is_terminal() {
        return declared;
    }

    match schedule {
        Some(pickup) if pickup < now => RouteStatus::Cancelled,
        _ => declared,
    }
}
