use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::EnrichedRoute;
use crate::services::route_filter::{MonthStats, StatusFilter};
use crate::utils::validation::MONTH_REGEX;

fn enabled() -> bool {
    true
}

// Query de la vista de mapa: un booleano por estado y conductor opcional
#[derive(Debug, Deserialize)]
pub struct MapQuery {
    #[serde(default = "enabled")]
    pub available: bool,
    #[serde(default = "enabled")]
    pub in_progress: bool,
    #[serde(default = "enabled")]
    pub completed: bool,
    #[serde(default = "enabled")]
    pub cancelled: bool,
    pub driver_id: Option<String>,
}

impl MapQuery {
    pub fn status_filter(&self) -> StatusFilter {
        StatusFilter {
            available: self.available,
            in_progress: self.in_progress,
            completed: self.completed,
            cancelled: self.cancelled,
        }
    }
}

// Query de la vista mensual
#[derive(Debug, Deserialize, Validate)]
pub struct MonthQuery {
    #[validate(regex = "MONTH_REGEX")]
    pub month: Option<String>,
    pub driver_id: Option<String>,
}

// Response de la vista de mapa
#[derive(Debug, Serialize)]
pub struct MapViewResponse {
    pub generated_at: DateTime<Utc>,
    pub filters: StatusFilter,
    pub total_routes: usize,
    pub routes: Vec<EnrichedRoute>,
}

// Response de la vista mensual
#[derive(Debug, Serialize)]
pub struct MonthViewResponse {
    pub generated_at: DateTime<Utc>,
    pub month: String,
    pub stats: MonthStats,
    pub routes: Vec<EnrichedRoute>,
}

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_query_validation() {
        let valid = MonthQuery {
            month: Some("2024-01".to_string()),
            driver_id: None,
        };
        assert!(valid.validate().is_ok());

        let missing = MonthQuery {
            month: None,
            driver_id: None,
        };
        assert!(missing.validate().is_ok());

        let invalid = MonthQuery {
            month: Some("01/2024".to_string()),
            driver_id: None,
        };
        assert!(invalid.validate().is_err());
    }
}
