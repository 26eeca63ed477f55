use chrono::Utc;
use validator::Validate;

use crate::dto::route_dto::{ApiResponse, MapQuery, MapViewResponse, MonthQuery, MonthViewResponse};
use crate::models::auth::CurrentUser;
use crate::services::route_enrichment_service::{EnrichmentOptions, RouteEnrichmentService};
use crate::services::route_filter::{apply_status_filter, filter_by_month, scope_to_driver, MonthStats};
use crate::state::ShutdownSignal;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{validate_month, YearMonth};

pub struct RouteController {
    enrichment: RouteEnrichmentService,
    shutdown: ShutdownSignal,
}

impl RouteController {
    pub fn new(enrichment: RouteEnrichmentService, shutdown: ShutdownSignal) -> Self {
        Self {
            enrichment,
            shutdown,
        }
    }

    /// Vista de mapa: estado efectivo + nombres de lugar, filtrado por estado
    pub async fn map_view(
        &self,
        user: &CurrentUser,
        query: MapQuery,
    ) -> AppResult<ApiResponse<MapViewResponse>> {
        let filters = query.status_filter();
        let enriched = self
            .enrichment
            .enrich_all(EnrichmentOptions::map_view(), self.shutdown.subscribe())
            .await?;

        let scoped = scope_to_driver(enriched, user.effective_driver_id(query.driver_id.as_deref()));
        let routes = apply_status_filter(&scoped, &filters);

        tracing::info!(
            "🗺️ Mapa: {} de {} rutas visibles",
            routes.len(),
            scoped.len()
        );

        let message = format!("{} rutas visibles", routes.len());
        Ok(ApiResponse::success_with_message(
            MapViewResponse {
                generated_at: Utc::now(),
                filters,
                total_routes: scoped.len(),
                routes,
            },
            message,
        ))
    }

    /// Vista mensual: estado efectivo por horario resuelto, sin geocodificar
    pub async fn month_view(
        &self,
        user: &CurrentUser,
        query: MonthQuery,
    ) -> AppResult<ApiResponse<MonthViewResponse>> {
        query.validate()?;

        let month = match query.month.as_deref() {
            Some(raw) => validate_month(raw).map_err(|e| {
                AppError::BadRequest(format!("Mes inválido '{}': {}", raw, e))
            })?,
            None => YearMonth::of(&Utc::now()),
        };

        let enriched = self
            .enrichment
            .enrich_all(EnrichmentOptions::schedule_only(), self.shutdown.subscribe())
            .await?;

        let scoped = scope_to_driver(enriched, user.effective_driver_id(query.driver_id.as_deref()));
        let routes = filter_by_month(&scoped, month);
        let stats = MonthStats::from_routes(&routes);

        tracing::info!("📅 Rutas de {}: {}", month, stats.total);

        Ok(ApiResponse::success(MonthViewResponse {
            generated_at: Utc::now(),
            month: month.to_string(),
            stats,
            routes,
        }))
    }
}
