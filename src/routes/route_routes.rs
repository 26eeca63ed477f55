use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::route_controller::RouteController;
use crate::dto::route_dto::{ApiResponse, MapQuery, MapViewResponse, MonthQuery, MonthViewResponse};
use crate::models::auth::CurrentUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/map", get(map_view))
        .route("/by-month", get(month_view))
}

async fn map_view(
    State(state): State<AppState>,
    user: CurrentUser,
    query: Result<Query<MapQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<MapViewResponse>>, AppError> {
    let Query(query) = query?;
    let controller = RouteController::new(state.enrichment.clone(), state.shutdown.clone());
    let response = controller.map_view(&user, query).await?;
    Ok(Json(response))
}

async fn month_view(
    State(state): State<AppState>,
    user: CurrentUser,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<MonthViewResponse>>, AppError> {
    let Query(query) = query?;
    let controller = RouteController::new(state.enrichment.clone(), state.shutdown.clone());
    let response = controller.month_view(&user, query).await?;
    Ok(Json(response))
}
