use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};

use crate::controllers::assistant_controller::AssistantController;
use crate::dto::assistant_dto::AssistantQueryRequest;
use crate::dto::route_dto::ApiResponse;
use crate::models::AssistantReply;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_assistant_router() -> Router<AppState> {
    Router::new().route("/query", post(query))
}

async fn query(
    State(state): State<AppState>,
    request: Result<Json<AssistantQueryRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AssistantReply>>, AppError> {
    let Json(request) = request?;
    let controller = AssistantController::new(state.assistant.clone());
    let response = controller.query(request).await?;
    Ok(Json(response))
}
