use std::sync::Arc;
use validator::Validate;

use crate::dto::assistant_dto::AssistantQueryRequest;
use crate::dto::route_dto::ApiResponse;
use crate::models::AssistantReply;
use crate::services::assistant_service::AssistantService;
use crate::utils::errors::{AppError, AppResult};

pub struct AssistantController {
    service: Arc<AssistantService>,
}

impl AssistantController {
    pub fn new(service: Arc<AssistantService>) -> Self {
        Self { service }
    }

    pub async fn query(
        &self,
        request: AssistantQueryRequest,
    ) -> AppResult<ApiResponse<AssistantReply>> {
        request.validate()?;

        let message = request.message.trim();
        if message.is_empty() {
            return Err(AppError::BadRequest("El mensaje es requerido".to_string()));
        }

        let reply = self.service.answer(message).await;
        tracing::info!("🤖 Respuesta del asistente ({:?})", reply.source);

        Ok(ApiResponse::success(reply))
    }
}
