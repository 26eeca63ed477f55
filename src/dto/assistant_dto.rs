use serde::Deserialize;
use validator::Validate;

// Pregunta al asistente
#[derive(Debug, Deserialize, Validate)]
pub struct AssistantQueryRequest {
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}
