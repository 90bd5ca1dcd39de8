use crate::predictor::ModelStatus;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub models: ModelStatus,
    pub generative_fallback: bool,
}
