use super::types::{ErrorResponse, HealthResponse};
use crate::{
    Error,
    estimator::{
        Diagnosis, DiagnosisQuery, Estimator, LivestockQuery, PriceSuggestion, ProductQuery,
        TrustQuery, TrustScore,
    },
    llm::ImagePayload,
};
use axum::{
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

#[derive(Clone)]
pub struct AppState {
    pub estimator: Arc<Estimator>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn reject(error: Error) -> ApiError {
    let status = if error.is_client_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    warn!("Rejecting request: {}", error);
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

fn validate(query: &impl Validate) -> Result<(), ApiError> {
    query.validate().map_err(|e| reject(e.into()))
}

pub async fn price_suggestion(
    State(state): State<AppState>,
    Json(query): Json<ProductQuery>,
) -> Result<Json<PriceSuggestion>, ApiError> {
    info!("Received price suggestion request for: {}", query.product_name);
    validate(&query)?;

    Ok(Json(state.estimator.estimate_price(&query).await))
}

pub async fn trust_score(
    State(state): State<AppState>,
    Json(query): Json<TrustQuery>,
) -> Result<Json<TrustScore>, ApiError> {
    info!("Received trust score request");
    validate(&query)?;

    Ok(Json(state.estimator.score_trust(&query)))
}

pub async fn plant_diagnosis(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Diagnosis>, ApiError> {
    info!("Received plant diagnosis request");
    let query = read_diagnosis_form(&mut multipart).await.map_err(|e| {
        warn!("Invalid plant diagnosis form: {}", e);
        (
            e.status(),
            Json(ErrorResponse {
                error: format!("Invalid multipart body: {}", e.body_text()),
            }),
        )
    })?;

    Ok(Json(state.estimator.diagnose_plant(&query).await))
}

pub async fn livestock_diagnosis(
    State(state): State<AppState>,
    Json(query): Json<LivestockQuery>,
) -> Result<Json<Diagnosis>, ApiError> {
    info!("Received livestock diagnosis request for: {}", query.animal);
    validate(&query)?;

    Ok(Json(state.estimator.diagnose_livestock(&query).await))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        models: state.estimator.models().status(),
        generative_fallback: state.estimator.generative_enabled(),
    })
}

/// Collects the `image` (or `file`) and `description` fields. Unknown fields
/// are ignored.
async fn read_diagnosis_form(multipart: &mut Multipart) -> Result<DiagnosisQuery, MultipartError> {
    let mut query = DiagnosisQuery::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" | "file" => {
                let mime_type = field
                    .content_type()
                    .filter(|ct| ct.starts_with("image/"))
                    .unwrap_or("image/jpeg")
                    .to_string();
                let bytes = field.bytes().await?;
                debug!("Read {} byte image ({})", bytes.len(), mime_type);
                if !bytes.is_empty() {
                    query.image = Some(ImagePayload::new(bytes.to_vec(), mime_type));
                }
            }
            "description" => {
                query.description = Some(field.text().await?);
            }
            other => debug!("Ignoring multipart field '{}'", other),
        }
    }

    Ok(query)
}
