pub mod handlers;
pub mod types;

use crate::{
    Result, config::Config, estimator::Estimator, llm::GenerativeFallback,
    predictor::ModelRegistry, reference,
};
use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span};
use uuid::Uuid;

pub fn router(state: handlers::AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/price-suggestion", post(handlers::price_suggestion))
        .route("/trust-score", post(handlers::trust_score))
        .route("/plant-diagnosis", post(handlers::plant_diagnosis))
        .route("/livestock-diagnosis", post(handlers::livestock_diagnosis))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                info_span!(
                    "request",
                    id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // A corrupt artifact aborts startup here
    let models = ModelRegistry::load(&config.models.dir).await?;
    let reference = reference::from_config(&config.reference)?;
    let generative = GenerativeFallback::new(config.llm.clone());

    let estimator = Estimator::new(Arc::new(models), reference, Arc::new(generative));
    info!(
        "Estimator ready: models={:?}, generative fallback enabled={}",
        estimator.models().status(),
        estimator.generative_enabled()
    );

    let app_state = handlers::AppState {
        estimator: Arc::new(estimator),
    };
    let app = router(app_state, config.server.max_upload_bytes);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
