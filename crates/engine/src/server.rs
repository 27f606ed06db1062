//! HTTP surface of `reco-service`
//!
//! Tables are re-read on every request, then the selected strategy runs on
//! actix's blocking pool under the configured time budget.

use crate::recommendation::{RecommendationEngine, Strategy};
use crate::storage::TableSource;
use crate::types::{RecommendOutcome, UserId};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use article_reco_core::RecoError;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const USAGE: &str = "Invalid request.\nThe JSON body must contain:\n- id (int)\n- type (ra, cb, cf, hy or cv)\n- n (optional positive int)";

/// Application state shared across all handlers
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    pub source: TableSource,
    pub request_timeout: Duration,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

/// Request failures and their HTTP mapping
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Error loading recommendation data")]
    DataLoad(#[source] RecoError),

    #[error("Recommendation failed: {0}")]
    Engine(#[source] RecoError),

    #[error("Recommendation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Worker pool unavailable")]
    Blocking,
}

impl From<RecoError> for ServiceError {
    fn from(err: RecoError) -> Self {
        match err {
            RecoError::DataLoad(_) => ServiceError::DataLoad(err),
            e if e.is_client_error() => ServiceError::BadRequest(e.to_string()),
            e => ServiceError::Engine(e),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ServiceError::DataLoad(_) | ServiceError::Engine(_) | ServiceError::Blocking => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}

/// Validated `POST /api/recommend` body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendRequest {
    pub user_id: UserId,
    pub strategy: Strategy,
    pub n: Option<usize>,
}

impl RecommendRequest {
    /// `id` must be a JSON integer and `type` a string; `n`, when present, a
    /// positive integer
    pub fn parse(body: &[u8]) -> Result<Self, ServiceError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|_| ServiceError::BadRequest(USAGE.to_string()))?;

        let user_id = value
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| ServiceError::BadRequest(USAGE.to_string()))?;
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ServiceError::BadRequest(USAGE.to_string()))?;
        let strategy: Strategy = tag.parse()?;

        let n = match value.get("n") {
            None | Some(Value::Null) => None,
            Some(raw) => match raw.as_u64() {
                Some(n) if n > 0 => Some(n as usize),
                _ => return Err(ServiceError::BadRequest(USAGE.to_string())),
            },
        };

        Ok(Self {
            user_id,
            strategy,
            n,
        })
    }
}

/// Health check endpoint
async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "reco-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Recommendation endpoint
async fn recommend(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ServiceError> {
    let request = RecommendRequest::parse(&body).map_err(|e| {
        warn!(error = %e, "Rejected recommendation request");
        e
    })?;

    let engine = Arc::clone(&state.engine);
    let source = state.source.clone();
    let n = request.n.unwrap_or(engine.config().default_n);

    let task = web::block(move || -> Result<RecommendOutcome, ServiceError> {
        let (embeddings, interactions) = source.load()?;
        engine
            .recommend(
                &embeddings,
                &interactions,
                request.user_id,
                request.strategy,
                n,
            )
            .map_err(ServiceError::Engine)
    });

    let outcome = match tokio::time::timeout(state.request_timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(ServiceError::Blocking),
        Err(_) => Err(ServiceError::Timeout(state.request_timeout)),
    }
    .map_err(|e| {
        error!(
            user_id = request.user_id,
            strategy = %request.strategy,
            error = %e,
            "Recommendation request failed"
        );
        e
    })?;

    info!(
        user_id = request.user_id,
        strategy = %request.strategy,
        n,
        "Recommendation request served"
    );

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(outcome.to_string()))
}

/// Configure application routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .service(web::scope("/api").route("/recommend", web::post().to(recommend)));
}
