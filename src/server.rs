//! HTTP transport for the rule engine.
//!
//! `POST /upload` takes a multipart form with a `file` part holding the JSON
//! statement and answers with the [`EvaluationReport`]. Errors are rendered
//! as `{"error": message, "status": code}`.

use crate::config::RuleConfig;
use crate::engine::{EvaluationReport, RiskEvaluator};
use crate::error::RiskFlagError;
use crate::ingestion::parse_document;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{debug, error, info};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const FILE_FIELD: &str = "file";

pub struct AppState {
    pub evaluator: RiskEvaluator,
}

impl AppState {
    pub fn new(config: RuleConfig) -> Self {
        Self {
            evaluator: RiskEvaluator::new(config),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file part")]
    NoFilePart,

    #[error("No selected file")]
    NoSelectedFile,

    #[error("Malformed upload: {0}")]
    MalformedUpload(String),

    #[error(transparent)]
    Evaluation(#[from] RiskFlagError),
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::MalformedUpload(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NoFilePart | ApiError::NoSelectedFile | ApiError::MalformedUpload(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Evaluation(e) => match e {
                RiskFlagError::SerializationError(_) | RiskFlagError::InvalidDocument(_) => {
                    StatusCode::BAD_REQUEST
                }
                RiskFlagError::EmptyDocument
                | RiskFlagError::EntryOutOfRange { .. }
                | RiskFlagError::MissingField { .. }
                | RiskFlagError::NonFiniteMetric { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                RiskFlagError::InvalidThreshold { .. } | RiskFlagError::IoError(_) => {
                    error!("Rule engine failure: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        };

        let message = match &self {
            ApiError::Evaluation(RiskFlagError::SerializationError(e)) => {
                format!("Invalid JSON: {}", e)
            }
            ApiError::Evaluation(RiskFlagError::InvalidThreshold { .. })
            | ApiError::Evaluation(RiskFlagError::IoError(_)) => "Internal error".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    // The upload form is posted straight from a browser front-end.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<EvaluationReport>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!("Upload is not a multipart form: {}", rejection.body_text());
        ApiError::NoFilePart
    })?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(ApiError::NoSelectedFile);
        }

        let bytes = field.bytes().await?;
        info!("Received '{}' ({} bytes)", file_name, bytes.len());

        let document = parse_document(&bytes)?;
        let report = state.evaluator.evaluate(&document)?;
        return Ok(Json(report));
    }

    Err(ApiError::NoFilePart)
}
