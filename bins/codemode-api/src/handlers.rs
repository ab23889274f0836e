// HTTP route handlers for the judge API

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use codemode_judge::{CatalogError, CheckError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::metrics;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    pub code: String,
    pub language: String,
    pub question_id: String,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub version: String,
    pub languages: Vec<String>,
}

/// Metrics label for every language missing from the mapping table
const UNSUPPORTED_LANGUAGE_LABEL: &str = "unsupported";

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// POST /judge/check - Verify a submission against a question's tests
pub async fn check_answer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CheckRequest>,
) -> Response {
    let start = Instant::now();
    let language = payload.language.trim().to_lowercase();

    let result = state
        .verifier
        .check_answer(&payload.code, &payload.language, &payload.question_id)
        .await;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(CheckError::UnsupportedLanguage(_)) => StatusCode::BAD_REQUEST,
        Err(CheckError::QuestionNotFound(_)) => StatusCode::NOT_FOUND,
        Err(CheckError::Catalog(CatalogError::Backend(_))) => StatusCode::SERVICE_UNAVAILABLE,
        Err(CheckError::Catalog(CatalogError::Decode(_))) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    metrics::record_request("/judge/check", "POST", status.as_u16());

    match result {
        Ok(verification) => {
            for verdict in &verification.verdicts {
                metrics::record_test_outcome(verdict.outcome.as_str());
            }
            let label = if verification.overall_passed { "passed" } else { "failed" };
            metrics::record_check(&language, label, elapsed_ms);

            info!(
                question_id = %payload.question_id,
                language = %language,
                overall_passed = verification.overall_passed,
                "Answer checked"
            );
            (status, Json(verification)).into_response()
        }
        Err(e @ CheckError::Catalog(_)) => {
            error!(question_id = %payload.question_id, error = %e, "Question catalog lookup failed");
            metrics::record_check(&language, "error", elapsed_ms);
            error_response(status, e.to_string())
        }
        Err(e @ CheckError::UnsupportedLanguage(_)) => {
            warn!(question_id = %payload.question_id, error = %e, "Check rejected");
            // caller-supplied names never become label values
            metrics::record_check(UNSUPPORTED_LANGUAGE_LABEL, "rejected", elapsed_ms);
            error_response(status, e.to_string())
        }
        Err(e) => {
            warn!(question_id = %payload.question_id, error = %e, "Check rejected");
            metrics::record_check(&language, "rejected", elapsed_ms);
            error_response(status, e.to_string())
        }
    }
}

/// GET /languages - Languages the executor mapping supports
pub async fn list_languages(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(LanguagesResponse {
        version: state.languages.version().to_string(),
        languages: state.languages.languages().to_vec(),
    })
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics() -> impl IntoResponse {
    (StatusCode::OK, metrics::render_metrics())
}

/// GET /health - Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
