//! `POST /api/classify`: suggest which prompt a change request belongs to.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use tracing::warn;

use crate::error::{ApiError, ErrorCode};
use crate::services::classify::{self, ChangeSuggestion, ClassifyError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClassifyBody {
    pub request: String,
}

pub async fn classify_change(
    State(state): State<AppState>,
    Json(body): Json<ClassifyBody>,
) -> Result<Json<ChangeSuggestion>, ApiError> {
    let result = match state.llm.as_deref() {
        Some(llm) => classify::classify(&state.catalog, llm, &body.request, state.classify_max_tokens).await,
        None => Err(ClassifyError::LlmNotConfigured),
    };
    result.map(Json).map_err(|e| {
        warn!(error = %e, code = e.error_code(), "classify: request failed");
        ApiError::from_err(classify_error_to_status(&e), &e)
    })
}

pub(crate) fn classify_error_to_status(err: &ClassifyError) -> StatusCode {
    match err {
        ClassifyError::LlmNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        ClassifyError::EmptyRequest => StatusCode::BAD_REQUEST,
        ClassifyError::Llm(_) | ClassifyError::MalformedAnswer(_) | ClassifyError::UnknownPrompt(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
