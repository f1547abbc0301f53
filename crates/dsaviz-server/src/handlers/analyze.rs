//! Analysis handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use dsaviz_core::{AnalysisRequest, AnalysisResult};

use crate::error::ApiError;
use crate::state::AppState;

/// Produces a normalized trace for the submitted code and input.
///
/// `POST /analyze` (also served at `POST /api/analyze-algorithm`)
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let result = state.pipeline.analyze(&request).await?;
    Ok(Json(result))
}
