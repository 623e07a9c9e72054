//! Emotion analysis endpoint.

use axum::{Json, Router, extract::State, routing::post};
use sahemind_common::AppResult;
use sahemind_core::{AnalyzeInput, EmotionDistribution};

use crate::{middleware::AppState, response::ApiResponse};

/// Estimate the emotion distribution of free text.
async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeInput>,
) -> AppResult<ApiResponse<EmotionDistribution>> {
    let distribution = state.emotion_service.analyze(&req.text).await?;
    Ok(ApiResponse::ok(distribution))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/analyze", post(analyze))
}
