use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::tts::VOICES;
use crate::infrastructure::config::Config;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready once the provider endpoint and key are known; no upstream call is made
pub async fn health_ready(State(config): State<Arc<Config>>) -> impl IntoResponse {
    if config.azure_speech_key.trim().is_empty() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "tts": "unconfigured",
                "voices": VOICES.len()
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "tts": "configured",
            "voices": VOICES.len()
        })),
    )
}
