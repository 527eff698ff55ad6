use axum::{Extension, Json};

use crate::{
    domain::tts::{default_voice, dto::VoiceResponse, VOICES},
    infrastructure::auth::AuthOperator,
};

/// GET /api/voices - Voice catalog, default first
pub async fn list_voices(
    Extension(_operator): Extension<AuthOperator>,
) -> Json<Vec<VoiceResponse>> {
    let default = default_voice();

    Json(
        VOICES
            .iter()
            .map(|v| VoiceResponse {
                display_name: v.display_name.to_string(),
                provider_voice_id: v.provider_voice_id.to_string(),
                default: *v == default,
            })
            .collect(),
    )
}
