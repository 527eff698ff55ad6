use serde::{Deserialize, Serialize};

/// Request for POST /api/tts/synthesize
#[derive(Debug, Serialize, Deserialize)]
pub struct TtsRequest {
    pub text: String,
    /// Display name or provider id; the default voice when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    /// Speaking rate in percent, -50 to 50
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<i32>,
}

/// Request for POST /api/tts/preview
#[derive(Debug, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub text: String,
}

/// Response for POST /api/tts/preview
#[derive(Debug, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub characters: usize,
    pub chunk_count: usize,
    pub chunks: Vec<ChunkPreview>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkPreview {
    pub index: usize,
    pub length: usize,
}

/// Entry of GET /api/voices
#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceResponse {
    pub display_name: String,
    pub provider_voice_id: String,
    pub default: bool,
}
