use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use narrator_backend::infrastructure::audio::{AudioCodec, AudioSegment, Mp3Codec};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

pub const MOCK_SPEECH_KEY: &str = "test-speech-key";
/// Any chunk containing this word is refused by the mock
pub const REJECT_MARKER: &str = "REJEITAR";
pub const MOCK_SAMPLE_RATE: u32 = 16_000;
/// Length of the clip returned for every accepted chunk
pub const CLIP_MILLIS: u64 = 500;

#[derive(Clone)]
struct MockState {
    clip: Arc<Vec<u8>>,
    requests: Arc<AtomicUsize>,
    bodies: Arc<parking_lot::Mutex<Vec<String>>>,
}

/// In-process stand-in for the Azure Speech REST endpoint
pub struct SpeechProviderMock {
    pub endpoint: String,
    requests: Arc<AtomicUsize>,
    bodies: Arc<parking_lot::Mutex<Vec<String>>>,
}

impl SpeechProviderMock {
    pub async fn start() -> anyhow::Result<Self> {
        let state = MockState {
            clip: Arc::new(sine_clip()?),
            requests: Arc::new(AtomicUsize::new(0)),
            bodies: Arc::new(parking_lot::Mutex::new(Vec::new())),
        };

        let requests = state.requests.clone();
        let bodies = state.bodies.clone();

        let app = Router::new()
            .route("/cognitiveservices/v1", post(synthesize))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self {
            endpoint: format!("http://{}/cognitiveservices/v1", addr),
            requests,
            bodies,
        })
    }

    /// Number of synthesis requests received so far
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// SSML documents received so far, in arrival order
    pub fn received_ssml(&self) -> Vec<String> {
        self.bodies.lock().clone()
    }
}

async fn synthesize(State(state): State<MockState>, headers: HeaderMap, body: Bytes) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let ssml = String::from_utf8_lossy(&body).to_string();
    state.bodies.lock().push(ssml.clone());

    let key = headers
        .get("Ocp-Apim-Subscription-Key")
        .and_then(|v| v.to_str().ok());
    if key != Some(MOCK_SPEECH_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "code": "Unauthorized", "message": "Invalid subscription key" } })),
        )
            .into_response();
    }

    if ssml.contains(REJECT_MARKER) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "code": "InvalidSsml", "message": "SSML rejected by mock" } })),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "audio/mpeg")],
        state.clip.as_ref().clone(),
    )
        .into_response()
}

fn sine_clip() -> anyhow::Result<Vec<u8>> {
    let frames = (MOCK_SAMPLE_RATE as u64 * CLIP_MILLIS / 1000) as usize;
    let samples = (0..frames)
        .map(|i| {
            let t = i as f32 / MOCK_SAMPLE_RATE as f32;
            ((t * 440.0 * std::f32::consts::TAU).sin() * 8_000.0) as i16
        })
        .collect();

    let segment = AudioSegment::new(samples, MOCK_SAMPLE_RATE, 1);
    Ok(Mp3Codec::new().encode(&segment)?)
}
