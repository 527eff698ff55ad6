use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::sync::Arc;
use tracing::Instrument;

use crate::{
    domain::tts::{
        default_voice,
        dto::{ChunkPreview, PreviewRequest, PreviewResponse, TtsRequest},
        find_voice, AssembledAudio, CancelFlag, PipelineReport, SpeechRate, SynthesisJob,
        TracingObserver, TtsService, TtsServiceApi, VoiceProfile,
    },
    error::{AppError, AppResult},
    infrastructure::auth::AuthOperator,
};

/// Base name of the downloadable file
pub const OUTPUT_FILE_STEM: &str = "audio_completo";

pub struct TtsController {
    tts_service: Arc<TtsService>,
    max_text_length: usize,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>, max_text_length: usize) -> Self {
        Self {
            tts_service,
            max_text_length,
        }
    }

    /// POST /api/tts/synthesize - Convert text to one audio file
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        Extension(_operator): Extension<AuthOperator>,
        Json(request): Json<TtsRequest>,
    ) -> AppResult<Response> {
        // Validate input
        controller.guard_text(&request.text)?;
        let voice = resolve_voice(request.voice.as_deref())?;
        let rate = SpeechRate::new(request.rate.unwrap_or(0)).map_err(AppError::from)?;

        let job = SynthesisJob {
            text: request.text,
            voice,
            rate,
        };

        // The run lives in its own task: if the client goes away this handler
        // is dropped, the guard raises the flag and no further chunks start
        let cancel = CancelFlag::new();
        let _guard = cancel.drop_guard();
        let service = controller.tts_service.clone();
        let task_cancel = cancel.clone();
        let handle = tokio::spawn(
            async move {
                let observer = TracingObserver;
                service.synthesize(job, &observer, &task_cancel).await
            }
            .instrument(tracing::Span::current()),
        );

        let report = handle
            .await
            .map_err(|e| AppError::Internal(format!("synthesis task failed: {}", e)))?
            .map_err(AppError::from)?;

        Ok(controller.render_report(report))
    }

    /// POST /api/tts/preview - Show how the text would be split
    pub async fn preview(
        State(controller): State<Arc<TtsController>>,
        Extension(_operator): Extension<AuthOperator>,
        Json(request): Json<PreviewRequest>,
    ) -> AppResult<Json<PreviewResponse>> {
        controller.guard_text(&request.text)?;

        let chunks = controller
            .tts_service
            .preview(&request.text)
            .map_err(AppError::from)?;

        Ok(Json(PreviewResponse {
            characters: request.text.trim().chars().count(),
            chunk_count: chunks.len(),
            chunks: chunks
                .iter()
                .map(|c| ChunkPreview {
                    index: c.index,
                    length: c.length,
                })
                .collect(),
        }))
    }

    fn guard_text(&self, text: &str) -> AppResult<()> {
        if text.trim().is_empty() {
            return Err(AppError::BadRequest("Text cannot be empty".to_string()));
        }

        if text.chars().count() > self.max_text_length {
            return Err(AppError::PayloadTooLarge(format!(
                "Text must be {} characters or less",
                self.max_text_length
            )));
        }

        Ok(())
    }

    fn render_report(&self, report: PipelineReport) -> Response {
        match report.final_audio.as_ref() {
            Some(audio) if report.is_complete() => {
                let (extension, mime_type) = self.tts_service.output_format();
                let headers = audio_headers(&report, audio, extension, mime_type);

                (StatusCode::OK, headers, Body::from(audio.bytes.clone())).into_response()
            }
            // Partial failure: the per-chunk report is the body, there is no audio
            _ => (StatusCode::BAD_GATEWAY, Json(report)).into_response(),
        }
    }
}

fn audio_headers(
    report: &PipelineReport,
    audio: &AssembledAudio,
    extension: &str,
    mime_type: &'static str,
) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(mime_type));
    headers.insert("x-chunk-count", HeaderValue::from(report.total_chunks));
    headers.insert("x-chunks-succeeded", HeaderValue::from(report.succeeded_count));
    headers.insert("x-character-count", HeaderValue::from(report.character_count));
    insert_text_header(
        &mut headers,
        header::CONTENT_DISPOSITION.as_str(),
        format!("attachment; filename=\"{}.{}\"", OUTPUT_FILE_STEM, extension),
    );
    insert_text_header(
        &mut headers,
        "x-duration-seconds",
        format!("{:.2}", audio.duration.as_secs_f64()),
    );
    headers
}

fn insert_text_header(headers: &mut HeaderMap, name: &'static str, value: String) {
    match HeaderValue::from_str(&value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(e) => tracing::warn!(header = name, value = %value, error = %e, "Dropping invalid header"),
    }
}

/// Absent means the default voice; anything not in the catalog is an error
fn resolve_voice(requested: Option<&str>) -> AppResult<VoiceProfile> {
    match requested.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default_voice()),
        Some(name) => find_voice(name)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown voice: {}", name))),
    }
}
