use super::progress::PipelineObserver;
use super::segmenter::TextChunk;
use super::ssml::build_ssml;
use super::voice::{SpeechRate, VoiceProfile};
use crate::infrastructure::repositories::{ProviderResponse, SpeechProvider, TransportError};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Retry knobs for transport failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub max_retries: u32,
    /// Fixed pause between attempts
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Duration::from_secs(2),
        }
    }
}

/// Everything needed to synthesize one chunk
#[derive(Debug, Clone)]
pub struct SynthesisRequest<'a> {
    pub chunk: &'a TextChunk,
    pub voice: &'a VoiceProfile,
    pub rate: SpeechRate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisFailure {
    /// The provider answered with a non-200 status
    RemoteRejected { status: u16, message: String },
    /// Every attempt ended without an HTTP response
    TransportExhausted { last_error: TransportError },
    /// The run was aborted before this chunk was dispatched
    Cancelled,
}

impl std::fmt::Display for SynthesisFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RemoteRejected { status, message } => {
                write!(f, "provider rejected the request (HTTP {}): {}", status, message)
            }
            Self::TransportExhausted { last_error } => {
                write!(f, "could not reach the provider: {}", last_error)
            }
            Self::Cancelled => write!(f, "cancelled before dispatch"),
        }
    }
}

/// Final result of synthesizing one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisOutcome {
    Success { audio: Vec<u8> },
    Failure {
        reason: SynthesisFailure,
        attempts_made: u32,
    },
}

impl SynthesisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// What to do after one provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptDisposition {
    Done,
    Retry,
    Stop,
}

/// Transport errors are transient; any HTTP answer, good or bad, is final
pub fn classify(result: &Result<ProviderResponse, TransportError>) -> AttemptDisposition {
    match result {
        Ok(response) if response.is_success() => AttemptDisposition::Done,
        Ok(_) => AttemptDisposition::Stop,
        Err(_) => AttemptDisposition::Retry,
    }
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

/// Pull `error.message` out of a JSON error body, falling back to the raw text
pub fn extract_error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ProviderErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => String::from_utf8_lossy(body).trim().to_string(),
    }
}

/// Turns chunks into audio through a speech provider
pub struct SynthesisClient {
    provider: Arc<dyn SpeechProvider>,
    retry: RetryPolicy,
}

impl SynthesisClient {
    pub fn new(provider: Arc<dyn SpeechProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    /// Synthesize one chunk, retrying transport failures only
    pub async fn synthesize(
        &self,
        request: &SynthesisRequest<'_>,
        observer: &dyn PipelineObserver,
    ) -> SynthesisOutcome {
        let chunk_index = request.chunk.index;
        let ssml = build_ssml(&request.chunk.content, request.voice, request.rate);
        let max_attempts = self.retry.max_attempts();

        tracing::debug!(
            chunk_index = chunk_index,
            voice = request.voice.provider_voice_id,
            rate = %request.rate,
            text_length = request.chunk.length,
            "Synthesizing chunk"
        );

        let mut attempt = 0;
        loop {
            attempt += 1;
            observer.on_attempt(chunk_index, attempt, max_attempts);

            let result = self.provider.send(&ssml).await;
            let retry = classify(&result) == AttemptDisposition::Retry && attempt < max_attempts;

            match result {
                Ok(response) if response.is_success() => {
                    return SynthesisOutcome::Success {
                        audio: response.body,
                    };
                }
                Ok(response) => {
                    let message = extract_error_message(&response.body);
                    tracing::error!(
                        chunk_index = chunk_index,
                        status = response.status,
                        message = %message,
                        "Provider rejected chunk"
                    );
                    return SynthesisOutcome::Failure {
                        reason: SynthesisFailure::RemoteRejected {
                            status: response.status,
                            message,
                        },
                        attempts_made: attempt,
                    };
                }
                Err(error) if retry => {
                    tracing::warn!(
                        chunk_index = chunk_index,
                        attempt = attempt,
                        max_attempts = max_attempts,
                        error = %error,
                        "Connection error, retrying"
                    );
                    tokio::time::sleep(self.retry.backoff).await;
                }
                Err(error) => {
                    tracing::error!(
                        chunk_index = chunk_index,
                        attempts = attempt,
                        error = %error,
                        "Could not reach the provider"
                    );
                    return SynthesisOutcome::Failure {
                        reason: SynthesisFailure::TransportExhausted { last_error: error },
                        attempts_made: attempt,
                    };
                }
            }
        }
    }
}
