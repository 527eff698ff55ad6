use super::assembler::AudioAssembler;
use super::cancel::CancelFlag;
use super::error::TtsServiceError;
use super::progress::PipelineObserver;
use super::report::{ChunkReport, PipelineReport, PipelineState};
use super::segmenter::{segment, TextChunk, DEFAULT_MAX_CHUNK_LENGTH};
use super::synthesis::{RetryPolicy, SynthesisClient, SynthesisFailure, SynthesisOutcome, SynthesisRequest};
use super::voice::{SpeechRate, VoiceProfile};
use crate::infrastructure::audio::AudioCodec;
use crate::infrastructure::repositories::SpeechProvider;
use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use std::sync::Arc;

/// Per-run limits, fixed at startup
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub max_chunk_length: usize,
    /// How many chunks may be at the provider at once. 1 keeps it sequential.
    pub concurrency: usize,
    pub retry: RetryPolicy,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_chunk_length: DEFAULT_MAX_CHUNK_LENGTH,
            concurrency: 4,
            retry: RetryPolicy::default(),
        }
    }
}

/// One submitted text with its voice settings
#[derive(Debug, Clone)]
pub struct SynthesisJob {
    pub text: String,
    pub voice: VoiceProfile,
    pub rate: SpeechRate,
}

pub struct TtsService {
    synthesis: SynthesisClient,
    assembler: Arc<AudioAssembler>,
    settings: PipelineSettings,
}

impl TtsService {
    pub fn new(
        provider: Arc<dyn SpeechProvider>,
        codec: Arc<dyn AudioCodec>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            synthesis: SynthesisClient::new(provider, settings.retry),
            assembler: Arc::new(AudioAssembler::new(codec)),
            settings,
        }
    }

    /// Extension and MIME type of the files this service produces
    pub fn output_format(&self) -> (&'static str, &'static str) {
        let codec = self.assembler.codec();
        (codec.extension(), codec.mime_type())
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Show how a text would be split, without calling the provider
    fn preview(&self, text: &str) -> Result<Vec<TextChunk>, TtsServiceError>;

    /// Run the whole pipeline over one text
    ///
    /// This operation:
    /// - Rejects blank text before any network activity
    /// - Splits the text and synthesizes every chunk, even after failures
    /// - Assembles one audio file only when every chunk succeeded
    ///
    /// Chunk and assembly failures end up in the report, not in the error.
    async fn synthesize(
        &self,
        job: SynthesisJob,
        observer: &dyn PipelineObserver,
        cancel: &CancelFlag,
    ) -> Result<PipelineReport, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    fn preview(&self, text: &str) -> Result<Vec<TextChunk>, TtsServiceError> {
        segment(text, self.settings.max_chunk_length)
    }

    async fn synthesize(
        &self,
        job: SynthesisJob,
        observer: &dyn PipelineObserver,
        cancel: &CancelFlag,
    ) -> Result<PipelineReport, TtsServiceError> {
        let started_at = Utc::now();
        let start_time = std::time::Instant::now();

        // 1. Segment (blank text is rejected here)
        let chunks = segment(&job.text, self.settings.max_chunk_length)?;
        let character_count = job.text.trim().chars().count();

        tracing::info!(
            chunk_count = chunks.len(),
            character_count = character_count,
            voice = job.voice.provider_voice_id,
            rate = %job.rate,
            "Text split into chunks"
        );

        // 2. Synthesize every chunk, outcomes stored by index
        let outcomes = self.synthesize_chunks(&chunks, &job, observer, cancel).await;
        let succeeded_count = outcomes.iter().filter(|o| o.is_success()).count();

        // 3. Assemble only when nothing failed
        let (final_audio, assembly_error, outcomes) = if succeeded_count == chunks.len() {
            let assembler = self.assembler.clone();
            let (outcomes, result) = tokio::task::spawn_blocking(move || {
                let result = assembler.assemble(&outcomes);
                (outcomes, result)
            })
            .await
            .map_err(|e| TtsServiceError::Other(anyhow::anyhow!("assembly task failed: {}", e)))?;

            match result {
                Ok(audio) => (Some(audio), None, outcomes),
                Err(e) => {
                    tracing::error!(error = %e, "Audio assembly failed");
                    (None, Some(e.to_string()), outcomes)
                }
            }
        } else {
            tracing::warn!(
                succeeded = succeeded_count,
                total = chunks.len(),
                "Not every chunk was synthesized, skipping concatenation"
            );
            (None, None, outcomes)
        };

        let state = if final_audio.is_some() {
            PipelineState::Complete
        } else {
            PipelineState::PartialFailure
        };

        let report = PipelineReport {
            state,
            total_chunks: chunks.len(),
            succeeded_count,
            character_count,
            final_audio,
            chunks: chunks
                .iter()
                .zip(outcomes.iter())
                .map(|(chunk, outcome)| ChunkReport::new(chunk, outcome))
                .collect(),
            assembly_error,
            started_at,
            finished_at: Utc::now(),
        };

        let duration = start_time.elapsed();
        tracing::info!(
            state = ?report.state,
            total_chunks = report.total_chunks,
            succeeded_count = report.succeeded_count,
            audio_size_bytes = report.final_audio.as_ref().map(|a| a.bytes.len()).unwrap_or(0),
            latency_ms = duration.as_millis(),
            "TTS pipeline finished"
        );

        Ok(report)
    }
}

impl TtsService {
    async fn synthesize_chunks(
        &self,
        chunks: &[TextChunk],
        job: &SynthesisJob,
        observer: &dyn PipelineObserver,
        cancel: &CancelFlag,
    ) -> Vec<SynthesisOutcome> {
        let total = chunks.len();
        let voice = &job.voice;
        let rate = job.rate;
        let mut outcomes: Vec<Option<SynthesisOutcome>> = vec![None; total];

        // Futures are lazy: buffer_unordered only polls one when a slot frees
        // up, so the cancel check in `run_chunk` happens at dispatch time
        let pending: Vec<_> = chunks
            .iter()
            .map(|chunk| self.run_chunk(chunk, total, voice, rate, observer, cancel))
            .collect();
        let mut in_flight =
            futures::stream::iter(pending).buffer_unordered(self.settings.concurrency.max(1));

        while let Some((index, outcome)) = in_flight.next().await {
            observer.on_chunk_result(index, &outcome);
            outcomes[index] = Some(outcome);
        }

        outcomes
            .into_iter()
            .map(|outcome| outcome.unwrap_or_else(cancelled))
            .collect()
    }

    async fn run_chunk(
        &self,
        chunk: &TextChunk,
        total: usize,
        voice: &VoiceProfile,
        rate: SpeechRate,
        observer: &dyn PipelineObserver,
        cancel: &CancelFlag,
    ) -> (usize, SynthesisOutcome) {
        if cancel.is_cancelled() {
            return (chunk.index, cancelled());
        }
        observer.on_progress(chunk.index, total);
        let request = SynthesisRequest { chunk, voice, rate };
        let outcome = self.synthesis.synthesize(&request, observer).await;
        (chunk.index, outcome)
    }
}

fn cancelled() -> SynthesisOutcome {
    SynthesisOutcome::Failure {
        reason: SynthesisFailure::Cancelled,
        attempts_made: 0,
    }
}
