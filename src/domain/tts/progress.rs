use super::synthesis::SynthesisOutcome;

/// Receives pipeline progress as it happens. Implementations must not block;
/// nothing they do feeds back into synthesis.
pub trait PipelineObserver: Send + Sync {
    /// A chunk is about to be dispatched
    fn on_progress(&self, chunk_index: usize, total: usize);

    /// A provider call is about to be made for a chunk (1-based attempt)
    fn on_attempt(&self, chunk_index: usize, attempt: u32, max_attempts: u32) {
        let _ = (chunk_index, attempt, max_attempts);
    }

    /// A chunk reached its final outcome
    fn on_chunk_result(&self, chunk_index: usize, outcome: &SynthesisOutcome);
}

/// Production observer: progress goes to the structured log
#[derive(Debug, Default, Clone)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_progress(&self, chunk_index: usize, total: usize) {
        tracing::info!(
            chunk = chunk_index + 1,
            total = total,
            "Processing chunk {} of {}",
            chunk_index + 1,
            total
        );
    }

    fn on_attempt(&self, chunk_index: usize, attempt: u32, max_attempts: u32) {
        if attempt > 1 {
            tracing::warn!(
                chunk_index = chunk_index,
                attempt = attempt,
                max_attempts = max_attempts,
                "Retrying chunk after connection error"
            );
        }
    }

    fn on_chunk_result(&self, chunk_index: usize, outcome: &SynthesisOutcome) {
        match outcome {
            SynthesisOutcome::Success { audio } => tracing::info!(
                chunk_index = chunk_index,
                audio_size_bytes = audio.len(),
                "Chunk synthesized"
            ),
            SynthesisOutcome::Failure {
                reason,
                attempts_made,
            } => tracing::error!(
                chunk_index = chunk_index,
                attempts = attempts_made,
                reason = %reason,
                "Chunk synthesis failed"
            ),
        }
    }
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {
    fn on_progress(&self, _chunk_index: usize, _total: usize) {}

    fn on_chunk_result(&self, _chunk_index: usize, _outcome: &SynthesisOutcome) {}
}
