use super::error::AssemblyError;
use super::synthesis::SynthesisOutcome;
use crate::infrastructure::audio::{AudioCodec, AudioSegment};
use std::sync::Arc;
use std::time::Duration;

/// The single file produced from every chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledAudio {
    pub bytes: Vec<u8>,
    pub duration: Duration,
}

/// Decodes per-chunk audio, joins it in chunk order and re-encodes one file
pub struct AudioAssembler {
    codec: Arc<dyn AudioCodec>,
}

impl AudioAssembler {
    pub fn new(codec: Arc<dyn AudioCodec>) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &dyn AudioCodec {
        self.codec.as_ref()
    }

    /// Assemble outcomes already ordered by chunk index
    ///
    /// Nothing is decoded unless every outcome is a success; a subset is never
    /// joined.
    pub fn assemble(&self, outcomes: &[SynthesisOutcome]) -> Result<AssembledAudio, AssemblyError> {
        let failed: Vec<usize> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, outcome)| !outcome.is_success())
            .map(|(index, _)| index)
            .collect();
        if !failed.is_empty() {
            return Err(AssemblyError::IncompleteOutcomes { failed });
        }

        let mut combined: Option<AudioSegment> = None;
        let mut duration = Duration::ZERO;

        for (chunk_index, outcome) in outcomes.iter().enumerate() {
            let SynthesisOutcome::Success { audio } = outcome else {
                continue;
            };

            let segment = self
                .codec
                .decode(audio)
                .map_err(|e| AssemblyError::DecodeFailed {
                    chunk_index,
                    reason: e.to_string(),
                })?;

            tracing::debug!(
                chunk_index = chunk_index,
                samples = segment.samples.len(),
                duration_ms = segment.duration().as_millis(),
                "Chunk audio decoded"
            );

            duration += segment.duration();

            if let Some(acc) = combined.as_mut() {
                if !acc.same_format(&segment) {
                    return Err(AssemblyError::FormatMismatch {
                        chunk_index,
                        expected: acc.format_label(),
                        found: segment.format_label(),
                    });
                }
                acc.append(segment);
            } else {
                combined = Some(segment);
            }
        }

        let combined = combined.ok_or_else(|| AssemblyError::EncodeFailed {
            reason: "there is no audio to encode".to_string(),
        })?;

        let bytes = self
            .codec
            .encode(&combined)
            .map_err(|e| AssemblyError::EncodeFailed {
                reason: e.to_string(),
            })?;

        tracing::info!(
            chunk_count = outcomes.len(),
            audio_size_bytes = bytes.len(),
            duration_secs = duration.as_secs_f64(),
            "Audio assembled"
        );

        Ok(AssembledAudio { bytes, duration })
    }
}
