use super::assembler::AssembledAudio;
use super::segmenter::TextChunk;
use super::synthesis::{SynthesisFailure, SynthesisOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Complete,
    PartialFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStatus {
    Succeeded,
    RemoteRejected,
    TransportExhausted,
    Cancelled,
}

/// Per-chunk line of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkReport {
    pub index: usize,
    pub length: usize,
    pub status: ChunkStatus,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ChunkReport {
    pub fn new(chunk: &TextChunk, outcome: &SynthesisOutcome) -> Self {
        let (status, attempts, http_status, message) = match outcome {
            // Success carries no attempt count
            SynthesisOutcome::Success { .. } => (ChunkStatus::Succeeded, 1, None, None),
            SynthesisOutcome::Failure {
                reason,
                attempts_made,
            } => {
                let (status, http_status) = match reason {
                    SynthesisFailure::RemoteRejected { status, .. } => {
                        (ChunkStatus::RemoteRejected, Some(*status))
                    }
                    SynthesisFailure::TransportExhausted { .. } => (ChunkStatus::TransportExhausted, None),
                    SynthesisFailure::Cancelled => (ChunkStatus::Cancelled, None),
                };
                (status, *attempts_made, http_status, Some(reason.to_string()))
            }
        };

        Self {
            index: chunk.index,
            length: chunk.length,
            status,
            attempts,
            http_status,
            message,
        }
    }
}

/// Result of one pipeline run. Immutable once returned.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub state: PipelineState,
    pub total_chunks: usize,
    pub succeeded_count: usize,
    pub character_count: usize,
    #[serde(skip)]
    pub final_audio: Option<AssembledAudio>,
    pub chunks: Vec<ChunkReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assembly_error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PipelineReport {
    pub fn is_complete(&self) -> bool {
        self.state == PipelineState::Complete
    }
}
