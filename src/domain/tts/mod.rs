pub mod assembler;
pub mod cancel;
pub mod dto;
pub mod error;
pub mod progress;
pub mod report;
pub mod segmenter;
pub mod service;
pub mod ssml;
pub mod synthesis;
pub mod voice;

pub use assembler::{AssembledAudio, AudioAssembler};
pub use cancel::CancelFlag;
pub use error::{AssemblyError, TtsServiceError};
pub use progress::{PipelineObserver, TracingObserver};
pub use report::{ChunkReport, ChunkStatus, PipelineReport, PipelineState};
pub use segmenter::{segment, TextChunk, DEFAULT_MAX_CHUNK_LENGTH};
pub use service::{PipelineSettings, SynthesisJob, TtsService, TtsServiceApi};
pub use synthesis::{RetryPolicy, SynthesisClient, SynthesisFailure, SynthesisOutcome};
pub use voice::{default_voice, find_voice, SpeechRate, VoiceProfile, VOICES};
