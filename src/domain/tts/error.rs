use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::Invalid(msg) => AppError::BadRequest(msg),
            TtsServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}

/// Why the assembler refused to produce a final file
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    #[error("chunks {failed:?} have no audio, refusing to concatenate a subset")]
    IncompleteOutcomes { failed: Vec<usize> },

    #[error("audio of chunk {chunk_index} could not be decoded: {reason}")]
    DecodeFailed { chunk_index: usize, reason: String },

    #[error("audio of chunk {chunk_index} is {found}, expected {expected}")]
    FormatMismatch {
        chunk_index: usize,
        expected: String,
        found: String,
    },

    #[error("final audio could not be encoded: {reason}")]
    EncodeFailed { reason: String },
}
