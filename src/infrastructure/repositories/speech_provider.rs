use async_trait::async_trait;
use std::time::Duration;

/// Raw reply from the provider, whatever its status
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ProviderResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// The request never produced an HTTP response
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Other(String),
}

/// Remote text-to-speech service speaking SSML over HTTP.
///
/// One call is one attempt. Implementations must not retry on their own;
/// the synthesis client owns the retry policy.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Post an SSML document and return the provider's reply
    ///
    /// # Errors
    /// Returns `TransportError` only when no HTTP response was received
    async fn send(&self, ssml: &str) -> Result<ProviderResponse, TransportError>;
}
