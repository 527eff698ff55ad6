pub mod azure_speech_provider;
pub mod speech_provider;

pub use azure_speech_provider::{AzureSpeechProvider, ProviderSettings, OUTPUT_FORMAT};
pub use speech_provider::{ProviderResponse, SpeechProvider, TransportError};
