use super::speech_provider::{ProviderResponse, SpeechProvider, TransportError};
use crate::infrastructure::config::Config;
use async_trait::async_trait;
use std::time::Duration;

pub const OUTPUT_FORMAT: &str = "audio-16khz-128kbitrate-mono-mp3";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";

/// Immutable provider settings, fixed at startup
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub endpoint: String,
    pub subscription_key: String,
    pub timeout: Duration,
}

impl ProviderSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            endpoint: config.tts_endpoint(),
            subscription_key: config.azure_speech_key.clone(),
            timeout: config.synthesis_timeout,
        }
    }
}

/// Azure Cognitive Services Speech implementation of the provider
pub struct AzureSpeechProvider {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl AzureSpeechProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent("narrator-backend")
            .build()?;

        Ok(Self { client, settings })
    }

    pub fn endpoint(&self) -> &str {
        &self.settings.endpoint
    }

    fn classify_error(&self, err: &reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.settings.timeout)
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

#[async_trait]
impl SpeechProvider for AzureSpeechProvider {
    async fn send(&self, ssml: &str) -> Result<ProviderResponse, TransportError> {
        let start_time = std::time::Instant::now();

        let response = self
            .client
            .post(&self.settings.endpoint)
            .header(SUBSCRIPTION_KEY_HEADER, &self.settings.subscription_key)
            .header(reqwest::header::CONTENT_TYPE, "application/ssml+xml")
            .header(OUTPUT_FORMAT_HEADER, OUTPUT_FORMAT)
            .body(ssml.as_bytes().to_vec())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, endpoint = %self.settings.endpoint, "Azure TTS request failed");
                self.classify_error(&e)
            })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.classify_error(&e))?
            .to_vec();

        tracing::debug!(
            provider = "azure",
            status = status,
            latency_ms = start_time.elapsed().as_millis(),
            body_size_bytes = body.len(),
            "Azure TTS response received"
        );

        Ok(ProviderResponse { status, body })
    }
}
