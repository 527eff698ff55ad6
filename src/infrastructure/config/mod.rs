use crate::domain::tts::{PipelineSettings, RetryPolicy, DEFAULT_MAX_CHUNK_LENGTH};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Upper bound for `SYNTHESIS_MAX_RETRIES`
pub const MAX_SYNTHESIS_RETRIES: u32 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Operator access
    pub operator_token: String,
    // Azure Speech
    pub azure_speech_key: String,
    pub azure_region: String,
    pub tts_endpoint: Option<String>,
    // Pipeline
    pub max_chunk_length: usize,
    pub max_text_length: usize,
    pub synthesis_max_retries: u32,
    pub synthesis_retry_backoff: Duration,
    pub synthesis_timeout: Duration,
    pub synthesis_concurrency: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            operator_token: env::var("OPERATOR_TOKEN")
                .map_err(|_| "OPERATOR_TOKEN must be set")?,
            azure_speech_key: env::var("AZURE_SPEECH_KEY")
                .map_err(|_| "AZURE_SPEECH_KEY must be set")?,
            azure_region: env::var("AZURE_REGION").unwrap_or_else(|_| "brazilsouth".to_string()),
            tts_endpoint: env::var("TTS_ENDPOINT").ok().filter(|s| !s.is_empty()),
            max_chunk_length: env::var("MAX_CHUNK_LENGTH")
                .unwrap_or_else(|_| DEFAULT_MAX_CHUNK_LENGTH.to_string())
                .parse()?,
            max_text_length: env::var("MAX_TEXT_LENGTH")
                .unwrap_or_else(|_| "100000".to_string())
                .parse()?,
            synthesis_max_retries: env::var("SYNTHESIS_MAX_RETRIES")
                .unwrap_or_else(|_| "2".to_string())
                .parse()?,
            synthesis_retry_backoff: Duration::from_secs(
                env::var("SYNTHESIS_RETRY_BACKOFF_SECS")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()?,
            ),
            synthesis_timeout: Duration::from_secs(
                env::var("SYNTHESIS_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()?,
            ),
            synthesis_concurrency: env::var("SYNTHESIS_CONCURRENCY")
                .unwrap_or_else(|_| "4".to_string())
                .parse()?,
        };

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.operator_token.trim().is_empty() {
            return Err("OPERATOR_TOKEN must not be empty".into());
        }
        if self.max_chunk_length == 0 {
            return Err("MAX_CHUNK_LENGTH must be greater than zero".into());
        }
        if self.synthesis_concurrency == 0 {
            return Err("SYNTHESIS_CONCURRENCY must be at least 1".into());
        }
        if self.synthesis_max_retries > MAX_SYNTHESIS_RETRIES {
            return Err(format!(
                "SYNTHESIS_MAX_RETRIES must be at most {}",
                MAX_SYNTHESIS_RETRIES
            )
            .into());
        }
        Ok(())
    }

    /// Provider URL, derived from the region unless overridden
    pub fn tts_endpoint(&self) -> String {
        self.tts_endpoint.clone().unwrap_or_else(|| {
            format!(
                "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
                self.azure_region
            )
        })
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            max_chunk_length: self.max_chunk_length,
            concurrency: self.synthesis_concurrency,
            retry: RetryPolicy {
                max_retries: self.synthesis_max_retries,
                backoff: self.synthesis_retry_backoff,
            },
        }
    }
}
