use narrator_backend::controllers::tts::TtsController;
use narrator_backend::domain::tts::TtsService;
use narrator_backend::infrastructure::audio::Mp3Codec;
use narrator_backend::infrastructure::config::{Config, LogFormat};
use narrator_backend::infrastructure::http::start_http_server;
use narrator_backend::infrastructure::repositories::{AzureSpeechProvider, ProviderSettings};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting Narrator Backend on {}:{}",
        config.host,
        config.port
    );

    // Speech provider
    let provider = AzureSpeechProvider::new(ProviderSettings::from_config(&config))?;
    tracing::info!(
        endpoint = provider.endpoint(),
        timeout_secs = config.synthesis_timeout.as_secs(),
        "Azure Speech provider initialized"
    );

    let settings = config.pipeline_settings();
    tracing::info!(
        max_chunk_length = settings.max_chunk_length,
        concurrency = settings.concurrency,
        max_attempts = settings.retry.max_attempts(),
        "Pipeline settings loaded"
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate services (inject provider and codec)
    let tts_service = Arc::new(TtsService::new(
        Arc::new(provider),
        Arc::new(Mp3Codec::new()),
        settings,
    ));

    // 2. Instantiate controllers (inject services)
    let tts_controller = Arc::new(TtsController::new(tts_service, config.max_text_length));

    // Start HTTP server with all routes
    start_http_server(config, tts_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "narrator_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "narrator_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
