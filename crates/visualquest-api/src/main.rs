//! VisualQuest API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use visualquest_api::error::AppError;
use visualquest_api::routes;
use visualquest_api::state::AppState;
use visualquest_core::clock::SystemClock;
use visualquest_generation::OpenAiCompatClient;
use visualquest_session_store::InMemoryEventRepository;
use visualquest_transcription::AssemblyAiClient;

fn require_env(name: &str) -> Result<String, AppError> {
    std::env::var(name)
        .map_err(|_| AppError::Config(format!("{name} environment variable must be set")))
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting VisualQuest API server");

    // Read configuration from environment.
    let host = env_or("HOST", "0.0.0.0");
    let port: u16 = env_or("PORT", "3000")
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

    let generation_api_key = require_env("GENERATION_API_KEY")?;
    let generation_base_url = env_or("GENERATION_BASE_URL", "https://api.sambanova.ai/v1");
    let vision_model = env_or("VISION_MODEL", "Llama-3.2-90B-Vision-Instruct");
    let story_model = env_or("STORY_MODEL", "Meta-Llama-3.2-3B-Instruct");

    let transcription_api_key = require_env("TRANSCRIPTION_API_KEY")?;
    let transcription_base_url = env_or("TRANSCRIPTION_BASE_URL", "https://api.assemblyai.com");

    // Build outbound clients.
    let generator = OpenAiCompatClient::new(
        generation_api_key,
        generation_base_url,
        vision_model,
        story_model,
    )
    .map_err(|e| AppError::ClientInit(e.to_string()))?;
    let transcriber = AssemblyAiClient::new(transcription_api_key, transcription_base_url)
        .map_err(|e| AppError::ClientInit(e.to_string()))?;

    // Build application state. Sessions live in process memory only.
    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(InMemoryEventRepository::new()),
        Arc::new(generator),
        Arc::new(transcriber),
    );

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/adventures", routes::adventure::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
