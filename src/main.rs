// src/main.rs

use std::sync::Arc;

use dotenvy::dotenv;
use quizgen::config::Config;
use quizgen::routes;
use quizgen::state::AppState;
use quizgen::utils::gemini::GeminiClient;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; quiz generation will be unavailable.");
    }

    let generator = GeminiClient::new(&config).expect("Failed to configure Gemini client");

    // Create AppState
    let state = AppState::new(config.clone(), Arc::new(generator));

    // Create the Axum application router
    let app = routes::create_router(state);

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}
