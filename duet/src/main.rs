use std::process::ExitCode;

use duet::{AppState, ServerConfig, StartupError, build_router, build_runtime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=debug".into()))
        .with(fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(phase = "startup", error = %err, "duet stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let runtime = build_runtime(&config)?;
    let info = runtime.info.clone();
    if !runtime.has_text_provider() {
        tracing::warn!(
            phase = "startup",
            "no text provider key configured; tool calls will fail until DEEPSEEK_API_KEY or GOOGLE_API_KEY is set"
        );
    }
    if info.image_provider.is_none() {
        tracing::warn!(
            phase = "startup",
            "HUGGINGFACE_API_KEY is not set; generate_image and generate_website_banner will fail"
        );
    }

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    tracing::info!(
        phase = "startup",
        address = %address,
        primary = %info.primary,
        secondary = ?info.secondary.map(|kind| kind.as_str()),
        tunnel = %info.tunnel_label(),
        image_directory = %info.image_directory.display(),
        "duet listening"
    );

    axum::serve(listener, build_router(AppState::new(runtime)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(phase = "shutdown", error = %err, "failed to listen for ctrl-c");
        return;
    }
    tracing::info!(phase = "shutdown", "shutdown signal received");
}
