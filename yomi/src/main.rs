use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yomi::api::{create_router, AppState};
use yomi::artifacts::{sweep_stale, ArtifactStore};
use yomi::config::Config;
use yomi::ocr::{TesseractEngine, TextRecognizer};
use yomi::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "yomi")]
#[command(about = "Self-hostable OCR text-extraction service")]
struct Args {
    /// Verify the OCR engine is usable and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yomi=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    tracing::info!("Initializing OCR engine...");
    let engine = TesseractEngine::new(&config.ocr);

    if args.check {
        if engine.is_available() {
            tracing::info!("OCR engine is available");
            return Ok(());
        }
        return Err(anyhow::anyhow!(
            "OCR engine unavailable - install Tesseract and its language data"
        ));
    }

    if !engine.is_available() {
        tracing::warn!("OCR unavailable - recognition requests will fail until Tesseract is installed");
    }

    let store = ArtifactStore::new(config.storage.upload_dir.clone())?;
    let pipeline = Pipeline::new(store, Arc::new(engine));
    let state = AppState::new(config.clone(), pipeline);

    let cancel_token = CancellationToken::new();

    tracing::info!("Starting upload sweeper...");
    let sweep_dir = config.storage.upload_dir.clone();
    let sweep_interval = Duration::from_secs(config.storage.sweep_interval_secs);
    let stale_after = Duration::from_secs(config.storage.stale_after_secs);
    let token = cancel_token.child_token();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!("Upload sweeper shutting down...");
                    break;
                }
                _ = tokio::time::sleep(sweep_interval) => {
                    if let Err(e) = sweep_stale(&sweep_dir, stale_after) {
                        tracing::error!("Upload sweep error: {}", e);
                    }
                }
            }
        }
    });

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Yomi starting on http://{}", addr);
    tracing::info!("  Languages:    http://{}/api/supported-languages", addr);
    tracing::info!("  Health check: http://{}/api/health", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token))
        .await?;

    Ok(())
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, cancelling background tasks...");
    cancel_token.cancel();
}
