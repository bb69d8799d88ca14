// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use glucose_timeline::application::assistant_service::AssistantService;
use glucose_timeline::application::glucose_repository::AssistantRelay;
use glucose_timeline::application::record_service::RecordService;
use glucose_timeline::application::streaming_service::StreamingDashboardService;
use glucose_timeline::application::timeline_service::TimelineService;
use glucose_timeline::infrastructure::assistant_relay::HttpAssistantRelay;
use glucose_timeline::infrastructure::config::load_service_config;
use glucose_timeline::infrastructure::http_repository::HttpGlucoseRepository;
use glucose_timeline::infrastructure::object_store::HttpObjectStore;
use glucose_timeline::presentation::app_state::AppState;
use glucose_timeline::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    // Load configuration
    let config = load_service_config().context("Failed to load config/service.toml")?;
    let options = config.timeline.align_options()?;
    let thresholds = config.timeline.thresholds()?;

    // Create adapters (infrastructure layer)
    let client = reqwest::Client::new();
    let repository = Arc::new(HttpGlucoseRepository::new(client.clone(), config.endpoints));
    let store = Arc::new(HttpObjectStore::new(client.clone(), config.storage.bucket_url));
    let relay: Option<Arc<dyn AssistantRelay>> = match config.assistant.url {
        Some(url) => Some(Arc::new(HttpAssistantRelay::new(client.clone(), url))),
        None => {
            tracing::info!("No assistant url configured, chat uses offline replies");
            None
        }
    };

    // Create services (application layer)
    let timeline_service = TimelineService::new(repository.clone(), options, thresholds);
    let streaming_service = StreamingDashboardService::new(repository.clone(), options, thresholds);
    let record_service = RecordService::new(repository.clone(), store, options.zone);
    let assistant_service = AssistantService::new(relay, timeline_service.clone());

    // Create application state
    let state = Arc::new(AppState {
        timeline_service,
        streaming_service,
        record_service,
        assistant_service,
    });

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!("Starting glucose-timeline service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;

    Ok(())
}
