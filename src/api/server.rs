use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    LatencyUnit,
    decompression::RequestDecompressionLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info};

use super::{
    services::{get_sections, health, recent, save_sections},
    state::AppState,
};
use crate::config::Config;
use crate::observability::announce_sections;
use crate::sections::SectionRegistry;
use crate::storage::StorageClient;
use crate::upstream::TautulliClient;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All routes with access logging and request decompression applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/sections", get(get_sections).post(save_sections))
        .route("/api/recent/{label}", get(recent))
        .route("/health", get(health))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(LatencyUnit::Millis),
                        ),
                )
                .layer(RequestDecompressionLayer::new()),
        )
}

pub async fn run(config: Config) -> Result<(), AnyError> {
    info!(
        provider = ?config.storage.provider,
        path = %config.storage.path.display(),
        key = %config.storage.key,
        "Opening section storage"
    );
    let storage = StorageClient::from_config(&config.storage)
        .map_err(|e| format!("Failed to open storage: {}", e))?;

    let registry = Arc::new(
        SectionRegistry::load(Arc::new(storage))
            .await
            .map_err(|e| format!("Failed to load sections: {}", e))?,
    );

    info!(base_url = %config.upstream.base_url, "Configuring Tautulli client");
    let upstream = Arc::new(
        TautulliClient::from_config(&config.upstream)
            .map_err(|e| format!("Failed to build Tautulli client: {}", e))?,
    );

    let address = config.server.bind_addr;
    let default_count = config.upstream.default_count;
    let state = AppState::new(config, registry.clone(), upstream);
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "tautulli-relay listening");
    announce_sections(address, &registry.snapshot(), default_count);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
