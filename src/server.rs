//! HTTP Server
//!
//! Axum-based server exposing the exporter endpoints.
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page with links to metrics and health
//! - `GET /metrics` - Prometheus metrics in text format, collected on demand
//! - `GET /health` - 200 if the last scrape reached Deluge, 503 otherwise
//!
//! # Metrics Collection
//!
//! There is no background loop. Each `/metrics` request runs one full collection
//! against Deluge; concurrent requests queue on the session lock.

use crate::collector::{CollectionStatus, DelugeCollector};
use crate::config::Config;
use crate::deluge::{HttpTransport, SessionManager};
use crate::metrics;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
struct AppState {
    collector: Arc<DelugeCollector>,
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    let transport = HttpTransport::new(&config.deluge)?;
    info!("Deluge API endpoint: {}", transport.api_url());

    let session = SessionManager::new(Arc::new(transport), config.deluge.password()?.clone());
    let collector = Arc::new(DelugeCollector::new(session));

    // Surface credential or daemon problems in the log right away
    if collector.collect().await.status == CollectionStatus::Failed {
        warn!("Initial Deluge status check failed; will retry on each scrape");
    }

    let state = AppState { collector };

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(state);

    let addr = format!("{}:{}", config.server.addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Metrics server listening on {}", addr);
    info!("Metrics available at http://{}/metrics", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn root_handler() -> impl IntoResponse {
    axum::response::Html(
        r#"<html>
<head><title>Deluge Exporter</title></head>
<body>
<h1>Deluge Prometheus Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
<p><a href="/health">Health</a></p>
</body>
</html>"#,
    )
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    let collection = state.collector.collect().await;

    match metrics::render(&collection.observations) {
        Ok(body) => body.into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.collector.is_healthy() {
        (axum::http::StatusCode::OK, "OK")
    } else {
        (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            "Deluge unreachable",
        )
    }
}
