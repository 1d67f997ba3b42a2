use std::future::Future;
use std::io;
use std::sync::Arc;
use anyhow::Context;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::Router;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use crate::config::Config;
use crate::error::AppError;
use crate::gateway::google_places::GooglePlacesClient;
use crate::gateway::PlacesGateway;
use crate::helpers::handler_404::page_not_found_handler;

pub mod health_check;
pub mod places_controller;
pub mod widget_controller;
pub mod wordpress_controller;

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured; proxy calls then fail fast.
    pub gateway: Option<Arc<dyn PlacesGateway>>,
    /// Origin written into generated embed code.
    pub public_base_url: String,
}

impl AppState {
    pub fn new(gateway: Option<Arc<dyn PlacesGateway>>, public_base_url: impl Into<String>) -> Self {
        Self {
            gateway,
            public_base_url: public_base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let gateway: Option<Arc<dyn PlacesGateway>> = match &config.google_places_api_key {
            Some(api_key) if !api_key.trim().is_empty() => Some(Arc::new(
                GooglePlacesClient::new(api_key.trim(), config.places_api_base_url.as_str())
                    .context("Failed to build the places API client")?,
            )),
            _ => {
                warn!("GOOGLE_PLACES_API_KEY is not set, place lookups will fail");
                None
            }
        };

        Ok(Self::new(gateway, config.public_base_url.as_str()))
    }

    pub fn gateway(&self) -> Result<Arc<dyn PlacesGateway>, AppError> {
        self.gateway.clone().ok_or(AppError::MissingApiKey)
    }
}

pub async fn serve(app_state: AppState, config: &Config) -> anyhow::Result<()> {
    let application = application(app_state, config.allowed_origins())
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()));

    let address = config.socket_addr();
    info!("API server listening on: {}", address);
    axum::Server::bind(&address)
        .serve(application.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Error spinning up the API server")
}

/// Every route plus the 404 fallback, without transport layers.
pub fn application(app_state: AppState, allowed_origins: Vec<HeaderValue>) -> Router {
    router_endpoints(app_state, allowed_origins).fallback(page_not_found_handler)
}

/// The proxy, export and dashboard routes only answer the configured origins.
/// The script embed's routes are fetched from whatever site hosts the widget,
/// so they accept any origin.
pub fn router_endpoints(app_state: AppState, allowed_origins: Vec<HeaderValue>) -> Router {
    let restricted = health_check::router()
        .nest("/places", places_controller::router(app_state.clone()))
        .nest("/wordpress", wordpress_controller::router())
        .merge(widget_controller::router(app_state.clone()))
        .layer(cors_layer().allow_origin(allowed_origins));

    let public = widget_controller::public_router(app_state).layer(cors_layer().allow_origin(Any));

    restricted.merge(public)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

async fn shutdown_signal() {
    let ctrl_c = wait_for_signal(signal::ctrl_c(), "Ctrl+C");

    #[cfg(unix)]
    let terminate = wait_for_signal(
        async {
            signal::unix::signal(signal::unix::SignalKind::terminate())?
                .recv()
                .await;
            Ok::<(), io::Error>(())
        },
        "terminate",
    );

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}

/// Completes when `handler` reports its signal. A handler that could not be
/// installed never completes, so it cannot shut the server down on its own.
async fn wait_for_signal(handler: impl Future<Output = io::Result<()>>, name: &str) {
    if let Err(e) = handler.await {
        warn!("Failed to install {} handler: {}", name, e);
        std::future::pending::<()>().await;
    }
}
