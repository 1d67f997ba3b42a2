use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;
use review_widget_backend::config::Config;
use review_widget_backend::controller::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter())),
        )
        .init();

    info!("Starting review widget backend in {} mode", config.environment);

    let app_state = AppState::from_config(&config)
        .context("Failed to initialise application state")?;

    controller::serve(app_state, &config).await
}
