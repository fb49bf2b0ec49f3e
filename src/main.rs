mod cli;
mod config;
mod domain;
mod services;
mod state;
mod store;

use crate::config::Config;
use crate::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        chat_url = %config.chat_url,
        predict_url = %config.predict_url,
        "starting cognovoid client"
    );

    let state = AppState::new(config)?;
    let mut lines = cli::input_lines();
    cli::chat::run(&state, &mut lines).await
}
