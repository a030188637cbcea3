mod alerts;
mod broadcast;
mod config;
mod discord;
mod prices;
mod web;

use std::sync::Arc;

use anyhow::Result;
use battlenet::BattleNetClient;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::discord::start_discord;

#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env is fine, the real environment still applies
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let config = Config::parse().validate()?;
    info!("starting with {config:?}");

    let prices = Arc::new(BattleNetClient::new(&config.client_id, &config.client_secret)?);
    let listener = web::bind(config.port).await?;
    tokio::spawn(web::serve(listener));

    let settings = config.alert_settings();
    start_discord(config.discord_token, prices, settings).await
}
