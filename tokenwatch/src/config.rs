use std::{sync::Arc, time::Duration};

use anyhow::{bail, Result};
use clap::Parser;

use crate::alerts::alert_manager::{AlertSettings, PriceRange};

/// Relays the WoW token price into Discord and alerts while it sits inside a price range
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Config {
    /// Battle.net API client id
    #[arg(long, env = "CLIENT_ID")]
    pub(crate) client_id: String,

    /// Battle.net API client secret
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub(crate) client_secret: String,

    /// Discord bot token
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub(crate) discord_token: String,

    /// Name of the text channel that receives price updates in every server
    #[arg(long, env = "CHANNEL_NAME")]
    pub(crate) channel_name: String,

    /// Lowest price (gold) that triggers alerts
    #[arg(long, env = "MIN_PRICE")]
    pub(crate) min_price: u64,

    /// Highest price (gold) that triggers alerts
    #[arg(long, env = "MAX_PRICE")]
    pub(crate) max_price: u64,

    /// Seconds between price checks
    #[arg(long, env = "CHECK_INTERVAL", value_parser = parse_seconds)]
    pub(crate) check_interval: Duration,

    /// Seconds between repeated alerts while the price is in range
    #[arg(long, env = "ALERT_INTERVAL", value_parser = parse_seconds)]
    pub(crate) alert_interval: Duration,

    /// Port for the health check endpoint
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub(crate) port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("discord_token", &"<redacted>")
            .field("channel_name", &self.channel_name)
            .field("min_price", &self.min_price)
            .field("max_price", &self.max_price)
            .field("check_interval", &self.check_interval)
            .field("alert_interval", &self.alert_interval)
            .field("port", &self.port)
            .finish()
    }
}

fn parse_seconds(value: &str) -> Result<Duration, String> {
    let seconds: u64 = value
        .trim()
        .parse()
        .map_err(|e| format!("{value:?} is not a number of seconds: {e}"))?;
    if seconds == 0 {
        return Err("interval must be at least one second".to_string());
    }
    Ok(Duration::from_secs(seconds))
}

impl Config {
    pub(crate) fn validate(self) -> Result<Self> {
        if self.min_price > self.max_price {
            bail!(
                "MIN_PRICE ({}) is above MAX_PRICE ({})",
                self.min_price,
                self.max_price
            );
        }
        Ok(self)
    }

    pub(crate) fn alert_settings(&self) -> AlertSettings {
        AlertSettings {
            channel_name: Arc::from(self.channel_name.as_str()),
            range: PriceRange {
                min: self.min_price,
                max: self.max_price,
            },
            check_interval: self.check_interval,
            alert_interval: self.alert_interval,
        }
    }
}
