mod oauth;
mod snapshot;

pub use oauth::{Credential, TokenCache};
pub use snapshot::{format_observed_at, PriceSnapshot, COPPER_PER_GOLD};

use chrono::{DateTime, Utc};
use log::{debug, error};
use oauth2::{basic::BasicErrorResponse, RequestTokenError};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_with::{formats::Flexible, serde_as, TimestampMilliSeconds};
use thiserror::Error;

pub type TokenRequestError =
    RequestTokenError<oauth2::reqwest::Error<reqwest::Error>, BasicErrorResponse>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
    #[error("HTTP Error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("OAuth token request failed: {0}")]
    TokenRequestError(#[from] Box<TokenRequestError>),
}

impl From<TokenRequestError> for Error {
    fn from(value: TokenRequestError) -> Self {
        Self::TokenRequestError(Box::new(value))
    }
}

/// `GET /data/wow/token/index`
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TokenIndexView {
    /// Price in copper
    pub price: u64,
    #[serde_as(as = "TimestampMilliSeconds<i64, Flexible>")]
    pub last_updated_timestamp: DateTime<Utc>,
}

/// Where the client sends its requests. Defaults to the US region.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub token_url: String,
    pub api_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            token_url: "https://oauth.battle.net/token".to_string(),
            api_base: "https://us.api.blizzard.com".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct BattleNetClient {
    client: Client,
    tokens: TokenCache,
    api_base: Url,
}

impl BattleNetClient {
    const NAMESPACE: &'static str = "dynamic-us";
    const LOCALE: &'static str = "en_US";

    pub fn new(client_id: impl ToString, client_secret: impl ToString) -> Result<Self, Error> {
        Self::with_endpoints(client_id, client_secret, Endpoints::default())
    }

    pub fn with_endpoints(
        client_id: impl ToString,
        client_secret: impl ToString,
        endpoints: Endpoints,
    ) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(BattleNetClient {
            client,
            tokens: TokenCache::new(client_id, client_secret, &endpoints.token_url)?,
            api_base: Url::parse(&endpoints.api_base)?,
        })
    }

    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    pub async fn get_token_index(&self, access_token: &str) -> Result<TokenIndexView, Error> {
        let mut url = self.api_base.join("/data/wow/token/index")?;
        url.query_pairs_mut()
            .append_pair("namespace", Self::NAMESPACE)
            .append_pair("locale", Self::LOCALE);
        debug!("Getting WoW token index: {url}");
        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?;
        Ok(serde_json::from_slice(&response.bytes().await?)?)
    }

    /// Current token price in gold. Nothing is requested if no access token can be had,
    /// and any failure is logged and yields `None`.
    pub async fn wow_token_price(&self) -> Option<PriceSnapshot> {
        let access_token = self.tokens.access_token().await?;
        match self.get_token_index(&access_token).await {
            Ok(index) => Some(index.into()),
            Err(e) => {
                error!("Error getting WoW token price {e}");
                None
            }
        }
    }
}
