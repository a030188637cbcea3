use std::time::{Duration, Instant};

use log::{error, info};
use oauth2::{
    basic::BasicClient, reqwest::async_http_client, AuthUrl, ClientId, ClientSecret,
    TokenResponse, TokenUrl,
};
use tokio::sync::Mutex;

use crate::Error;

/// Bearer token handed out by the Battle.net OAuth server
#[derive(Clone, Debug)]
pub struct Credential {
    pub token: String,
    pub expires_at: Instant,
}

impl Credential {
    pub fn new(token: String, expires_in: Duration) -> Self {
        Self {
            token,
            expires_at: Instant::now() + expires_in,
        }
    }

    pub fn is_valid_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Lazily refreshed client credentials token.
///
/// The cached credential is handed back without touching the network until it expires.
/// The lock is held across a refresh so concurrent callers wait for the one request in flight
/// instead of each asking for their own token.
pub struct TokenCache {
    client_id: ClientId,
    client: BasicClient,
    credential: Mutex<Option<Credential>>,
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl TokenCache {
    pub fn new(
        client_id: impl ToString,
        client_secret: impl ToString,
        token_url: &str,
    ) -> Result<Self, Error> {
        // the authorize url is never visited with the client credentials grant
        let client_id = ClientId::new(client_id.to_string());
        let client = BasicClient::new(
            client_id.clone(),
            Some(ClientSecret::new(client_secret.to_string())),
            AuthUrl::new(token_url.to_string())?,
            Some(TokenUrl::new(token_url.to_string())?),
        );
        Ok(Self {
            client_id,
            client,
            credential: Mutex::new(None),
        })
    }

    /// Returns the cached token, or fetches a new one. Failures are logged and yield `None`.
    pub async fn access_token(&self) -> Option<String> {
        match self.try_access_token().await {
            Ok(token) => Some(token),
            Err(e) => {
                error!("Error getting Battle.net access token {e}");
                None
            }
        }
    }

    pub async fn try_access_token(&self) -> Result<String, Error> {
        let mut credential = self.credential.lock().await;
        if let Some(cached) = credential
            .as_ref()
            .filter(|c| c.is_valid_at(Instant::now()))
        {
            return Ok(cached.token.clone());
        }
        let response = self
            .client
            .exchange_client_credentials()
            .request_async(async_http_client)
            .await?;
        // a missing lifetime means we can't trust the token past this request
        let expires_in = response.expires_in().unwrap_or_default();
        info!("Refreshed Battle.net access token, valid for {expires_in:?}");
        let fresh = Credential::new(response.access_token().secret().clone(), expires_in);
        let token = fresh.token.clone();
        *credential = Some(fresh);
        Ok(token)
    }

    /// Snapshot of the currently cached credential, if any
    pub async fn cached(&self) -> Option<Credential> {
        self.credential.lock().await.clone()
    }
}

#[cfg(test)]
mod test {
    use std::time::{Duration, Instant};

    use super::{Credential, TokenCache};

    #[test]
    fn test_credential_expiry() {
        let credential = Credential::new("abc".to_string(), Duration::from_secs(60));
        assert!(credential.is_valid_at(Instant::now()));
        assert!(!credential.is_valid_at(credential.expires_at));
        assert!(!credential.is_valid_at(credential.expires_at + Duration::from_secs(1)));
    }

    #[test]
    fn test_zero_lifetime_is_expired() {
        let credential = Credential::new("abc".to_string(), Duration::ZERO);
        assert!(!credential.is_valid_at(Instant::now()));
    }

    #[test]
    fn test_bad_token_url() {
        assert!(TokenCache::new("id", "secret", "not a url").is_err());
    }

    #[tokio::test]
    async fn test_starts_empty() {
        let cache = TokenCache::new("id", "secret", "https://oauth.battle.net/token").unwrap();
        assert!(cache.cached().await.is_none());
    }
}
