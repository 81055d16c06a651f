use crate::app::config::{DeutscheConfig, RevolutConfig};
use crate::error::{BankingError, Result};
use crate::models::provider::Provider;
use parking_lot::Mutex;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Tokens are renewed this long before the provider says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Deserialize)]
pub struct TokenRenewalResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    valid_until: Instant,
}

/// Acquires bearer tokens from a provider's token endpoint.
pub struct TokenService {
    client: Client,
    provider: Provider,
    token_url: String,
    params: Vec<(String, String)>,
    cache: Mutex<Option<CachedToken>>,
}

impl TokenService {
    pub fn new(client: Client, provider: Provider, token_url: impl Into<String>, params: Vec<(String, String)>) -> Self {
        Self {
            client,
            provider,
            token_url: token_url.into(),
            params,
            cache: Mutex::new(None),
        }
    }

    pub fn revolut(client: Client, config: &RevolutConfig) -> Self {
        let params = vec![
            ("grant_type".to_string(), "refresh_token".to_string()),
            ("refresh_token".to_string(), config.refresh_token.clone()),
            ("client_id".to_string(), config.client_id.clone()),
            ("client_assertion_type".to_string(), config.client_assertion_type.clone()),
            ("client_assertion".to_string(), config.client_assertion.clone()),
        ];
        Self::new(client, Provider::Revolut, config.token_url.clone(), params)
    }

    pub fn deutsche(client: Client, config: &DeutscheConfig) -> Self {
        let params = vec![
            ("grant_type".to_string(), "refresh_token".to_string()),
            ("refresh_token".to_string(), config.refresh_token.clone()),
            ("client_id".to_string(), config.client_id.clone()),
            ("client_secret".to_string(), config.client_secret.clone()),
        ];
        Self::new(client, Provider::Deutsche, config.token_url.clone(), params)
    }

    pub async fn get_token(&self) -> Result<String> {
        if let Some(token) = self.cached() {
            debug!("Reusing cached {} token", self.provider);
            return Ok(token);
        }

        let renewal = self.fetch().await.map_err(|reason| {
            error!("Failed to fetch {} token: {}", self.provider, reason);
            BankingError::TokenFetch {
                provider: self.provider,
                reason,
            }
        })?;

        if let Some(seconds) = renewal.expires_in {
            let lifetime = Duration::from_secs(seconds).saturating_sub(EXPIRY_MARGIN);
            // An expiry past what `Instant` can represent is not cached.
            let valid_until = Some(lifetime)
                .filter(|lifetime| !lifetime.is_zero())
                .and_then(|lifetime| Instant::now().checked_add(lifetime));
            if let Some(valid_until) = valid_until {
                *self.cache.lock() = Some(CachedToken {
                    value: renewal.access_token.clone(),
                    valid_until,
                });
            }
        }

        info!("Renewed {} access token", self.provider);
        Ok(renewal.access_token)
    }

    fn cached(&self) -> Option<String> {
        let cache = self.cache.lock();
        cache
            .as_ref()
            .filter(|token| token.valid_until > Instant::now())
            .map(|token| token.value.clone())
    }

    async fn fetch(&self) -> std::result::Result<TokenRenewalResponse, String> {
        let response = self
            .client
            .post(&self.token_url)
            .form(&self.params)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string())?;
        if !status.is_success() {
            return Err(format!("HTTP {}: {}", status, body));
        }

        serde_json::from_str(&body).map_err(|e| e.to_string())
    }
}
