//! OAuth2 access-token cache.
//!
//! One valid token is shared across every concurrent request handler. The
//! cache slot is guarded by an async mutex held across the refresh, so
//! concurrent misses trigger exactly one outbound request and every waiter
//! gets the same token or the same error.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use floodwatch_core::error::AuthError;
use reqwest::StatusCode;
use tokio::sync::Mutex;

use crate::ports::{Clock, SystemClock, TokenGrant, TokenTransport};

/// Total attempts against the token endpoint when it answers 429. The
/// provider's rate limiting is short-lived; anything still throttled after
/// this many tries is surfaced to the caller.
const MAX_TOKEN_ATTEMPTS: u32 = 3;

/// Fixed wait between rate-limited attempts.
const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(5);

/// A bearer token with its absolute expiry instant.
#[derive(Debug, Clone)]
pub struct AccessToken {
    secret: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Construct a token directly. Production tokens come from the cache;
    /// this exists for adapters and test doubles implementing the
    /// acquisition port.
    pub fn new(secret: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            secret: secret.into(),
            expires_at,
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// Process-wide token cache for one credential pair.
pub struct TokenCache {
    transport: Arc<dyn TokenTransport>,
    clock: Arc<dyn Clock>,
    backoff: Duration,
    slot: Mutex<Option<AccessToken>>,
}

impl TokenCache {
    pub fn new(transport: Arc<dyn TokenTransport>) -> Self {
        Self::with_clock(transport, Arc::new(SystemClock))
    }

    pub fn with_clock(transport: Arc<dyn TokenTransport>, clock: Arc<dyn Clock>) -> Self {
        Self {
            transport,
            clock,
            backoff: RATE_LIMIT_BACKOFF,
            slot: Mutex::new(None),
        }
    }

    /// Shorten the rate-limit backoff, for tests.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Return the cached token, refreshing it first if absent or expired.
    pub async fn get_token(&self) -> Result<AccessToken, AuthError> {
        let mut slot = self.slot.lock().await;

        if let Some(token) = slot.as_ref() {
            if self.clock.now() < token.expires_at {
                tracing::debug!("using cached access token");
                return Ok(token.clone());
            }
            tracing::debug!("cached access token expired");
        }

        tracing::info!("requesting new access token");
        let grant = self.request_with_retry().await?;

        let token = AccessToken {
            secret: grant.access_token,
            expires_at: self.clock.now() + TimeDelta::seconds(grant.expires_in as i64),
        };
        *slot = Some(token.clone());

        tracing::info!("new access token obtained");
        Ok(token)
    }

    async fn request_with_retry(&self) -> Result<TokenGrant, AuthError> {
        let mut attempt = 1;
        loop {
            match self.transport.request_token().await {
                Err(AuthError::RateLimited { .. }) if attempt < MAX_TOKEN_ATTEMPTS => {
                    tracing::warn!(attempt, "token endpoint rate limited, backing off");
                    tokio::time::sleep(self.backoff).await;
                    attempt += 1;
                }
                Err(AuthError::RateLimited { .. }) => {
                    return Err(AuthError::RateLimited { attempts: attempt });
                }
                other => return other,
            }
        }
    }
}

/// The real client-credentials round trip.
pub struct HttpTokenTransport {
    client: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl HttpTokenTransport {
    pub fn new(
        client: reqwest::Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

#[async_trait]
impl TokenTransport for HttpTokenTransport {
    async fn request_token(&self) -> Result<TokenGrant, AuthError> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("include_client_id", "true"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Network {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AuthError::RateLimited { attempts: 1 });
        }
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            let detail = response.text().await.unwrap_or_default();
            return Err(AuthError::InvalidCredentials { detail });
        }
        if !status.is_success() {
            return Err(AuthError::Network {
                detail: format!("token endpoint returned HTTP {status}"),
            });
        }

        response.json().await.map_err(|e| AuthError::MalformedResponse {
            detail: e.to_string(),
        })
    }
}
