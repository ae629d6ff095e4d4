//! Identity provider client for the admin console.
//!
//! The same hosted provider the storefront uses; the console additionally
//! requires the `admin` role claim before a session is accepted.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use brightbasket_core::{Email, UserId};

use crate::config::IdentityConfig;

/// Errors from the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The token was rejected (expired, revoked, or forged).
    #[error("session token rejected")]
    InvalidToken,

    /// Unexpected response from the provider.
    #[error("identity provider returned {status}")]
    Status { status: reqwest::StatusCode },

    /// Response body did not parse.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Role claim carried by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

/// Profile returned by a successful token verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: Email,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Client for the identity provider's server API.
#[derive(Clone)]
pub struct IdentityClient {
    inner: Arc<IdentityClientInner>,
}

struct IdentityClientInner {
    client: reqwest::Client,
    api_url: String,
    secret_key: SecretString,
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

impl IdentityClient {
    /// Create a new identity client.
    #[must_use]
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            inner: Arc::new(IdentityClientInner {
                client: reqwest::Client::new(),
                api_url: config.api_url.trim_end_matches('/').to_string(),
                secret_key: config.secret_key.clone(),
            }),
        }
    }

    /// Verify a session token and return the user's profile.
    ///
    /// # Errors
    ///
    /// `IdentityError::InvalidToken` when the provider rejects the token;
    /// transport and parse failures otherwise.
    #[instrument(skip(self, token))]
    pub async fn verify_session(&self, token: &str) -> Result<UserProfile, IdentityError> {
        let response = self
            .inner
            .client
            .post(format!("{}/sessions/verify", self.inner.api_url))
            .bearer_auth(self.inner.secret_key.expose_secret())
            .json(&VerifyRequest { token })
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(IdentityError::InvalidToken);
        }
        if !status.is_success() {
            return Err(IdentityError::Status { status });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
