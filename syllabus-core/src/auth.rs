//! OAuth token state, passed explicitly to every calendar call.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{SyllabusError, SyllabusResult};

/// Access token plus what is needed to renew it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

/// An OAuth account as the identity provider hands it over after sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthAccount {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds since the epoch
    pub expires_at: i64,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Result of a refresh call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshedToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds
    pub expires_in: i64,
}

impl AuthSession {
    pub fn from_account(account: &OAuthAccount) -> SyllabusResult<Self> {
        let expires_at = DateTime::from_timestamp(account.expires_at, 0).ok_or_else(|| {
            SyllabusError::TokenRefresh(format!("Invalid expiry timestamp {}", account.expires_at))
        })?;

        Ok(AuthSession {
            access_token: account.access_token.clone(),
            refresh_token: account.refresh_token.clone().filter(|t| !t.is_empty()),
            expires_at,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Apply a refresh result. The previous refresh token is kept when the
    /// provider doesn't hand out a new one.
    pub fn apply(&mut self, refreshed: RefreshedToken, now: DateTime<Utc>) {
        self.access_token = refreshed.access_token;
        self.expires_at = now + Duration::seconds(refreshed.expires_in);
        if let Some(token) = refreshed.refresh_token.filter(|t| !t.is_empty()) {
            self.refresh_token = Some(token);
        }
    }
}

/// Exchanges a refresh token for a new access token.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> SyllabusResult<RefreshedToken>;
}

/// Refresh unconditionally.
pub async fn refresh_session(
    session: &mut AuthSession,
    refresher: &dyn TokenRefresher,
    now: DateTime<Utc>,
) -> SyllabusResult<()> {
    let refresh_token = session
        .refresh_token
        .clone()
        .ok_or_else(|| SyllabusError::TokenRefresh("Session has no refresh token".to_string()))?;

    let refreshed = refresher.refresh(&refresh_token).await?;
    session.apply(refreshed, now);
    info!(expires_at = %session.expires_at, "Refreshed access token");

    Ok(())
}

/// Refresh only if the access token has expired. Returns whether it did.
pub async fn ensure_fresh(
    session: &mut AuthSession,
    refresher: &dyn TokenRefresher,
    now: DateTime<Utc>,
) -> SyllabusResult<bool> {
    if !session.is_expired(now) {
        return Ok(false);
    }

    refresh_session(session, refresher, now).await?;
    Ok(true)
}
