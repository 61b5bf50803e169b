//! Stored Google sessions (access + refresh token per account) and the
//! refresher that renews them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use google_calendar::Client;
use syllabus_core::SyllabusError;
use syllabus_core::auth::{AuthSession, OAuthAccount, RefreshedToken, TokenRefresher};
use syllabus_core::error::SyllabusResult;
use tracing::debug;

use crate::app_config::{self, Credentials};

/// Session files, one TOML file per account.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// ~/.config/syllabus/providers/google/session
    pub fn default_location() -> Result<Self> {
        Ok(SessionStore {
            dir: app_config::base_dir()?.join("session"),
        })
    }

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SessionStore { dir: dir.into() }
    }

    fn path_for_account(&self, account: &str) -> PathBuf {
        let slug = account.replace(['/', '\\', ':'], "_");
        self.dir.join(format!("{}.toml", slug))
    }

    pub fn load(&self, account: &str) -> Result<AuthSession> {
        let path = self.path_for_account(account);

        if !path.exists() {
            return Err(SyllabusError::Unauthorized(format!(
                "Google OAuth session for {} not found! Import one with `syllabus session import`.",
                account
            ))
            .into());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read Google OAuth session from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse Google OAuth session from {}", path.display()))
    }

    pub fn save(&self, account: &str, session: &AuthSession) -> Result<()> {
        let contents = toml::to_string_pretty(session).context("Failed to serialize session")?;

        let path = self.path_for_account(account);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write session to {}", path.display()))?;

        // Set to owner-only (0600) since file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        debug!(account, "Saved Google session");
        Ok(())
    }

    /// Store the token set handed over by the identity provider after sign-in.
    pub fn import(&self, account: &str, oauth: &OAuthAccount) -> Result<AuthSession> {
        let session = AuthSession::from_account(oauth).context("Invalid OAuth account")?;
        self.save(account, &session)?;
        Ok(session)
    }
}

/// Refreshes access tokens against Google's token endpoint.
pub struct GoogleTokenRefresher {
    credentials: Credentials,
}

impl GoogleTokenRefresher {
    pub fn new(credentials: Credentials) -> Self {
        GoogleTokenRefresher { credentials }
    }

    /// Uses the credentials in app_config.toml.
    pub fn from_app_config() -> Result<Self> {
        Ok(Self::new(app_config::load()?))
    }
}

#[async_trait]
impl TokenRefresher for GoogleTokenRefresher {
    async fn refresh(&self, refresh_token: &str) -> SyllabusResult<RefreshedToken> {
        let client = Client::new(
            self.credentials.client_id.clone(),
            self.credentials.client_secret.clone(),
            String::new(),
            String::new(),
            refresh_token.to_string(),
        );

        let tokens = client
            .refresh_access_token()
            .await
            .map_err(|e| SyllabusError::TokenRefresh(e.to_string()))?;

        // Google typically doesn't return a new refresh_token on refresh
        Ok(RefreshedToken {
            access_token: tokens.access_token,
            refresh_token: Some(tokens.refresh_token).filter(|t| !t.is_empty()),
            expires_in: tokens.expires_in,
        })
    }
}

/// Keeps a session file in step with refreshes made during a call.
pub async fn with_saved_session<T, F, Fut>(store: &SessionStore, account: &str, op: F) -> Result<T>
where
    F: FnOnce(AuthSession) -> Fut,
    Fut: std::future::Future<Output = (AuthSession, SyllabusResult<T>)>,
{
    let session = store.load(account)?;
    let before = session.clone();

    let (session, result) = op(session).await;
    if session != before {
        store.save(account, &session)?;
    }

    Ok(result?)
}
