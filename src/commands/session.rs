use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use syllabus_core::auth::OAuthAccount;
use syllabus_provider_google::SessionStore;

use crate::commands::json_arg;

pub fn import(account: &str, json: &str) -> Result<()> {
    let raw = json_arg(json)?;
    let oauth: OAuthAccount = serde_json::from_str(&raw).context("Failed to parse OAuth account JSON")?;

    let session = SessionStore::default_location()?.import(account, &oauth)?;

    println!("{}", format!("Saved session for {}", account).green());
    println!(
        "  {}",
        format!("access token expires {}", session.expires_at.format("%Y-%m-%d %H:%M UTC")).dimmed()
    );
    if session.refresh_token.is_none() {
        println!(
            "  {}",
            "No refresh token: the session stops working when the access token expires".yellow()
        );
    }

    Ok(())
}
