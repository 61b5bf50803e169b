pub mod events;
pub mod push;
pub mod resolve;
pub mod session;
pub mod tasks;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use syllabus_core::config::SyllabusConfig;
use syllabus_core::extract::{DocumentExtractor, TextExtractor};
use syllabus_core::sync::CalendarService;
use syllabus_provider_google::{GoogleCalendar, GoogleTokenRefresher, SessionStore};

/// Extract the text of a syllabus document.
pub fn read_document(path: &Path, mime: Option<&str>) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path.file_name().and_then(|name| name.to_str());

    let text = DocumentExtractor.extract(&bytes, mime.unwrap_or_default(), file_name)?;
    Ok(text)
}

/// Inline JSON, or the contents of the file it names.
pub fn json_arg(value: &str) -> Result<String> {
    let trimmed = value.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return Ok(value.to_string());
    }

    std::fs::read_to_string(value).with_context(|| format!("Failed to read {}", value))
}

/// Everything needed to talk to the configured Google calendar.
pub struct CalendarContext {
    pub service: CalendarService,
    pub sessions: SessionStore,
    pub account: String,
}

impl CalendarContext {
    pub fn load(config: &SyllabusConfig, account: Option<String>) -> Result<Self> {
        let account = match account {
            Some(account) => account,
            None => config.require_account()?.to_string(),
        };

        let calendar = GoogleCalendar::new(config.calendar_id.clone(), config.tz()?);
        let refresher = GoogleTokenRefresher::from_app_config()?;

        Ok(CalendarContext {
            service: CalendarService::new(Arc::new(calendar), Arc::new(refresher)),
            sessions: SessionStore::default_location()?,
            account,
        })
    }
}
