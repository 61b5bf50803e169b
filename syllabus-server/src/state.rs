use std::sync::Arc;

use anyhow::{Context, Result};
use syllabus_core::config::SyllabusConfig;
use syllabus_core::extract::{DocumentExtractor, TextExtractor};
use syllabus_core::storage::{SqliteTaskStore, TaskStore};
use syllabus_core::sync::CalendarService;
use syllabus_core::{Resolver, ResolverOptions};
use syllabus_provider_google::{GoogleCalendar, GoogleTokenRefresher, SessionStore};
use tracing::warn;

/// Calendar access for the configured account.
pub struct CalendarAccess {
    pub service: CalendarService,
    pub sessions: SessionStore,
    pub account: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub extractor: Arc<dyn TextExtractor>,
    pub store: Arc<dyn TaskStore>,
    /// None when no account or Google credentials are configured
    pub calendar: Option<Arc<CalendarAccess>>,
}

impl AppState {
    pub fn new(config: &SyllabusConfig) -> Result<Self> {
        let resolver = Resolver::new(ResolverOptions {
            course: config.course.clone(),
            weekdays: config.weekday_table()?,
        });

        let db_path = config.database_path()?;
        let store = SqliteTaskStore::open(&db_path)
            .with_context(|| format!("Failed to open task database at {}", db_path.display()))?;

        let calendar = match Self::calendar_access(config) {
            Ok(access) => Some(Arc::new(access)),
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Calendar routes disabled");
                None
            }
        };

        Ok(AppState {
            resolver: Arc::new(resolver),
            extractor: Arc::new(DocumentExtractor),
            store: Arc::new(store),
            calendar,
        })
    }

    fn calendar_access(config: &SyllabusConfig) -> Result<CalendarAccess> {
        let account = config.require_account()?.to_string();
        let refresher = GoogleTokenRefresher::from_app_config()?;
        let calendar = GoogleCalendar::new(config.calendar_id.clone(), config.tz()?);

        Ok(CalendarAccess {
            service: CalendarService::new(Arc::new(calendar), Arc::new(refresher)),
            sessions: SessionStore::default_location()?,
            account,
        })
    }
}
