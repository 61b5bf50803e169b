//! Calendar sync: the calendar interface and the single token-refresh retry.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::auth::{AuthSession, TokenRefresher, ensure_fresh, refresh_session};
use crate::error::SyllabusResult;
use crate::event::CalendarEvent;
use crate::task::Task;

/// A calendar that accepts tasks as events.
///
/// Implementations report a rejected access token as
/// [`SyllabusError::Unauthorized`](crate::error::SyllabusError::Unauthorized).
#[async_trait]
pub trait CalendarSync: Send + Sync {
    /// Create one event per task, sequentially, in order.
    async fn create_events(&self, access_token: &str, tasks: &[Task]) -> SyllabusResult<Vec<CalendarEvent>>;

    /// Upcoming events, soonest first.
    async fn list_events(&self, access_token: &str) -> SyllabusResult<Vec<CalendarEvent>>;
}

/// Run `op` with a fresh access token. If the token is rejected anyway,
/// refresh once and run `op` again; a second failure is returned as is.
pub async fn with_token_retry<T, F, Fut>(
    session: &mut AuthSession,
    refresher: &dyn TokenRefresher,
    mut op: F,
) -> SyllabusResult<T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = SyllabusResult<T>>,
{
    ensure_fresh(session, refresher, Utc::now()).await?;

    match op(session.access_token.clone()).await {
        Err(err) if err.is_unauthorized() => {
            warn!(error = %err, "Access token rejected, refreshing and retrying once");
            refresh_session(session, refresher, Utc::now()).await?;
            op(session.access_token.clone()).await
        }
        result => result,
    }
}

/// A calendar plus the means to keep its access token valid.
#[derive(Clone)]
pub struct CalendarService {
    sync: Arc<dyn CalendarSync>,
    refresher: Arc<dyn TokenRefresher>,
}

impl CalendarService {
    pub fn new(sync: Arc<dyn CalendarSync>, refresher: Arc<dyn TokenRefresher>) -> Self {
        CalendarService { sync, refresher }
    }

    /// Create an event for each task.
    ///
    /// Each task gets its own retry so a token that expires mid-batch doesn't
    /// re-create the events already written.
    pub async fn push_tasks(&self, session: &mut AuthSession, tasks: &[Task]) -> SyllabusResult<Vec<CalendarEvent>> {
        let mut created = Vec::with_capacity(tasks.len());

        for task in tasks {
            let sync = self.sync.as_ref();
            let events = with_token_retry(session, self.refresher.as_ref(), |token| async move {
                sync.create_events(&token, std::slice::from_ref(task)).await
            })
            .await?;
            created.extend(events);
        }

        info!(count = created.len(), "Created calendar events");
        Ok(created)
    }

    pub async fn upcoming(&self, session: &mut AuthSession) -> SyllabusResult<Vec<CalendarEvent>> {
        let sync = self.sync.as_ref();
        with_token_retry(session, self.refresher.as_ref(), |token| async move {
            sync.list_events(&token).await
        })
        .await
    }
}
