//! Google Calendar as a [`CalendarSync`] target.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use google_calendar::Client;
use google_calendar::types::{OrderBy, SendUpdates};
use syllabus_core::SyllabusError;
use syllabus_core::error::SyllabusResult;
use syllabus_core::event::{CalendarEvent, EventRequest};
use syllabus_core::sync::CalendarSync;
use syllabus_core::task::Task;
use tracing::{debug, info};

use crate::convert::{FromGoogle, ToGoogle};

const UPCOMING_LIMIT: usize = 10;

/// How far ahead "upcoming" looks. Bounds the listing so recurring events
/// aren't expanded without end.
const UPCOMING_HORIZON_DAYS: i64 = 90;

/// `(time_min, time_max)` for the upcoming-events listing.
fn upcoming_window(now: DateTime<Utc>) -> (String, String) {
    let until = now + Duration::days(UPCOMING_HORIZON_DAYS);
    (now.to_rfc3339(), until.to_rfc3339())
}

pub struct GoogleCalendar {
    calendar_id: String,
    time_zone: Tz,
}

impl GoogleCalendar {
    pub fn new(calendar_id: impl Into<String>, time_zone: Tz) -> Self {
        GoogleCalendar {
            calendar_id: calendar_id.into(),
            time_zone,
        }
    }

    // API calls only need the bearer token; refreshing goes through the
    // TokenRefresher.
    fn client(access_token: &str) -> Client {
        Client::new(
            String::new(),
            String::new(),
            String::new(),
            access_token.to_string(),
            String::new(),
        )
    }
}

/// Map a Google API error, telling a rejected token apart from other failures.
fn map_google_error(context: &str, err: impl std::fmt::Display) -> SyllabusError {
    let error_str = err.to_string();
    if error_str.contains("401") || error_str.contains("Invalid Credentials") || error_str.contains("UNAUTHENTICATED")
    {
        SyllabusError::Unauthorized(error_str)
    } else {
        SyllabusError::Calendar(format!("{}: {}", context, error_str))
    }
}

#[async_trait]
impl CalendarSync for GoogleCalendar {
    async fn create_events(&self, access_token: &str, tasks: &[Task]) -> SyllabusResult<Vec<CalendarEvent>> {
        let client = Self::client(access_token);
        let mut created = Vec::with_capacity(tasks.len());

        for task in tasks {
            let google_event = EventRequest::from_task(task, self.time_zone)?.to_google();

            let response = client
                .events()
                .insert(&self.calendar_id, 0, 0, false, SendUpdates::None, false, &google_event)
                .await
                .map_err(|e| map_google_error(&format!("Failed to create event: {}", task.title), e))?;

            let event = CalendarEvent::from_google(response.body)
                .map_err(|e| SyllabusError::Calendar(format!("{:#}", e)))?;
            debug!(id = %event.id, summary = %event.summary, "Created event");
            created.push(event);
        }

        info!(count = created.len(), calendar = %self.calendar_id, "Created Google Calendar events");
        Ok(created)
    }

    async fn list_events(&self, access_token: &str) -> SyllabusResult<Vec<CalendarEvent>> {
        let client = Self::client(access_token);
        let (time_min, time_max) = upcoming_window(Utc::now());

        let response = client
            .events()
            .list_all(
                &self.calendar_id,
                "",
                0,
                OrderBy::StartTime,
                &[],
                "", // search query
                &[],
                false,
                false,
                true, // expand recurring events, required for start-time ordering
                &time_max,
                &time_min,
                "",
                "",
            )
            .await
            .map_err(|e| map_google_error("Failed to fetch events", e))?;

        response
            .body
            .into_iter()
            .take(UPCOMING_LIMIT)
            .map(|event| {
                CalendarEvent::from_google(event).map_err(|e| SyllabusError::Calendar(format!("{:#}", e)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_upcoming_window_is_bounded() {
        let now = Utc.with_ymd_and_hms(2024, 8, 19, 12, 0, 0).unwrap();

        let (time_min, time_max) = upcoming_window(now);

        assert_eq!(time_min, "2024-08-19T12:00:00+00:00");
        assert_eq!(time_max, "2024-11-17T12:00:00+00:00");
    }

    #[test]
    fn test_rejected_token_maps_to_unauthorized() {
        let err = map_google_error(
            "Failed to fetch events",
            "code: 401 Unauthorized, error: Request had invalid authentication credentials.",
        );

        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_other_errors_map_to_calendar_error() {
        let err = map_google_error("Failed to fetch events", "code: 403 Forbidden, error: Rate Limit Exceeded");

        assert!(matches!(err, SyllabusError::Calendar(msg) if msg.starts_with("Failed to fetch events")));
    }
}
