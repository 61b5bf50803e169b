//! Calendar event payloads built from tasks.
//!
//! The wire shape follows Google Calendar's event resource (camelCase, `date`
//! for all-day events, `dateTime` + `timeZone` for timed ones).

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{SyllabusError, SyllabusResult};
use crate::task::Task;

const EMAIL_REMINDER_MINUTES: u32 = 24 * 60;
const POPUP_REMINDER_MINUTES: u32 = 10;

/// Start or end of an event. Exactly one of `date` / `date_time` is set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventTime {
    pub fn all_day(date: NaiveDate) -> Self {
        EventTime {
            date: Some(date),
            ..Default::default()
        }
    }

    /// A wall-clock time in `tz`. Times skipped by a DST transition are rejected.
    pub fn local(naive: NaiveDateTime, tz: Tz) -> SyllabusResult<Self> {
        let local = tz.from_local_datetime(&naive).earliest().ok_or_else(|| {
            SyllabusError::Calendar(format!("{} does not exist in time zone {}", naive, tz))
        })?;

        Ok(EventTime {
            date: None,
            date_time: Some(local.fixed_offset()),
            time_zone: Some(tz.name().to_string()),
        })
    }

    /// Sortable instant; all-day events sort at midnight UTC.
    pub fn sort_key(&self) -> Option<NaiveDateTime> {
        self.date_time
            .map(|dt| dt.naive_utc())
            .or_else(|| self.date.and_then(|d| d.and_hms_opt(0, 0, 0)))
    }
}

impl std::fmt::Display for EventTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.date_time, self.date) {
            (Some(dt), _) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
            (None, Some(d)) => write!(f, "{}", d.format("%Y-%m-%d")),
            (None, None) => f.write_str("-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

impl Default for Reminders {
    /// Email a day ahead, popup ten minutes ahead.
    fn default() -> Self {
        Reminders {
            use_default: false,
            overrides: vec![
                ReminderOverride {
                    method: "email".to_string(),
                    minutes: EMAIL_REMINDER_MINUTES,
                },
                ReminderOverride {
                    method: "popup".to_string(),
                    minutes: POPUP_REMINDER_MINUTES,
                },
            ],
        }
    }
}

/// An event to create, derived from a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub summary: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
    pub reminders: Reminders,
}

impl EventRequest {
    /// Build the event for `task`, placing timed tasks in `tz`.
    ///
    /// All-day events end on the following day (the calendar treats the end
    /// date as exclusive). Timed tasks without an end time end at their start.
    pub fn from_task(task: &Task, tz: Tz) -> SyllabusResult<Self> {
        let (start, end) = match task.start_time {
            None => (
                EventTime::all_day(task.date),
                EventTime::all_day(task.date + Duration::days(1)),
            ),
            Some(start_time) => {
                let end_time = task.end_time.unwrap_or(start_time);
                (
                    EventTime::local(task.date.and_time(start_time), tz)?,
                    EventTime::local(task.date.and_time(end_time), tz)?,
                )
            }
        };

        Ok(EventRequest {
            summary: task.title.clone(),
            description: task.description.clone(),
            start,
            end,
            reminders: Reminders::default(),
        })
    }
}

/// An event as the calendar reports it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
}
