//! The dated task record produced by the resolver.
//!
//! Tasks are what flows downstream: into calendar events and into the task
//! store. JSON shape:
//!
//! ```json
//! { "title": "...", "date": "2024-08-19", "start_time": "09:00", "end_time": "10:50", "description": "..." }
//! ```

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{SyllabusError, SyllabusResult};

/// A single dated task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    pub date: NaiveDate,
    #[serde(default, with = "hhmm", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub description: String,
}

impl Task {
    pub fn new(title: impl Into<String>, date: NaiveDate, description: impl Into<String>) -> Self {
        Task {
            title: title.into(),
            date,
            start_time: None,
            end_time: None,
            description: description.into(),
        }
    }

    pub fn with_times(mut self, start: Option<NaiveTime>, end: Option<NaiveTime>) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    /// Identity used for deduplication; no natural ID exists before persistence.
    pub fn dedup_key(&self) -> (String, NaiveDate, Option<NaiveTime>) {
        (self.title.clone(), self.date, self.start_time)
    }

    pub fn is_all_day(&self) -> bool {
        self.start_time.is_none()
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.date.format("%Y-%m-%d"), self.title)
    }
}

/// A task as persisted by a task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTask {
    pub id: i64,
    pub user_id: String,
    #[serde(flatten)]
    pub task: Task,
}

/// Parse a JSON array of tasks.
///
/// Tolerates a surrounding ```` ```json ```` fence. Anything that does not
/// match the task schema is reported with the raw text attached.
pub fn parse_tasks_json(raw: &str) -> SyllabusResult<Vec<Task>> {
    let body = strip_code_fence(raw);

    serde_json::from_str(body).map_err(|e| SyllabusError::MalformedOutput {
        message: e.to_string(),
        raw: raw.to_string(),
    })
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);

    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Serde helpers for `HH:MM` times.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => serializer.serialize_str(&t.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;

        match value.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveTime::parse_from_str(s, FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid time '{}', expected HH:MM", s))),
        }
    }
}
