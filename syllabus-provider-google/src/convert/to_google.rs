use chrono::Utc;
use syllabus_core::event::{EventRequest, EventTime, Reminders};

use super::ToGoogle;

impl ToGoogle<google_calendar::types::Event> for EventRequest {
    fn to_google(&self) -> google_calendar::types::Event {
        google_calendar::types::Event {
            summary: self.summary.clone(),
            description: self.description.clone(),
            start: Some(self.start.to_google()),
            end: Some(self.end.to_google()),
            reminders: Some(self.reminders.to_google()),
            ..Default::default()
        }
    }
}

impl ToGoogle<google_calendar::types::EventDateTime> for EventTime {
    fn to_google(&self) -> google_calendar::types::EventDateTime {
        google_calendar::types::EventDateTime {
            date: self.date,
            date_time: self.date_time.map(|dt| dt.with_timezone(&Utc)),
            time_zone: self.time_zone.clone().unwrap_or_default(),
        }
    }
}

impl ToGoogle<google_calendar::types::Reminders> for Reminders {
    fn to_google(&self) -> google_calendar::types::Reminders {
        google_calendar::types::Reminders {
            overrides: self
                .overrides
                .iter()
                .map(|r| google_calendar::types::EventReminder {
                    method: r.method.clone(),
                    minutes: r.minutes as i64,
                })
                .collect(),
            use_default: self.use_default,
        }
    }
}
