use anyhow::{Result, bail};
use chrono::Utc;
use chrono_tz::Tz;
use syllabus_core::event::{CalendarEvent, EventTime};

use super::FromGoogle;

impl FromGoogle<google_calendar::types::Event> for CalendarEvent {
    fn from_google(event: google_calendar::types::Event) -> Result<Self> {
        let Some(start) = event.start else {
            bail!("Event {} has no start time", event.id);
        };
        let Some(end) = event.end else {
            bail!("Event {} has no end time", event.id);
        };

        Ok(CalendarEvent {
            id: event.id,
            summary: event.summary,
            description: event.description,
            start: EventTime::from_google(start)?,
            end: EventTime::from_google(end)?,
            html_link: Some(event.html_link).filter(|l| !l.is_empty()),
        })
    }
}

impl FromGoogle<google_calendar::types::EventDateTime> for EventTime {
    /// Instants are shown in the event's own zone when Google names one.
    fn from_google(value: google_calendar::types::EventDateTime) -> Result<Self> {
        let time_zone = Some(value.time_zone).filter(|tz| !tz.is_empty());

        match (value.date_time, value.date) {
            (Some(dt), _) => {
                let local = match time_zone.as_deref().and_then(|tz| tz.parse::<Tz>().ok()) {
                    Some(tz) => dt.with_timezone(&tz).fixed_offset(),
                    None => dt.with_timezone(&Utc).fixed_offset(),
                };
                Ok(EventTime {
                    date: None,
                    date_time: Some(local),
                    time_zone,
                })
            }
            (None, Some(date)) => Ok(EventTime::all_day(date)),
            (None, None) => bail!("Event time has neither date nor dateTime"),
        }
    }
}
