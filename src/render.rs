//! Colored terminal rendering for tasks and events.

use owo_colors::OwoColorize;
use syllabus_core::StoredTask;
use syllabus_core::Task;
use syllabus_core::event::CalendarEvent;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Task {
    fn render(&self) -> String {
        let time = match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => format!("{}-{}", start.format("%H:%M"), end.format("%H:%M")),
            (Some(start), None) => start.format("%H:%M").to_string(),
            _ => "all-day".to_string(),
        };

        format!(
            "{} {:>11} {}",
            self.date.format("%a %b %-d").bold(),
            time.dimmed(),
            self.title
        )
    }
}

impl Render for StoredTask {
    fn render(&self) -> String {
        format!("{} {}", format!("#{:<4}", self.id).dimmed(), self.task.render())
    }
}

impl Render for CalendarEvent {
    fn render(&self) -> String {
        let link = self.html_link.as_deref().unwrap_or_default();
        format!("{} {} {}", self.start.to_string().bold(), self.summary, link.dimmed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_task_render_shows_date_time_and_title() {
        let task = Task::new("Week 1 (Mon)", NaiveDate::from_ymd_opt(2024, 8, 19).unwrap(), "").with_times(
            NaiveTime::from_hms_opt(9, 0, 0),
            NaiveTime::from_hms_opt(10, 50, 0),
        );

        let rendered = task.render();

        assert!(rendered.contains("Mon Aug 19"));
        assert!(rendered.contains("09:00-10:50"));
        assert!(rendered.ends_with("Week 1 (Mon)"));
    }

    #[test]
    fn test_all_day_task_render() {
        let task = Task::new("Midterm Exam", NaiveDate::from_ymd_opt(2024, 10, 15).unwrap(), "");

        assert!(task.render().contains("all-day"));
    }
}
