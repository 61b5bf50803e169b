//! The date resolver: syllabus text in, dated tasks out.
//!
//! Dates come from exactly two places. A literal date written in the text is
//! used as-is. Anything else is placed on the week grid, which exists only
//! once an anchor is found: an outline entry with a written date, or one that
//! names a single holiday whose date is fixed for the term year. Items that
//! neither source can date are dropped.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::debug;

use crate::context::{DateSpec, Item, SyllabusContext, TimeSpec, WeekEntry};
use crate::holiday::HolidayAnchor;
use crate::task::Task;
use crate::weekday::{WeekdayTable, short_label};

#[derive(Debug, Clone, Default)]
pub struct ResolverOptions {
    /// Course label for titles; overrides a `Course:` line in the text
    pub course: Option<String>,
    pub weekdays: WeekdayTable,
}

#[derive(Debug, Clone, Default)]
pub struct Resolver {
    options: ResolverOptions,
}

/// Resolve with default options.
pub fn resolve(text: &str) -> Vec<Task> {
    Resolver::default().resolve(text)
}

impl Resolver {
    pub fn new(options: ResolverOptions) -> Self {
        Resolver { options }
    }

    pub fn resolve(&self, text: &str) -> Vec<Task> {
        let context = SyllabusContext::parse(text, &self.options.weekdays);
        self.resolve_context(&context)
    }

    pub fn resolve_context(&self, context: &SyllabusContext) -> Vec<Task> {
        let course = self.options.course.as_deref().or(context.course.as_deref());
        let grid = WeekGrid::anchor(context);
        if grid.is_none() {
            debug!("No anchor found; only literal dates will resolve");
        }

        let mut tasks = Vec::new();
        for entry in &context.weekly_outline {
            tasks.extend(meeting_tasks(entry, context, grid.as_ref(), course));
        }
        for item in &context.items {
            match item_task(item, context, grid.as_ref(), course) {
                Some(task) => tasks.push(task),
                None => debug!(item = %item.label, "Dropping item without a resolvable date"),
            }
        }

        dedup_and_order(tasks)
    }
}

/// Week numbers mapped onto calendar weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WeekGrid {
    week: u32,
    monday: NaiveDate,
}

impl WeekGrid {
    /// First anchor in document order: an entry with a written date, then an
    /// entry naming exactly one holiday.
    fn anchor(context: &SyllabusContext) -> Option<Self> {
        let explicit = context.weekly_outline.iter().find_map(|entry| {
            let date = entry.literal_date()?;
            Some(WeekGrid::containing(entry.week_number, date))
        });
        if explicit.is_some() {
            return explicit;
        }

        let year = context.term_year()?;
        context.weekly_outline.iter().find_map(|entry| {
            let [holiday] = entry.holidays.as_slice() else {
                return None;
            };
            let anchor = HolidayAnchor::for_year(*holiday, year)?;
            debug!(
                holiday = %anchor.holiday,
                date = %anchor.resolved_date,
                week = entry.week_number,
                "Anchoring week grid on holiday"
            );
            Some(WeekGrid::containing(entry.week_number, anchor.resolved_date))
        })
    }

    fn containing(week: u32, date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_monday() as i64;
        WeekGrid {
            week,
            monday: date - Duration::days(offset),
        }
    }

    fn date_of(&self, week: u32, weekday: Weekday) -> Option<NaiveDate> {
        let weeks = week as i64 - self.week as i64;
        self.monday
            .checked_add_signed(Duration::days(weeks * 7 + weekday.num_days_from_monday() as i64))
    }
}

fn meeting_tasks(
    entry: &WeekEntry,
    context: &SyllabusContext,
    grid: Option<&WeekGrid>,
    course: Option<&str>,
) -> Vec<Task> {
    let meeting_days = context.meeting_weekdays();
    let mut tasks = Vec::new();

    for (day, content) in &entry.days {
        if !meeting_days.is_empty() && !meeting_days.contains(day) {
            debug!(week = entry.week_number, day = short_label(*day), "Skipping non-meeting day");
            continue;
        }
        if content.skip {
            debug!(week = entry.week_number, day = short_label(*day), "Skipping day without class");
            continue;
        }

        let date = content
            .date
            .or_else(|| grid.and_then(|g| g.date_of(entry.week_number, *day)));
        let Some(date) = date else {
            debug!(week = entry.week_number, day = short_label(*day), "Dropping unanchored meeting");
            continue;
        };

        let label = format!("Week {} ({})", entry.week_number, short_label(*day));
        tasks.push(
            Task::new(titled(course, &label), date, content.content.clone())
                .with_times(context.class_start(), context.class_end()),
        );
    }

    tasks
}

fn item_task(
    item: &Item,
    context: &SyllabusContext,
    grid: Option<&WeekGrid>,
    course: Option<&str>,
) -> Option<Task> {
    let date = match item.date? {
        DateSpec::Literal(date) => date,
        DateSpec::Week { week, weekday } => {
            let meeting_days = context.meeting_weekdays();
            let weekday = match (weekday, meeting_days) {
                (Some(day), _) => day,
                (None, [only]) => *only,
                (None, _) => return None,
            };
            if item.weekday_from_prose && !meeting_days.is_empty() && !meeting_days.contains(&weekday) {
                debug!(item = %item.label, day = short_label(weekday), "Dropping item on a non-meeting day");
                return None;
            }
            grid?.date_of(week, weekday)?
        }
    };

    let (start, end) = match item.time {
        TimeSpec::None => (None, None),
        TimeSpec::Due(time) => (Some(time), None),
        TimeSpec::BeforeClass => (context.class_start(), None),
        TimeSpec::Window(start, end) => (Some(start), end),
    };

    Some(Task::new(titled(course, &item.label), date, item.description.clone()).with_times(start, end))
}

fn titled(course: Option<&str>, label: &str) -> String {
    match course {
        Some(course) => format!("{} – {}", course, label),
        None => label.to_string(),
    }
}

/// Drop repeated (title, date, start) triples, keeping the first, then order
/// chronologically. The sort is stable, so ties keep document order.
fn dedup_and_order(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Task> = tasks
        .into_iter()
        .filter(|task| {
            let fresh = seen.insert(task.dedup_key());
            if !fresh {
                debug!(task = %task, "Dropping duplicate task");
            }
            fresh
        })
        .collect();

    unique.sort_by_key(|task| (task.date, task.start_time));
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    use crate::holiday::Holiday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_labor_day_anchors_week_one() {
        let tasks = resolve(
            "Fall 2024... MW 9:00–10:50am... Week 3 (Mon): Labor Day Holiday... Week 1 (Mon): Hawkins v. McGee",
        );

        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert!(task.title.contains("Week 1"));
        assert_eq!(task.date, date(2024, 8, 19));
        assert_eq!(task.start_time, Some(hm(9, 0)));
        assert_eq!(task.end_time, Some(hm(10, 50)));
        assert!(task.description.contains("Hawkins v. McGee"));
    }

    #[test]
    fn test_unanchored_due_item_is_dropped() {
        let tasks = resolve("Case brief due by 11:59pm, before Week 2 Wed class");

        assert!(tasks.is_empty());
    }

    #[test]
    fn test_anchored_due_item_uses_due_time() {
        let text = "\
Fall 2024
MW 9:00-10:50am
Week 3 (Mon): Labor Day Holiday
Week 1 (Mon): Hawkins v. McGee
Case brief due by 11:59pm, before Week 2 Wed class
";
        let tasks = resolve(text);

        let brief = tasks.iter().find(|t| t.title == "Case brief due").unwrap();
        assert_eq!(brief.date, date(2024, 8, 28));
        assert_eq!(brief.start_time, Some(hm(23, 59)));
        assert_eq!(brief.end_time, None);
    }

    #[test]
    fn test_explicit_dates_are_used_verbatim() {
        let text = "\
Fall 2024
Final Exam: December 10, 2024
Midterm Exam: October 15, 2024
Paper due 11/1/2024 by 5pm
";
        let tasks = resolve(text);

        let dates: Vec<_> = tasks.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(2024, 10, 15), date(2024, 11, 1), date(2024, 12, 10)]);
        assert_eq!(tasks[1].title, "Paper due");
        assert_eq!(tasks[1].start_time, Some(hm(17, 0)));
    }

    #[test]
    fn test_holiday_anchor_matches_rule_for_year() {
        let text = "\
Fall 2025
TTh 2:00-3:15pm
Week 14 (Thu): Thanksgiving, no class
Week 14 (Tue): Remedies
";
        let tasks = resolve(text);

        assert_eq!(Holiday::Thanksgiving.date(2025), Some(date(2025, 11, 27)));
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].date, date(2025, 11, 25));
        assert_eq!(tasks[0].start_time, Some(hm(14, 0)));
        assert_eq!(tasks[0].end_time, Some(hm(15, 15)));
    }

    #[test]
    fn test_literal_outline_date_anchors_other_weeks() {
        let text = "\
Spring 2025
Class meets TTh 11:00-12:15pm
Week 1
Tue (1/14): Introduction
Thu: Offer
Week 2
Tue: Acceptance
";
        let tasks = resolve(text);

        let dates: Vec<_> = tasks.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(2025, 1, 14), date(2025, 1, 16), date(2025, 1, 21)]);
        assert_eq!(tasks[2].title, "Week 2 (Tue)");
        assert_eq!(tasks[2].description, "Acceptance");
    }

    #[test]
    fn test_duplicate_entries_yield_one_task() {
        let text = "\
Fall 2024 MW 9:00-10:50am
Week 1 (Mon): Hawkins v. McGee
Week 1 (Mon): Hawkins v. McGee
Week 3 (Mon): Labor Day Holiday
";
        let tasks = resolve(text);

        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn test_resolving_twice_is_identical() {
        let text = "\
Course: Contracts
Fall 2024 MW 9:00-10:50am
Week 3 (Mon): Labor Day Holiday
Week 3 (Wed): Battle of the forms
Week 1: Introduction
Midterm Exam: October 15, 9:00-11:00am
";

        assert_eq!(resolve(text), resolve(text));
    }

    #[test]
    fn test_no_class_days_never_produce_tasks() {
        let text = "\
Fall 2024 MW 9:00-10:50am
Week 3 (Mon): Labor Day Holiday
Week 3 (Wed): No class
Week 4 (Mon): Classes cancelled
Week 4 (Wed): Parol evidence
";
        let tasks = resolve(text);

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].date, date(2024, 9, 11));
    }

    #[test]
    fn test_week_item_without_weekday_uses_single_meeting_day() {
        let text = "\
Fall 2024
W 6:00-8:00pm
Week 3 (Wed): Labor Day week recap
Quiz in Week 5
";
        let tasks = resolve(text);

        let quiz = tasks.iter().find(|t| t.title == "Quiz").unwrap();
        assert_eq!(quiz.date, date(2024, 9, 18));
        assert!(quiz.is_all_day());
    }

    #[test]
    fn test_first_holiday_anchor_wins() {
        let text = "\
Fall 2024
MW 9:00-10:50am
Week 3 (Mon): Labor Day Holiday
Week 13 (Wed): Thanksgiving break
Week 5 (Wed): Offer
";
        let tasks = resolve(text);

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].date, date(2024, 9, 18));
    }

    #[test]
    fn test_literal_date_anchor_beats_earlier_holiday() {
        let text = "\
Fall 2024
MW 9:00-10:50am
Week 3 (Mon): Labor Day Holiday
Week 4 (Wed, Sept 18): Offer
Week 5 (Mon): Acceptance
";
        let tasks = resolve(text);

        let acceptance = tasks.iter().find(|t| t.description == "Acceptance").unwrap();
        assert_eq!(acceptance.date, date(2024, 9, 23));
    }

    #[test]
    fn test_policy_text_after_header_block_is_not_dated() {
        let text = "\
Fall 2024
MW 9:00-10:50am
Week 3
Mon: Labor Day Holiday
Wed: Offer

Course policies
Late papers due Friday lose a letter grade.
";
        let tasks = resolve(text);

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Week 3 (Wed)");
        assert_eq!(tasks[0].date, date(2024, 9, 4));
    }

    #[test]
    fn test_prose_weekday_off_the_meeting_days_is_dropped() {
        let text = "\
Fall 2024
MW 9:00-10:50am
Week 3 (Mon): Labor Day Holiday
Reading quiz in Week 4 on Friday
Map quiz in Week 4 on Wednesday
";
        let tasks = resolve(text);

        assert!(tasks.iter().all(|t| t.title != "Reading quiz"));
        let map_quiz = tasks.iter().find(|t| t.title == "Map quiz").unwrap();
        assert_eq!(map_quiz.date, date(2024, 9, 11));
    }

    #[test]
    fn test_week_with_holiday_keeps_other_meetings() {
        let text = "\
Fall 2024
MW 9:00-10:50am
Week 3: Labor Day, no class Monday
";
        let tasks = resolve(text);

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Week 3 (Wed)");
        assert_eq!(tasks[0].date, date(2024, 9, 4));
    }

    #[test]
    fn test_marker_inside_label_does_not_panic() {
        let tasks = resolve("Fall 2024\nMW 9:00-10:50am\nWeek 3 (Mon): Labor Day Holiday\nWeek 5 (see Week 4: remedies)");

        assert!(tasks.is_empty());
    }

    #[test]
    fn test_course_option_prefixes_titles() {
        let resolver = Resolver::new(ResolverOptions {
            course: Some("Contracts".to_string()),
            ..Default::default()
        });

        let tasks = resolver.resolve("Fall 2024 MW 9:00-10:50am\nWeek 3 (Wed, Sept 4): Battle of the forms");

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Contracts – Week 3 (Wed)");
        assert_eq!(tasks[0].date, date(2024, 9, 4));
    }

    #[test]
    fn test_no_anchor_and_no_literal_dates_is_empty() {
        let tasks = resolve("MW 9:00-10:50am\nWeek 1 (Mon): Introduction\nWeek 2 (Wed): Consideration");

        assert!(tasks.is_empty());
    }
}
