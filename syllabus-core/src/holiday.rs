//! U.S. holidays a syllabus may use as a calendar anchor.
//!
//! Each holiday resolves to a concrete date for a year through a fixed rule
//! (nth weekday of a month, last weekday of a month, or a fixed day).

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Holiday {
    LaborDay,
    Thanksgiving,
    MlkDay,
    MemorialDay,
    IndependenceDay,
}

#[derive(Debug, Clone, Copy)]
enum HolidayRule {
    NthWeekday { month: u32, weekday: Weekday, n: u8 },
    LastWeekday { month: u32, weekday: Weekday },
    Fixed { month: u32, day: u32 },
}

const RULES: &[(Holiday, HolidayRule)] = &[
    (
        Holiday::LaborDay,
        HolidayRule::NthWeekday { month: 9, weekday: Weekday::Mon, n: 1 },
    ),
    (
        Holiday::Thanksgiving,
        HolidayRule::NthWeekday { month: 11, weekday: Weekday::Thu, n: 4 },
    ),
    (
        Holiday::MlkDay,
        HolidayRule::NthWeekday { month: 1, weekday: Weekday::Mon, n: 3 },
    ),
    (
        Holiday::MemorialDay,
        HolidayRule::LastWeekday { month: 5, weekday: Weekday::Mon },
    ),
    (
        Holiday::IndependenceDay,
        HolidayRule::Fixed { month: 7, day: 4 },
    ),
];

static HOLIDAY_PATTERNS: Lazy<Vec<(Holiday, Regex)>> = Lazy::new(|| {
    [
        (Holiday::LaborDay, r"(?i)\blabou?r\s+day\b"),
        (Holiday::Thanksgiving, r"(?i)\bthanksgiving\b"),
        (
            Holiday::MlkDay,
            r"(?i)\b(?:mlk|martin\s+luther\s+king(?:,?\s+jr\.?)?)(?:\s+day)?\b",
        ),
        (Holiday::MemorialDay, r"(?i)\bmemorial\s+day\b"),
        (
            Holiday::IndependenceDay,
            r"(?i)\b(?:independence\s+day|fourth\s+of\s+july|july\s+4(?:th)?)\b",
        ),
    ]
    .into_iter()
    .map(|(holiday, pattern)| {
        let re = Regex::new(pattern).expect("holiday pattern should compile");
        (holiday, re)
    })
    .collect()
});

impl Holiday {
    pub fn name(&self) -> &'static str {
        match self {
            Holiday::LaborDay => "Labor Day",
            Holiday::Thanksgiving => "Thanksgiving",
            Holiday::MlkDay => "Martin Luther King Jr. Day",
            Holiday::MemorialDay => "Memorial Day",
            Holiday::IndependenceDay => "Independence Day",
        }
    }

    /// The holiday's date in `year`.
    pub fn date(&self, year: i32) -> Option<NaiveDate> {
        let (_, rule) = RULES.iter().find(|(h, _)| h == self)?;

        match *rule {
            HolidayRule::NthWeekday { month, weekday, n } => {
                NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
            }
            HolidayRule::LastWeekday { month, weekday } => last_weekday_of_month(year, month, weekday),
            HolidayRule::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day),
        }
    }

    /// Holidays named in a fragment of text, in the order of this enum, without duplicates.
    pub fn find_in(text: &str) -> Vec<Holiday> {
        HOLIDAY_PATTERNS
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(holiday, _)| *holiday)
            .collect()
    }
}

impl std::fmt::Display for Holiday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A holiday resolved for a concrete term year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HolidayAnchor {
    pub holiday: Holiday,
    pub resolved_date: NaiveDate,
}

impl HolidayAnchor {
    pub fn for_year(holiday: Holiday, year: i32) -> Option<Self> {
        Some(HolidayAnchor {
            holiday,
            resolved_date: holiday.date(year)?,
        })
    }
}

fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    let mut date = first_of_next - Duration::days(1);
    while date.weekday() != weekday {
        date = date - Duration::days(1);
    }
    Some(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_holiday_rules_for_2024() {
        assert_eq!(Holiday::LaborDay.date(2024), Some(date(2024, 9, 2)));
        assert_eq!(Holiday::Thanksgiving.date(2024), Some(date(2024, 11, 28)));
        assert_eq!(Holiday::MlkDay.date(2024), Some(date(2024, 1, 15)));
        assert_eq!(Holiday::MemorialDay.date(2024), Some(date(2024, 5, 27)));
        assert_eq!(Holiday::IndependenceDay.date(2024), Some(date(2024, 7, 4)));
    }

    #[test]
    fn test_holiday_rules_hold_across_years() {
        for year in 2020..=2030 {
            let labor = Holiday::LaborDay.date(year).unwrap();
            assert_eq!(labor.weekday(), Weekday::Mon);
            assert!(labor.day() <= 7);

            let thanksgiving = Holiday::Thanksgiving.date(year).unwrap();
            assert_eq!(thanksgiving.weekday(), Weekday::Thu);
            assert!((22..=28).contains(&thanksgiving.day()));

            let memorial = Holiday::MemorialDay.date(year).unwrap();
            assert_eq!(memorial.weekday(), Weekday::Mon);
            assert!(memorial.day() > 24);
        }
    }

    #[test]
    fn test_find_in_matches_aliases() {
        assert_eq!(Holiday::find_in("Labor Day Holiday"), vec![Holiday::LaborDay]);
        assert_eq!(Holiday::find_in("No class (MLK)"), vec![Holiday::MlkDay]);
        assert_eq!(
            Holiday::find_in("Fourth of July recess"),
            vec![Holiday::IndependenceDay]
        );
        assert!(Holiday::find_in("Offer and acceptance").is_empty());
    }

    #[test]
    fn test_find_in_reports_every_named_holiday() {
        let found = Holiday::find_in("Thanksgiving; make-up for Labor Day");

        assert_eq!(found, vec![Holiday::LaborDay, Holiday::Thanksgiving]);
    }
}
