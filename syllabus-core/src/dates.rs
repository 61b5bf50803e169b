//! Literal calendar dates written in syllabus text.

use std::ops::Range;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static LITERAL_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        \b(?:
            (?P<iso_y>\d{4})-(?P<iso_m>\d{1,2})-(?P<iso_d>\d{1,2})
          | (?P<num_m>\d{1,2})/(?P<num_d>\d{1,2})(?:/(?P<num_y>\d{4}|\d{2}))?
          | (?P<month>jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?
                     |aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)
            \.?\s+(?P<day>\d{1,2})(?:st|nd|rd|th)?(?:,?\s+(?P<year>\d{4}))?
        )\b",
    )
    .expect("LITERAL_DATE should compile")
});

/// A date mention and where it sits in the source text.
///
/// `date` is `None` when the mention lacks a year and no term year is known,
/// or names an impossible day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMention {
    pub date: Option<NaiveDate>,
    pub span: Range<usize>,
}

/// Every date mention in `text`, in order of appearance.
pub fn find_dates(text: &str, default_year: Option<i32>) -> Vec<DateMention> {
    LITERAL_DATE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let date = if let Some(y) = caps.name("iso_y") {
                ymd(Some(y.as_str()), caps.name("iso_m")?.as_str(), caps.name("iso_d")?.as_str(), None)
            } else if let Some(m) = caps.name("num_m") {
                ymd(
                    caps.name("num_y").map(|y| y.as_str()),
                    m.as_str(),
                    caps.name("num_d")?.as_str(),
                    default_year,
                )
            } else {
                let month = month_number(caps.name("month")?.as_str())?;
                ymd(
                    caps.name("year").map(|y| y.as_str()),
                    &month.to_string(),
                    caps.name("day")?.as_str(),
                    default_year,
                )
            };

            Some(DateMention {
                date,
                span: whole.range(),
            })
        })
        .collect()
}

/// The first resolvable date in `text`.
pub fn first_date(text: &str, default_year: Option<i32>) -> Option<NaiveDate> {
    find_dates(text, default_year).into_iter().find_map(|m| m.date)
}

fn ymd(year: Option<&str>, month: &str, day: &str, default_year: Option<i32>) -> Option<NaiveDate> {
    let year = match year {
        Some(y) if y.len() == 2 => 2000 + y.parse::<i32>().ok()?,
        Some(y) => y.parse().ok()?,
        None => default_year?,
    };
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

fn month_number(name: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let prefix: String = name.to_lowercase().chars().take(3).collect();

    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .map(|i| i as u32 + 1)
}
