//! Clock times as syllabi write them: "9:00", "10:50am", "9 a.m.", "noon".

use chrono::NaiveTime;
use once_cell::sync::Lazy;
use regex::Regex;

/// Regex fragment matching one clock time, meridiem optional.
pub(crate) const CLOCK: &str = r"\d{1,2}(?::\d{2})?(?:\s*[ap]\.?\s?m\.?)?";

/// Regex fragment matching a range separator between two clock times.
pub(crate) const RANGE_SEPARATOR: &str = r"\s*(?:-|–|—|to)\s*";

static CLOCK_PARTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d{1,2})(?::(\d{2}))?\s*(?:([ap])\.?\s?m\.?)?$")
        .expect("CLOCK_PARTS should compile")
});

static DUE_AT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:by|at|before)\s+(noon|midnight|\d{1,2}:\d{2}(?:\s*[ap]\.?\s?m\.?)?|\d{1,2}\s*[ap]\.?\s?m\.?)",
    )
    .expect("DUE_AT should compile")
});

static BEFORE_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bbefore\b[^.;]*?\bclass\b").expect("BEFORE_CLASS should compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

/// A parsed but not yet disambiguated clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    pub meridiem: Option<Meridiem>,
}

impl ClockTime {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "noon" => {
                return Some(ClockTime {
                    hour: 12,
                    minute: 0,
                    meridiem: Some(Meridiem::Pm),
                });
            }
            "midnight" => {
                return Some(ClockTime {
                    hour: 11,
                    minute: 59,
                    meridiem: Some(Meridiem::Pm),
                });
            }
            _ => {}
        }

        let caps = CLOCK_PARTS.captures(s)?;
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        let meridiem = caps.get(3).map(|m| {
            if m.as_str().eq_ignore_ascii_case("a") {
                Meridiem::Am
            } else {
                Meridiem::Pm
            }
        });

        if minute > 59 {
            return None;
        }
        match meridiem {
            Some(_) if !(1..=12).contains(&hour) => None,
            None if hour > 23 => None,
            _ => Some(ClockTime { hour, minute, meridiem }),
        }
    }

    /// Resolve with the given meridiem (ignored if the reading carries its own).
    pub fn with_meridiem(&self, meridiem: Option<Meridiem>) -> Option<NaiveTime> {
        let hour = match self.meridiem.or(meridiem) {
            Some(Meridiem::Am) if self.hour == 12 => 0,
            Some(Meridiem::Am) => self.hour,
            Some(Meridiem::Pm) if self.hour == 12 => 12,
            Some(Meridiem::Pm) => self.hour + 12,
            None => self.hour,
        };
        NaiveTime::from_hms_opt(hour, self.minute, 0)
    }

    pub fn to_time(&self) -> Option<NaiveTime> {
        self.with_meridiem(None)
    }
}

/// Resolve a class window such as "9:00–10:50am".
///
/// A start without a meridiem borrows the end's, unless that would place it
/// after the end ("11:00-12:15pm" starts at 11:00). With no meridiem at all,
/// hours 1-7 are read as afternoon.
pub fn parse_window(start: &str, end: &str) -> Option<(NaiveTime, NaiveTime)> {
    let start = ClockTime::parse(start)?;
    let end = ClockTime::parse(end)?;

    if start.meridiem.is_none() && end.meridiem.is_none() {
        let start_time = afternoon_guess(&start)?;
        let end_time = afternoon_guess(&end)?;
        return (start_time < end_time).then_some((start_time, end_time));
    }

    let end_time = end.with_meridiem(start.meridiem)?;
    let start_time = match start.meridiem {
        Some(_) => start.to_time()?,
        None => {
            let borrowed = start.with_meridiem(end.meridiem)?;
            if borrowed > end_time {
                start.with_meridiem(Some(Meridiem::Am))?
            } else {
                borrowed
            }
        }
    };

    (start_time < end_time).then_some((start_time, end_time))
}

fn afternoon_guess(clock: &ClockTime) -> Option<NaiveTime> {
    if (1..=7).contains(&clock.hour) {
        clock.with_meridiem(Some(Meridiem::Pm))
    } else {
        clock.to_time()
    }
}

/// When a due item is due relative to its date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueTime {
    /// "by 11:59pm", "by noon"
    At(NaiveTime),
    /// "before class": the meeting's start time
    BeforeClass,
}

/// Find a due-time phrase in a clause. An explicit clock time wins over "before class".
pub fn find_due_time(text: &str) -> Option<DueTime> {
    let explicit = DUE_AT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| ClockTime::parse(m.as_str()))
        .and_then(|clock| clock.to_time());

    if let Some(time) = explicit {
        return Some(DueTime::At(time));
    }

    BEFORE_CLASS.is_match(text).then_some(DueTime::BeforeClass)
}

/// Byte offset where a due-time phrase begins, if the clause has one.
pub(crate) fn due_phrase_start(text: &str) -> Option<usize> {
    let at = DUE_AT.find(text).map(|m| m.start());
    let before = BEFORE_CLASS.find(text).map(|m| m.start());

    match (at, before) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
