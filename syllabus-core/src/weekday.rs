//! Weekday abbreviations as they appear in meeting patterns ("MW", "TTh", "TuTh").
//!
//! Conventions differ between schools: some write Thursday as "R", some use a
//! bare "T" for Tuesday only. The mapping is therefore a table, not a set of
//! hard-coded guesses, and configuration may override any entry.

use std::collections::BTreeMap;

use chrono::Weekday;

use crate::error::{SyllabusError, SyllabusResult};

const DEFAULT_ABBREVIATIONS: &[(&str, Weekday)] = &[
    ("M", Weekday::Mon),
    ("Mo", Weekday::Mon),
    ("Mon", Weekday::Mon),
    ("T", Weekday::Tue),
    ("Tu", Weekday::Tue),
    ("Tue", Weekday::Tue),
    ("Tues", Weekday::Tue),
    ("W", Weekday::Wed),
    ("We", Weekday::Wed),
    ("Wed", Weekday::Wed),
    ("Th", Weekday::Thu),
    ("R", Weekday::Thu),
    ("Thu", Weekday::Thu),
    ("Thur", Weekday::Thu),
    ("Thurs", Weekday::Thu),
    ("F", Weekday::Fri),
    ("Fr", Weekday::Fri),
    ("Fri", Weekday::Fri),
    ("Sa", Weekday::Sat),
    ("Sat", Weekday::Sat),
    ("Su", Weekday::Sun),
    ("Sun", Weekday::Sun),
    ("U", Weekday::Sun),
];

const FULL_NAMES: &[(&str, Weekday)] = &[
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

/// Abbreviation → weekday mapping, matched case-insensitively, longest first.
#[derive(Debug, Clone)]
pub struct WeekdayTable {
    // Lowercased abbreviations, sorted longest first
    entries: Vec<(String, Weekday)>,
}

impl Default for WeekdayTable {
    fn default() -> Self {
        let mut table = WeekdayTable {
            entries: Vec::new(),
        };
        for (abbr, day) in DEFAULT_ABBREVIATIONS {
            table.insert(abbr, *day);
        }
        table
    }
}

impl WeekdayTable {
    /// Default table with overrides applied, e.g. `{"T" = "thu"}`.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> SyllabusResult<Self> {
        let mut table = Self::default();

        for (abbr, name) in overrides {
            let day = parse_full_name(name)
                .or_else(|| name.parse::<Weekday>().ok())
                .ok_or_else(|| {
                    SyllabusError::Config(format!(
                        "Unknown weekday '{}' for abbreviation '{}'",
                        name, abbr
                    ))
                })?;
            table.insert(abbr, day);
        }

        Ok(table)
    }

    /// Add or replace a single abbreviation.
    pub fn insert(&mut self, abbr: &str, day: Weekday) {
        let key = abbr.trim().to_lowercase();
        if key.is_empty() {
            return;
        }

        self.entries.retain(|(k, _)| *k != key);
        self.entries.push((key, day));
        self.entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(&b.0)));
    }

    /// Look up a single token: a full name ("Monday", "Mondays") or an exact abbreviation.
    pub fn lookup(&self, token: &str) -> Option<Weekday> {
        let token = token.trim().trim_end_matches('.');
        if let Some(day) = parse_full_name(token) {
            return Some(day);
        }

        let lower = token.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == lower)
            .map(|(_, day)| *day)
    }

    /// Split a run of concatenated abbreviations ("MWF", "TTh") into weekdays.
    ///
    /// Every character must be consumed; otherwise the run is not a day pattern.
    pub fn tokenize(&self, run: &str) -> Option<Vec<Weekday>> {
        let lower = run.to_lowercase();
        let mut rest = lower.as_str();
        let mut days = Vec::new();

        while !rest.is_empty() {
            let (key, day) = self.entries.iter().find(|(k, _)| rest.starts_with(k.as_str()))?;
            days.push(*day);
            rest = &rest[key.len()..];
        }

        if days.is_empty() { None } else { Some(days) }
    }

    /// Parse a full meeting-day pattern: "MW", "Mon/Wed", "TuTh",
    /// "Mondays and Wednesdays", "M, W, F".
    ///
    /// Returns weekdays ordered Monday first, without duplicates.
    pub fn parse_pattern(&self, pattern: &str) -> Option<Vec<Weekday>> {
        let mut days = Vec::new();

        for piece in split_pattern(pattern) {
            match self.lookup(piece) {
                Some(day) => days.push(day),
                None => days.extend(self.tokenize(piece)?),
            }
        }

        if days.is_empty() {
            return None;
        }

        days.sort_by_key(|d| d.num_days_from_monday());
        days.dedup();
        Some(days)
    }
}

fn split_pattern(pattern: &str) -> impl Iterator<Item = &str> {
    pattern
        .split(|c: char| c == '/' || c == ',' || c == '&' || c == '+' || c.is_whitespace())
        .map(|p| p.trim().trim_end_matches('.'))
        .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case("and"))
}

fn parse_full_name(token: &str) -> Option<Weekday> {
    let lower = token.trim().to_lowercase();
    let singular = lower.strip_suffix('s').unwrap_or(&lower);

    FULL_NAMES
        .iter()
        .find(|(name, _)| *name == lower || *name == singular)
        .map(|(_, day)| *day)
}

/// Short display label, e.g. "Mon".
pub fn short_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
