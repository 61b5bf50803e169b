//! Syllabus context: the facts the resolver needs, pulled out of plain text.
//!
//! Extraction is purely lexical. It finds the term and year, the meeting
//! pattern and class window, the week-by-week outline, and the standalone
//! dated items (deadlines, exams). No dates are computed here except literal
//! ones; anchoring and offset arithmetic live in [`crate::resolve`].

use chrono::{NaiveDate, NaiveTime, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::clock::{self, CLOCK, DueTime, RANGE_SEPARATOR};
use crate::dates::{self, DateMention};
use crate::holiday::Holiday;
use crate::weekday::WeekdayTable;

static TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(fall|autumn|spring|summer|winter)\s+(?:semester\s+|term\s+|quarter\s+)?(\d{4})\b")
        .expect("TERM should compile")
});

static COURSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*course(?:\s+(?:title|name))?\s*:\s*(.+?)\s*$").expect("COURSE should compile")
});

const DAY_LIST: &str = r"[A-Za-z]+\.?(?:\s*(?:/|,|&|\band\b)\s*[A-Za-z]+\.?)*";

static MEETING_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b({DAY_LIST})\s+({CLOCK}){RANGE_SEPARATOR}({CLOCK})"))
        .expect("MEETING_RANGE should compile")
});

static MEETING_SINGLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:meets|lectures?|class(?:es)?)\s*:?\s*(?:on\s+)?({DAY_LIST})\s+(?:at\s+|from\s+)?({CLOCK})"
    ))
    .expect("MEETING_SINGLE should compile")
});

static TIME_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b({CLOCK}){RANGE_SEPARATOR}({CLOCK})")).expect("TIME_RANGE should compile")
});

static WEEK_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bweek\s+(\d{1,2})\b").expect("WEEK_MARKER should compile"));

static WEEK_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bweek\s+(\d{1,2})\b(?:\s*\(\s*([A-Za-z]+)\.?\s*\)|,?\s+([A-Za-z]+))?")
        .expect("WEEK_REF should compile")
});

static DAY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:[-*•]\s*)?([A-Za-z]+\.?(?:/[A-Za-z]+\.?)*)\s*(?:\(([^)]*)\)|(\d{1,2}/\d{1,2}(?:/\d{2,4})?))?\s*[:\-–—]\s*(.*)$",
    )
    .expect("DAY_LINE should compile")
});

static SKIP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:holiday|no\s+class(?:es)?|class(?:es)?\s+(?:is\s+|are\s+)?cancell?ed|no\s+meeting|recess|(?:spring|fall|autumn|winter|thanksgiving|reading)\s+break)\b",
    )
    .expect("SKIP should compile")
});

static ITEM_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:due|deadline|exam|midterm|final|quiz)\b").expect("ITEM_KEYWORD should compile")
});

static DUE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bdue\b").expect("DUE_WORD should compile"));

static CLAUSE_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.{3,}|…|;").expect("CLAUSE_SPLIT should compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Fall,
    Spring,
    Summer,
    Winter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub season: Season,
    pub year: i32,
}

/// Which weekdays the class meets and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingPattern {
    /// Ordered Monday first
    pub weekdays: Vec<Weekday>,
    pub class_start: Option<NaiveTime>,
    pub class_end: Option<NaiveTime>,
}

/// What one day of a week entry holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayContent {
    pub content: String,
    /// Marked "Holiday", "No class" or similar
    pub skip: bool,
    /// Literal date written next to the day label
    pub date: Option<NaiveDate>,
    /// Content came from a day-less entry and was spread over the meeting days
    pub inherited: bool,
}

/// One labeled week of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekEntry {
    pub week_number: u32,
    pub days: Vec<(Weekday, DayContent)>,
    /// Holidays named anywhere in the entry
    pub holidays: Vec<Holiday>,
    general: Option<String>,
}

impl WeekEntry {
    fn new(week_number: u32) -> Self {
        WeekEntry {
            week_number,
            days: Vec::new(),
            holidays: Vec::new(),
            general: None,
        }
    }

    pub fn day(&self, weekday: Weekday) -> Option<&DayContent> {
        self.days.iter().find(|(d, _)| *d == weekday).map(|(_, c)| c)
    }

    /// First literal date written against one of the entry's days.
    pub fn literal_date(&self) -> Option<NaiveDate> {
        self.days.iter().find_map(|(_, c)| c.date)
    }

    fn push_day(&mut self, weekday: Weekday, content: DayContent) {
        self.days.push((weekday, content));
    }
}

/// How an item's date is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSpec {
    /// Written out in the text
    Literal(NaiveDate),
    /// Relative to the week grid; needs an anchor
    Week { week: u32, weekday: Option<Weekday> },
}

/// How an item's time is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSpec {
    None,
    Due(NaiveTime),
    BeforeClass,
    Window(NaiveTime, Option<NaiveTime>),
}

/// A deadline, exam or other dated item outside the meeting grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub label: String,
    pub description: String,
    pub date: Option<DateSpec>,
    pub time: TimeSpec,
    /// The weekday was picked out of running text, not from an outline label
    /// or a `Week N (Day)` reference
    pub weekday_from_prose: bool,
}

/// Everything extracted from one syllabus. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyllabusContext {
    pub term: Option<Term>,
    pub course: Option<String>,
    pub meeting: Option<MeetingPattern>,
    pub weekly_outline: Vec<WeekEntry>,
    pub items: Vec<Item>,
}

impl SyllabusContext {
    pub fn parse(text: &str, weekdays: &WeekdayTable) -> Self {
        let term = find_term(text);
        let year = term.map(|t| t.year);
        let meeting = find_meeting(text, weekdays);
        let course = COURSE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.is_empty());

        let mut scanner = OutlineScanner::new(weekdays, year);
        for line in text.lines() {
            scanner.scan_line(line);
        }

        let meeting_days = meeting.as_ref().map(|m| m.weekdays.clone()).unwrap_or_default();
        let (mut weekly_outline, mut items) = scanner.finish();

        for entry in &mut weekly_outline {
            spread_general_content(entry, &meeting_days, year);
        }
        for entry in &weekly_outline {
            items.extend(outline_due_items(entry, &meeting_days, year));
        }

        SyllabusContext {
            term,
            course,
            meeting,
            weekly_outline,
            items,
        }
    }

    pub fn term_year(&self) -> Option<i32> {
        self.term.map(|t| t.year)
    }

    pub fn meeting_weekdays(&self) -> &[Weekday] {
        self.meeting.as_ref().map(|m| m.weekdays.as_slice()).unwrap_or(&[])
    }

    pub fn class_start(&self) -> Option<NaiveTime> {
        self.meeting.as_ref().and_then(|m| m.class_start)
    }

    pub fn class_end(&self) -> Option<NaiveTime> {
        self.meeting.as_ref().and_then(|m| m.class_end)
    }
}

fn find_term(text: &str) -> Option<Term> {
    let caps = TERM.captures(text)?;
    let season = match caps.get(1)?.as_str().to_lowercase().as_str() {
        "fall" | "autumn" => Season::Fall,
        "spring" => Season::Spring,
        "summer" => Season::Summer,
        _ => Season::Winter,
    };
    let year = caps.get(2)?.as_str().parse().ok()?;
    Some(Term { season, year })
}

fn find_meeting(text: &str, weekdays: &WeekdayTable) -> Option<MeetingPattern> {
    for caps in MEETING_RANGE.captures_iter(text) {
        let (Some(days), Some(start), Some(end)) = (caps.get(1), caps.get(2), caps.get(3)) else {
            continue;
        };
        let Some(days) = weekdays.parse_pattern(days.as_str()) else {
            continue;
        };
        if let Some((class_start, class_end)) = clock::parse_window(start.as_str(), end.as_str()) {
            return Some(MeetingPattern {
                weekdays: days,
                class_start: Some(class_start),
                class_end: Some(class_end),
            });
        }
    }

    for caps in MEETING_SINGLE.captures_iter(text) {
        let (Some(days), Some(start)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let Some(days) = weekdays.parse_pattern(days.as_str()) else {
            continue;
        };
        if let Some(class_start) = clock::ClockTime::parse(start.as_str()).and_then(|c| c.to_time()) {
            return Some(MeetingPattern {
                weekdays: days,
                class_start: Some(class_start),
                class_end: None,
            });
        }
    }

    None
}

/// A "Week N" marker that opens an outline entry.
struct Marker {
    start: usize,
    week: u32,
    label: Option<String>,
    content_start: usize,
}

/// Line-by-line outline scanner.
///
/// Handles inline entries (`Week 3 (Mon): Labor Day`), several per line, and
/// header blocks (`Week 3` followed by `Mon: ...` lines).
struct OutlineScanner<'a> {
    weekdays: &'a WeekdayTable,
    year: Option<i32>,
    entries: Vec<WeekEntry>,
    items: Vec<Item>,
    // Week of the header block currently open, if any
    block_week: Option<u32>,
}

impl<'a> OutlineScanner<'a> {
    fn new(weekdays: &'a WeekdayTable, year: Option<i32>) -> Self {
        OutlineScanner {
            weekdays,
            year,
            entries: Vec::new(),
            items: Vec::new(),
            block_week: None,
        }
    }

    fn scan_line(&mut self, line: &str) {
        let markers = self.find_markers(line);

        let Some(first) = markers.first() else {
            if self.block_week.is_some() {
                if self.scan_day_line(line) {
                    return;
                }
                // A blank line or prose closes the header block.
                self.block_week = None;
            }
            self.scan_free_text(line);
            return;
        };

        self.scan_free_text(&line[..first.start]);

        for (i, marker) in markers.iter().enumerate() {
            let end = markers
                .get(i + 1)
                .map(|m| m.start)
                .unwrap_or(line.len())
                .max(marker.content_start);
            let content = clean_content(&line[marker.content_start..end]);
            self.open_entry(marker, content);
        }
    }

    /// Markers in line order. A marker inside the previous marker's label
    /// (`Week 5 (see Week 4: remedies)`) belongs to that label.
    fn find_markers(&self, line: &str) -> Vec<Marker> {
        let mut markers: Vec<Marker> = Vec::new();

        for caps in WEEK_MARKER.captures_iter(line) {
            let (Some(whole), Some(week)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Ok(week) = week.as_str().parse() else {
                continue;
            };
            if markers.last().is_some_and(|prev| whole.start() < prev.content_start) {
                continue;
            }
            if let Some(marker) = read_marker(line, whole.start(), whole.end(), week, self.weekdays) {
                markers.push(marker);
            }
        }

        markers
    }

    fn open_entry(&mut self, marker: &Marker, content: String) {
        let mut entry = WeekEntry::new(marker.week);
        entry.holidays = Holiday::find_in(&content);

        let label = marker
            .label
            .as_deref()
            .map(|l| parse_day_label(l, self.weekdays, self.year));

        match label {
            Some(DayLabel { days, date }) if !days.is_empty() => {
                let single = days.len() == 1;
                for day in days {
                    entry.push_day(day, day_content(&content, if single { date } else { None }, false));
                }
            }
            _ if content.is_empty() => {}
            _ => entry.general = Some(content),
        }

        let is_header = entry.days.is_empty();
        self.block_week = is_header.then_some(marker.week);
        self.entries.push(entry);
    }

    /// Attach a `Mon: ...` line to the open header block. Returns false if the
    /// line is not a day line.
    fn scan_day_line(&mut self, line: &str) -> bool {
        let Some(caps) = DAY_LINE.captures(line) else {
            return false;
        };
        let Some(days_text) = caps.get(1) else {
            return false;
        };
        if self.weekdays.parse_pattern(days_text.as_str()).is_none() {
            return false;
        }

        let label = match caps.get(2).or_else(|| caps.get(3)) {
            Some(extra) => format!("{} {}", days_text.as_str(), extra.as_str()),
            None => days_text.as_str().to_string(),
        };
        let DayLabel { days, date } = parse_day_label(&label, self.weekdays, self.year);
        let content = clean_content(caps.get(4).map(|m| m.as_str()).unwrap_or_default());

        let Some(entry) = self.entries.last_mut() else {
            return false;
        };
        for holiday in Holiday::find_in(&content) {
            if !entry.holidays.contains(&holiday) {
                entry.holidays.push(holiday);
            }
        }
        let single = days.len() == 1;
        for day in days {
            entry.push_day(day, day_content(&content, if single { date } else { None }, false));
        }
        true
    }

    fn scan_free_text(&mut self, text: &str) {
        for clause in CLAUSE_SPLIT.split(text) {
            if let Some(item) = parse_item(clause, self.block_week, self.weekdays, self.year) {
                self.items.push(item);
            }
        }
    }

    fn finish(self) -> (Vec<WeekEntry>, Vec<Item>) {
        (self.entries, self.items)
    }
}

fn read_marker(line: &str, start: usize, after: usize, week: u32, weekdays: &WeekdayTable) -> Option<Marker> {
    let at_line_start = line[..start].trim().is_empty();
    let mut offset = after;
    let mut label = None;

    offset += leading_ws(&line[offset..]);
    let cursor = &line[offset..];

    if let Some(inner) = cursor.strip_prefix('(') {
        let close = inner.find(')')?;
        label = Some(inner[..close].to_string());
        offset += close + 2;
    } else {
        let word_len = cursor
            .find(|c: char| !(c.is_ascii_alphabetic() || c == '/' || c == '.'))
            .unwrap_or(cursor.len());
        let word = &cursor[..word_len];
        let after_word = &cursor[word_len..];
        let sep_at = leading_ws(after_word);
        if word_len > 0
            && separator_len(&after_word[sep_at..]).is_some()
            && weekdays.parse_pattern(word).is_some()
        {
            label = Some(word.to_string());
            offset += word_len;
        }
    }

    offset += leading_ws(&line[offset..]);
    let cursor = &line[offset..];

    if let Some(sep) = separator_len(cursor) {
        return Some(Marker {
            start,
            week,
            label,
            content_start: offset + sep,
        });
    }

    // Without a separator only a line-leading marker opens an entry.
    if at_line_start && (cursor.trim().is_empty() || label.is_some()) {
        return Some(Marker {
            start,
            week,
            label,
            content_start: offset,
        });
    }

    None
}

fn leading_ws(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

fn separator_len(s: &str) -> Option<usize> {
    let c = s.chars().next()?;
    matches!(c, ':' | '-' | '–' | '—').then(|| c.len_utf8())
}

struct DayLabel {
    days: Vec<Weekday>,
    date: Option<NaiveDate>,
}

/// Parse "Mon", "Mon/Wed", "Mon, Aug 19", "Aug 19" or "M 8/19".
fn parse_day_label(label: &str, weekdays: &WeekdayTable, year: Option<i32>) -> DayLabel {
    let mentions = dates::find_dates(label, year);
    let date = mentions.iter().find_map(|m| m.date);
    let rest = strip_spans(label, &mentions);

    let days = match weekdays.parse_pattern(&rest) {
        Some(days) => days,
        None => date.map(|d| vec![chrono::Datelike::weekday(&d)]).unwrap_or_default(),
    };

    DayLabel { days, date }
}

fn strip_spans(text: &str, mentions: &[DateMention]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in mentions {
        out.push_str(&text[last..m.span.start]);
        out.push(' ');
        last = m.span.end;
    }
    out.push_str(&text[last..]);
    out
}

fn day_content(content: &str, date: Option<NaiveDate>, inherited: bool) -> DayContent {
    DayContent {
        content: content.to_string(),
        skip: SKIP.is_match(content),
        date,
        inherited,
    }
}

/// Trim whitespace, list punctuation and ellipses from outline content.
fn clean_content(s: &str) -> String {
    let mut s = s.trim();
    loop {
        let before = s.len();
        s = s
            .trim_end_matches("...")
            .trim_end_matches('…')
            .trim_start_matches("...")
            .trim_start_matches('…')
            .trim_matches(|c: char| c.is_whitespace() || c == ';' || c == ',');
        if s.len() == before {
            break;
        }
    }
    s.to_string()
}

/// Spread a day-less entry's content over the meeting days it doesn't name.
///
/// When the entry names a holiday, only the holiday's own weekday loses its
/// class; the other meetings of the week still happen.
fn spread_general_content(entry: &mut WeekEntry, meeting_days: &[Weekday], year: Option<i32>) {
    let Some(general) = entry.general.take() else {
        return;
    };

    let holiday_days: Vec<Weekday> = match year {
        Some(year) => entry
            .holidays
            .iter()
            .filter_map(|h| h.date(year))
            .map(|d| chrono::Datelike::weekday(&d))
            .collect(),
        None => Vec::new(),
    };

    for day in meeting_days {
        if entry.day(*day).is_none() {
            let mut content = day_content(&general, None, true);
            if content.skip && !holiday_days.is_empty() {
                content.skip = holiday_days.contains(day);
            }
            entry.push_day(*day, content);
        }
    }
    entry.days.sort_by_key(|(d, _)| d.num_days_from_monday());
}

/// "due" clauses inside outline content, dated to their meeting.
///
/// Content spread over several meeting days is skipped: its due date would
/// not be unique.
fn outline_due_items(entry: &WeekEntry, meeting_days: &[Weekday], year: Option<i32>) -> Vec<Item> {
    let inherited_days = entry.days.iter().filter(|(_, c)| c.inherited).count();
    let mut items = Vec::new();

    for (day, content) in &entry.days {
        if content.skip || (content.inherited && inherited_days > 1) {
            continue;
        }
        if !meeting_days.is_empty() && !meeting_days.contains(day) {
            continue;
        }

        for clause in CLAUSE_SPLIT.split(&content.content) {
            if !DUE_WORD.is_match(clause) {
                continue;
            }
            let literal = dates::first_date(clause, year).or(content.date);
            let date = match literal {
                Some(d) => DateSpec::Literal(d),
                None => DateSpec::Week {
                    week: entry.week_number,
                    weekday: Some(*day),
                },
            };
            items.push(Item {
                label: item_label(clause, year),
                description: clause.trim().to_string(),
                date: Some(date),
                time: item_time(clause),
                weekday_from_prose: false,
            });
        }
    }

    items
}

/// A standalone deadline or exam clause. `block_week` is the header block the
/// clause sits in, if any.
fn parse_item(clause: &str, block_week: Option<u32>, weekdays: &WeekdayTable, year: Option<i32>) -> Option<Item> {
    let clause = clause.trim();
    if clause.is_empty() || !ITEM_KEYWORD.is_match(clause) {
        return None;
    }

    let literal = dates::first_date(clause, year);
    let week_ref = find_week_ref(clause, weekdays);

    let (date, weekday_from_prose) = match (literal, week_ref, block_week) {
        (Some(d), _, _) => (Some(DateSpec::Literal(d)), false),
        (None, Some((week, Some(weekday))), _) => (
            Some(DateSpec::Week {
                week,
                weekday: Some(weekday),
            }),
            false,
        ),
        (None, Some((week, None)), _) => {
            let weekday = find_weekday_word(clause, weekdays);
            (Some(DateSpec::Week { week, weekday }), weekday.is_some())
        }
        (None, None, Some(week)) => match find_weekday_word(clause, weekdays) {
            Some(weekday) => (
                Some(DateSpec::Week {
                    week,
                    weekday: Some(weekday),
                }),
                true,
            ),
            None => (None, false),
        },
        (None, None, None) => (None, false),
    };

    Some(Item {
        label: item_label(clause, year),
        description: clause.to_string(),
        date,
        time: item_time(clause),
        weekday_from_prose,
    })
}

fn find_week_ref(clause: &str, weekdays: &WeekdayTable) -> Option<(u32, Option<Weekday>)> {
    let caps = WEEK_REF.captures(clause)?;
    let week = caps.get(1)?.as_str().parse().ok()?;
    let weekday = caps
        .get(2)
        .or_else(|| caps.get(3))
        .and_then(|m| weekdays.lookup(m.as_str()));
    Some((week, weekday))
}

/// A capitalized weekday word ("Fri", "Wednesday"). Single-letter
/// abbreviations are too ambiguous in running text.
fn find_weekday_word(clause: &str, weekdays: &WeekdayTable) -> Option<Weekday> {
    clause
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| w.len() >= 3 && w.starts_with(|c: char| c.is_ascii_uppercase()))
        .find_map(|w| weekdays.lookup(w))
}

fn item_time(clause: &str) -> TimeSpec {
    match clock::find_due_time(clause) {
        Some(DueTime::At(t)) => return TimeSpec::Due(t),
        Some(DueTime::BeforeClass) => return TimeSpec::BeforeClass,
        None => {}
    }

    TIME_RANGE
        .captures(clause)
        .and_then(|caps| clock::parse_window(caps.get(1)?.as_str(), caps.get(2)?.as_str()))
        .map(|(start, end)| TimeSpec::Window(start, Some(end)))
        .unwrap_or(TimeSpec::None)
}

/// Short label for an item: the text before its date, week reference or due phrase.
fn item_label(clause: &str, year: Option<i32>) -> String {
    let clause = clause.trim().trim_start_matches(|c: char| c == '-' || c == '*' || c == '•').trim();

    let mut cut = clause.len();
    let mut consider = |pos: Option<usize>| {
        if let Some(p) = pos {
            cut = cut.min(p);
        }
    };
    consider(clause.find(':'));
    consider(dates::find_dates(clause, year).first().map(|m| m.span.start));
    consider(WEEK_MARKER.find(clause).map(|m| m.start()));
    consider(DUE_WORD.find(clause).map(|m| m.start()));
    consider(clock::due_phrase_start(clause));

    let head = clause[..cut]
        .trim()
        .trim_end_matches(|c: char| matches!(c, ',' | '-' | '–' | '—' | '(' | '.') || c.is_whitespace())
        .trim();
    let head = head
        .strip_suffix(" on")
        .or_else(|| head.strip_suffix(" in"))
        .unwrap_or(head)
        .trim();

    let is_due = DUE_WORD.is_match(clause);
    match (head.is_empty(), is_due) {
        (true, true) => "Assignment due".to_string(),
        (true, false) => "Deadline".to_string(),
        (false, true) => format!("{} due", head),
        (false, false) => head.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> SyllabusContext {
        SyllabusContext::parse(text, &WeekdayTable::default())
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_single_line_syllabus() {
        let ctx = parse(
            "Fall 2024... MW 9:00–10:50am... Week 3 (Mon): Labor Day Holiday... Week 1 (Mon): Hawkins v. McGee",
        );

        assert_eq!(ctx.term_year(), Some(2024));
        assert_eq!(ctx.meeting_weekdays(), &[Weekday::Mon, Weekday::Wed]);
        assert_eq!(ctx.class_start(), Some(hm(9, 0)));
        assert_eq!(ctx.class_end(), Some(hm(10, 50)));

        assert_eq!(ctx.weekly_outline.len(), 2);
        let week3 = &ctx.weekly_outline[0];
        assert_eq!(week3.week_number, 3);
        assert_eq!(week3.holidays, vec![Holiday::LaborDay]);
        let monday = week3.day(Weekday::Mon).unwrap();
        assert!(monday.skip);
        assert_eq!(monday.content, "Labor Day Holiday");

        let week1 = &ctx.weekly_outline[1];
        assert_eq!(week1.day(Weekday::Mon).unwrap().content, "Hawkins v. McGee");
        assert!(!week1.day(Weekday::Mon).unwrap().skip);
        assert!(ctx.items.is_empty());
    }

    #[test]
    fn test_parse_header_blocks_with_day_lines() {
        let text = "\
Course: Contracts
Spring 2025
Class meets TTh 11:00-12:15pm

Week 1
Tue: Introduction
Thu (1/16): Offer and acceptance
Week 2: Consideration
";
        let ctx = parse(text);

        assert_eq!(ctx.course.as_deref(), Some("Contracts"));
        assert_eq!(ctx.meeting_weekdays(), &[Weekday::Tue, Weekday::Thu]);
        assert_eq!(ctx.class_start(), Some(hm(11, 0)));

        let week1 = &ctx.weekly_outline[0];
        assert_eq!(week1.day(Weekday::Tue).unwrap().content, "Introduction");
        assert_eq!(
            week1.day(Weekday::Thu).unwrap().date,
            NaiveDate::from_ymd_opt(2025, 1, 16)
        );

        let week2 = &ctx.weekly_outline[1];
        assert_eq!(week2.days.len(), 2);
        assert!(week2.days.iter().all(|(_, c)| c.inherited && c.content == "Consideration"));
    }

    #[test]
    fn test_week_reference_inside_sentence_is_not_an_entry() {
        let ctx = parse("Case brief due by 11:59pm, before Week 2 Wed class");

        assert!(ctx.weekly_outline.is_empty());
        assert_eq!(ctx.items.len(), 1);

        let item = &ctx.items[0];
        assert_eq!(item.label, "Case brief due");
        assert_eq!(
            item.date,
            Some(DateSpec::Week {
                week: 2,
                weekday: Some(Weekday::Wed)
            })
        );
        assert_eq!(item.time, TimeSpec::Due(hm(23, 59)));
    }

    #[test]
    fn test_standalone_exam_with_literal_date_and_window() {
        let ctx = parse("Fall 2024\nMidterm Exam: October 15, 9:00-11:00am, Room 101");

        let item = &ctx.items[0];
        assert_eq!(item.label, "Midterm Exam");
        assert_eq!(
            item.date,
            Some(DateSpec::Literal(NaiveDate::from_ymd_opt(2024, 10, 15).unwrap()))
        );
        assert_eq!(item.time, TimeSpec::Window(hm(9, 0), Some(hm(11, 0))));
    }

    #[test]
    fn test_outline_due_clause_becomes_item() {
        let ctx = parse("Fall 2024 MW 9:00-10:50am\nWeek 2 (Wed): Lucy v. Zehmer; Reading response due before class");

        assert_eq!(ctx.items.len(), 1);
        let item = &ctx.items[0];
        assert_eq!(item.label, "Reading response due");
        assert_eq!(item.time, TimeSpec::BeforeClass);
        assert_eq!(
            item.date,
            Some(DateSpec::Week {
                week: 2,
                weekday: Some(Weekday::Wed)
            })
        );
    }

    #[test]
    fn test_bare_day_word_marker() {
        let ctx = parse("Week 4 Wed: No class");

        let entry = &ctx.weekly_outline[0];
        assert_eq!(entry.week_number, 4);
        assert!(entry.day(Weekday::Wed).unwrap().skip);
    }

    #[test]
    fn test_week_mention_inside_label_stays_in_label() {
        let ctx = parse("Fall 2024\nMW 9:00-10:50am\nWeek 3 (Mon): Labor Day Holiday\nWeek 5 (see Week 4: remedies)");

        let weeks: Vec<_> = ctx.weekly_outline.iter().map(|e| e.week_number).collect();
        assert_eq!(weeks, vec![3, 5]);
        assert!(ctx.weekly_outline[1].days.is_empty());
    }

    #[test]
    fn test_blank_line_closes_header_block() {
        let text = "\
Fall 2024
MW 9:00-10:50am
Week 3
Mon: Labor Day Holiday
Wed: Offer

Course policies
Late papers due Friday lose a letter grade.
";
        let ctx = parse(text);

        let week3 = &ctx.weekly_outline[0];
        assert_eq!(week3.days.len(), 2);
        assert_eq!(ctx.items.len(), 1);
        assert_eq!(ctx.items[0].label, "Late papers due");
        assert_eq!(ctx.items[0].date, None);
    }

    #[test]
    fn test_prose_line_closes_header_block() {
        let ctx = parse("Week 2\nTue: Consideration\nQuiz Thursday on chapter two\nThu: Promissory estoppel");

        assert_eq!(ctx.items[0].date, None);
        assert!(ctx.weekly_outline[0].day(Weekday::Thu).is_none());
    }

    #[test]
    fn test_weekday_taken_from_prose_is_flagged() {
        let ctx = parse("Reading quiz in Week 4 on Friday\nMap quiz in Week 4 (Wed)");

        assert_eq!(ctx.items.len(), 2);
        assert!(ctx.items[0].weekday_from_prose);
        assert_eq!(
            ctx.items[0].date,
            Some(DateSpec::Week {
                week: 4,
                weekday: Some(Weekday::Fri)
            })
        );
        assert!(!ctx.items[1].weekday_from_prose);
    }

    #[test]
    fn test_undated_mentions_without_keywords_are_ignored() {
        let ctx = parse("Grading: participation 10%, papers 90%");

        assert!(ctx.items.is_empty());
        assert!(ctx.weekly_outline.is_empty());
        assert!(ctx.meeting.is_none());
    }
}
