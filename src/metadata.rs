//! Metadata derived from a post rather than written in its front matter.
//!
//! | Field | Source |
//! |-------|--------|
//! | `slug` | filename stem (`hello-world.mdx` → `hello-world`) |
//! | `url` | configured prefix + slug (`/blog/hello-world`) |
//! | `publishedAt` | front-matter `date`, formatted `Jan 02, 2024` |
//! | `wordCount` | whitespace-delimited tokens in the body |
//! | `readingTime` | word count at a fixed reading speed, `3 min read` |

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Reading speed used when nothing is configured.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// A post's publication date.
///
/// Posts are ordered by [`instant`](Self::instant), the UTC time of
/// publication; a date-only value counts as midnight UTC of that day. The
/// calendar day is kept separately for display: a timestamp with an offset is
/// shown on the day it was written in, not the day it falls on in UTC.
///
/// Not `Ord`: two dates at the same instant written with different offsets
/// are distinct values but sort as a tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublishDate {
    instant: NaiveDateTime,
    day: NaiveDate,
}

impl PublishDate {
    /// Parse an ISO-8601 date or date-time.
    ///
    /// | Form | Examples |
    /// |------|----------|
    /// | calendar date | `2024-01-02`, `20240102` |
    /// | reduced precision | `2024-01`, `2024` (first of the month / year) |
    /// | date-time | `2024-01-02T10:00`, `2024-01-02 10:00:00.250`, `20240102T1000` |
    /// | with zone | `...Z`, `...+02:00`, `...+0200`, `...+02` |
    ///
    /// A date-time without a zone is taken as UTC. Times need a full calendar
    /// date in front of them.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if !text.is_ascii() {
            return None;
        }

        let (date_part, time_part) = match text.split_once(['T', 't', ' ']) {
            Some((date, time)) => (date, Some(time)),
            None => (text, None),
        };
        let day = parse_calendar_day(date_part)?;

        let Some(time_part) = time_part else {
            return Some(Self {
                instant: day.and_time(NaiveTime::from_hms_opt(0, 0, 0)?),
                day,
            });
        };
        if date_part.len() < 8 {
            return None;
        }

        let (clock, offset) = split_zone(time_part)?;
        let local = day.and_time(parse_clock(clock)?);
        let instant = match offset {
            Some(offset) => offset.from_local_datetime(&local).single()?.naive_utc(),
            None => local,
        };
        Some(Self { instant, day })
    }

    pub fn instant(&self) -> NaiveDateTime {
        self.instant
    }

    /// Human-readable form used for `publishedAt`: `Jan 02, 2024`.
    pub fn to_published_at(&self) -> String {
        self.day.format("%b %d, %Y").to_string()
    }
}

fn all_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// `YYYY-MM-DD`, `YYYYMMDD`, `YYYY-MM` or `YYYY`. Input must be ASCII.
fn parse_calendar_day(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    let (year, month, day) = match text.len() {
        4 => (text, "01", "01"),
        7 if bytes[4] == b'-' => (&text[..4], &text[5..], "01"),
        8 => (&text[..4], &text[4..6], &text[6..]),
        10 if bytes[4] == b'-' && bytes[7] == b'-' => (&text[..4], &text[5..7], &text[8..]),
        _ => return None,
    };
    if !(all_digits(year) && all_digits(month) && all_digits(day)) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Split a trailing `Z` or numeric offset off a time of day.
fn split_zone(text: &str) -> Option<(&str, Option<FixedOffset>)> {
    if let Some(clock) = text.strip_suffix(['Z', 'z']) {
        return Some((clock, Some(FixedOffset::east_opt(0)?)));
    }
    match text.rfind(['+', '-']) {
        Some(at) => Some((&text[..at], Some(parse_offset(&text[at..])?))),
        None => Some((text, None)),
    }
}

/// `+HH:MM`, `+HHMM` or `+HH` (and the `-` forms).
fn parse_offset(text: &str) -> Option<FixedOffset> {
    let (sign, rest) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };
    let (hours, minutes) = match rest.len() {
        2 => (rest, "00"),
        4 => (&rest[..2], &rest[2..]),
        5 if rest.as_bytes()[2] == b':' => (&rest[..2], &rest[3..]),
        _ => return None,
    };
    if !(all_digits(hours) && all_digits(minutes)) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_clock(text: &str) -> Option<NaiveTime> {
    const CLOCK_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%H%M%S%.f", "%H%M"];

    if text.len() == 2 && all_digits(text) {
        return NaiveTime::from_hms_opt(text.parse().ok()?, 0, 0);
    }
    CLOCK_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
}

/// Slug for a post file: its name with the extension removed.
///
/// `None` when the name is not valid UTF-8; a lossy conversion could map two
/// different files to the same slug.
pub fn slug_from_path(path: &Path) -> Option<String> {
    path.file_stem()?.to_str().map(str::to_string)
}

/// Public URL for a slug under `prefix` (e.g. `/blog`).
pub fn post_url(prefix: &str, slug: &str) -> String {
    format!("{prefix}/{slug}")
}

/// Count maximal runs of non-whitespace characters.
pub fn word_count(body: &str) -> usize {
    body.split_whitespace().count()
}

/// Estimated reading duration in whole minutes.
///
/// `words / words_per_minute`, rounded to two decimals and then up to the
/// next whole minute. A post with no words reads in zero minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReadingTime {
    minutes: u64,
}

impl ReadingTime {
    pub fn estimate(words: usize, words_per_minute: u32) -> Self {
        let exact = words as f64 / f64::from(words_per_minute.max(1));
        let rounded = (exact * 100.0).round() / 100.0;
        Self {
            minutes: rounded.ceil() as u64,
        }
    }

    pub fn minutes(&self) -> u64 {
        self.minutes
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min read", self.minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReadingTimeError(String);

impl fmt::Display for ParseReadingTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected `<minutes> min read`, got {:?}", self.0)
    }
}

impl std::error::Error for ParseReadingTimeError {}

impl FromStr for ReadingTime {
    type Err = ParseReadingTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .strip_suffix(" min read")
            .and_then(|n| n.parse().ok())
            .map(|minutes| Self { minutes })
            .ok_or_else(|| ParseReadingTimeError(s.to_string()))
    }
}
