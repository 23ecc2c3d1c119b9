//! # Date/Range Parser
//!
//! Turns the date strings report callers send into UTC instants and
//! half-open report windows.
//!
//! ## Accepted Formats (tried in order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Date only       2024-01-15                 → 00:00:00 in offset    │
//! │  2. Date and time   2024-01-15 10:30:00        → as given, in offset   │
//! │  3. RFC 3339        2024-01-15T10:30:00+07:00  → carries own offset    │
//! │                                                                         │
//! │  Anything else, including "", is InvalidDateFormat.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Windows
//! A [`DateWindow`] is `[start, end)`: start inclusive, end exclusive. The
//! daily report window runs from local midnight to the next local midnight
//! in the configured offset.

use std::borrow::Cow;

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};

use crate::error::{CoreError, CoreResult};

/// `YYYY-MM-DD`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `YYYY-MM-DD HH:MM:SS`
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATE_SHAPE: &str = "dddd-dd-dd";
const DATE_TIME_SHAPE: &str = "dddd-dd-dd dd:dd:dd";
const RFC3339_PREFIX_SHAPE: &str = "dddd-dd-ddTdd:dd:dd";

/// Time appended to a date-only end bound.
const END_OF_DAY: &str = "23:59:59";

// =============================================================================
// Parser
// =============================================================================

/// Parses report bounds, interpreting offset-less input in a fixed offset.
///
/// ## Example
/// ```rust
/// use chrono::FixedOffset;
/// use kasir_core::dates::DateParser;
///
/// let jakarta = FixedOffset::east_opt(7 * 3600).unwrap();
/// let parser = DateParser::new(jakarta);
/// let start = parser.parse("2024-01-15").unwrap();
/// assert_eq!(start.to_rfc3339(), "2024-01-14T17:00:00+00:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParser {
    offset: FixedOffset,
}

impl DateParser {
    pub fn new(offset: FixedOffset) -> Self {
        DateParser { offset }
    }

    /// Parser that reads offset-less input as UTC.
    pub fn utc() -> Self {
        DateParser { offset: Utc.fix() }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Parses one bound into a UTC instant.
    pub fn parse(&self, s: &str) -> CoreResult<DateTime<Utc>> {
        if s.is_empty() {
            return Err(CoreError::invalid_date(s));
        }

        if matches_shape(s, DATE_SHAPE) {
            if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
                return self
                    .local_to_utc(date.and_time(NaiveTime::MIN))
                    .ok_or_else(|| CoreError::invalid_date(s));
            }
        }

        if matches_shape(s, DATE_TIME_SHAPE) {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT) {
                return self
                    .local_to_utc(naive)
                    .ok_or_else(|| CoreError::invalid_date(s));
            }
        }

        // chrono also takes a space or lowercase `t` before the time
        let prefix = s.get(..RFC3339_PREFIX_SHAPE.len()).unwrap_or_default();
        if !matches_shape(prefix, RFC3339_PREFIX_SHAPE) {
            return Err(CoreError::invalid_date(s));
        }

        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| CoreError::invalid_date(s))
    }

    /// Parses both bounds of a range report.
    ///
    /// The end must be strictly after the start; otherwise the error carries
    /// both bounds as local dates.
    pub fn window(&self, start: &str, end: &str) -> CoreResult<DateWindow> {
        let start = self.parse(start)?;
        let end = self.parse(end)?;
        DateWindow::new(start, end, self.offset)
    }

    /// Window covering one calendar day in this parser's offset.
    pub fn day_window(&self, date: NaiveDate) -> CoreResult<DateWindow> {
        DateWindow::for_day(date, self.offset)
    }

    /// Window covering the calendar day that contains `now`.
    pub fn today_window(&self, now: DateTime<Utc>) -> CoreResult<DateWindow> {
        self.day_window(self.local_date(now))
    }

    /// Calendar date of an instant in this parser's offset.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    fn local_to_utc(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        self.offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl Default for DateParser {
    fn default() -> Self {
        DateParser::utc()
    }
}

// =============================================================================
// End-of-day normalization
// =============================================================================

/// Returns true if `s` is a valid `YYYY-MM-DD` date with no time part.
pub fn is_date_only(s: &str) -> bool {
    matches_shape(s, DATE_SHAPE) && NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok()
}

/// Pushes a date-only end bound to the last second of that day.
///
/// Any other input, including strings that are not dates at all, comes back
/// unchanged so the parser can report it.
///
/// ## Example
/// ```rust
/// use kasir_core::dates::normalize_end_of_day;
///
/// assert_eq!(normalize_end_of_day("2024-05-01"), "2024-05-01 23:59:59");
/// assert_eq!(normalize_end_of_day("2024-05-01 12:00:00"), "2024-05-01 12:00:00");
/// ```
pub fn normalize_end_of_day(s: &str) -> Cow<'_, str> {
    if is_date_only(s) {
        Cow::Owned(format!("{} {}", s, END_OF_DAY))
    } else {
        Cow::Borrowed(s)
    }
}

/// `d` matches an ASCII digit, any other pattern byte matches itself.
fn matches_shape(s: &str, shape: &str) -> bool {
    s.len() == shape.len()
        && s.bytes().zip(shape.bytes()).all(|(c, p)| match p {
            b'd' => c.is_ascii_digit(),
            _ => c == p,
        })
}

// =============================================================================
// Date Window
// =============================================================================

/// Half-open report window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    offset: FixedOffset,
}

impl DateWindow {
    /// Builds a window, rejecting `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, offset: FixedOffset) -> CoreResult<Self> {
        if end <= start {
            return Err(CoreError::InvalidDateRange {
                start: start.with_timezone(&offset).date_naive(),
                end: end.with_timezone(&offset).date_naive(),
            });
        }

        Ok(DateWindow { start, end, offset })
    }

    /// Local midnight of `date` to local midnight of the following day.
    pub fn for_day(date: NaiveDate, offset: FixedOffset) -> CoreResult<Self> {
        let midnight = date.and_time(NaiveTime::MIN);
        let next_midnight = midnight
            .checked_add_signed(Duration::days(1))
            .ok_or_else(|| CoreError::invalid_date(date.to_string()))?;

        let to_utc = |naive: NaiveDateTime| {
            offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| CoreError::invalid_date(date.to_string()))
        };

        DateWindow::new(to_utc(midnight)?, to_utc(next_midnight)?, offset)
    }

    /// Inclusive start.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Local date of the start bound.
    pub fn start_date(&self) -> NaiveDate {
        self.start.with_timezone(&self.offset).date_naive()
    }

    /// Local date of the end bound.
    pub fn end_date(&self) -> NaiveDate {
        self.end.with_timezone(&self.offset).date_naive()
    }

    /// The error to report when this window holds no transactions.
    pub fn no_transactions(&self) -> CoreError {
        CoreError::NoTransactions {
            start: self.start_date(),
            end: self.end_date(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_accepted_formats() {
        let parser = DateParser::utc();

        assert_eq!(parser.parse("2024-01-15").unwrap(), utc("2024-01-15T00:00:00Z"));
        assert_eq!(
            parser.parse("2024-01-15 10:30:00").unwrap(),
            utc("2024-01-15T10:30:00Z")
        );
        assert_eq!(
            parser.parse("2024-01-15T10:30:00+07:00").unwrap(),
            utc("2024-01-15T03:30:00Z")
        );
        assert_eq!(
            parser.parse("2024-01-15T10:30:00Z").unwrap(),
            utc("2024-01-15T10:30:00Z")
        );
    }

    #[test]
    fn test_parse_rejects_other_input() {
        let parser = DateParser::utc();

        for input in [
            "",
            "15-01-2024",
            "2024-1-15",
            "2024-02-30",
            "2024-01-15 25:00:00",
            "today",
            "2024-01-15 10:30:00+07:00",
            "2024-01-15t10:30:00Z",
        ] {
            let err = parser.parse(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidDateFormat, "input {:?}", input);
            assert_eq!(
                err,
                CoreError::InvalidDateFormat {
                    input: input.to_string()
                }
            );
        }
    }

    #[test]
    fn test_offset_applies_to_naive_input_only() {
        let jakarta = FixedOffset::east_opt(7 * 3600).unwrap();
        let parser = DateParser::new(jakarta);

        assert_eq!(parser.parse("2024-01-15").unwrap(), utc("2024-01-14T17:00:00Z"));
        assert_eq!(
            parser.parse("2024-01-15 10:30:00").unwrap(),
            utc("2024-01-15T03:30:00Z")
        );
        // Explicit offset wins over the configured one
        assert_eq!(
            parser.parse("2024-01-15T10:30:00Z").unwrap(),
            utc("2024-01-15T10:30:00Z")
        );
    }

    #[test]
    fn test_normalize_end_of_day() {
        assert_eq!(normalize_end_of_day("2024-05-01"), "2024-05-01 23:59:59");
        assert_eq!(
            normalize_end_of_day("2024-05-01 08:00:00"),
            "2024-05-01 08:00:00"
        );
        assert_eq!(
            normalize_end_of_day("2024-05-01T08:00:00Z"),
            "2024-05-01T08:00:00Z"
        );
        assert_eq!(normalize_end_of_day(""), "");
        assert_eq!(normalize_end_of_day("2024-13-01"), "2024-13-01");
        assert!(matches!(normalize_end_of_day("2024-05-01 08:00:00"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_window_requires_end_after_start() {
        let parser = DateParser::utc();

        let err = parser.window("2024-05-02", "2024-05-01").unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidDateRange {
                start: date(2024, 5, 2),
                end: date(2024, 5, 1),
            }
        );

        let err = parser.window("2024-05-01", "2024-05-01").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDateRange);

        let window = parser.window("2024-05-01", "2024-05-01 23:59:59").unwrap();
        assert!(window.contains(utc("2024-05-01T00:00:00Z")));
        assert!(window.contains(utc("2024-05-01T23:59:58Z")));
        assert!(!window.contains(utc("2024-05-01T23:59:59Z")));
    }

    #[test]
    fn test_window_propagates_format_errors() {
        let parser = DateParser::utc();
        let err = parser.window("2024-05-01", "01/05/2024").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDateFormat);
    }

    #[test]
    fn test_day_window_is_half_open() {
        let parser = DateParser::utc();
        let window = parser.day_window(date(2024, 2, 29)).unwrap();

        assert_eq!(window.start(), utc("2024-02-29T00:00:00Z"));
        assert_eq!(window.end(), utc("2024-03-01T00:00:00Z"));
        assert!(window.contains(utc("2024-02-29T23:59:59.999Z")));
        assert!(!window.contains(utc("2024-03-01T00:00:00Z")));
        assert!(!window.contains(utc("2024-02-28T23:59:59Z")));
    }

    #[test]
    fn test_today_window_uses_local_calendar_day() {
        let jakarta = FixedOffset::east_opt(7 * 3600).unwrap();
        let parser = DateParser::new(jakarta);

        // 20:00 UTC on the 15th is already the 16th in Jakarta
        let window = parser.today_window(utc("2024-01-15T20:00:00Z")).unwrap();
        assert_eq!(window.start_date(), date(2024, 1, 16));
        assert_eq!(window.end_date(), date(2024, 1, 17));
        assert_eq!(window.start(), utc("2024-01-15T17:00:00Z"));
    }

    #[test]
    fn test_no_transactions_error_names_window() {
        let window = DateParser::utc().day_window(date(2024, 5, 1)).unwrap();
        assert_eq!(
            window.no_transactions().to_string(),
            "No transactions between 2024-05-01 and 2024-05-02"
        );
    }
}
