//! `DD/MM/YYYY` input masking and parsing.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// Maximum number of digits kept by the input mask.
pub const DATE_DIGITS: usize = 8;

/// Errors raised when turning date text into a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateValidationError {
    /// The text is not exactly `DD/MM/YYYY`.
    #[error("date must use the DD/MM/YYYY format")]
    Malformed,
    /// The text names a day that does not exist, such as `31/02/2026`.
    #[error("{text} is not a calendar date")]
    NonexistentDate {
        /// Rejected input.
        text: String,
    },
    /// The date falls outside the bookable window.
    #[error("date must fall between {earliest} and {latest}")]
    OutsideWindow {
        /// First bookable date.
        earliest: NaiveDate,
        /// Last bookable date.
        latest: NaiveDate,
    },
}

static DATE_RE: OnceLock<Regex> = OnceLock::new();

fn date_regex() -> &'static Regex {
    DATE_RE.get_or_init(|| {
        // ASCII classes only; `\d` would admit other Unicode digits.
        let pattern = "^([0-9]{2})/([0-9]{2})/([0-9]{4})$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("date regex failed to compile: {error}"))
    })
}

/// Re-mask free-form input as a progressively built `DD/MM/YYYY` string.
///
/// Every non-digit is stripped, at most eight digits are kept, and `/` is
/// inserted after the day and month groups. The result depends only on
/// `raw`, so it can be applied on every keystroke.
///
/// # Examples
/// ```
/// use clinic::domain::format_date_input;
///
/// assert_eq!(format_date_input("1"), "1");
/// assert_eq!(format_date_input("150"), "15/0");
/// assert_eq!(format_date_input("15/06/20251"), "15/06/2025");
/// ```
pub fn format_date_input(raw: &str) -> String {
    let mut formatted = String::with_capacity(DATE_DIGITS + 2);
    let digits = raw.chars().filter(|ch| ch.is_ascii_digit()).take(DATE_DIGITS);
    for (index, digit) in digits.enumerate() {
        if index == 2 || index == 4 {
            formatted.push('/');
        }
        formatted.push(digit);
    }
    formatted
}

/// Parse exact `DD/MM/YYYY` text into a calendar date.
///
/// The displayed month is the calendar month (`03` is March). Days that do
/// not exist are rejected rather than rolled into the following month.
pub fn parse_date_text(text: &str) -> Result<NaiveDate, DateValidationError> {
    let captures = date_regex()
        .captures(text)
        .ok_or(DateValidationError::Malformed)?;
    let field = |index: usize| -> Result<u32, DateValidationError> {
        captures
            .get(index)
            .and_then(|group| group.as_str().parse().ok())
            .ok_or(DateValidationError::Malformed)
    };
    let day = field(1)?;
    let month = field(2)?;
    let year = i32::try_from(field(3)?).map_err(|_| DateValidationError::Malformed)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| DateValidationError::NonexistentDate {
        text: text.to_owned(),
    })
}
