//! Bookable date window and the clock-aware validator built on it.

use std::sync::Arc;

use chrono::{Months, NaiveDate};
use mockable::Clock;

use super::date_input::{DateValidationError, parse_date_text};

/// Inclusive window `[today, today + months]` of bookable dates.
///
/// Month addition clamps to the last day of the target month: 31 January
/// plus three months is 30 April, and 30 November plus three months is the
/// last day of February.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    months: u32,
}

impl BookingWindow {
    /// Default look-ahead in calendar months.
    pub const DEFAULT_MONTHS: u32 = 3;

    /// Window reaching `months` calendar months past today.
    pub fn new(months: u32) -> Self {
        Self { months }
    }

    /// Look-ahead in calendar months.
    pub fn months(self) -> u32 {
        self.months
    }

    /// First and last bookable dates relative to `today`.
    pub fn bounds(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let latest = today
            .checked_add_months(Months::new(self.months))
            .unwrap_or(NaiveDate::MAX);
        (today, latest)
    }

    /// Whether `date` is bookable when the current day is `today`.
    pub fn contains(self, today: NaiveDate, date: NaiveDate) -> bool {
        let (earliest, latest) = self.bounds(today);
        (earliest..=latest).contains(&date)
    }

    /// Parse `text` and check it against the window.
    pub fn resolve(self, text: &str, today: NaiveDate) -> Result<NaiveDate, DateValidationError> {
        let date = parse_date_text(text)?;
        if self.contains(today, date) {
            return Ok(date);
        }
        let (earliest, latest) = self.bounds(today);
        Err(DateValidationError::OutsideWindow { earliest, latest })
    }
}

impl Default for BookingWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MONTHS)
    }
}

/// Date checks gating appointment creation, anchored to an injected clock.
///
/// "Today" is the device-local calendar date.
#[derive(Clone)]
pub struct SchedulingValidator {
    clock: Arc<dyn Clock>,
    window: BookingWindow,
}

impl SchedulingValidator {
    /// Build a validator from a clock and booking window.
    pub fn new(clock: Arc<dyn Clock>, window: BookingWindow) -> Self {
        Self { clock, window }
    }

    /// Current local calendar date.
    pub fn today(&self) -> NaiveDate {
        self.clock.local().date_naive()
    }

    /// Configured booking window.
    pub fn window(&self) -> BookingWindow {
        self.window
    }

    /// Whether `text` is an exact `DD/MM/YYYY` date inside the window.
    pub fn validate_date(&self, text: &str) -> bool {
        self.resolve_date(text).is_ok()
    }

    /// Resolve `text` into a bookable calendar date.
    pub fn resolve_date(&self, text: &str) -> Result<NaiveDate, DateValidationError> {
        self.window.resolve(text, self.today())
    }
}
