//! Fixed half-hour booking grid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// First bookable hour (inclusive).
pub const OPENING_HOUR: u8 = 9;
/// Closing hour (exclusive); no slot starts at this hour.
pub const CLOSING_HOUR: u8 = 18;
/// Grid step in minutes.
pub const SLOT_MINUTES: u8 = 30;
/// Number of slots offered per day.
pub const SLOT_COUNT: usize = (CLOSING_HOUR - OPENING_HOUR) as usize * 60 / SLOT_MINUTES as usize;

/// Errors raised when parsing `HH:MM` text into a [`TimeSlot`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeSlotParseError {
    /// The text is not two digits, a colon and two digits.
    #[error("time must use the HH:MM format")]
    Malformed,
    /// Well-formed, but not a point on the booking grid.
    #[error("{time} is not an offered time slot")]
    OffGrid {
        /// Rejected input.
        time: String,
    },
}

/// A point in the half-hour grid between 09:00 and 17:30 inclusive.
///
/// Rendered as 24-hour `HH:MM`. Ordering follows the time of day.
///
/// # Examples
/// ```
/// use clinic::domain::TimeSlot;
///
/// let slot: TimeSlot = "10:30".parse().unwrap();
/// assert_eq!(slot.to_string(), "10:30");
/// assert!("18:00".parse::<TimeSlot>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot {
    hour: u8,
    minute: u8,
}

impl TimeSlot {
    /// Hour of day, 24-hour clock.
    pub fn hour(self) -> u8 {
        self.hour
    }

    /// Minute within the hour.
    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Slot at `index` positions after opening. Indices past the grid are
    /// never produced by [`generate_time_slots`].
    fn from_index(index: usize) -> Self {
        let minutes = usize::from(OPENING_HOUR) * 60 + index * usize::from(SLOT_MINUTES);
        Self {
            hour: u8::try_from(minutes / 60).unwrap_or(CLOSING_HOUR),
            minute: u8::try_from(minutes % 60).unwrap_or(0),
        }
    }

    fn is_on_grid(hour: u8, minute: u8) -> bool {
        (OPENING_HOUR..CLOSING_HOUR).contains(&hour) && minute % SLOT_MINUTES == 0 && minute < 60
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeSlot {
    type Err = TimeSlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = s.split_once(':').ok_or(TimeSlotParseError::Malformed)?;
        let hour = two_digits(hour)?;
        let minute = two_digits(minute)?;
        if !Self::is_on_grid(hour, minute) {
            return Err(TimeSlotParseError::OffGrid { time: s.to_owned() });
        }
        Ok(Self { hour, minute })
    }
}

fn two_digits(part: &str) -> Result<u8, TimeSlotParseError> {
    if part.len() != 2 || !part.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(TimeSlotParseError::Malformed);
    }
    part.parse().map_err(|_| TimeSlotParseError::Malformed)
}

impl From<TimeSlot> for String {
    fn from(value: TimeSlot) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = TimeSlotParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Lazily yield every bookable slot, 09:00 through 17:30.
///
/// Each call returns a fresh iterator with identical output.
pub fn generate_time_slots() -> impl ExactSizeIterator<Item = TimeSlot> + Clone {
    (0..SLOT_COUNT).map(TimeSlot::from_index)
}
