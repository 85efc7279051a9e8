//! Scheduling rules that gate appointment creation.
//!
//! Everything here is free of side effects apart from reading the injected
//! clock: slot generation, the date input mask, date parsing and the
//! bookable window.

mod date_input;
mod slots;
mod window;

pub use date_input::{DATE_DIGITS, DateValidationError, format_date_input, parse_date_text};
pub use slots::{
    CLOSING_HOUR, OPENING_HOUR, SLOT_COUNT, SLOT_MINUTES, TimeSlot, TimeSlotParseError,
    generate_time_slots,
};
pub use window::{BookingWindow, SchedulingValidator};

#[cfg(test)]
mod tests;
