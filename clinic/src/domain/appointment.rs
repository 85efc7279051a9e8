//! Appointment drafts composed by the user and the validated requests built
//! from them.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::scheduling::{DateValidationError, SchedulingValidator, TimeSlot, format_date_input};

/// Draft field that must be filled before submitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    /// No doctor selected.
    Doctor,
    /// No time slot selected.
    Time,
    /// Description left blank.
    Description,
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Doctor => "doctor",
            Self::Time => "time",
            Self::Description => "description",
        })
    }
}

/// In-progress, unvalidated booking selections.
///
/// Date text is re-masked on every edit, so `raw_date_text` always holds
/// the progressively built `DD/MM/YYYY` form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentDraft {
    doctor_id: String,
    raw_date_text: String,
    selected_time: String,
    description: String,
}

impl AppointmentDraft {
    /// Empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the doctor to book with.
    pub fn select_doctor(&mut self, doctor_id: impl Into<String>) -> &mut Self {
        self.doctor_id = doctor_id.into();
        self
    }

    /// Apply a keystroke's worth of date text through the input mask.
    pub fn enter_date(&mut self, text: &str) -> &mut Self {
        self.raw_date_text = format_date_input(text);
        self
    }

    /// Select a time slot by its `HH:MM` label.
    pub fn select_time(&mut self, time: impl Into<String>) -> &mut Self {
        self.selected_time = time.into();
        self
    }

    /// Set the free-text reason for the visit.
    pub fn describe(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    /// Selected doctor id; empty when none.
    pub fn doctor_id(&self) -> &str {
        self.doctor_id.as_str()
    }

    /// Masked date text.
    pub fn raw_date_text(&self) -> &str {
        self.raw_date_text.as_str()
    }

    /// Selected time label; empty when none.
    pub fn selected_time(&self) -> &str {
        self.selected_time.as_str()
    }

    /// Visit description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Required fields that are still blank, in form order.
    pub fn missing_fields(&self) -> Vec<DraftField> {
        [
            (DraftField::Doctor, self.doctor_id.as_str()),
            (DraftField::Time, self.selected_time.as_str()),
            (DraftField::Description, self.description.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Inline hint for the date field: `None` while the field is empty or
    /// valid, otherwise why the current text cannot be booked.
    pub fn date_hint(&self, validator: &SchedulingValidator) -> Option<DateValidationError> {
        if self.raw_date_text.is_empty() {
            return None;
        }
        validator.resolve_date(&self.raw_date_text).err()
    }
}

/// Validated, immutable appointment handed to the booking collaborator.
///
/// Only [`crate::domain::AppointmentIntake`] constructs requests, after every
/// field has passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    doctor_id: String,
    date: NaiveDate,
    time: TimeSlot,
    description: String,
}

impl AppointmentRequest {
    pub(crate) fn new(
        doctor_id: String,
        date: NaiveDate,
        time: TimeSlot,
        description: String,
    ) -> Self {
        Self {
            doctor_id,
            date,
            time,
            description,
        }
    }

    /// Doctor being booked.
    pub fn doctor_id(&self) -> &str {
        self.doctor_id.as_str()
    }

    /// Resolved calendar date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Booked slot.
    pub fn time(&self) -> TimeSlot {
        self.time
    }

    /// Visit description as entered.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}
