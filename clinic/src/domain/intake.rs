//! Appointment intake: validates a draft and hands the resulting request to
//! the booking collaborator.
//!
//! Rejections are user-correctable and only logged at debug level. Failures
//! of the availability or booking collaborators surface as domain
//! [`DomainError`]s. Nothing is retried.

use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::ports::{
    BookingService, BookingServiceError, SlotAvailability, SlotAvailabilityError,
};
use crate::domain::{
    AppointmentDraft, AppointmentRequest, DateValidationError, DomainError, DraftField,
    SchedulingValidator, TimeSlot, TimeSlotParseError,
};

/// Why a draft cannot be submitted as it stands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeRejection {
    /// Required fields are blank.
    #[error("missing required fields: {}", join_fields(.fields))]
    MissingFields {
        /// Blank fields in display order.
        fields: Vec<DraftField>,
    },
    /// Date text does not name a bookable date.
    #[error("invalid date: {0}")]
    InvalidDate(#[source] DateValidationError),
    /// Selected time is not on the slot grid.
    #[error("invalid time: {0}")]
    InvalidTime(#[source] TimeSlotParseError),
    /// The slot is already taken.
    #[error("time slot {time} is not available")]
    SlotUnavailable {
        /// Slot that was requested.
        time: TimeSlot,
    },
}

fn join_fields(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Outcome of a failed submission.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// The draft failed validation; nothing was booked.
    #[error(transparent)]
    Rejected(#[from] IntakeRejection),
    /// A collaborator failed.
    #[error(transparent)]
    Collaborator(#[from] DomainError),
}

/// Validates drafts and books the resulting requests.
#[derive(Clone)]
pub struct AppointmentIntake<A, B> {
    validator: SchedulingValidator,
    availability: Arc<A>,
    booking: Arc<B>,
}

impl<A, B> AppointmentIntake<A, B> {
    /// Create an intake over the given validator and collaborators.
    pub fn new(validator: SchedulingValidator, availability: Arc<A>, booking: Arc<B>) -> Self {
        Self {
            validator,
            availability,
            booking,
        }
    }

    /// Validator used for date checks.
    pub fn validator(&self) -> &SchedulingValidator {
        &self.validator
    }
}

impl<A, B> AppointmentIntake<A, B>
where
    A: SlotAvailability,
    B: BookingService,
{
    fn map_availability_error(error: SlotAvailabilityError) -> DomainError {
        match error {
            SlotAvailabilityError::Unavailable { message } => DomainError::service_unavailable(
                format!("availability source unavailable: {message}"),
            ),
        }
    }

    fn map_booking_error(error: BookingServiceError) -> DomainError {
        match error {
            BookingServiceError::SlotTaken { time } => {
                DomainError::conflict("time slot already booked")
                    .with_details(json!({ "time": time, "code": "slot_taken" }))
            }
            BookingServiceError::Unavailable { message } => {
                DomainError::service_unavailable(format!("booking service unavailable: {message}"))
            }
            BookingServiceError::Rejected { message } => {
                DomainError::invalid_request(format!("booking rejected: {message}"))
            }
        }
    }

    fn reject(draft: &AppointmentDraft, rejection: IntakeRejection) -> IntakeError {
        debug!(
            doctor_id = %draft.doctor_id(),
            date = %draft.raw_date_text(),
            time = %draft.selected_time(),
            reason = %rejection,
            "appointment draft rejected"
        );
        IntakeError::Rejected(rejection)
    }

    /// Validate `draft` and, if it passes, book it exactly once.
    ///
    /// Checks run in order: required fields, date, time grid, availability.
    /// The first failing check decides the rejection.
    pub async fn submit(&self, draft: &AppointmentDraft) -> Result<AppointmentRequest, IntakeError> {
        let fields = draft.missing_fields();
        if !fields.is_empty() {
            return Err(Self::reject(draft, IntakeRejection::MissingFields { fields }));
        }

        let date = self
            .validator
            .resolve_date(draft.raw_date_text())
            .map_err(|err| Self::reject(draft, IntakeRejection::InvalidDate(err)))?;

        let time: TimeSlot = draft
            .selected_time()
            .parse()
            .map_err(|err| Self::reject(draft, IntakeRejection::InvalidTime(err)))?;

        let available = self
            .availability
            .is_available(draft.doctor_id(), date, time)
            .await
            .map_err(Self::map_availability_error)?;
        if !available {
            return Err(Self::reject(draft, IntakeRejection::SlotUnavailable { time }));
        }

        let request = AppointmentRequest::new(
            draft.doctor_id().to_owned(),
            date,
            time,
            draft.description().to_owned(),
        );
        self.booking
            .book(&request)
            .await
            .map_err(Self::map_booking_error)?;
        info!(
            doctor_id = %request.doctor_id(),
            date = %request.date(),
            time = %request.time(),
            "appointment booked"
        );
        Ok(request)
    }
}

#[cfg(test)]
#[path = "intake_tests.rs"]
mod tests;
