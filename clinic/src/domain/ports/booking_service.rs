//! Driven port for the booking collaborator that persists appointments.
//!
//! The intake hands over a fully validated [`AppointmentRequest`]; the
//! collaborator owns the authoritative conflict check.

use async_trait::async_trait;
use tracing::info;

use crate::domain::AppointmentRequest;

use super::define_port_error;

define_port_error! {
    /// Errors raised by booking adapters.
    pub enum BookingServiceError {
        /// The slot was taken between validation and booking.
        SlotTaken { time: String } => "time slot {time} is no longer available",
        /// The booking backend could not be reached.
        Unavailable { message: String } => "booking service unavailable: {message}",
        /// The booking backend refused the request.
        Rejected { message: String } => "booking rejected: {message}",
    }
}

/// Port that records a validated appointment request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingService: Send + Sync {
    /// Book a validated appointment request.
    async fn book(&self, request: &AppointmentRequest) -> Result<(), BookingServiceError>;
}

/// Booking collaborator that accepts every request and only logs it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookingService;

#[async_trait]
impl BookingService for FixtureBookingService {
    async fn book(&self, request: &AppointmentRequest) -> Result<(), BookingServiceError> {
        info!(
            doctor_id = %request.doctor_id(),
            date = %request.date(),
            time = %request.time(),
            "appointment accepted by fixture booking service"
        );
        Ok(())
    }
}
