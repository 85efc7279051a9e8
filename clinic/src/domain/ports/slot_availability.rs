//! Capability answering whether a time slot can still be booked.
//!
//! Intake consults this port before handing a request to the booking
//! collaborator, so a real conflict source can replace [`AlwaysAvailable`]
//! without touching the intake flow.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::TimeSlot;

use super::define_port_error;

define_port_error! {
    /// Errors raised by availability adapters.
    pub enum SlotAvailabilityError {
        /// The availability source could not be reached.
        Unavailable { message: String } => "availability source unavailable: {message}",
    }
}

/// Port answering whether a doctor's slot on a date can still be booked.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlotAvailability: Send + Sync {
    /// Whether `slot` on `date` with `doctor_id` is free.
    async fn is_available(
        &self,
        doctor_id: &str,
        date: NaiveDate,
        slot: TimeSlot,
    ) -> Result<bool, SlotAvailabilityError>;
}

/// Reports every slot as free; the booking collaborator performs the
/// authoritative check.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysAvailable;

#[async_trait]
impl SlotAvailability for AlwaysAvailable {
    async fn is_available(
        &self,
        _doctor_id: &str,
        _date: NaiveDate,
        _slot: TimeSlot,
    ) -> Result<bool, SlotAvailabilityError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::generate_time_slots;

    #[tokio::test]
    async fn always_available_accepts_every_grid_slot() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date");
        for slot in generate_time_slots() {
            let available = AlwaysAvailable
                .is_available("1", date, slot)
                .await
                .expect("infallible");
            assert!(available, "{slot} should be available");
        }
    }
}
