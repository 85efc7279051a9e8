//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_service;
mod booking_service;
mod doctor_directory;
mod key_value_store;
mod notification_source;
mod session_context;
mod slot_availability;

#[cfg(test)]
pub use auth_service::MockAuthService;
pub use auth_service::{
    AuthService, AuthServiceError, AuthSession, FIXTURE_PASSWORD, FixtureAuthService,
};
#[cfg(test)]
pub use booking_service::MockBookingService;
pub use booking_service::{BookingService, BookingServiceError, FixtureBookingService};
#[cfg(test)]
pub use doctor_directory::MockDoctorDirectory;
pub use doctor_directory::{DoctorDirectory, DoctorDirectoryError, FixtureDoctorDirectory};
#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
pub use key_value_store::{KeyValueStore, KeyValueStoreError};
#[cfg(test)]
pub use notification_source::MockNotificationSource;
pub use notification_source::{
    FixtureNotificationSource, NotificationSource, NotificationSourceError,
};
#[cfg(test)]
pub use session_context::MockSessionContext;
pub use session_context::SessionContext;
#[cfg(test)]
pub use slot_availability::MockSlotAvailability;
pub use slot_availability::{AlwaysAvailable, SlotAvailability, SlotAvailabilityError};
