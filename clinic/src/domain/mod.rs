//! Domain primitives and services for the clinic client.
//!
//! Purpose: hold who is signed in, gate appointment creation and keep the
//! unread-notification badge current. Everything outside this module talks
//! to it through the traits in [`ports`].
//!
//! Public surface:
//! - DomainError / ErrorCode: failure payload shared by every service.
//! - Identity, Role, CredentialToken: the signed-in user and credential.
//! - SessionStore / SessionState: session lifecycle and persistence.
//! - SchedulingValidator, TimeSlot, format_date_input: scheduling rules.
//! - AppointmentDraft, AppointmentIntake, AppointmentRequest: booking.
//! - NotificationCounter: background unread count.
//! - Landing: top-level navigation for a session state.

pub mod appointment;
pub mod auth;
pub mod doctor;
pub mod error;
pub mod identity;
pub mod intake;
pub mod landing;
pub mod notifications;
pub mod ports;
pub mod scheduling;
pub mod session;

pub use self::appointment::{AppointmentDraft, AppointmentRequest, DraftField};
pub use self::auth::{CredentialsValidationError, LoginCredentials, RegistrationData};
pub use self::doctor::Doctor;
pub use self::error::{DomainError, DomainErrorValidationError, ErrorCode};
pub use self::identity::{CredentialToken, Identity, IdentityValidationError, Role, UserId};
pub use self::intake::{AppointmentIntake, IntakeError, IntakeRejection};
pub use self::landing::{Dashboard, Landing};
pub use self::notifications::{BADGE_MAX, CounterSettings, NotificationCounter, badge_label};
pub use self::scheduling::{
    BookingWindow, CLOSING_HOUR, DATE_DIGITS, DateValidationError, OPENING_HOUR, SLOT_COUNT,
    SLOT_MINUTES, SchedulingValidator, TimeSlot, TimeSlotParseError, format_date_input,
    generate_time_slots, parse_date_text,
};
pub use self::session::{
    ActiveSession, SESSION_TOKEN_KEY, SESSION_USER_KEY, SessionState, SessionStore,
    SessionTimeouts,
};
