//! Port for the external source of unread notification counts.
use async_trait::async_trait;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification source adapters.
    pub enum NotificationSourceError {
        /// The notification backend could not be reached.
        Unavailable { message: String } => "notification source unavailable: {message}",
        /// The backend answered but the count could not be read.
        Query { message: String } => "notification count query failed: {message}",
    }
}

/// Port supplying per-user unread notification counts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// Number of unread notifications for `user_id`.
    async fn unread_count(&self, user_id: &UserId) -> Result<u32, NotificationSourceError>;
}

/// Notification source with an empty inbox for every user.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationSource;

#[async_trait]
impl NotificationSource for FixtureNotificationSource {
    async fn unread_count(&self, _user_id: &UserId) -> Result<u32, NotificationSourceError> {
        Ok(0)
    }
}
