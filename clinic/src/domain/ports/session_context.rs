//! Driving port through which the view layer reads and changes the session.
//!
//! Screens depend on this capability set rather than on the concrete
//! [`crate::domain::SessionStore`], so tests can construct isolated stores
//! or substitute a double.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{DomainError, Identity, LoginCredentials, RegistrationData, SessionState};

/// Session capabilities shared with screens and background tasks.
///
/// Reads are synchronous snapshots. Mutating operations serialise inside
/// the implementation and publish the resulting state to subscribers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionContext: Send + Sync {
    /// Signed-in identity, if any.
    fn current_identity(&self) -> Option<Identity>;

    /// True until the persisted session has been restored. Callers must
    /// render nothing while loading rather than treat it as signed out.
    fn is_loading(&self) -> bool;

    /// Receiver that observes every published session state.
    fn subscribe(&self) -> watch::Receiver<SessionState>;

    /// Authenticate and start a session.
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<Identity, DomainError>;

    /// Create an account and start a session for it.
    async fn register(&self, data: &RegistrationData) -> Result<Identity, DomainError>;

    /// End the session. Never fails.
    async fn sign_out(&self);

    /// Replace the signed-in identity and persist it.
    async fn update_user(&self, identity: Identity) -> Result<(), DomainError>;
}
