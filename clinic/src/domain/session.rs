//! Session store: the single owner of "who is signed in".
//!
//! The store publishes its [`SessionState`] through a `watch` channel so
//! screens re-render on change. Sign-in, registration, sign-out and profile
//! updates run one at a time behind an operation lock, and every call to
//! the auth service or storage is bounded by a timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::{Mutex, watch};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AuthService, AuthServiceError, AuthSession, KeyValueStore, KeyValueStoreError, SessionContext,
};
use crate::domain::{CredentialToken, DomainError, Identity, LoginCredentials, RegistrationData};

/// Storage key holding the signed-in identity as JSON.
pub const SESSION_USER_KEY: &str = "session/user";
/// Storage key holding the opaque credential token.
pub const SESSION_TOKEN_KEY: &str = "session/token";

/// Identity and token of a signed-in user. One never exists without the
/// other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    identity: Identity,
    token: CredentialToken,
}

impl ActiveSession {
    /// Pair an identity with its credential.
    pub fn new(identity: Identity, token: CredentialToken) -> Self {
        Self { identity, token }
    }

    /// Signed-in user.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Credential for the auth service.
    pub fn token(&self) -> &CredentialToken {
        &self.token
    }
}

impl From<AuthSession> for ActiveSession {
    fn from(value: AuthSession) -> Self {
        Self::new(value.user, value.token)
    }
}

/// Observable session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Persisted session not yet restored. Render nothing.
    Loading,
    /// Restored, nobody signed in.
    Unauthenticated,
    /// A user is signed in.
    Authenticated(ActiveSession),
}

impl SessionState {
    /// Signed-in identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(session) => Some(session.identity()),
            Self::Loading | Self::Unauthenticated => None,
        }
    }

    /// Whether restoration is still pending.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Upper bounds for collaborator calls made by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimeouts {
    /// Limit for each auth service call.
    pub auth: Duration,
    /// Limit for each storage call.
    pub storage: Duration,
}

impl SessionTimeouts {
    /// Default auth service limit.
    pub const DEFAULT_AUTH: Duration = Duration::from_secs(10);
    /// Default storage limit.
    pub const DEFAULT_STORAGE: Duration = Duration::from_secs(5);
}

impl Default for SessionTimeouts {
    fn default() -> Self {
        Self {
            auth: Self::DEFAULT_AUTH,
            storage: Self::DEFAULT_STORAGE,
        }
    }
}

/// Holds the current session and keeps it in step with durable storage.
///
/// Share it as an `Arc<SessionStore>` (or `Arc<dyn SessionContext>`); there
/// is no process-wide instance.
pub struct SessionStore {
    auth: Arc<dyn AuthService>,
    storage: Arc<dyn KeyValueStore>,
    timeouts: SessionTimeouts,
    state: watch::Sender<SessionState>,
    op_lock: Mutex<()>,
}

impl SessionStore {
    /// Create a store in the [`SessionState::Loading`] state.
    pub fn new(
        auth: Arc<dyn AuthService>,
        storage: Arc<dyn KeyValueStore>,
        timeouts: SessionTimeouts,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            auth,
            storage,
            timeouts,
            state,
            op_lock: Mutex::new(()),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn map_auth_error(error: AuthServiceError) -> DomainError {
        match error {
            AuthServiceError::InvalidCredentials => {
                DomainError::unauthorized("invalid email or password")
            }
            AuthServiceError::AlreadyRegistered { email } => {
                DomainError::conflict("an account already exists for this email")
                    .with_details(json!({ "email": email, "code": "already_registered" }))
            }
            AuthServiceError::Unavailable { message } => {
                DomainError::service_unavailable(format!("auth service unavailable: {message}"))
            }
            AuthServiceError::Rejected { message } => DomainError::invalid_request(format!(
                "auth service rejected the request: {message}"
            )),
        }
    }

    fn map_storage_error(error: KeyValueStoreError) -> DomainError {
        match error {
            KeyValueStoreError::InvalidKey { key } => {
                DomainError::internal(format!("storage key is not usable: {key}"))
            }
            KeyValueStoreError::Io { message } => {
                DomainError::service_unavailable(format!("session storage unavailable: {message}"))
            }
        }
    }

    async fn call_auth<T, F>(&self, operation: &'static str, call: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, AuthServiceError>>,
    {
        match timeout(self.timeouts.auth, call).await {
            Ok(result) => result.map_err(Self::map_auth_error),
            Err(_) => Err(DomainError::timeout(format!("auth service {operation} timed out"))),
        }
    }

    async fn call_storage<T, F>(&self, operation: &'static str, call: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, KeyValueStoreError>>,
    {
        match timeout(self.timeouts.storage, call).await {
            Ok(result) => result.map_err(Self::map_storage_error),
            Err(_) => Err(DomainError::timeout(format!("session storage {operation} timed out"))),
        }
    }

    /// Load the persisted session and leave the loading state.
    ///
    /// A half-present or malformed pair is cleared. Storage failures are
    /// logged and treated as "nobody signed in".
    pub async fn restore(&self) {
        let _guard = self.op_lock.lock().await;

        if let Err(err) = self
            .call_auth("load_registered_users", self.auth.load_registered_users())
            .await
        {
            warn!(error = %err, "failed to load registered users");
        }

        let next = match self.load_persisted().await {
            Ok(Some(session)) => {
                info!(
                    user_id = %session.identity().id(),
                    role = %session.identity().role(),
                    "session restored"
                );
                SessionState::Authenticated(session)
            }
            Ok(None) => SessionState::Unauthenticated,
            Err(err) => {
                warn!(error = %err, "failed to read persisted session");
                SessionState::Unauthenticated
            }
        };
        self.state.send_replace(next);
    }

    async fn load_persisted(&self) -> Result<Option<ActiveSession>, DomainError> {
        let user = self
            .call_storage("get", self.storage.get(SESSION_USER_KEY))
            .await?;
        let token = self
            .call_storage("get", self.storage.get(SESSION_TOKEN_KEY))
            .await?;

        let (user, token) = match (user, token) {
            (None, None) => return Ok(None),
            (Some(user), Some(token)) => (user, token),
            (user, token) => {
                warn!(
                    has_user = user.is_some(),
                    has_token = token.is_some(),
                    "discarding incomplete persisted session"
                );
                self.clear_persisted().await;
                return Ok(None);
            }
        };

        let parsed = serde_json::from_str::<Identity>(&user)
            .map_err(|err| err.to_string())
            .and_then(|identity| {
                CredentialToken::new(token)
                    .map(|token| ActiveSession::new(identity, token))
                    .map_err(|err| err.to_string())
            });
        match parsed {
            Ok(session) => Ok(Some(session)),
            Err(reason) => {
                warn!(%reason, "discarding malformed persisted session");
                self.clear_persisted().await;
                Ok(None)
            }
        }
    }

    async fn persist_identity(&self, identity: &Identity) -> Result<(), DomainError> {
        let user = serde_json::to_string(identity)
            .map_err(|err| DomainError::internal(format!("failed to serialise identity: {err}")))?;
        self.call_storage("set", self.storage.set(SESSION_USER_KEY, &user))
            .await
    }

    async fn persist(&self, session: &ActiveSession) -> Result<(), DomainError> {
        self.persist_identity(session.identity()).await?;
        self.call_storage(
            "set",
            self.storage.set(SESSION_TOKEN_KEY, session.token().expose()),
        )
        .await
    }

    async fn clear_persisted(&self) {
        for key in [SESSION_USER_KEY, SESSION_TOKEN_KEY] {
            if let Err(err) = self.call_storage("remove", self.storage.remove(key)).await {
                warn!(key, error = %err, "failed to remove persisted session key");
            }
        }
    }

    async fn start_session(&self, issued: AuthSession) -> Identity {
        let session = ActiveSession::from(issued);
        let identity = session.identity().clone();
        self.state
            .send_replace(SessionState::Authenticated(session.clone()));
        if let Err(err) = self.persist(&session).await {
            warn!(user_id = %identity.id(), error = %err, "failed to persist session");
        }
        info!(user_id = %identity.id(), role = %identity.role(), "session started");
        identity
    }

    /// Authenticate and start a session.
    ///
    /// On failure the state is unchanged. A persistence failure after the
    /// service accepted the credentials is logged, not returned.
    pub async fn sign_in(&self, credentials: &LoginCredentials) -> Result<Identity, DomainError> {
        let _guard = self.op_lock.lock().await;
        let issued = self
            .call_auth("sign_in", self.auth.sign_in(credentials))
            .await
            .inspect_err(|err| debug!(error = %err, "sign-in failed"))?;
        Ok(self.start_session(issued).await)
    }

    /// Create an account and start a session for it.
    pub async fn register(&self, data: &RegistrationData) -> Result<Identity, DomainError> {
        let _guard = self.op_lock.lock().await;
        let issued = self
            .call_auth("register", self.auth.register(data))
            .await
            .inspect_err(|err| debug!(error = %err, "registration failed"))?;
        Ok(self.start_session(issued).await)
    }

    /// End the session. The local session is always cleared, whatever the
    /// auth service or storage report.
    pub async fn sign_out(&self) {
        let _guard = self.op_lock.lock().await;
        if let Err(err) = self.call_auth("sign_out", self.auth.sign_out()).await {
            warn!(error = %err, "auth service sign-out failed");
        }
        self.state.send_replace(SessionState::Unauthenticated);
        self.clear_persisted().await;
        info!("session ended");
    }

    /// Replace the signed-in identity and persist it.
    ///
    /// Fails with `Unauthorized` when nobody is signed in. The in-memory
    /// identity is replaced before writing, so a storage failure leaves the
    /// new identity visible but unsaved.
    pub async fn update_user(&self, identity: Identity) -> Result<(), DomainError> {
        let _guard = self.op_lock.lock().await;
        let token = match &*self.state.borrow() {
            SessionState::Authenticated(session) => session.token().clone(),
            SessionState::Loading | SessionState::Unauthenticated => {
                return Err(DomainError::unauthorized("no active session"));
            }
        };
        self.state
            .send_replace(SessionState::Authenticated(ActiveSession::new(
                identity.clone(),
                token,
            )));
        self.persist_identity(&identity).await
    }
}

#[async_trait]
impl SessionContext for SessionStore {
    fn current_identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    fn subscribe(&self) -> watch::Receiver<SessionState> {
        SessionStore::subscribe(self)
    }

    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<Identity, DomainError> {
        SessionStore::sign_in(self, credentials).await
    }

    async fn register(&self, data: &RegistrationData) -> Result<Identity, DomainError> {
        SessionStore::register(self, data).await
    }

    async fn sign_out(&self) {
        SessionStore::sign_out(self).await;
    }

    async fn update_user(&self, identity: Identity) -> Result<(), DomainError> {
        SessionStore::update_user(self, identity).await
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
