//! Driven port for the external auth service.
//!
//! The session store only depends on this request/response contract. The
//! fixture keeps an in-memory account list so the client can run without a
//! backend.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::{CredentialToken, Identity, LoginCredentials, RegistrationData, Role};

use super::define_port_error;

define_port_error! {
    /// Errors raised by auth service adapters.
    pub enum AuthServiceError {
        /// Email and password did not match an account.
        InvalidCredentials => "invalid email or password",
        /// Registration collided with an existing account.
        AlreadyRegistered { email: String } => "an account already exists for {email}",
        /// The service could not be reached.
        Unavailable { message: String } => "auth service unavailable: {message}",
        /// The service answered with something the client cannot use.
        Rejected { message: String } => "auth service rejected the request: {message}",
    }
}

/// Identity and credential issued together by a successful sign-in or
/// registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Signed-in user.
    pub user: Identity,
    /// Credential paired with `user`.
    pub token: CredentialToken,
}

/// Port for credential verification and account registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify credentials and issue a session.
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<AuthSession, AuthServiceError>;

    /// Create a registered-user record and issue a session for it.
    async fn register(&self, data: &RegistrationData) -> Result<AuthSession, AuthServiceError>;

    /// End the server-side session, if any.
    async fn sign_out(&self) -> Result<(), AuthServiceError>;

    /// Warm the service's registered-user list.
    async fn load_registered_users(&self) -> Result<(), AuthServiceError>;
}

/// Password shared by the seeded fixture accounts.
pub const FIXTURE_PASSWORD: &str = "123456";

struct FixtureAccount {
    email: String,
    password: Zeroizing<String>,
    identity: Identity,
}

/// In-memory auth service seeded with one account per role.
///
/// | email | role |
/// |---|---|
/// | `admin@clinic.test` | admin |
/// | `doctor@clinic.test` | doctor |
/// | `patient@clinic.test` | patient |
///
/// All seeded accounts use [`FIXTURE_PASSWORD`]. Registered accounts are
/// patients and live until the service is dropped.
pub struct FixtureAuthService {
    accounts: Mutex<Vec<FixtureAccount>>,
}

impl FixtureAuthService {
    /// Build the service with the seeded accounts.
    pub fn new() -> Self {
        let seeded = [
            ("admin@clinic.test", "admin", "Clinic Admin", Role::Admin),
            ("doctor@clinic.test", "1", "Dr. João Silva", Role::Doctor),
            ("patient@clinic.test", "patient", "Ana Souza", Role::Patient),
        ];
        let accounts = seeded
            .into_iter()
            .filter_map(|(email, id, name, role)| {
                Identity::try_new(id, name, role, "")
                    .ok()
                    .map(|identity| FixtureAccount {
                        email: email.to_owned(),
                        password: Zeroizing::new(FIXTURE_PASSWORD.to_owned()),
                        identity,
                    })
            })
            .collect();
        Self {
            accounts: Mutex::new(accounts),
        }
    }

    fn issue(identity: Identity) -> Result<AuthSession, AuthServiceError> {
        let token = CredentialToken::new(format!("fixture-{}", Uuid::new_v4()))
            .map_err(|err| AuthServiceError::rejected(err.to_string()))?;
        Ok(AuthSession {
            user: identity,
            token,
        })
    }
}

impl Default for FixtureAuthService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthService for FixtureAuthService {
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<AuthSession, AuthServiceError> {
        let accounts = self.accounts.lock().await;
        let account = accounts
            .iter()
            .find(|account| {
                account.email.eq_ignore_ascii_case(credentials.email())
                    && account.password.as_str() == credentials.password()
            })
            .ok_or_else(AuthServiceError::invalid_credentials)?;
        Self::issue(account.identity.clone())
    }

    async fn register(&self, data: &RegistrationData) -> Result<AuthSession, AuthServiceError> {
        let mut accounts = self.accounts.lock().await;
        let email = data.credentials().email();
        if accounts
            .iter()
            .any(|account| account.email.eq_ignore_ascii_case(email))
        {
            return Err(AuthServiceError::already_registered(email));
        }

        let identity = Identity::try_new(Uuid::new_v4().to_string(), data.name(), Role::Patient, "")
            .map_err(|err| AuthServiceError::rejected(err.to_string()))?;
        accounts.push(FixtureAccount {
            email: email.to_owned(),
            password: Zeroizing::new(data.credentials().password().to_owned()),
            identity: identity.clone(),
        });
        Self::issue(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthServiceError> {
        Ok(())
    }

    async fn load_registered_users(&self) -> Result<(), AuthServiceError> {
        let count = self.accounts.lock().await.len();
        debug!(count, "fixture registered users loaded");
        Ok(())
    }
}
