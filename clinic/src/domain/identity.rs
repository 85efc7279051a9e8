//! Authenticated user identity and the credential token paired with it.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Validation errors returned by the identity constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    /// The user id was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The user id carried surrounding whitespace.
    #[error("user id must not contain surrounding whitespace")]
    InvalidId,
    /// The display name was blank.
    #[error("user name must not be empty")]
    EmptyName,
    /// The credential token was empty.
    #[error("credential token must not be empty")]
    EmptyToken,
}

/// Stable user identifier issued by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdentityValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(IdentityValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Role granted to an identity. Decides which dashboard the user lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Clinic administrator.
    Admin,
    /// Practising doctor.
    Doctor,
    /// Patient booking appointments.
    Patient,
}

impl Role {
    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Doctor => "doctor",
            Self::Patient => "patient",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated user's profile record.
///
/// ## Invariants
/// - `id` is non-empty with no surrounding whitespace.
/// - `name` is non-empty once trimmed.
///
/// Persisted as camelCase JSON under `session/user`.
///
/// # Examples
/// ```
/// use clinic::domain::{Identity, Role};
///
/// let identity = Identity::try_new("7", "Ana Souza", Role::Patient, "").unwrap();
/// assert_eq!(identity.id().as_ref(), "7");
/// assert_eq!(identity.role(), Role::Patient);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "IdentityDto", into = "IdentityDto")]
pub struct Identity {
    id: UserId,
    name: String,
    role: Role,
    image: String,
}

impl Identity {
    /// Validate raw parts and build an identity.
    pub fn try_new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        image: impl Into<String>,
    ) -> Result<Self, IdentityValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(IdentityValidationError::EmptyName);
        }
        Ok(Self {
            id: UserId::new(id)?,
            name,
            role,
            image: image.into(),
        })
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Granted role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Avatar URL; may be empty.
    pub fn image(&self) -> &str {
        self.image.as_str()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityDto {
    id: String,
    name: String,
    role: Role,
    #[serde(default)]
    image: String,
}

impl From<Identity> for IdentityDto {
    fn from(value: Identity) -> Self {
        Self {
            id: value.id.into(),
            name: value.name,
            role: value.role,
            image: value.image,
        }
    }
}

impl TryFrom<IdentityDto> for Identity {
    type Error = IdentityValidationError;

    fn try_from(value: IdentityDto) -> Result<Self, Self::Error> {
        Self::try_new(value.id, value.name, value.role, value.image)
    }
}

/// Opaque credential proving an authenticated session to the auth service.
///
/// The secret is wiped from memory on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialToken(Zeroizing<String>);

impl CredentialToken {
    /// Wrap a raw token string.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(IdentityValidationError::EmptyToken);
        }
        Ok(Self(Zeroizing::new(raw)))
    }

    /// Raw token value for the auth service or persistence.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for CredentialToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialToken(<redacted>)")
    }
}
