//! Authentication primitives: sign-in credentials and registration data.
//!
//! Keep form parsing outside the session store by exposing constructors that
//! validate string inputs before anything talks to the auth service.

use zeroize::Zeroizing;

/// Domain error returned when sign-in or registration values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Registration name was missing or blank once trimmed.
    #[error("name must not be empty")]
    EmptyName,
}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use clinic::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin@clinic.test ", "123456").unwrap();
/// assert_eq!(creds.email(), "admin@clinic.test");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            email: normalise_email(email)?,
            password: checked_password(password)?,
        })
    }

    /// Normalised email used for account lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload for a new patient account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationData {
    name: String,
    credentials: LoginCredentials,
}

impl RegistrationData {
    /// Construct registration data from raw form inputs.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CredentialsValidationError::EmptyName);
        }
        Ok(Self {
            name: name.to_owned(),
            credentials: LoginCredentials::try_from_parts(email, password)?,
        })
    }

    /// Trimmed display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Credentials the new account signs in with.
    pub fn credentials(&self) -> &LoginCredentials {
        &self.credentials
    }
}

fn normalise_email(email: &str) -> Result<String, CredentialsValidationError> {
    let normalised = email.trim();
    if normalised.is_empty() {
        return Err(CredentialsValidationError::EmptyEmail);
    }
    Ok(normalised.to_owned())
}

fn checked_password(password: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if password.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::EmptyEmail)]
    #[case("   ", "pw", CredentialsValidationError::EmptyEmail)]
    #[case("user@clinic.test", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  admin@clinic.test  ", "secret")]
    #[case("ana@clinic.test", " padded password ")]
    fn valid_credentials_trim_email_only(#[case] email: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(email, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.email(), email.trim());
        assert_eq!(creds.password(), password);
    }

    #[test]
    fn registration_requires_a_name() {
        let err = RegistrationData::try_from_parts(" ", "ana@clinic.test", "pw")
            .expect_err("blank name");
        assert_eq!(err, CredentialsValidationError::EmptyName);
    }

    #[test]
    fn registration_trims_name() {
        let data = RegistrationData::try_from_parts(" Ana Souza ", "ana@clinic.test", "pw")
            .expect("valid registration");
        assert_eq!(data.name(), "Ana Souza");
        assert_eq!(data.credentials().email(), "ana@clinic.test");
    }
}
