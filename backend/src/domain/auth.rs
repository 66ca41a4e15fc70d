//! Registration and login payloads.
//!
//! Handlers hand raw strings to these constructors, which trim every field
//! and reject blanks before any port is called.

use std::fmt;

use zeroize::Zeroizing;

use super::{EmailAddress, Error, UserName};

/// Domain error returned when a credential payload is incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Name was missing or blank once trimmed.
    EmptyName,
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was missing or blank once trimmed.
    EmptyPassword,
}

impl CredentialValidationError {
    /// Wire name of the offending field.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyEmail => "email",
            Self::EmptyPassword => "password",
        }
    }
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} must not be empty", self.field())
    }
}

impl std::error::Error for CredentialValidationError {}

impl From<CredentialValidationError> for Error {
    fn from(value: CredentialValidationError) -> Self {
        Self::missing_field(value.field())
    }
}

fn trimmed_password(raw: &str) -> Result<Zeroizing<String>, CredentialValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CredentialValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(trimmed.to_owned()))
}

/// Validated registration request.
///
/// # Examples
/// ```
/// use todo_backend::domain::Registration;
///
/// let reg = Registration::try_from_parts(" Ada ", "ada@example.com", "pw").unwrap();
/// assert_eq!(reg.name().as_ref(), "Ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: UserName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw inputs in field order: name, email, password.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let name = UserName::new(name).map_err(|_| CredentialValidationError::EmptyName)?;
        let email = EmailAddress::new(email).map_err(|_| CredentialValidationError::EmptyEmail)?;
        let password = trimmed_password(password)?;
        Ok(Self {
            name,
            email,
            password,
        })
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` and `password` are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let email = EmailAddress::new(email).map_err(|_| CredentialValidationError::EmptyEmail)?;
        let password = trimmed_password(password)?;
        Ok(Self { email, password })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
