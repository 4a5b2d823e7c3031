//! Authentication primitives: login credentials and signup requests.
//!
//! Inbound adapters build these from raw strings before talking to a port, so
//! the account service only ever sees validated input.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{UserId, UserName, UserValidationError};

/// Validation failures for login and signup payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// User name was missing, blank or too long.
    #[error("{0}")]
    UserName(UserValidationError),
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Requested user id was missing or malformed.
    #[error("{0}")]
    UserId(UserValidationError),
}

fn password(raw: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if raw.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(raw.to_owned()))
}

/// Validated login credentials.
///
/// ## Invariants
/// - `user_name` is trimmed and non-empty.
/// - `password` is non-empty; whitespace is kept verbatim.
///
/// # Examples
/// ```
/// use carousel_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ann ", "pw").unwrap();
/// assert_eq!(creds.user_name().as_ref(), "ann");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    user_name: UserName,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(
        user_name: &str,
        password_raw: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let user_name = UserName::new(user_name).map_err(CredentialsValidationError::UserName)?;
        Ok(Self {
            user_name,
            password: password(password_raw)?,
        })
    }

    pub fn user_name(&self) -> &UserName {
        &self.user_name
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("user_name", &self.user_name)
            .finish_non_exhaustive()
    }
}

/// Validated signup request. The client chooses the durable user id.
#[derive(Clone, PartialEq, Eq)]
pub struct SignupRequest {
    id: UserId,
    credentials: LoginCredentials,
}

impl SignupRequest {
    /// Construct a signup request from raw inputs.
    pub fn try_from_parts(
        id: &str,
        user_name: &str,
        password_raw: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let credentials = LoginCredentials::try_from_parts(user_name, password_raw)?;
        let id = UserId::new(id).map_err(CredentialsValidationError::UserId)?;
        Ok(Self { id, credentials })
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn credentials(&self) -> &LoginCredentials {
        &self.credentials
    }
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("id", &self.id)
            .field("user_name", self.credentials.user_name())
            .finish_non_exhaustive()
    }
}
