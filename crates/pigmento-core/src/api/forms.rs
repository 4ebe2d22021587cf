//! Sign-in and sign-up form input with local validation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Email regex should be valid")
});

/// Validation failures, with the messages shown next to the inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least 6 characters long")]
    PasswordTooShort { field: &'static str },

    #[error("Passwords don't match")]
    PasswordMismatch,
}

fn validate_email(email: &str) -> Result<(), FormError> {
    if EMAIL_REGEX.is_match(email.trim()) {
        Ok(())
    } else {
        Err(FormError::InvalidEmail)
    }
}

fn validate_password_len(password: &str, field: &'static str) -> Result<(), FormError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(FormError::PasswordTooShort { field })
    }
}

/// Credentials posted to `/users/signin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    /// Only the e-mail shape is checked; password rules are the server's.
    pub fn validate(&self) -> Result<(), FormError> {
        validate_email(&self.email)
    }
}

/// Account details posted to `/users/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self { email: email.into(), password: password.into(), confirm_password: confirm_password.into() }
    }

    /// Checks run in field order; the first failure is returned.
    pub fn validate(&self) -> Result<(), FormError> {
        validate_email(&self.email)?;
        validate_password_len(&self.password, "password")?;
        validate_password_len(&self.confirm_password, "confirmPassword")?;
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(())
    }
}
