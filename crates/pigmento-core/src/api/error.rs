//! Error types for the Pigmento API client.

use thiserror::Error;

use super::forms::FormError;

/// Fallback message when the API rejects a request without explaining why.
pub const GENERIC_REJECTION: &str = "Something went wrong";

/// Errors returned by [`super::PigmentoClient`].
#[derive(Error, Debug)]
pub enum ApiError {
    /// Form input failed local validation; nothing was sent.
    #[error(transparent)]
    Form(#[from] FormError),

    /// The request never got a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("{message} (status {status})")]
    Rejected { status: u16, message: String },

    /// The API answered successfully but reported an error in the body.
    #[error("Service error: {0}")]
    Service(String),

    /// Sign-in succeeded without returning a token.
    #[error("Failed to retrieve token")]
    MissingToken,

    /// The response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A developer shortcut was used outside dev mode.
    #[error("Dev mode is disabled")]
    DevModeDisabled,
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_display() {
        let err = ApiError::Rejected { status: 401, message: "Invalid credentials".to_string() };
        let msg = format!("{}", err);
        assert!(msg.contains("Invalid credentials"));
        assert!(msg.contains("401"));
    }

    #[test]
    fn test_form_error_is_transparent() {
        let err: ApiError = FormError::PasswordMismatch.into();
        assert_eq!(format!("{}", err), "Passwords don't match");
    }

    #[test]
    fn test_missing_token_display() {
        assert_eq!(ApiError::MissingToken.to_string(), "Failed to retrieve token");
    }
}
