//! Client for the Pigmento REST API.
//!
//! Covers account creation, sign-in, the color of the day, photo scoring and
//! push-token registration. Form validation happens locally before any
//! request is sent.

pub mod auth;
pub mod client;
pub mod error;
pub mod forms;
pub mod types;

pub use auth::{DEV_SESSION_TOKEN, dev_sign_in, sign_in_and_persist};
pub use client::PigmentoClient;
pub use error::{ApiError, ApiResult, GENERIC_REJECTION};
pub use forms::{FormError, MIN_PASSWORD_LEN, SignInForm, SignUpForm};
pub use types::{DailyColor, UploadScore};
