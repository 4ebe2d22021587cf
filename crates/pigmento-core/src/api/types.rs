//! Response bodies of the Pigmento API.

use serde::{Deserialize, Serialize};

/// Body of `POST /users/signin`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignInResponse {
    #[serde(default)]
    pub success: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Color of the day, as sent by `GET /colors` (e.g. `"rgb(12, 34, 56)"` or `"blue"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyColor {
    pub color: String,
}

/// Score computed by the server for an uploaded photo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UploadScore {
    pub score: f64,
}
