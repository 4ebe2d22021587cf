//! HTTP client for the Pigmento API.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info};

use super::error::{ApiError, ApiResult, GENERIC_REJECTION};
use super::forms::{SignInForm, SignUpForm};
use super::types::{DailyColor, MessageResponse, SignInResponse, UploadScore};
use crate::config::ApiConfig;

/// Client for the Pigmento REST API.
///
/// The scoring service is opaque: responses are decoded into the shapes the
/// app displays and nothing else is inferred from them.
#[derive(Debug, Clone)]
pub struct PigmentoClient {
    base_url: String,
    client: Client,
    token: Option<String>,
}

impl PigmentoClient {
    /// Create a client from configuration.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { base_url: config.base_url.trim_end_matches('/').to_string(), client, token: None })
    }

    /// Send `token` as a bearer credential on every request.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> ApiResult<Response> {
        self.authorize(request).send().await.map_err(|e| {
            error!(error = %e, url = %url, "Failed to reach Pigmento API");
            ApiError::Network(e.to_string())
        })
    }

    /// Turn a non-success response into [`ApiError::Rejected`].
    async fn reject(response: Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .json::<MessageResponse>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_REJECTION.to_string());
        debug!(status, message = %message, "Pigmento API rejected request");
        ApiError::Rejected { status, message }
    }

    /// Decode a body that may carry an `error` field instead of a payload.
    async fn service_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        let body: Value = response.json().await?;
        if let Some(message) = body.get("error").filter(|e| !e.is_null()) {
            let message = message.as_str().map_or_else(|| message.to_string(), str::to_string);
            return Err(ApiError::Service(message));
        }
        serde_json::from_value(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Create an account. Validation runs first; nothing is sent on failure.
    pub async fn sign_up(&self, form: &SignUpForm) -> ApiResult<()> {
        form.validate()?;
        let url = self.url("/users/signup");
        let response = self.send(self.client.post(&url).json(form), &url).await?;
        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        info!("Account created");
        Ok(())
    }

    /// Exchange credentials for a session token.
    pub async fn sign_in(&self, form: &SignInForm) -> ApiResult<String> {
        form.validate()?;
        let url = self.url("/users/signin");
        let response = self.send(self.client.post(&url).json(form), &url).await?;
        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        let body: SignInResponse = response.json().await?;
        body.token.filter(|t| !t.is_empty()).ok_or(ApiError::MissingToken)
    }

    /// Fetch the color of the day.
    pub async fn daily_color(&self) -> ApiResult<DailyColor> {
        let url = self.url("/colors");
        let response = self.send(self.client.get(&url), &url).await?;
        Self::service_json(response).await
    }

    /// Upload a photo for scoring.
    pub async fn upload_photo(&self, bytes: Vec<u8>, file_name: &str, mime_type: &str) -> ApiResult<UploadScore> {
        let size = bytes.len();
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| ApiError::InvalidResponse(format!("Invalid MIME type {}: {}", mime_type, e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = self.url("/uploads");
        debug!(file_name, size, "Uploading photo");
        let response = self.send(self.client.post(&url).multipart(form), &url).await?;
        let score: UploadScore = Self::service_json(response).await?;
        info!(score = score.score, "Photo scored");
        Ok(score)
    }

    /// Register a device push-notification token.
    pub async fn register_push_token(&self, push_token: &str) -> ApiResult<()> {
        let url = self.url("/notifications/register");
        let body = serde_json::json!({ "token": push_token });
        let response = self.send(self.client.post(&url).json(&body), &url).await?;
        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        info!("Push token registered");
        Ok(())
    }
}
