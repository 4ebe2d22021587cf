//! Sign-in flows that end with a persisted session.

use tracing::warn;

use super::client::PigmentoClient;
use super::error::{ApiError, ApiResult};
use super::forms::SignInForm;
use crate::config::ApiConfig;
use crate::session::SessionContext;

/// Placeholder token stored by [`dev_sign_in`].
pub const DEV_SESSION_TOKEN: &str = "xxx";

/// Sign in against the API and store the returned token in the session.
///
/// The session is left untouched when the request fails.
pub async fn sign_in_and_persist(
    client: &PigmentoClient,
    session: &SessionContext,
    form: &SignInForm,
) -> ApiResult<String> {
    let token = client.sign_in(form).await.inspect_err(|e| {
        warn!(error = %e, "Sign-in failed");
    })?;
    session.sign_in(token.clone());
    Ok(token)
}

/// Store [`DEV_SESSION_TOKEN`] without contacting the API.
pub fn dev_sign_in(session: &SessionContext, config: &ApiConfig) -> ApiResult<()> {
    if !config.dev_mode {
        return Err(ApiError::DevModeDisabled);
    }
    session.sign_in(DEV_SESSION_TOKEN);
    Ok(())
}
