//! Push-token registration command.

use colored::Colorize;

use super::AppContext;

pub async fn execute(app: &AppContext, token: &str) -> anyhow::Result<()> {
    app.require_authenticated()?;
    app.client()?.register_push_token(token).await?;
    println!("{}", "Push token registered".green());
    Ok(())
}
