//! Color-of-the-day command.

use colored::Colorize;

use super::AppContext;

/// Print the color of the day.
pub async fn execute(app: &AppContext) -> anyhow::Result<()> {
    app.require_authenticated()?;
    let color = app.client()?.daily_color().await?;
    println!("{} {}", "Color of the day:".bold(), color.color.cyan());
    Ok(())
}
