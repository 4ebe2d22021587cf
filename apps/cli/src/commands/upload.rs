//! Upload command implementation.

use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use super::AppContext;

/// Upload an image and print the score it received.
pub async fn execute(app: &AppContext, path: &Path) -> anyhow::Result<()> {
    app.require_authenticated()?;

    let bytes = tokio::fs::read(path).await.with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("photo.jpg");
    let mime = mime_guess::from_path(path).first_or(mime_guess::mime::IMAGE_JPEG);

    let score = app.client()?.upload_photo(bytes, file_name, mime.essence_str()).await?;
    println!("{} {}", "Score:".bold(), format!("{:.1}", score.score).green());
    Ok(())
}
