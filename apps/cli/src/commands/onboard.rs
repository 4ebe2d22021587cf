//! Onboard command implementation.

use colored::Colorize;

use super::AppContext;

/// Complete onboarding.
pub fn execute(app: &AppContext) -> anyhow::Result<()> {
    if app.session.is_onboard() {
        println!("{}", "Onboarding already completed".dimmed());
    } else {
        app.session.complete_onboarding();
        println!("{}", "Onboarding completed".green());
    }
    Ok(())
}
