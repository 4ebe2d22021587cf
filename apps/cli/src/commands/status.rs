//! Status command implementation.

use std::path::Path;

use colored::Colorize;
use pigmento_core::{BackendKind, Gate, SessionSnapshot};
use serde::Serialize;

use super::AppContext;

/// `status --json` body: the session snapshot plus what the app would do with it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport<'a> {
    #[serde(flatten)]
    snapshot: &'a SessionSnapshot,
    gate: Gate,
    route: Option<&'static str>,
    signed_in: bool,
    backend: BackendKind,
    data_dir: &'a Path,
}

/// Show the session state and the route the app would open.
pub fn execute(app: &AppContext, json_output: bool) -> anyhow::Result<()> {
    let snapshot = app.session.snapshot();
    let gate = snapshot.gate();
    let signed_in = snapshot.session.as_deref().is_some_and(|s| !s.is_empty());

    if json_output {
        let report = StatusReport {
            snapshot: &snapshot,
            gate,
            route: gate.route(),
            signed_in,
            backend: app.config.storage.backend,
            data_dir: &app.config.storage.data_dir,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Pigmento Status".bold().cyan());
    println!();
    println!("  Gate:       {}", gate.to_string().green());
    println!("  Route:      {}", gate.route().unwrap_or("-"));
    println!("  Onboarded:  {}", if snapshot.is_onboard { "yes".green() } else { "no".yellow() });
    println!("  Signed in:  {}", if signed_in { "yes".green() } else { "no".yellow() });
    println!("  Backend:    {}", app.config.storage.backend);
    println!("  Data dir:   {}", app.config.storage.data_dir.display().to_string().dimmed());
    Ok(())
}
