//! Sign-in, sign-up and sign-out commands.

use colored::Colorize;
use pigmento_core::api::{self, SignInForm, SignUpForm};

use super::AppContext;

/// Sign in against the API and store the token.
pub async fn sign_in(app: &AppContext, email: String, password: String) -> anyhow::Result<()> {
    let client = app.client()?;
    let form = SignInForm::new(email, password);
    api::sign_in_and_persist(&client, &app.session, &form).await?;
    println!("{}", "Signed in".green());
    Ok(())
}

/// Store the placeholder dev token.
pub fn dev_sign_in(app: &AppContext) -> anyhow::Result<()> {
    api::dev_sign_in(&app.session, &app.config.api)?;
    println!("{}", "Signed in with dev session".yellow());
    Ok(())
}

/// Create an account. Does not sign in.
pub async fn sign_up(
    app: &AppContext,
    email: String,
    password: String,
    confirm_password: String,
) -> anyhow::Result<()> {
    let client = app.client()?;
    client.sign_up(&SignUpForm::new(email, password, confirm_password)).await?;
    println!("{}", "Account created".green());
    println!("  Sign in with: pigmento sign-in --email <EMAIL> --password <PASSWORD>");
    Ok(())
}

/// Forget the stored session.
pub fn sign_out(app: &AppContext) -> anyhow::Result<()> {
    app.session.sign_out();
    println!("{}", "Signed out".green());
    Ok(())
}
