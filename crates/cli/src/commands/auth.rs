//! Auth commands: login, logout, signup, and the password flows.

use anyhow::Result;

use devmart_client::auth::{LoginOutcome, SignupPayload};
use devmart_client::session::Screen;

use crate::app::App;

pub async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    app.session.set_screen(Screen::Login);
    match app.auth.login(email, password).await? {
        LoginOutcome::Success(user) => {
            println!("Logged in as {} <{}>", user.username, user.email);
            Ok(())
        }
        // The failure message was already surfaced via the notifier.
        LoginOutcome::Failed(_) => std::process::exit(1),
    }
}

pub fn logout(app: &App) {
    app.auth.logout();
    println!("You are signed out. Run `devmart login` to sign back in.");
}

pub async fn signup(
    app: &App,
    username: String,
    email: String,
    password: String,
    contact: Option<String>,
) -> Result<()> {
    app.session.set_screen(Screen::Signup);
    let payload = SignupPayload {
        username,
        email,
        password,
        contact_number: contact,
    };
    let message = app.auth.signup(&payload).await?;
    println!("{message}");
    Ok(())
}

pub async fn verify_email(app: &App, token: &str) -> Result<()> {
    app.session.set_screen(Screen::VerifyEmail);
    let message = app.auth.verify_email(token).await?;
    println!("{message}");
    Ok(())
}

pub async fn forgot_password(app: &App, email: &str) -> Result<()> {
    app.session.set_screen(Screen::ForgotPassword);
    let message = app.auth.forgot_password(email).await?;
    println!("{message}");
    Ok(())
}

pub async fn reset_password(app: &App, token: &str, password: &str, confirm: &str) -> Result<()> {
    app.session.set_screen(Screen::ResetPassword);
    let message = app.auth.reset_password(token, password, confirm).await?;
    println!("{message}");
    Ok(())
}

pub async fn update_password(app: &App, current: &str, new: &str, confirm: &str) -> Result<()> {
    app.session.set_screen(Screen::Profile);
    let message = app.auth.update_password(current, new, confirm).await?;
    println!("{message}");
    Ok(())
}

pub fn whoami(app: &App) {
    match app.session.current_user() {
        Some(user) => {
            let role = if user.is_admin() { " (admin)" } else { "" };
            println!("{} <{}>{role}", user.username, user.email);
        }
        None => println!("Not logged in"),
    }
}
