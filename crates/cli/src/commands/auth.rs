//! Login, signup and logout.

use dokan_client::types::{SignupRequest, User};
use dokan_core::{Email, PhoneNumber};

use super::{CommandError, Context};
use crate::output;

/// Log in and save the token.
pub async fn login(ctx: &Context, email: &str, password: &str) -> Result<(), CommandError> {
    let email = Email::parse(email)?;
    let user = ctx.api.login(&email, password).await?;
    print_user(ctx, &user);
    Ok(())
}

/// Start a signup; the backend emails a one-time code.
pub async fn signup(
    ctx: &Context,
    name: String,
    email: &str,
    phone: Option<&str>,
    password: String,
) -> Result<(), CommandError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(CommandError::Invalid("Please enter your name".to_string()));
    }

    let request = SignupRequest {
        name,
        email: Email::parse(email)?,
        phone: phone.map(PhoneNumber::parse).transpose()?,
        password,
    };
    let message = ctx.api.signup(&request).await?;

    output::line(message.as_deref().unwrap_or("Check your email for a verification code."));
    output::line(format!(
        "Then run: dokan verify-otp -e {} <code>",
        request.email
    ));
    Ok(())
}

/// Confirm a signup and save the token.
pub async fn verify_otp(ctx: &Context, email: &str, otp: &str) -> Result<(), CommandError> {
    if otp.trim().is_empty() {
        return Err(CommandError::Invalid("Please enter the code".to_string()));
    }
    let email = Email::parse(email)?;
    let user = ctx.api.verify_otp(&email, otp).await?;
    print_user(ctx, &user);
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<(), CommandError> {
    ctx.api.logout()?;
    output::line("Logged out.");
    Ok(())
}

fn print_user(ctx: &Context, user: &User) {
    if ctx.json {
        output::json(user);
    } else {
        output::line(format!("Logged in as {} <{}> ({})", user.name, user.email, user.role));
    }
}
