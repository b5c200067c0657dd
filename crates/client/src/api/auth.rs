//! Login, signup with OTP verification, and logout.
//!
//! Login and OTP verification both return a bearer token; it is saved to the
//! token store and attached to every later request. Logout is local only.

use dokan_core::Email;
use reqwest::Method;
use secrecy::SecretString;
use tracing::instrument;

use super::ApiClient;
use crate::error::Result;
use crate::types::{
    AuthResponse, LoginRequest, MessageResponse, SignupRequest, User, VerifyOtpRequest,
};

impl ApiClient {
    /// Log in and persist the returned token.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::Unauthorized`] for bad credentials, or an
    /// error if the request fails or the token cannot be saved.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<User> {
        let response: AuthResponse = self
            .send(
                Method::POST,
                &["api", "auth", "login"],
                &LoginRequest { email, password },
            )
            .await?;
        self.store_session(response)
    }

    /// Start a signup. The backend emails a one-time code to confirm it.
    ///
    /// Returns the server's message, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<Option<String>> {
        let response: MessageResponse = self
            .send(Method::POST, &["api", "auth", "signup"], request)
            .await?;
        Ok(response.message)
    }

    /// Confirm a signup with the emailed code and persist the returned token.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is rejected, the request fails, or the
    /// token cannot be saved.
    #[instrument(skip(self, otp), fields(email = %email))]
    pub async fn verify_otp(&self, email: &Email, otp: &str) -> Result<User> {
        let response: AuthResponse = self
            .send(
                Method::POST,
                &["api", "auth", "verify-otp"],
                &VerifyOtpRequest {
                    email,
                    otp: otp.trim(),
                },
            )
            .await?;
        self.store_session(response)
    }

    /// Forget the stored token. No request is made.
    ///
    /// # Errors
    ///
    /// Returns an error if the token store cannot be cleared.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<()> {
        self.tokens().clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    fn store_session(&self, response: AuthResponse) -> Result<User> {
        self.tokens().save(&SecretString::from(response.token))?;
        tracing::info!(user = %response.user.id, role = %response.user.role, "Logged in");
        Ok(response.user)
    }
}
