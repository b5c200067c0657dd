//! Unified error handling for backend calls.
//!
//! The backend reports failures ad hoc: a non-2xx status and, sometimes, a
//! JSON body with a `message` field. `ApiError` keeps that message so callers
//! can show it to the user verbatim, and [`ApiError::user_message`] falls back
//! to a generic string when there is none.

use thiserror::Error;

use crate::token::TokenStoreError;

/// Shown when the server gave no usable message.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Shown when the request never reached the server.
pub const NETWORK_FAILURE: &str = "Could not reach the server. Check your connection and try again.";

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with an error status.
    #[error("API error: {status}{}", format_message(.message.as_deref()))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// Missing or rejected bearer token.
    #[error("Unauthorized{}", format_message(.0.as_deref()))]
    Unauthorized(Option<String>),

    /// Resource not found.
    #[error("Not found: {path}{}", format_message(.message.as_deref()))]
    NotFound {
        path: String,
        message: Option<String>,
    },

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {retry_after} seconds{}", format_message(.message.as_deref()))]
    RateLimited {
        retry_after: u64,
        message: Option<String>,
    },

    /// Body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Token storage failed.
    #[error("Token storage error: {0}")]
    TokenStore(#[from] TokenStoreError),
}

fn format_message(message: Option<&str>) -> String {
    message.map_or_else(String::new, |m| format!(" - {m}"))
}

impl ApiError {
    /// The message to show the user.
    ///
    /// Uses the server's `message` when it sent one, otherwise a generic
    /// fallback for the kind of failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api {
                message: Some(m), ..
            }
            | Self::NotFound {
                message: Some(m), ..
            }
            | Self::RateLimited {
                message: Some(m), ..
            }
            | Self::Unauthorized(Some(m)) => m.clone(),
            Self::Unauthorized(None) => "Please log in to continue.".to_string(),
            Self::NotFound { message: None, .. } => {
                "The requested item could not be found.".to_string()
            }
            Self::RateLimited {
                retry_after,
                message: None,
            } => format!("Too many requests. Please wait {retry_after} seconds and try again."),
            Self::Http(_) => NETWORK_FAILURE.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    /// HTTP status returned by the backend, if the call got that far.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;
