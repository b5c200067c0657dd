//! Command implementations.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod invoices;
pub mod orders;
pub mod reviews;
pub mod seller;
pub mod shipping;

use dokan_client::{ApiClient, ApiError, CheckoutError, ClientConfig, ConfigError};
use dokan_core::{CouponCodeError, EmailError, PhoneError};
use thiserror::Error;

pub use admin::AdminAction;
pub use cart::CartAction;
pub use catalog::ProductArgs;
pub use checkout::CheckoutArgs;
pub use invoices::InvoiceAction;
pub use orders::OrderAction;
pub use reviews::ReviewAction;
pub use seller::SellerAction;
pub use shipping::ShippingAction;

/// Errors that can occur running a command.
///
/// Backend failures display the user-facing message rather than the
/// transport detail.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    #[error("{}", .0.user_message())]
    Checkout(#[from] CheckoutError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid phone number: {0}")]
    Phone(#[from] PhoneError),

    #[error("Invalid coupon code: {0}")]
    Coupon(#[from] CouponCodeError),

    #[error("{0}")]
    Invalid(String),
}

/// Shared state for one command invocation.
pub struct Context {
    pub api: ApiClient,
    /// Print raw JSON instead of tables.
    pub json: bool,
}

impl Context {
    /// Build the API client from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or the client cannot be
    /// built.
    pub fn from_env(json: bool) -> Result<Self, CommandError> {
        let config = ClientConfig::from_env()?;
        tracing::debug!(?config, "Loaded configuration");
        let api = ApiClient::new(&config)?;
        Ok(Self { api, json })
    }
}
