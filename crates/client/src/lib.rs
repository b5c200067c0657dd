//! Dokan Client - HTTP client for the storefront and admin REST backend.
//!
//! # Modules
//!
//! - [`api`] - [`ApiClient`] with one method per backend endpoint
//! - [`checkout`] - Coupon application and order submission with in-flight guards
//! - [`config`] - Environment-based configuration
//! - [`token`] - Bearer token persistence
//! - [`types`] - Request and response bodies
//!
//! # Example
//!
//! ```rust,ignore
//! use dokan_client::{ApiClient, Checkout, ClientConfig};
//! use dokan_core::CheckoutSession;
//!
//! let config = ClientConfig::from_env()?;
//! let api = ApiClient::new(&config)?;
//! let settings = api.shipping_settings().await?;
//!
//! let mut session = CheckoutSession::new(api.cart().await?.items);
//! session.set_district("Dhaka");
//! session.address.address = "House 12, Road 5, Dhanmondi".to_string();
//!
//! let checkout = Checkout::new(api);
//! checkout.apply_coupon(&mut session, &settings, "EID25").await?;
//! let order = checkout.submit(&session, &settings).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod token;
pub mod types;

pub use api::ApiClient;
pub use checkout::{Checkout, CheckoutError};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, Result};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
