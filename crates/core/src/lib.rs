//! Dokan Core - Shared domain types and checkout rules.
//!
//! This crate provides the types used by every Dokan component:
//! - `client` - HTTP client for the storefront and admin REST backend
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no HTTP
//! clients, no clock reads inside the rules themselves (callers pass "now").
//! This keeps checkout arithmetic testable in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, money, contact details and statuses
//! - [`shipping`] - Shipping settings and the shipping rate resolver
//! - [`cart`] - Cart items and subtotals
//! - [`coupon`] - Coupon codes and server-resolved coupon results
//! - [`checkout`] - Checkout session state, totals and the order payload
//! - [`districts`] - The district list used by the shipping selector

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod coupon;
pub mod districts;
pub mod lenient;
pub mod shipping;
pub mod types;

pub use cart::CartItem;
pub use checkout::{
    CheckoutSession, OrderItemPayload, OrderPayload, OrderTotals, ShippingAddress, ValidationError,
};
pub use coupon::{AppliedCoupon, CouponCode, CouponCodeError};
pub use shipping::{Campaign, ShippingQuote, ShippingSettings, Zone};
pub use types::*;
