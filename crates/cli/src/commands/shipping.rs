//! Shipping quotes and the district list.

use chrono::Utc;
use clap::Subcommand;
use dokan_core::districts::{self, DISTRICTS};
use dokan_core::{Money, ShippingQuote};
use rust_decimal::Decimal;

use super::{CommandError, Context};
use crate::output;

#[derive(Subcommand)]
pub enum ShippingAction {
    /// Quote shipping for a district
    Quote {
        district: String,

        /// Order subtotal in taka; defaults to the current cart
        #[arg(long)]
        subtotal: Option<Decimal>,
    },
    /// List the districts shipping can be quoted for
    Districts,
}

pub async fn run(ctx: &Context, action: ShippingAction) -> Result<(), CommandError> {
    match action {
        ShippingAction::Quote { district, subtotal } => quote(ctx, &district, subtotal).await,
        ShippingAction::Districts => {
            self::districts();
            Ok(())
        }
    }
}

async fn quote(ctx: &Context, district: &str, subtotal: Option<Decimal>) -> Result<(), CommandError> {
    let district = districts::canonical(district).ok_or_else(|| {
        CommandError::Invalid(format!(
            "Unknown district: {district}. Run `dokan shipping districts` for the list."
        ))
    })?;

    let subtotal = match subtotal {
        Some(amount) => Money::new(amount),
        None => ctx.api.cart().await?.subtotal(),
    };

    let settings = ctx.api.shipping_settings().await?;
    let quote = settings.quote(district, subtotal, Utc::now());

    if ctx.json {
        output::json(&serde_json::json!({
            "district": district,
            "subtotal": subtotal,
            "shipping": quote.amount(),
            "zone": quote.zone(),
        }));
        return Ok(());
    }

    output::field("District", district);
    output::field("Subtotal", subtotal);
    output::field("Shipping", quote.amount());
    output::line(describe(&quote));
    Ok(())
}

/// One-line reason for a quote.
pub fn describe(quote: &ShippingQuote) -> String {
    match quote {
        ShippingQuote::NoDistrict => "Select a district to see shipping.".to_string(),
        ShippingQuote::Unconfigured { zone } => {
            format!("No shipping rate is configured for {zone}.")
        }
        ShippingQuote::FreeDistrict { .. } => "Free shipping to this district.".to_string(),
        ShippingQuote::ThresholdMet {
            threshold,
            campaign: true,
            ..
        } => format!("Free shipping campaign: orders of {threshold} or more ship free."),
        ShippingQuote::ThresholdMet { threshold, .. } => {
            format!("Orders of {threshold} or more ship free.")
        }
        ShippingQuote::Rate { zone, .. } => format!("Flat rate {zone}."),
    }
}

/// Print the district list. Needs no backend.
pub fn districts() {
    for district in DISTRICTS {
        if district == districts::CAPITAL_DISTRICT {
            output::line(format!("{district} (inside Dhaka rate)"));
        } else {
            output::line(district);
        }
    }
}
