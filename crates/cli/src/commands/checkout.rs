//! Checkout: shipping, coupon, totals and order submission.

use chrono::Utc;
use clap::Args;
use dokan_client::Checkout;
use dokan_core::districts;
use dokan_core::{CheckoutSession, OrderTotals, PaymentMethod, PhoneNumber};

use super::{CommandError, Context};
use crate::output;

#[derive(Args)]
pub struct CheckoutArgs {
    /// Delivery district
    #[arg(short, long)]
    district: String,

    /// Street address
    #[arg(short, long)]
    address: String,

    /// Recipient name
    #[arg(short, long)]
    name: Option<String>,

    /// Recipient mobile number
    #[arg(long)]
    phone: Option<String>,

    /// Note for the courier
    #[arg(long)]
    note: Option<String>,

    /// Coupon code to apply before ordering
    #[arg(short, long)]
    coupon: Option<String>,

    /// `cod` or `online`
    #[arg(long, default_value = "cod")]
    payment: PaymentMethod,

    /// Show the totals without placing the order
    #[arg(long)]
    dry_run: bool,
}

pub async fn run(ctx: &Context, args: CheckoutArgs) -> Result<(), CommandError> {
    let cart = ctx.api.cart().await?;
    let settings = ctx.api.shipping_settings().await?;

    let mut session = CheckoutSession::new(cart.items);
    let district = districts::canonical(&args.district).unwrap_or(args.district.as_str());
    session.set_district(district);
    session.address.address = args.address.trim().to_string();
    session.address.full_name = args.name.unwrap_or_default().trim().to_string();
    session.address.phone = args.phone.as_deref().map(PhoneNumber::parse).transpose()?;
    session.address.note = args.note.filter(|n| !n.trim().is_empty());
    session.payment_method = args.payment;

    // Catch missing pieces before spending a coupon request on them.
    session.validate().map_err(dokan_client::CheckoutError::from)?;

    let checkout = Checkout::new(ctx.api.clone());
    if let Some(code) = args.coupon.as_deref() {
        let applied = checkout.apply_coupon(&mut session, &settings, code).await?;
        if !ctx.json {
            output::line(format!("Coupon {} applied.", applied.code));
        }
    }

    let quote = session.shipping_quote(&settings, Utc::now());
    let totals = session.totals(&settings, Utc::now());

    if args.dry_run {
        if ctx.json {
            output::json(&totals);
        } else {
            print_totals(&totals);
            output::line(super::shipping::describe(&quote));
        }
        return Ok(());
    }

    let order = checkout.submit(&session, &settings).await?;

    if ctx.json {
        output::json(&order);
        return Ok(());
    }
    print_totals(&totals);
    output::line("");
    output::line(format!(
        "Order {} placed ({}).",
        order.reference(),
        order.payment_method
    ));
    Ok(())
}

fn print_totals(totals: &OrderTotals) {
    output::field("Subtotal", totals.subtotal);
    output::field("Shipping", totals.shipping);
    if totals.discount.is_positive() {
        output::field("Discount", format!("-{}", totals.discount));
    }
    if totals.shipping_discount.is_positive() {
        output::field("Shipping discount", format!("-{}", totals.shipping_discount));
    }
    output::field("Total", totals.total);
}
