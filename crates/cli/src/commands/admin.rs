//! Admin commands: orders, shipping settings and seller verification.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use dokan_core::districts;
use dokan_core::{OrderId, OrderStatus, ShippingSettings, VerificationId};
use rust_decimal::Decimal;

use super::{CommandError, Context};
use crate::output;

#[derive(Subcommand)]
pub enum AdminAction {
    /// List orders
    Orders {
        /// Only orders in this status
        #[arg(short, long)]
        status: Option<OrderStatus>,
    },
    /// Move an order to a new status
    SetStatus { id: String, status: OrderStatus },
    /// Shipping settings
    Shipping {
        #[command(subcommand)]
        action: ShippingSettingsAction,
    },
    /// Verification requests awaiting review
    Pending,
    /// Approve a seller's verification
    Approve { id: String },
    /// Reject a seller's verification
    Reject {
        id: String,

        #[arg(short, long)]
        reason: String,
    },
}

#[derive(Subcommand)]
pub enum ShippingSettingsAction {
    /// Show the current settings
    Show,
    /// Change settings; unset options keep their current value
    Set(ShippingSettingsArgs),
}

#[derive(Args)]
pub struct ShippingSettingsArgs {
    /// Flat rate inside Dhaka
    #[arg(long)]
    inside: Option<Decimal>,

    /// Flat rate outside Dhaka
    #[arg(long)]
    outside: Option<Decimal>,

    /// Subtotal at which shipping is free (0 disables)
    #[arg(long)]
    free_threshold: Option<Decimal>,

    /// District that always ships free; repeat for several
    #[arg(long = "free-district")]
    free_districts: Vec<String>,

    /// Clear the free district list
    #[arg(long, conflicts_with = "free_districts")]
    clear_free_districts: bool,

    /// Turn the free-shipping campaign on or off
    #[arg(long)]
    campaign: Option<bool>,

    /// Campaign start (RFC 3339)
    #[arg(long)]
    campaign_start: Option<DateTime<Utc>>,

    /// Campaign end (RFC 3339)
    #[arg(long)]
    campaign_end: Option<DateTime<Utc>>,

    /// Free-shipping threshold while the campaign runs
    #[arg(long)]
    campaign_threshold: Option<Decimal>,
}

impl ShippingSettingsArgs {
    /// Apply the given options on top of `settings`.
    fn apply(self, mut settings: ShippingSettings) -> Result<ShippingSettings, CommandError> {
        for (label, value) in [
            ("inside rate", self.inside),
            ("outside rate", self.outside),
            ("free threshold", self.free_threshold),
            ("campaign threshold", self.campaign_threshold),
        ] {
            if value.is_some_and(|v| v.is_sign_negative()) {
                return Err(CommandError::Invalid(format!("The {label} cannot be negative")));
            }
        }

        if self.inside.is_some() {
            settings.inside_dhaka_rate = self.inside;
        }
        if self.outside.is_some() {
            settings.outside_dhaka_rate = self.outside;
        }
        if self.free_threshold.is_some() {
            settings.free_threshold = self.free_threshold;
        }
        if self.clear_free_districts {
            settings.free_for_districts.clear();
        } else if !self.free_districts.is_empty() {
            settings.free_for_districts = self
                .free_districts
                .iter()
                .map(|d| {
                    districts::canonical(d)
                        .map(str::to_string)
                        .ok_or_else(|| CommandError::Invalid(format!("Unknown district: {d}")))
                })
                .collect::<Result<_, _>>()?;
        }

        if let Some(active) = self.campaign {
            settings.campaign.active = active;
        }
        if self.campaign_start.is_some() {
            settings.campaign.start_at = self.campaign_start;
        }
        if self.campaign_end.is_some() {
            settings.campaign.end_at = self.campaign_end;
        }
        if self.campaign_threshold.is_some() {
            settings.campaign.free_threshold = self.campaign_threshold;
        }
        if let (Some(start), Some(end)) = (settings.campaign.start_at, settings.campaign.end_at)
            && end < start
        {
            return Err(CommandError::Invalid(
                "The campaign cannot end before it starts".to_string(),
            ));
        }
        Ok(settings)
    }
}

pub async fn run(ctx: &Context, action: AdminAction) -> Result<(), CommandError> {
    match action {
        AdminAction::Orders { status } => {
            let orders = ctx.api.admin_orders(status).await?;
            super::orders::print_orders(ctx, &orders);
        }
        AdminAction::SetStatus { id, status } => {
            let order = ctx
                .api
                .set_order_status(&OrderId::new(id.trim()), status)
                .await?;
            super::orders::print_order(ctx, &order);
        }
        AdminAction::Shipping { action } => shipping(ctx, action).await?,
        AdminAction::Pending => {
            let pending = ctx.api.pending_verifications().await?;
            if ctx.json {
                output::json(&pending);
                return Ok(());
            }
            let rows: Vec<Vec<String>> = pending
                .iter()
                .map(|v| {
                    vec![
                        v.id.as_ref().map(ToString::to_string).unwrap_or_default(),
                        v.shop_name.clone(),
                        v.nid_number.clone(),
                        v.documents.len().to_string(),
                    ]
                })
                .collect();
            output::table(&["ID", "SHOP", "NID", "DOCS"], &rows);
        }
        AdminAction::Approve { id } => {
            let message = ctx
                .api
                .approve_verification(&VerificationId::new(id.trim()))
                .await?;
            output::line(message.as_deref().unwrap_or("Seller approved."));
        }
        AdminAction::Reject { id, reason } => {
            if reason.trim().is_empty() {
                return Err(CommandError::Invalid(
                    "Please give a reason for the rejection".to_string(),
                ));
            }
            let message = ctx
                .api
                .reject_verification(&VerificationId::new(id.trim()), &reason)
                .await?;
            output::line(message.as_deref().unwrap_or("Seller rejected."));
        }
    }
    Ok(())
}

async fn shipping(ctx: &Context, action: ShippingSettingsAction) -> Result<(), CommandError> {
    let settings = match action {
        ShippingSettingsAction::Show => ctx.api.shipping_settings().await?,
        ShippingSettingsAction::Set(args) => {
            let current = ctx.api.shipping_settings().await?;
            let updated = args.apply(current)?;
            ctx.api.update_shipping_settings(&updated).await?
        }
    };

    if ctx.json {
        output::json(&settings);
        return Ok(());
    }

    let amount = |v: Option<Decimal>| v.map_or_else(|| "not set".to_string(), |d| format!("{d}"));
    let date = |v: Option<DateTime<Utc>>| v.map_or_else(|| "open".to_string(), |t| t.to_rfc3339());

    output::field("Inside Dhaka", amount(settings.inside_dhaka_rate));
    output::field("Outside Dhaka", amount(settings.outside_dhaka_rate));
    output::field("Free threshold", amount(settings.free_threshold));
    output::field(
        "Free districts",
        if settings.free_for_districts.is_empty() {
            "none".to_string()
        } else {
            settings.free_for_districts.join(", ")
        },
    );
    output::field(
        "Campaign",
        if settings.campaign.is_running(Utc::now()) {
            "running"
        } else if settings.campaign.active {
            "scheduled or ended"
        } else {
            "off"
        },
    );
    if settings.campaign.active {
        output::field("  starts", date(settings.campaign.start_at));
        output::field("  ends", date(settings.campaign.end_at));
        output::field("  threshold", amount(settings.campaign.free_threshold));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args() -> ShippingSettingsArgs {
        ShippingSettingsArgs {
            inside: None,
            outside: None,
            free_threshold: None,
            free_districts: Vec::new(),
            clear_free_districts: false,
            campaign: None,
            campaign_start: None,
            campaign_end: None,
            campaign_threshold: None,
        }
    }

    fn current() -> ShippingSettings {
        ShippingSettings {
            inside_dhaka_rate: Some(Decimal::from(60)),
            outside_dhaka_rate: Some(Decimal::from(120)),
            free_for_districts: vec!["Gazipur".to_string()],
            ..ShippingSettings::default()
        }
    }

    #[test]
    fn test_apply_keeps_unset_values() {
        let updated = ShippingSettingsArgs {
            outside: Some(Decimal::from(150)),
            ..args()
        }
        .apply(current())
        .unwrap();
        assert_eq!(updated.inside_dhaka_rate, Some(Decimal::from(60)));
        assert_eq!(updated.outside_dhaka_rate, Some(Decimal::from(150)));
        assert_eq!(updated.free_for_districts, vec!["Gazipur".to_string()]);
    }

    #[test]
    fn test_apply_canonicalizes_districts() {
        let updated = ShippingSettingsArgs {
            free_districts: vec![" narayanganj ".to_string()],
            ..args()
        }
        .apply(current())
        .unwrap();
        assert_eq!(updated.free_for_districts, vec!["Narayanganj".to_string()]);

        let err = ShippingSettingsArgs {
            free_districts: vec!["Atlantis".to_string()],
            ..args()
        }
        .apply(current());
        assert!(err.is_err());
    }

    #[test]
    fn test_apply_rejects_negative_and_inverted_window() {
        assert!(
            ShippingSettingsArgs {
                inside: Some(Decimal::from(-5)),
                ..args()
            }
            .apply(current())
            .is_err()
        );

        let start = "2026-03-10T00:00:00Z".parse().unwrap();
        let end = "2026-03-01T00:00:00Z".parse().unwrap();
        assert!(
            ShippingSettingsArgs {
                campaign_start: Some(start),
                campaign_end: Some(end),
                ..args()
            }
            .apply(current())
            .is_err()
        );
    }
}
