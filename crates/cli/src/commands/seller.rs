//! Seller verification from the seller's side.

use clap::Subcommand;
use dokan_client::types::{SellerVerification, VerificationRequest};
use dokan_core::VerificationStatus;

use super::{CommandError, Context};
use crate::output;

#[derive(Subcommand)]
pub enum SellerAction {
    /// Show your verification status
    Status,
    /// Submit verification documents
    Submit {
        #[arg(long)]
        shop_name: String,

        /// National ID number
        #[arg(long)]
        nid: String,

        #[arg(long)]
        trade_license: Option<String>,

        /// URL of an uploaded document; repeat for several
        #[arg(long = "document")]
        documents: Vec<String>,
    },
}

pub async fn run(ctx: &Context, action: SellerAction) -> Result<(), CommandError> {
    let verification = match action {
        SellerAction::Status => ctx.api.verification_status().await?,
        SellerAction::Submit {
            shop_name,
            nid,
            trade_license,
            documents,
        } => {
            let request = VerificationRequest {
                shop_name: required(shop_name, "shop name")?,
                nid_number: required(nid, "NID number")?,
                trade_license: trade_license.filter(|t| !t.trim().is_empty()),
                documents,
            };
            ctx.api.submit_verification(&request).await?
        }
    };

    print_verification(ctx, &verification);
    Ok(())
}

fn required(value: String, what: &str) -> Result<String, CommandError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(CommandError::Invalid(format!("Please enter a {what}")));
    }
    Ok(value)
}

pub fn print_verification(ctx: &Context, verification: &SellerVerification) {
    if ctx.json {
        output::json(verification);
        return;
    }
    output::field("Status", verification.status);
    if verification.status == VerificationStatus::Unsubmitted {
        return;
    }
    output::field("Shop", &verification.shop_name);
    if let Some(submitted) = verification.submitted_at {
        output::field("Submitted", submitted.format("%Y-%m-%d %H:%M"));
    }
    if let Some(reason) = &verification.rejection_reason {
        output::field("Reason", reason);
    }
}
