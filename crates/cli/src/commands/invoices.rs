use clap::Subcommand;
use dokan_core::InvoiceId;

use super::{CommandError, Context};
use crate::output;

#[derive(Subcommand)]
pub enum InvoiceAction {
    /// List invoices
    List,
    /// Show one invoice
    Show { id: String },
}

pub async fn run(ctx: &Context, action: InvoiceAction) -> Result<(), CommandError> {
    match action {
        InvoiceAction::List => {
            let invoices = ctx.api.invoices().await?;
            if ctx.json {
                output::json(&invoices);
                return Ok(());
            }
            let rows: Vec<Vec<String>> = invoices
                .iter()
                .map(|i| {
                    vec![
                        i.invoice_number.clone().unwrap_or_else(|| i.id.to_string()),
                        i.issued_at
                            .map(|t| t.format("%Y-%m-%d").to_string())
                            .unwrap_or_default(),
                        i.status.to_string(),
                        i.amount.to_string(),
                    ]
                })
                .collect();
            output::table(&["INVOICE", "ISSUED", "STATUS", "AMOUNT"], &rows);
        }
        InvoiceAction::Show { id } => {
            let invoice = ctx.api.invoice(&InvoiceId::new(id.trim())).await?;
            if ctx.json {
                output::json(&invoice);
                return Ok(());
            }
            output::heading(&format!(
                "Invoice {}",
                invoice.invoice_number.as_deref().unwrap_or(invoice.id.as_str())
            ));
            if let Some(order) = &invoice.order_id {
                output::field("Order", order);
            }
            output::field("Status", invoice.status);
            let rows: Vec<Vec<String>> = invoice
                .lines
                .iter()
                .map(|l| vec![l.description.clone(), l.quantity.to_string(), l.amount.to_string()])
                .collect();
            output::table(&["DESCRIPTION", "QTY", "AMOUNT"], &rows);
            output::field("Amount", invoice.amount);
        }
    }
    Ok(())
}
