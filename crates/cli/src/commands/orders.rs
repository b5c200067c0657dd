//! Order history.

use clap::Subcommand;
use dokan_client::types::Order;
use dokan_core::OrderId;

use super::{CommandError, Context};
use crate::output;

#[derive(Subcommand)]
pub enum OrderAction {
    /// List your orders
    List,
    /// Show one order
    Show { id: String },
}

pub async fn run(ctx: &Context, action: OrderAction) -> Result<(), CommandError> {
    match action {
        OrderAction::List => {
            let orders = ctx.api.my_orders().await?;
            print_orders(ctx, &orders);
        }
        OrderAction::Show { id } => {
            let order = ctx.api.order(&OrderId::new(id.trim())).await?;
            print_order(ctx, &order);
        }
    }
    Ok(())
}

pub fn print_orders(ctx: &Context, orders: &[Order]) {
    if ctx.json {
        output::json(orders);
        return;
    }
    let rows: Vec<Vec<String>> = orders
        .iter()
        .map(|o| {
            vec![
                o.reference().to_string(),
                o.created_at
                    .map(|t| t.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                o.status.to_string(),
                o.items.len().to_string(),
                o.total.to_string(),
            ]
        })
        .collect();
    output::table(&["ORDER", "DATE", "STATUS", "ITEMS", "TOTAL"], &rows);
}

pub fn print_order(ctx: &Context, order: &Order) {
    if ctx.json {
        output::json(order);
        return;
    }

    output::heading(&format!("Order {}", order.reference()));
    output::field("Status", order.status);
    output::field("Payment", order.payment_method);
    output::field("District", &order.shipping_address.district);
    output::field("Address", &order.shipping_address.address);
    output::line("");

    let rows: Vec<Vec<String>> = order
        .items
        .iter()
        .map(|i| {
            vec![
                i.name.clone(),
                i.price.to_string(),
                i.quantity.to_string(),
            ]
        })
        .collect();
    output::table(&["ITEM", "PRICE", "QTY"], &rows);
    output::line("");

    output::field("Subtotal", order.subtotal);
    output::field("Shipping", order.shipping_cost);
    if order.discount.is_positive() {
        output::field("Discount", format!("-{}", order.discount));
    }
    if order.shipping_discount.is_positive() {
        output::field("Shipping discount", format!("-{}", order.shipping_discount));
    }
    if let Some(code) = &order.coupon_code {
        output::field("Coupon", code);
    }
    output::field("Total", order.total);
}
