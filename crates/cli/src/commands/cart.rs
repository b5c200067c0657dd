//! Cart management.

use clap::Subcommand;
use dokan_client::types::{AddToCartRequest, Cart};
use dokan_core::ProductId;

use super::{CommandError, Context};
use crate::output;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        product: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        #[arg(long)]
        size: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },
    /// Set a line's quantity (0 removes it)
    Update { product: String, quantity: u32 },
    /// Remove a line
    Remove { product: String },
    /// Empty the cart
    Clear,
}

pub async fn run(ctx: &Context, action: CartAction) -> Result<(), CommandError> {
    let cart = match action {
        CartAction::Show => ctx.api.cart().await?,
        CartAction::Add {
            product,
            quantity,
            size,
            color,
        } => {
            if quantity == 0 {
                return Err(CommandError::Invalid(
                    "Quantity must be at least 1".to_string(),
                ));
            }
            let request = AddToCartRequest {
                product_id: ProductId::new(product.trim()),
                quantity,
                size,
                color,
            };
            ctx.api.add_to_cart(&request).await?
        }
        CartAction::Update { product, quantity } => {
            ctx.api
                .update_cart_item(&ProductId::new(product.trim()), quantity)
                .await?
        }
        CartAction::Remove { product } => {
            ctx.api
                .remove_cart_item(&ProductId::new(product.trim()))
                .await?
        }
        CartAction::Clear => ctx.api.clear_cart().await?,
    };

    print_cart(ctx, &cart);
    Ok(())
}

pub fn print_cart(ctx: &Context, cart: &Cart) {
    if ctx.json {
        output::json(cart);
        return;
    }
    if cart.is_empty() {
        output::line("Your cart is empty.");
        return;
    }

    let rows: Vec<Vec<String>> = cart
        .items
        .iter()
        .map(|item| {
            let mut name = item.name.clone();
            for variant in [&item.size, &item.color].into_iter().flatten() {
                name.push_str(&format!(" / {variant}"));
            }
            vec![
                item.product_id.to_string(),
                name,
                item.price.to_string(),
                item.quantity.to_string(),
                item.line_total().to_string(),
            ]
        })
        .collect();
    output::table(&["ID", "ITEM", "PRICE", "QTY", "TOTAL"], &rows);
    output::field("Items", cart.item_count());
    output::field("Subtotal", cart.subtotal());
}
