//! Product and category browsing.

use clap::Args;
use dokan_client::types::{Product, ProductQuery};
use dokan_core::ProductId;

use super::{CommandError, Context};
use crate::output;

#[derive(Args)]
pub struct ProductArgs {
    /// Free-text search
    #[arg(short, long)]
    search: Option<String>,

    /// Category slug or id
    #[arg(short, long)]
    category: Option<String>,

    #[arg(long)]
    page: Option<u32>,

    #[arg(long)]
    limit: Option<u32>,
}

impl From<ProductArgs> for ProductQuery {
    fn from(args: ProductArgs) -> Self {
        Self {
            search: args.search,
            category: args.category,
            page: args.page,
            limit: args.limit,
        }
    }
}

pub async fn products(ctx: &Context, args: ProductArgs) -> Result<(), CommandError> {
    let page = ctx.api.products(&args.into()).await?;
    if ctx.json {
        output::json(&page);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = page.products.iter().map(product_row).collect();
    output::table(&["ID", "NAME", "PRICE", "STOCK"], &rows);
    output::line(format!(
        "Page {} of {} ({} products)",
        page.page, page.pages, page.total
    ));
    Ok(())
}

fn product_row(product: &Product) -> Vec<String> {
    vec![
        product.id.to_string(),
        product.name.clone(),
        product.effective_price().to_string(),
        if product.in_stock() {
            product.stock.to_string()
        } else {
            "sold out".to_string()
        },
    ]
}

/// Show one product and its reviews.
pub async fn product(ctx: &Context, id: &str) -> Result<(), CommandError> {
    let id = ProductId::new(id.trim());
    let product = ctx.api.product(&id).await?;
    let reviews = ctx.api.reviews(&id).await?;

    if ctx.json {
        output::json(&serde_json::json!({ "product": product, "reviews": reviews }));
        return Ok(());
    }

    output::heading(&product.name);
    output::field("Price", product.effective_price());
    if product.effective_price() != product.price {
        output::field("Regular price", product.price);
    }
    output::field("Stock", product.stock);
    if let Some(category) = &product.category {
        output::field("Category", category);
    }
    if !product.sizes.is_empty() {
        output::field("Sizes", product.sizes.join(", "));
    }
    if !product.colors.is_empty() {
        output::field("Colors", product.colors.join(", "));
    }
    if !product.description.is_empty() {
        output::line("");
        output::line(&product.description);
    }

    output::line("");
    output::line(format!("Reviews ({})", reviews.len()));
    for review in &reviews {
        output::line(format!(
            "  {} {}: {}",
            "*".repeat(usize::from(review.rating)),
            review.user_name,
            review.comment
        ));
    }
    Ok(())
}

pub async fn categories(ctx: &Context) -> Result<(), CommandError> {
    let categories = ctx.api.categories().await?;
    if ctx.json {
        output::json(&categories);
        return Ok(());
    }
    let rows: Vec<Vec<String>> = categories
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.name.clone(),
                c.slug.clone().unwrap_or_default(),
            ]
        })
        .collect();
    output::table(&["ID", "NAME", "SLUG"], &rows);
    Ok(())
}
