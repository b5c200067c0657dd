use clap::Subcommand;
use dokan_client::types::NewReview;
use dokan_core::ProductId;

use super::{CommandError, Context};
use crate::output;

#[derive(Subcommand)]
pub enum ReviewAction {
    /// List a product's reviews
    List { product: String },
    /// Review a product
    Post {
        product: String,

        /// 1 to 5
        #[arg(short, long)]
        rating: u8,

        #[arg(short, long)]
        comment: String,
    },
}

pub async fn run(ctx: &Context, action: ReviewAction) -> Result<(), CommandError> {
    match action {
        ReviewAction::List { product } => {
            let reviews = ctx.api.reviews(&ProductId::new(product.trim())).await?;
            if ctx.json {
                output::json(&reviews);
                return Ok(());
            }
            let rows: Vec<Vec<String>> = reviews
                .iter()
                .map(|r| vec![r.rating.to_string(), r.user_name.clone(), r.comment.clone()])
                .collect();
            output::table(&["RATING", "BY", "COMMENT"], &rows);
        }
        ReviewAction::Post {
            product,
            rating,
            comment,
        } => {
            let review = NewReview::new(ProductId::new(product.trim()), rating, &comment)
                .map_err(|e| CommandError::Invalid(e.to_string()))?;
            let posted = ctx.api.post_review(&review).await?;
            if ctx.json {
                output::json(&posted);
            } else {
                output::line("Thanks for your review.");
            }
        }
    }
    Ok(())
}
