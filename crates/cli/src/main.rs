//! Dokan CLI - Storefront and admin tasks against the Dokan REST backend.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the token is saved to ~/.dokan/token.json)
//! dokan login -e customer@example.com
//!
//! # Browse and fill the cart
//! dokan products --search saree
//! dokan cart add 65f0aa --quantity 2
//!
//! # Quote shipping and place an order
//! dokan shipping quote Sylhet --subtotal 1500
//! dokan checkout --district Dhaka --address "House 12, Road 5" --coupon EID25
//!
//! # Admin
//! dokan admin orders --status pending
//! dokan admin shipping set --inside 60 --outside 120 --free-threshold 1000
//! ```
//!
//! # Environment Variables
//!
//! See `dokan_client::config`. `RUST_LOG` overrides the log filter.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::{
    AdminAction, CartAction, CheckoutArgs, Context, InvoiceAction, OrderAction, ProductArgs,
    ReviewAction, SellerAction, ShippingAction,
};

#[derive(Parser)]
#[command(name = "dokan")]
#[command(author, version, about = "Dokan storefront and admin tools")]
struct Cli {
    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and save the bearer token
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "DOKAN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account; a one-time code is emailed to confirm it
    Signup {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// Bangladeshi mobile number
        #[arg(long)]
        phone: Option<String>,

        #[arg(short, long, env = "DOKAN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Confirm a signup with the emailed code
    VerifyOtp {
        #[arg(short, long)]
        email: String,

        otp: String,
    },
    /// Forget the saved token
    Logout,
    /// List products
    Products(ProductArgs),
    /// Show one product with its reviews
    Product { id: String },
    /// List product categories
    Categories,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Shipping quotes and districts
    Shipping {
        #[command(subcommand)]
        action: ShippingAction,
    },
    /// Check out the current cart
    Checkout(CheckoutArgs),
    /// Your orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Product reviews
    Reviews {
        #[command(subcommand)]
        action: ReviewAction,
    },
    /// Invoices
    Invoices {
        #[command(subcommand)]
        action: InvoiceAction,
    },
    /// Seller verification
    Seller {
        #[command(subcommand)]
        action: SellerAction,
    },
    /// Admin tasks
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dokan_client=info,dokan_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // District listing needs no backend.
    if let Commands::Shipping {
        action: ShippingAction::Districts,
    } = cli.command
    {
        commands::shipping::districts();
        return Ok(());
    }

    let ctx = Context::from_env(cli.json)?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&ctx, &email, &password).await?;
        }
        Commands::Signup {
            name,
            email,
            phone,
            password,
        } => commands::auth::signup(&ctx, name, &email, phone.as_deref(), password).await?,
        Commands::VerifyOtp { email, otp } => commands::auth::verify_otp(&ctx, &email, &otp).await?,
        Commands::Logout => commands::auth::logout(&ctx)?,
        Commands::Products(args) => commands::catalog::products(&ctx, args).await?,
        Commands::Product { id } => commands::catalog::product(&ctx, &id).await?,
        Commands::Categories => commands::catalog::categories(&ctx).await?,
        Commands::Cart { action } => commands::cart::run(&ctx, action).await?,
        Commands::Shipping { action } => commands::shipping::run(&ctx, action).await?,
        Commands::Checkout(args) => commands::checkout::run(&ctx, args).await?,
        Commands::Orders { action } => commands::orders::run(&ctx, action).await?,
        Commands::Reviews { action } => commands::reviews::run(&ctx, action).await?,
        Commands::Invoices { action } => commands::invoices::run(&ctx, action).await?,
        Commands::Seller { action } => commands::seller::run(&ctx, action).await?,
        Commands::Admin { action } => commands::admin::run(&ctx, action).await?,
    }
    Ok(())
}
