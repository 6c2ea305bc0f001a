//! Lotus CLI - the storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! lotus products --search tea
//! lotus product green-tea
//! lotus categories
//!
//! # Session
//! lotus register you@example.com
//! lotus login you@example.com
//! lotus whoami
//! lotus logout
//!
//! # Cart
//! lotus cart show
//! lotus cart add green-tea --quantity 2
//! lotus cart set 14 3
//! lotus cart remove 14
//! lotus cart clear --yes
//!
//! # Orders
//! lotus checkout --phone 0123456789 --address "12 Hang Gai, Hanoi"
//! lotus orders
//! ```
//!
//! Commands run one at a time, so cart and order operations are naturally
//! serialized; the checkout flow additionally refuses duplicate
//! submissions on its own.

#![cfg_attr(not(test), forbid(unsafe_code))]
// Terminal output is the product here.
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

use lotus_storefront::config::StorefrontConfig;
use lotus_storefront::state::AppState;

mod commands;

#[derive(Parser)]
#[command(name = "lotus")]
#[command(author, version, about = "Lotus storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        /// Filter by search text
        #[arg(short, long)]
        search: Option<String>,

        /// Filter by category id
        #[arg(short, long)]
        category: Option<i32>,
    },
    /// Show one product by its URL slug
    Product {
        /// Product slug, e.g. `green-tea`
        slug: String,
    },
    /// List product categories
    Categories,
    /// Sign in with email and password
    Login {
        /// Account email
        email: String,
    },
    /// Create an account and sign in
    Register {
        /// Account email
        email: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// Cart operations
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Convert the cart into an order
    Checkout {
        /// Contact phone number (required by the backend)
        #[arg(long)]
        phone: String,

        /// Delivery address
        #[arg(long)]
        address: String,

        /// Optional delivery note
        #[arg(long)]
        note: Option<String>,
    },
    /// List your orders, newest first
    Orders,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart and its subtotal
    Show,
    /// Add a product (by slug) to the cart
    Add {
        /// Product slug
        slug: String,

        /// Quantity to add (clamped to available stock)
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a cart line
    Set {
        /// Cart line id (shown by `cart show`)
        line: i32,

        /// New quantity (at least 1)
        quantity: u32,
    },
    /// Remove one cart line (asks for confirmation)
    Remove {
        /// Cart line id
        line: i32,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Empty the cart (asks for confirmation)
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let state = AppState::new(config)?;

    // Pick up a session persisted by a previous run, if any.
    state.session().restore();

    match cli.command {
        Commands::Products { search, category } => {
            commands::shop::products(&state, search.as_deref(), category).await?;
        }
        Commands::Product { slug } => commands::shop::product(&state, &slug).await?,
        Commands::Categories => commands::shop::categories(&state).await?,
        Commands::Login { email } => commands::account::login(&state, &email).await?,
        Commands::Register { email } => commands::account::register(&state, &email).await?,
        Commands::Logout => commands::account::logout(&state),
        Commands::Whoami => commands::account::whoami(&state),
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state).await?,
            CartAction::Add { slug, quantity } => {
                commands::cart::add(&state, &slug, quantity).await?;
            }
            CartAction::Set { line, quantity } => {
                commands::cart::set_quantity(&state, line, quantity).await?;
            }
            CartAction::Remove { line, yes } => commands::cart::remove(&state, line, yes).await?,
            CartAction::Clear { yes } => commands::cart::clear(&state, yes).await?,
        },
        Commands::Checkout {
            phone,
            address,
            note,
        } => commands::order::checkout(&state, phone, address, note).await?,
        Commands::Orders => commands::order::list(&state).await?,
    }

    Ok(())
}
