//! Eco-packaging CLI - settings and order inspection tools.
//!
//! # Usage
//!
//! ```bash
//! # Print the current widget settings
//! eco-cli settings show
//!
//! # Change the discount and packaging cost
//! eco-cli settings set --discount-percent 10 --packaging-cost 12
//!
//! # Restore the default settings
//! eco-cli settings reset
//!
//! # List recent orders with their packaging choice
//! eco-cli orders --filter eco --limit 25
//!
//! # Print the dashboard metrics
//! eco-cli metrics
//! ```
//!
//! # Commands
//!
//! - `settings` - Inspect or modify the widget settings blob
//! - `orders` - List recent orders from the Shopify Admin API
//! - `metrics` - Compute and print the dashboard metrics

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::settings::SettingsUpdate;

#[derive(Parser)]
#[command(name = "eco-cli")]
#[command(author, version, about = "Eco-packaging CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or modify the widget settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// List recent orders with their packaging choice
    Orders {
        /// Which orders to show (`all`, `eco`, `standard`)
        #[arg(short, long, default_value = "all")]
        filter: String,

        /// How many orders to fetch, newest first
        #[arg(short, long, default_value_t = 50)]
        limit: u32,
    },
    /// Compute and print the dashboard metrics
    Metrics,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current settings
    Show,
    /// Update one or more settings fields
    Set {
        /// Enable or disable the discount
        #[arg(long)]
        enabled: Option<bool>,

        /// Discount percent, clamped to 0-100
        #[arg(long)]
        discount_percent: Option<u32>,

        /// Packaging cost per item in kroner
        #[arg(long)]
        packaging_cost: Option<u32>,

        /// Show the widget on product pages
        #[arg(long)]
        show_on_product_page: Option<bool>,

        /// Show the widget on the cart page
        #[arg(long)]
        show_on_cart: Option<bool>,

        /// Widget language (`en`, `da`)
        #[arg(long)]
        language: Option<String>,
    },
    /// Restore the default settings
    Reset,
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
    match cli.command {
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show()?,
            SettingsAction::Set {
                enabled,
                discount_percent,
                packaging_cost,
                show_on_product_page,
                show_on_cart,
                language,
            } => {
                commands::settings::set(SettingsUpdate {
                    enabled,
                    discount_percent,
                    packaging_cost,
                    show_on_product_page,
                    show_on_cart,
                    language,
                })?;
            }
            SettingsAction::Reset => commands::settings::reset()?,
        },
        Commands::Orders { filter, limit } => {
            commands::orders::list(&filter, limit).await?;
        }
        Commands::Metrics => commands::metrics::show().await?,
    }
    Ok(())
}
