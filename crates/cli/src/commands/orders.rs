//! Order listing command.
//!
//! # Usage
//!
//! ```bash
//! eco-cli orders --filter eco --limit 25
//! ```
//!
//! # Environment Variables
//!
//! Reads the same Shopify configuration as the admin service
//! (`SHOPIFY_STORE`, `SHOPIFY_ADMIN_TOKEN`, ...). Unlike the dashboard,
//! a missing token is an error here rather than an empty listing.

use thiserror::Error;

use eco_packaging_admin::config::{AdminConfig, ConfigError};
use eco_packaging_admin::shopify::{AdminApiError, AdminClient, OrderSummary};

/// Line items fetched per order.
const LINE_ITEMS_PER_ORDER: u32 = 20;
/// Upper bound the Admin API accepts for one page of orders.
const MAX_ORDERS: u32 = 250;

/// Errors that can occur while listing orders.
#[derive(Debug, Error)]
pub enum OrdersCliError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The Admin API request failed.
    #[error("Shopify Admin API error: {0}")]
    Api(#[from] AdminApiError),

    /// Unsupported filter value.
    #[error("Invalid filter: {0}. Valid filters: all, eco, standard")]
    InvalidFilter(String),
}

fn keep(filter: &str, order: &OrderSummary) -> Result<bool, OrdersCliError> {
    match filter {
        "all" => Ok(true),
        "eco" => Ok(order.eco_packaging),
        "standard" => Ok(!order.eco_packaging),
        other => Err(OrdersCliError::InvalidFilter(other.to_owned())),
    }
}

/// Fetch and print recent orders, newest first.
pub async fn list(filter: &str, limit: u32) -> Result<(), OrdersCliError> {
    dotenvy::dotenv().ok();

    // Validate the filter before any network round trip
    if !matches!(filter, "all" | "eco" | "standard") {
        return Err(OrdersCliError::InvalidFilter(filter.to_owned()));
    }

    let config = AdminConfig::from_env()?;
    let client = AdminClient::new(&config.shopify)?;

    let orders = client
        .fetch_orders(limit.min(MAX_ORDERS), LINE_ITEMS_PER_ORDER)
        .await?;

    let eco_count = orders.iter().filter(|o| o.eco_packaging).count();
    tracing::info!(
        "{} orders fetched ({} eco, {} standard), showing: {}",
        orders.len(),
        eco_count,
        orders.len() - eco_count,
        filter
    );

    for order in &orders {
        if keep(filter, order)? {
            let badge = if order.eco_packaging { "eco" } else { "standard" };
            tracing::info!(
                "  {}  {}  {:<24}  {} items  {} {}  [{}]",
                order.name,
                order.created_at.format("%d.%m.%Y"),
                order.customer_name,
                order.item_count(),
                order.subtotal,
                order.currency,
                badge
            );
        }
    }

    Ok(())
}
