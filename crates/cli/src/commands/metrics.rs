//! Dashboard metrics command.
//!
//! Computes the same metrics the dashboard page shows, over the same
//! order window, and prints them to the terminal.
//!
//! # Usage
//!
//! ```bash
//! eco-cli metrics
//! ```

use thiserror::Error;

use eco_packaging_admin::config::{AdminConfig, ConfigError};
use eco_packaging_admin::filters::format_kroner;
use eco_packaging_admin::metrics::{DashboardMetrics, WEEKDAYS};
use eco_packaging_admin::settings::SettingsStore;
use eco_packaging_admin::shopify::{AdminApiError, AdminClient};

/// Orders fetched for the metrics window, matching the dashboard page.
const METRICS_ORDERS: u32 = 250;
/// Line items fetched per order.
const METRICS_LINE_ITEMS: u32 = 50;

/// Errors that can occur while computing metrics.
#[derive(Debug, Error)]
pub enum MetricsCliError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The Admin API request failed.
    #[error("Shopify Admin API error: {0}")]
    Api(#[from] AdminApiError),
}

/// Fetch orders, compute the dashboard metrics, and print them.
pub async fn show() -> Result<(), MetricsCliError> {
    dotenvy::dotenv().ok();

    let config = AdminConfig::from_env()?;
    let client = AdminClient::new(&config.shopify)?;
    let settings = SettingsStore::new(&config.data_dir).load();

    let orders = client.fetch_orders(METRICS_ORDERS, METRICS_LINE_ITEMS).await?;
    let metrics = DashboardMetrics::compute(&orders, &settings);

    tracing::info!(
        "Orders: {} total, {} eco ({:.1}%)",
        metrics.total_orders,
        metrics.eco_orders,
        metrics.eco_percentage
    );
    tracing::info!("Items saved: {}", metrics.items_saved);
    tracing::info!(
        "Estimated cost saved: {}",
        format_kroner(metrics.estimated_cost_saved)
    );
    tracing::info!(
        "Total discount given: {}",
        format_kroner(metrics.total_discount_given)
    );

    tracing::info!("Eco orders by weekday:");
    for (label, count) in WEEKDAYS.iter().zip(metrics.weekday_counts) {
        tracing::info!("  {}: {}", label, count);
    }

    if metrics.top_products.is_empty() {
        tracing::info!("No product data in eco orders yet");
    } else {
        tracing::info!("Top products in eco orders:");
        for (i, product) in metrics.top_products.iter().enumerate() {
            tracing::info!("  {}. {} ({})", i + 1, product.title, product.quantity);
        }
    }

    Ok(())
}
