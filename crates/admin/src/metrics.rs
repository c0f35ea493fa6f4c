//! Dashboard aggregates computed from the order list.
//!
//! Everything here is recomputed on every page load; nothing is cached or
//! persisted. Money math uses `Decimal` so repeated percentage sums do not
//! drift the way float accumulation would.

use std::collections::HashMap;

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::shopify::OrderSummary;
use eco_packaging_core::AppSettings;

/// Weekday labels in histogram order.
pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const TOP_PRODUCT_LIMIT: usize = 5;

/// Aggregates shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardMetrics {
    /// All orders in the fetched window.
    pub total_orders: usize,
    /// Orders classified as eco packaging.
    pub eco_orders: usize,
    /// Eco share of all orders, in percent.
    pub eco_percentage: Decimal,
    /// Units shipped without standard packaging (sum of eco line items).
    pub items_saved: u64,
    /// `items_saved` times the configured packaging cost, in kroner.
    pub estimated_cost_saved: Decimal,
    /// Sum of eco subtotals times the configured discount percent.
    pub total_discount_given: Decimal,
    /// Eco orders per weekday, Sunday first.
    pub weekday_counts: [u64; 7],
    /// Most-ordered products across eco orders.
    pub top_products: Vec<ProductCount>,
}

/// One entry in the top-products list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCount {
    pub title: String,
    pub quantity: u64,
}

impl DashboardMetrics {
    /// Compute all aggregates over one fetched order window.
    #[must_use]
    pub fn compute(orders: &[OrderSummary], settings: &AppSettings) -> Self {
        let eco: Vec<&OrderSummary> = orders.iter().filter(|o| o.eco_packaging).collect();

        let items_saved: u64 = eco.iter().map(|o| u64::from(o.item_count())).sum();
        let estimated_cost_saved =
            Decimal::from(items_saved) * Decimal::from(settings.packaging_cost);

        let discount_rate = Decimal::from(settings.discount_percent) / Decimal::from(100);
        let total_discount_given: Decimal = eco.iter().map(|o| o.subtotal * discount_rate).sum();

        let eco_percentage = if orders.is_empty() {
            Decimal::ZERO
        } else {
            (Decimal::from(eco.len()) * Decimal::from(100) / Decimal::from(orders.len())).round_dp(1)
        };

        let mut weekday_counts = [0u64; 7];
        for order in &eco {
            let bucket = order.created_at.weekday().num_days_from_sunday() as usize;
            if let Some(count) = weekday_counts.get_mut(bucket) {
                *count += 1;
            }
        }

        Self {
            total_orders: orders.len(),
            eco_orders: eco.len(),
            eco_percentage,
            items_saved,
            estimated_cost_saved,
            total_discount_given,
            weekday_counts,
            top_products: top_products(&eco),
        }
    }
}

/// Rank products across eco orders by total quantity.
///
/// Ties break alphabetically so the list is stable across reloads.
fn top_products(eco_orders: &[&OrderSummary]) -> Vec<ProductCount> {
    let mut quantities: HashMap<&str, u64> = HashMap::new();
    for order in eco_orders {
        for item in &order.line_items {
            *quantities.entry(item.title.as_str()).or_insert(0) += u64::from(item.quantity);
        }
    }

    let mut ranked: Vec<ProductCount> = quantities
        .into_iter()
        .map(|(title, quantity)| ProductCount {
            title: title.to_string(),
            quantity,
        })
        .collect();
    ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(a.title.cmp(&b.title)));
    ranked.truncate(TOP_PRODUCT_LIMIT);
    ranked
}
