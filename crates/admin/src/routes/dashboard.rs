//! Dashboard route handler.

use askama::Template;
use axum::{extract::State, response::Html};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::{
    filters,
    metrics::{DashboardMetrics, WEEKDAYS},
    routes::load_orders,
    state::AppState,
};

/// Orders fetched for the dashboard window.
const DASHBOARD_ORDERS: u32 = 250;
/// Line items fetched per order.
const DASHBOARD_LINE_ITEMS: u32 = 50;
/// Rows in the recent eco orders table.
const RECENT_ECO_LIMIT: usize = 10;

/// One bar in the eco orders weekday chart.
#[derive(Debug, Clone)]
pub struct WeekdayBarView {
    pub label: &'static str,
    pub count: u64,
    /// Bar height relative to the busiest weekday, 0..=100.
    pub percent: u32,
}

/// Row in the recent eco orders table.
#[derive(Debug, Clone)]
pub struct EcoOrderRowView {
    pub name: String,
    pub customer_name: String,
    pub date: String,
    pub item_count: u32,
    pub discount: Decimal,
}

/// Bar in the top products list.
#[derive(Debug, Clone)]
pub struct TopProductView {
    pub title: String,
    pub quantity: u64,
    /// Bar width relative to the best seller, 0..=100.
    pub percent: u32,
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_path: String,
    pub connected: bool,
    pub metrics: DashboardMetrics,
    /// Always rendered with one decimal, e.g. `30.0`.
    pub eco_percentage: String,
    pub weekdays: Vec<WeekdayBarView>,
    pub recent_eco: Vec<EcoOrderRowView>,
    pub top_products: Vec<TopProductView>,
}

/// Scale a count to a percentage of the chart maximum.
fn bar_percent(count: u64, max: u64) -> u32 {
    if max == 0 {
        0
    } else {
        u32::try_from(count * 100 / max).unwrap_or(100)
    }
}

/// Dashboard page handler.
///
/// Every data source degrades independently: a failed order fetch
/// renders zeroed metrics, and settings fall back to defaults.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let orders = load_orders(&state, DASHBOARD_ORDERS, DASHBOARD_LINE_ITEMS).await;
    let settings = state.settings().load();
    let metrics = DashboardMetrics::compute(&orders, &settings);

    let discount_rate = Decimal::from(settings.discount_percent) / Decimal::from(100);
    let recent_eco: Vec<EcoOrderRowView> = orders
        .iter()
        .filter(|order| order.eco_packaging)
        .take(RECENT_ECO_LIMIT)
        .map(|order| EcoOrderRowView {
            name: order.name.clone(),
            customer_name: order.customer_name.clone(),
            date: order.created_at.format("%d.%m.%Y").to_string(),
            item_count: order.item_count(),
            discount: (order.subtotal * discount_rate).round_dp(2),
        })
        .collect();

    let busiest = metrics.weekday_counts.iter().copied().max().unwrap_or(0);
    let weekdays: Vec<WeekdayBarView> = WEEKDAYS
        .iter()
        .copied()
        .zip(metrics.weekday_counts)
        .map(|(label, count)| WeekdayBarView {
            label,
            count,
            percent: bar_percent(count, busiest),
        })
        .collect();

    let best_seller = metrics.top_products.first().map_or(0, |p| p.quantity);
    let top_products: Vec<TopProductView> = metrics
        .top_products
        .iter()
        .map(|p| TopProductView {
            title: p.title.clone(),
            quantity: p.quantity,
            percent: bar_percent(p.quantity, best_seller),
        })
        .collect();

    let template = DashboardTemplate {
        current_path: "/".to_string(),
        connected: state.shopify().has_token(),
        eco_percentage: format!("{:.1}", metrics.eco_percentage),
        metrics,
        weekdays,
        recent_eco,
        top_products,
    };

    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::shopify::{LineItemSummary, OrderSummary};
    use eco_packaging_core::AppSettings;

    use super::*;

    fn eco_order(name: &str, subtotal: Decimal) -> OrderSummary {
        OrderSummary {
            id: format!("gid://shopify/Order/{}", name.trim_start_matches('#')),
            name: name.to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 8, 17, 9, 0, 0).unwrap(),
            customer_name: "Mette Jensen".to_string(),
            customer_email: None,
            line_items: vec![LineItemSummary {
                title: "Beeswax candle".to_string(),
                quantity: 2,
            }],
            note: None,
            subtotal,
            currency: "DKK".to_string(),
            discount_total: Decimal::ZERO,
            eco_packaging: true,
        }
    }

    #[test]
    fn test_bar_percent_scales_to_max() {
        assert_eq!(bar_percent(0, 0), 0, "empty chart has no bars");
        assert_eq!(bar_percent(5, 10), 50);
        assert_eq!(bar_percent(10, 10), 100);
    }

    #[test]
    fn test_recent_eco_row_discount_uses_settings_rate() {
        let order = eco_order("#1001", Decimal::from(200));
        let settings = AppSettings::default();
        let rate = Decimal::from(settings.discount_percent) / Decimal::from(100);

        let discount = (order.subtotal * rate).round_dp(2);
        assert_eq!(discount, Decimal::from(10), "5% of 200 kr");
    }

    #[test]
    fn test_dashboard_template_renders_empty_state() {
        let settings = AppSettings::default();
        let metrics = DashboardMetrics::compute(&[], &settings);
        let weekdays: Vec<WeekdayBarView> = WEEKDAYS
            .iter()
            .copied()
            .zip(metrics.weekday_counts)
            .map(|(label, count)| WeekdayBarView {
                label,
                count,
                percent: 0,
            })
            .collect();

        let template = DashboardTemplate {
            current_path: "/".to_string(),
            connected: false,
            eco_percentage: format!("{:.1}", metrics.eco_percentage),
            metrics,
            weekdays,
            recent_eco: Vec::new(),
            top_products: Vec::new(),
        };

        let html = template.render().unwrap();
        assert!(html.contains("No eco orders yet"));
        assert!(html.contains("0.0"), "empty store shows a zero percentage");
        assert!(
            html.contains("token"),
            "disconnected dashboard hints at missing credentials"
        );
    }
}
