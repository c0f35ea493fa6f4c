//! Orders listing route handler.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::{filters, routes::load_orders, shopify::OrderSummary, state::AppState};

/// Orders fetched for the listing window.
const ORDERS_PAGE_ORDERS: u32 = 100;
/// Line items fetched per order.
const ORDERS_PAGE_LINE_ITEMS: u32 = 20;

/// Which orders the table shows.
///
/// Unknown query values fall back to [`OrderFilter::All`] rather than
/// erroring, matching the select control on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFilter {
    All,
    Eco,
    Standard,
}

impl OrderFilter {
    fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("eco") => Self::Eco,
            Some("standard") => Self::Standard,
            _ => Self::All,
        }
    }

    const fn matches(self, eco_packaging: bool) -> bool {
        match self {
            Self::All => true,
            Self::Eco => eco_packaging,
            Self::Standard => !eco_packaging,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Eco => "eco",
            Self::Standard => "standard",
        }
    }
}

/// Query parameters for the orders page.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub filter: Option<String>,
}

/// Row in the orders table.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub name: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub date: String,
    pub item_count: u32,
    pub subtotal: Decimal,
    pub eco_packaging: bool,
}

impl From<&OrderSummary> for OrderRowView {
    fn from(order: &OrderSummary) -> Self {
        Self {
            name: order.name.clone(),
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            date: order.created_at.format("%d.%m.%Y").to_string(),
            item_count: order.item_count(),
            subtotal: order.subtotal,
            eco_packaging: order.eco_packaging,
        }
    }
}

/// Orders page template.
#[derive(Template)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub current_path: String,
    pub connected: bool,
    pub filter: &'static str,
    pub total_count: usize,
    pub eco_count: usize,
    pub standard_count: usize,
    pub rows: Vec<OrderRowView>,
}

/// Orders page handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Html<String> {
    let orders = load_orders(&state, ORDERS_PAGE_ORDERS, ORDERS_PAGE_LINE_ITEMS).await;
    let filter = OrderFilter::from_query(query.filter.as_deref());

    let eco_count = orders.iter().filter(|o| o.eco_packaging).count();
    let rows: Vec<OrderRowView> = orders
        .iter()
        .filter(|o| filter.matches(o.eco_packaging))
        .map(OrderRowView::from)
        .collect();

    let template = OrdersTemplate {
        current_path: "/orders".to_string(),
        connected: state.shopify().has_token(),
        filter: filter.as_str(),
        total_count: orders.len(),
        eco_count,
        standard_count: orders.len() - eco_count,
        rows,
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

    use crate::shopify::LineItemSummary;

    use super::*;

    fn order(name: &str, eco: bool) -> OrderSummary {
        OrderSummary {
            id: format!("gid://shopify/Order/{}", name.trim_start_matches('#')),
            name: name.to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 8, 20, 14, 30, 0).unwrap(),
            customer_name: "Lars Nielsen".to_string(),
            customer_email: Some("lars@example.com".to_string()),
            line_items: vec![
                LineItemSummary {
                    title: "Soap bar".to_string(),
                    quantity: 1,
                },
                LineItemSummary {
                    title: "Tote bag".to_string(),
                    quantity: 2,
                },
            ],
            note: None,
            subtotal: Decimal::new(24_900, 2),
            currency: "DKK".to_string(),
            discount_total: Decimal::ZERO,
            eco_packaging: eco,
        }
    }

    #[test]
    fn test_filter_parses_known_values() {
        assert_eq!(OrderFilter::from_query(Some("eco")), OrderFilter::Eco);
        assert_eq!(
            OrderFilter::from_query(Some("standard")),
            OrderFilter::Standard
        );
        assert_eq!(OrderFilter::from_query(Some("all")), OrderFilter::All);
        assert_eq!(OrderFilter::from_query(None), OrderFilter::All);
    }

    #[test]
    fn test_filter_falls_back_to_all_on_unknown() {
        assert_eq!(OrderFilter::from_query(Some("bogus")), OrderFilter::All);
    }

    #[test]
    fn test_filter_matches() {
        assert!(OrderFilter::All.matches(true));
        assert!(OrderFilter::All.matches(false));
        assert!(OrderFilter::Eco.matches(true));
        assert!(!OrderFilter::Eco.matches(false));
        assert!(OrderFilter::Standard.matches(false));
        assert!(!OrderFilter::Standard.matches(true));
    }

    #[test]
    fn test_row_view_formats_date_and_counts_items() {
        let row = OrderRowView::from(&order("#1001", true));
        assert_eq!(row.date, "20.08.2026");
        assert_eq!(row.item_count, 3);
        assert!(row.eco_packaging);
    }

    #[test]
    fn test_orders_template_renders_counts_and_badges() {
        let orders = [order("#1001", true), order("#1002", false)];
        let rows: Vec<OrderRowView> = orders.iter().map(OrderRowView::from).collect();

        let template = OrdersTemplate {
            current_path: "/orders".to_string(),
            connected: true,
            filter: "all",
            total_count: 2,
            eco_count: 1,
            standard_count: 1,
            rows,
        };

        let html = template.render().unwrap();
        assert!(html.contains("Showing 2 of 2 orders"));
        assert!(html.contains("✓ Eco"));
        assert!(html.contains("Standard"));
        assert!(html.contains("lars@example.com"));
    }
}
