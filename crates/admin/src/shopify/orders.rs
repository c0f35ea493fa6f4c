//! Order fetching for the admin pages.
//!
//! One query serves both pages; the dashboard asks for a deeper window
//! (250 orders, 50 line items) than the orders table (100 orders, 20 line
//! items). Responses are flattened into [`OrderSummary`] records.

use serde::Deserialize;
use tracing::instrument;

use super::conversions::{OrderSummary, convert_order};
use super::{AdminApiError, AdminClient};

/// Orders query, newest first.
const ORDERS_QUERY: &str = r"
    query EcoOrders($first: Int!, $lineItems: Int!) {
        orders(first: $first, sortKey: CREATED_AT, reverse: true) {
            edges {
                node {
                    id
                    name
                    createdAt
                    customer {
                        firstName
                        lastName
                        email
                    }
                    lineItems(first: $lineItems) {
                        edges {
                            node {
                                quantity
                                title
                            }
                        }
                    }
                    note
                    customAttributes {
                        key
                        value
                    }
                    subtotalPriceSet {
                        shopMoney {
                            amount
                            currencyCode
                        }
                    }
                    totalDiscountsSet {
                        shopMoney {
                            amount
                        }
                    }
                }
            }
        }
    }
";

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct OrdersData {
    pub orders: OrderConnection,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderConnection {
    #[serde(default)]
    pub edges: Vec<OrderEdge>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderEdge {
    pub node: OrderNode,
}

/// One order node as returned by the Admin API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderNode {
    pub id: String,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub customer: Option<CustomerNode>,
    #[serde(default)]
    pub line_items: Option<LineItemConnection>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub custom_attributes: Vec<AttributeNode>,
    #[serde(default)]
    pub subtotal_price_set: Option<PriceSet>,
    #[serde(default)]
    pub total_discounts_set: Option<PriceSet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomerNode {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LineItemConnection {
    #[serde(default)]
    pub edges: Vec<LineItemEdge>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LineItemEdge {
    pub node: LineItemNode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LineItemNode {
    pub quantity: u32,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AttributeNode {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PriceSet {
    #[serde(default)]
    pub shop_money: Option<MoneyBag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MoneyBag {
    pub amount: String,
    #[serde(default)]
    pub currency_code: Option<String>,
}

// =============================================================================
// Fetching
// =============================================================================

impl AdminClient {
    /// Fetch the most recent orders, flattened and classified.
    ///
    /// # Arguments
    ///
    /// * `first` - Number of orders to return (newest first)
    /// * `line_items` - Line items fetched per order
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error
    /// response. Callers on the page path treat any error as empty data.
    #[instrument(skip(self))]
    pub async fn fetch_orders(
        &self,
        first: u32,
        line_items: u32,
    ) -> Result<Vec<OrderSummary>, AdminApiError> {
        let variables = serde_json::json!({
            "first": first,
            "lineItems": line_items,
        });

        let response: OrdersData = self.execute(ORDERS_QUERY, Some(variables)).await?;

        Ok(response
            .orders
            .edges
            .into_iter()
            .map(|edge| convert_order(edge.node))
            .collect())
    }
}
