//! Flattening of Admin API order nodes into page-ready records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::orders::{CustomerNode, OrderNode, PriceSet};

/// Cart attribute key written by the storefront widget.
const ECO_ATTRIBUTE_KEY: &str = "eco_packaging";

/// Note phrases that mark an order as eco.
const ECO_NOTE_MARKERS: &[&str] = &["eco", "minimal packaging"];

/// A flat, display-ready projection of one order.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    /// Shopify GID.
    pub id: String,
    /// Human order number, e.g. `#1001`.
    pub name: String,
    /// Order creation time.
    pub created_at: DateTime<Utc>,
    /// Customer display name, `Guest` when unknown.
    pub customer_name: String,
    /// Customer email, if any.
    pub customer_email: Option<String>,
    /// Line items (title + quantity).
    pub line_items: Vec<LineItemSummary>,
    /// Free-text order note.
    pub note: Option<String>,
    /// Order subtotal before discounts.
    pub subtotal: Decimal,
    /// ISO currency code, `DKK` when the API omits it.
    pub currency: String,
    /// Total discounts applied by the platform.
    pub discount_total: Decimal,
    /// Whether this order is classified as eco packaging.
    pub eco_packaging: bool,
}

/// One line item on an order.
#[derive(Debug, Clone)]
pub struct LineItemSummary {
    pub title: String,
    pub quantity: u32,
}

impl OrderSummary {
    /// Total units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.line_items.iter().map(|item| item.quantity).sum()
    }
}

/// Flatten one order node.
pub(crate) fn convert_order(node: OrderNode) -> OrderSummary {
    let eco_packaging = is_eco_order(&node);
    let (subtotal, currency) = money_from(node.subtotal_price_set.as_ref());
    let (discount_total, _) = money_from(node.total_discounts_set.as_ref());

    OrderSummary {
        customer_name: customer_name(node.customer.as_ref()),
        customer_email: node.customer.and_then(|c| c.email),
        line_items: node
            .line_items
            .map(|items| {
                items
                    .edges
                    .into_iter()
                    .map(|edge| LineItemSummary {
                        title: edge.node.title,
                        quantity: edge.node.quantity,
                    })
                    .collect()
            })
            .unwrap_or_default(),
        id: node.id,
        name: node.name,
        created_at: node.created_at,
        note: node.note,
        subtotal,
        currency,
        discount_total,
        eco_packaging,
    }
}

/// Classify an order as eco packaging.
///
/// Heuristic: the `eco_packaging` custom attribute equals `"yes"`, or the
/// free-text note contains an eco marker phrase (case-insensitive
/// substring). The substring match can misfire on unrelated notes, and the
/// widget writes `minimal`/`standard` rather than `yes`, so the note check
/// is what catches widget orders. Known limitation, kept deliberately.
fn is_eco_order(node: &OrderNode) -> bool {
    let attribute_says_yes = node
        .custom_attributes
        .iter()
        .find(|attr| attr.key == ECO_ATTRIBUTE_KEY)
        .and_then(|attr| attr.value.as_deref())
        .is_some_and(|value| value == "yes");

    if attribute_says_yes {
        return true;
    }

    node.note.as_deref().is_some_and(|note| {
        let note = note.to_lowercase();
        ECO_NOTE_MARKERS.iter().any(|marker| note.contains(marker))
    })
}

/// Join first and last name, falling back to `Guest`.
fn customer_name(customer: Option<&CustomerNode>) -> String {
    let Some(customer) = customer else {
        return "Guest".to_string();
    };

    let first = customer.first_name.as_deref().unwrap_or("");
    let last = customer.last_name.as_deref().unwrap_or("");
    let name = format!("{first} {last}").trim().to_string();
    if name.is_empty() {
        "Guest".to_string()
    } else {
        name
    }
}

/// Extract amount and currency, defaulting to zero DKK.
fn money_from(set: Option<&PriceSet>) -> (Decimal, String) {
    let Some(money) = set.and_then(|s| s.shop_money.as_ref()) else {
        return (Decimal::ZERO, "DKK".to_string());
    };

    let amount = money.amount.parse::<Decimal>().unwrap_or_default();
    let currency = money
        .currency_code
        .clone()
        .unwrap_or_else(|| "DKK".to_string());
    (amount, currency)
}
