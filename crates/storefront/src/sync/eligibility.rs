//! Discount eligibility rules for cart contents.
//!
//! Exclusions are configured per deployment; see
//! [`WidgetConfig`](crate::config::WidgetConfig). All matching is
//! case-insensitive substring matching, mirroring how merchants tag
//! products in practice (a type of `Gift_Card Deluxe` still counts as a
//! gift card).

use crate::config::WidgetConfig;
use crate::shopify::{CartItem, CartSnapshot};
use crate::sync::strings;

/// Result of an eligibility check over the whole cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityResult {
    pub is_eligible: bool,
    /// Shopper-facing explanation; empty when eligible.
    pub reason: String,
}

impl EligibilityResult {
    const fn eligible() -> Self {
        Self {
            is_eligible: true,
            reason: String::new(),
        }
    }
}

/// Checks whether the cart qualifies for the packaging discount.
///
/// An empty cart is eligible so the widget stays interactive before the
/// shopper adds anything. A non-empty cart qualifies as long as at least
/// one line item is not excluded.
#[must_use]
pub fn check_eligibility(cart: &CartSnapshot, config: &WidgetConfig) -> EligibilityResult {
    if cart.items.is_empty() {
        return EligibilityResult::eligible();
    }

    if cart.items.iter().any(|item| !is_excluded(item, config)) {
        return EligibilityResult::eligible();
    }

    EligibilityResult {
        is_eligible: false,
        reason: strings::for_language(config.language)
            .ineligible_items
            .to_string(),
    }
}

/// A line item is excluded when its product type matches an excluded type,
/// or an excluded tag appears in any line-item property value or in the
/// variant title.
fn is_excluded(item: &CartItem, config: &WidgetConfig) -> bool {
    let product_type = item.product_type.to_lowercase();
    if config
        .exclude_product_types
        .iter()
        .any(|excluded| product_type.contains(excluded.as_str()))
    {
        return true;
    }

    let has_excluded_tag = |text: &str| {
        let text = text.to_lowercase();
        config
            .exclude_product_tags
            .iter()
            .any(|tag| text.contains(tag.as_str()))
    };

    item.properties.values().any(|value| has_excluded_tag(value))
        || item.variant_title.as_deref().is_some_and(has_excluded_tag)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use eco_packaging_core::Language;

    use super::*;

    fn item(product_type: &str) -> CartItem {
        CartItem {
            key: Some("1:abc".to_string()),
            title: "Test item".to_string(),
            quantity: 1,
            product_type: product_type.to_string(),
            variant_title: None,
            properties: BTreeMap::new(),
        }
    }

    fn cart(items: Vec<CartItem>) -> CartSnapshot {
        CartSnapshot {
            token: Some("tok".to_string()),
            attributes: BTreeMap::new(),
            item_count: items.iter().map(|i| i.quantity).sum(),
            items,
            total_price: 10_000,
            currency: Some("DKK".to_string()),
        }
    }

    #[test]
    fn test_empty_cart_is_eligible() {
        let result = check_eligibility(&cart(vec![]), &WidgetConfig::default());
        assert!(result.is_eligible);
        assert!(result.reason.is_empty());
    }

    #[test]
    fn test_one_plain_item_keeps_cart_eligible() {
        let result = check_eligibility(
            &cart(vec![item("gift_card"), item("candle")]),
            &WidgetConfig::default(),
        );
        assert!(result.is_eligible);
    }

    #[test]
    fn test_all_items_excluded_reports_reason() {
        let result = check_eligibility(&cart(vec![item("gift_card")]), &WidgetConfig::default());
        assert!(!result.is_eligible);
        assert_eq!(
            result.reason,
            "Discount not available for items in your cart"
        );
    }

    #[test]
    fn test_product_type_match_is_case_insensitive_substring() {
        let result = check_eligibility(
            &cart(vec![item("Gift_Card Deluxe")]),
            &WidgetConfig::default(),
        );
        assert!(!result.is_eligible);
    }

    #[test]
    fn test_property_value_tag_excludes_item() {
        let mut tagged = item("candle");
        tagged.properties.insert(
            "_internal".to_string(),
            "wholesale No_Eco_Discount".to_string(),
        );
        let result = check_eligibility(&cart(vec![tagged]), &WidgetConfig::default());
        assert!(!result.is_eligible);
    }

    #[test]
    fn test_variant_title_marker_excludes_item() {
        let mut marked = item("candle");
        marked.variant_title = Some("Large / NO_ECO_DISCOUNT".to_string());
        let result = check_eligibility(&cart(vec![marked]), &WidgetConfig::default());
        assert!(!result.is_eligible);
    }

    #[test]
    fn test_reason_follows_configured_language() {
        let config = WidgetConfig {
            language: Language::Da,
            ..WidgetConfig::default()
        };
        let result = check_eligibility(&cart(vec![item("gift_card")]), &config);
        assert_eq!(result.reason, "Rabatten gælder ikke varerne i din kurv");
    }
}
