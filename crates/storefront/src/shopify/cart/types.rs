//! Projections of the cart AJAX API responses.
//!
//! Only the fields the synchronizer and eligibility rules read are modeled;
//! the rest of the `/cart.js` payload is ignored. Several fields are `null`
//! rather than absent for some themes, so the deserializers treat `null` and
//! missing the same way.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use eco_packaging_core::{ECO_PACKAGING_ATTRIBUTE, PackagingChoice};

/// Read-only snapshot of the remote cart.
///
/// Refetched wholesale on every sync point; there is no incremental diff.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Cart token issued by the platform.
    #[serde(default)]
    pub token: Option<String>,
    /// Cart-level attributes, including `eco_packaging`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: BTreeMap<String, String>,
    /// Line items currently in the cart.
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Total number of units across all line items.
    #[serde(default)]
    pub item_count: u32,
    /// Cart total in minor currency units.
    #[serde(default)]
    pub total_price: i64,
    /// ISO currency code.
    #[serde(default)]
    pub currency: Option<String>,
}

impl CartSnapshot {
    /// The packaging choice recorded on the cart attribute, if any.
    ///
    /// Unknown attribute values are treated as unset.
    #[must_use]
    pub fn packaging_attribute(&self) -> Option<PackagingChoice> {
        self.attributes
            .get(ECO_PACKAGING_ATTRIBUTE)
            .and_then(|value| PackagingChoice::from_str(value).ok())
    }
}

/// One line item from the cart payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartItem {
    /// Line item key (variant id plus properties hash).
    #[serde(default)]
    pub key: Option<String>,
    /// Product title.
    #[serde(default)]
    pub title: String,
    /// Number of units of this line.
    #[serde(default)]
    pub quantity: u32,
    /// Product type, used by the eligibility denylist.
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_type: String,
    /// Variant title, used by the eligibility denylist.
    #[serde(default)]
    pub variant_title: Option<String>,
    /// Line item properties, matched against the excluded tags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: BTreeMap<String, String>,
}

/// Deserialize `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cart_payload() {
        let json = r#"{
            "token": "abc123",
            "attributes": {"eco_packaging": "minimal"},
            "item_count": 3,
            "total_price": 24900,
            "currency": "DKK",
            "items": [
                {"key": "1:a", "title": "Candle", "quantity": 2, "product_type": "Home", "variant_title": "Large", "properties": {"gift_wrap": "yes"}},
                {"key": "2:b", "title": "Gift card", "quantity": 1, "product_type": "gift_card", "variant_title": null, "properties": null}
            ]
        }"#;

        let cart: CartSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(cart.packaging_attribute(), Some(PackagingChoice::Minimal));
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items[0].properties.get("gift_wrap").unwrap(), "yes");
        assert!(cart.items[1].properties.is_empty());
        assert_eq!(cart.items[1].variant_title, None);
    }

    #[test]
    fn test_missing_attribute_is_unset() {
        let cart: CartSnapshot = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert_eq!(cart.packaging_attribute(), None);
    }

    #[test]
    fn test_unknown_attribute_value_is_unset() {
        let json = r#"{"attributes": {"eco_packaging": "recycled"}, "items": []}"#;
        let cart: CartSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(cart.packaging_attribute(), None);
    }

    #[test]
    fn test_null_attributes_object() {
        let cart: CartSnapshot = serde_json::from_str(r#"{"attributes": null}"#).unwrap();
        assert!(cart.attributes.is_empty());
    }
}
