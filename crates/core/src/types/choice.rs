//! The shopper's packaging choice.
//!
//! The choice lives in three places that must agree: the shopper's local
//! store, the cart-level attribute on the remote cart, and the selected
//! state of the rendered toggle. The storefront synchronizer is responsible
//! for keeping them consistent; this module only defines the value and the
//! keys it is stored under.

use serde::{Deserialize, Serialize};

/// Cart attribute key the choice is written to on the remote cart.
pub const ECO_PACKAGING_ATTRIBUTE: &str = "eco_packaging";

/// Key the choice is stored under in the shopper-local key-value store.
pub const ECO_PACKAGING_STORAGE_KEY: &str = "eco_packaging";

/// Packaging mode selected by the shopper.
///
/// `Minimal` opts into eco packaging and (when the cart is eligible) the
/// discount code; `Standard` is the ordinary packaging flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PackagingChoice {
    #[default]
    Standard,
    Minimal,
}

impl PackagingChoice {
    /// The wire value written to the cart attribute and the local store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Minimal => "minimal",
        }
    }

    /// Whether this choice opts into the eco-packaging discount.
    #[must_use]
    pub const fn is_minimal(self) -> bool {
        matches!(self, Self::Minimal)
    }
}

impl std::fmt::Display for PackagingChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored or submitted choice value is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid packaging choice: {0}")]
pub struct ParsePackagingChoiceError(pub String);

impl std::str::FromStr for PackagingChoice {
    type Err = ParsePackagingChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "minimal" => Ok(Self::Minimal),
            other => Err(ParsePackagingChoiceError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_choices() {
        assert_eq!("minimal".parse(), Ok(PackagingChoice::Minimal));
        assert_eq!("standard".parse(), Ok(PackagingChoice::Standard));
    }

    #[test]
    fn test_parse_invalid_choice() {
        let err = "eco".parse::<PackagingChoice>().unwrap_err();
        assert_eq!(err, ParsePackagingChoiceError("eco".to_owned()));
    }

    #[test]
    fn test_display_matches_wire_value() {
        assert_eq!(PackagingChoice::Minimal.to_string(), "minimal");
        assert_eq!(PackagingChoice::Standard.to_string(), "standard");
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&PackagingChoice::Minimal).unwrap();
        assert_eq!(json, "\"minimal\"");
        let back: PackagingChoice = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PackagingChoice::Minimal);
    }

    #[test]
    fn test_default_is_standard() {
        assert_eq!(PackagingChoice::default(), PackagingChoice::Standard);
        assert!(!PackagingChoice::default().is_minimal());
    }
}
