//! Merchant-configurable app settings.
//!
//! Settings are stored as one JSON blob under a fixed key. Field names on
//! the wire are camelCase to stay compatible with blobs written by earlier
//! versions of the app. Missing fields fall back to their defaults when a
//! partial blob is read back, so adding a field never invalidates stored
//! settings.

use serde::{Deserialize, Serialize};

/// Key the settings blob is stored under.
pub const SETTINGS_STORAGE_KEY: &str = "eco_packaging_settings";

const MAX_DISCOUNT_PERCENT: u32 = 100;

/// Widget display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Da,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Da => "da",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "da" => Ok(Self::Da),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// The merchant-facing configuration blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Master switch for the widget.
    pub enabled: bool,
    /// Discount applied to eco orders, in whole percent.
    pub discount_percent: u32,
    /// Packaging cost saved per shipped item, in whole kroner.
    pub packaging_cost: u32,
    /// Show the toggle on product pages.
    pub show_on_product_page: bool,
    /// Show the toggle on the cart page.
    pub show_on_cart: bool,
    /// Widget display language.
    pub language: Language,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            discount_percent: 5,
            packaging_cost: 8,
            show_on_product_page: true,
            show_on_cart: false,
            language: Language::En,
        }
    }
}

impl AppSettings {
    /// Clamp numeric fields to their valid ranges.
    ///
    /// Saving goes through this so an out-of-range form submission can never
    /// persist an invalid blob.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.discount_percent = self.discount_percent.min(MAX_DISCOUNT_PERCENT);
        self
    }
}
