//! Settings inspection and update commands.
//!
//! # Usage
//!
//! ```bash
//! eco-cli settings show
//! eco-cli settings set --discount-percent 10 --language da
//! eco-cli settings reset
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATA_DIR` - Directory holding the settings blob (default `./data`)

use std::path::PathBuf;

use thiserror::Error;

use eco_packaging_admin::settings::{SettingsError, SettingsStore};
use eco_packaging_core::{AppSettings, Language};

/// Errors that can occur during settings operations.
#[derive(Debug, Error)]
pub enum SettingsCliError {
    /// Settings persistence failed.
    #[error("Settings store error: {0}")]
    Store(#[from] SettingsError),

    /// Unsupported language value.
    #[error("Invalid language: {0}. Valid languages: en, da")]
    InvalidLanguage(String),
}

/// Fields to change; `None` leaves the current value untouched.
#[derive(Debug, Default)]
pub struct SettingsUpdate {
    pub enabled: Option<bool>,
    pub discount_percent: Option<u32>,
    pub packaging_cost: Option<u32>,
    pub show_on_product_page: Option<bool>,
    pub show_on_cart: Option<bool>,
    pub language: Option<String>,
}

impl SettingsUpdate {
    /// Merge the update onto existing settings, clamping numbers.
    fn apply(self, mut settings: AppSettings) -> Result<AppSettings, SettingsCliError> {
        if let Some(enabled) = self.enabled {
            settings.enabled = enabled;
        }
        if let Some(percent) = self.discount_percent {
            settings.discount_percent = percent;
        }
        if let Some(cost) = self.packaging_cost {
            settings.packaging_cost = cost;
        }
        if let Some(show) = self.show_on_product_page {
            settings.show_on_product_page = show;
        }
        if let Some(show) = self.show_on_cart {
            settings.show_on_cart = show;
        }
        if let Some(language) = self.language {
            settings.language = language
                .parse::<Language>()
                .map_err(|_| SettingsCliError::InvalidLanguage(language))?;
        }
        Ok(settings.clamped())
    }
}

fn open_store() -> SettingsStore {
    dotenvy::dotenv().ok();

    let data_dir: PathBuf = std::env::var("ADMIN_DATA_DIR")
        .unwrap_or_else(|_| "./data".to_owned())
        .into();
    SettingsStore::new(&data_dir)
}

fn report(settings: &AppSettings) {
    tracing::info!("  Enabled: {}", settings.enabled);
    tracing::info!("  Discount percent: {}%", settings.discount_percent);
    tracing::info!("  Packaging cost: {} kr/item", settings.packaging_cost);
    tracing::info!("  Show on product page: {}", settings.show_on_product_page);
    tracing::info!("  Show on cart: {}", settings.show_on_cart);
    tracing::info!("  Language: {}", settings.language);
}

/// Print the current settings.
pub fn show() -> Result<(), SettingsCliError> {
    let store = open_store();
    let settings = store.load();

    tracing::info!("Settings from {}", store.path().display());
    report(&settings);
    Ok(())
}

/// Apply a partial update to the settings blob.
pub fn set(update: SettingsUpdate) -> Result<(), SettingsCliError> {
    let store = open_store();
    let settings = update.apply(store.load())?;
    store.save(&settings)?;

    tracing::info!("Settings saved to {}", store.path().display());
    report(&settings);
    Ok(())
}

/// Restore the default settings.
pub fn reset() -> Result<(), SettingsCliError> {
    let store = open_store();
    let defaults = store.reset()?;

    tracing::info!("Settings reset to defaults at {}", store.path().display());
    report(&defaults);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_merges_only_given_fields() {
        let update = SettingsUpdate {
            discount_percent: Some(15),
            language: Some("da".to_owned()),
            ..SettingsUpdate::default()
        };

        let settings = update.apply(AppSettings::default()).unwrap();
        assert_eq!(settings.discount_percent, 15);
        assert_eq!(settings.language, Language::Da);
        assert!(settings.enabled, "untouched fields keep their value");
        assert_eq!(settings.packaging_cost, 8);
    }

    #[test]
    fn test_update_clamps_discount() {
        let update = SettingsUpdate {
            discount_percent: Some(400),
            ..SettingsUpdate::default()
        };

        let settings = update.apply(AppSettings::default()).unwrap();
        assert_eq!(settings.discount_percent, 100);
    }

    #[test]
    fn test_update_rejects_unknown_language() {
        let update = SettingsUpdate {
            language: Some("klingon".to_owned()),
            ..SettingsUpdate::default()
        };

        let err = update.apply(AppSettings::default()).unwrap_err();
        assert!(matches!(err, SettingsCliError::InvalidLanguage(_)));
    }
}
