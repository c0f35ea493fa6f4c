//! App settings routes.
//!
//! The form writes the whole settings blob on save; there is no partial
//! update. Numeric fields tolerate junk input by falling back to zero
//! and then clamping, so a mistyped value never turns into a 422.

use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    response::{Html, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use eco_packaging_core::{AppSettings, Language};

use crate::{error::Result, filters, state::AppState};

/// Query parameters for the settings page.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsPageQuery {
    /// Set by the post-save redirect to show the confirmation flash.
    pub saved: Option<String>,
}

/// Settings form fields as the browser submits them.
///
/// Checkboxes are absent when unchecked, numbers arrive as text.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub enabled: Option<String>,
    #[serde(default)]
    pub discount_percent: String,
    #[serde(default)]
    pub packaging_cost: String,
    #[serde(default)]
    pub show_on_product_page: Option<String>,
    #[serde(default)]
    pub show_on_cart: Option<String>,
    #[serde(default)]
    pub language: String,
}

impl SettingsForm {
    /// Convert the raw form into a settings blob, clamping out-of-range
    /// numbers.
    fn into_settings(self) -> AppSettings {
        AppSettings {
            enabled: self.enabled.is_some(),
            discount_percent: self.discount_percent.trim().parse().unwrap_or(0),
            packaging_cost: self.packaging_cost.trim().parse().unwrap_or(0),
            show_on_product_page: self.show_on_product_page.is_some(),
            show_on_cart: self.show_on_cart.is_some(),
            language: self.language.parse().unwrap_or_default(),
        }
        .clamped()
    }
}

/// Settings page template.
#[derive(Template)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    pub current_path: String,
    pub saved: bool,
    pub settings: AppSettings,
    pub language: &'static str,
}

/// Settings page handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SettingsPageQuery>,
) -> Html<String> {
    let settings = state.settings().load();

    let template = SettingsTemplate {
        current_path: "/settings".to_string(),
        saved: query.saved.is_some(),
        language: settings.language.as_str(),
        settings,
    };

    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// Save the submitted settings and redirect back with a flash.
#[instrument(skip(state, form))]
pub async fn update(
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> Result<Redirect> {
    let settings = form.into_settings();
    state.settings().save(&settings)?;

    tracing::info!(
        enabled = settings.enabled,
        discount_percent = settings.discount_percent,
        packaging_cost = settings.packaging_cost,
        "Settings updated"
    );

    Ok(Redirect::to("/settings?saved=1"))
}

/// Restore the default settings and redirect back with a flash.
#[instrument(skip(state))]
pub async fn reset(State(state): State<AppState>) -> Result<Redirect> {
    let defaults = state.settings().reset()?;

    tracing::info!(
        discount_percent = defaults.discount_percent,
        "Settings reset to defaults"
    );

    Ok(Redirect::to("/settings?saved=1"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(discount: &str, cost: &str, language: &str) -> SettingsForm {
        SettingsForm {
            enabled: Some("on".to_string()),
            discount_percent: discount.to_string(),
            packaging_cost: cost.to_string(),
            show_on_product_page: Some("on".to_string()),
            show_on_cart: None,
            language: language.to_string(),
        }
    }

    #[test]
    fn test_form_parses_numbers_and_language() {
        let settings = form("10", "12", "da").into_settings();
        assert!(settings.enabled);
        assert_eq!(settings.discount_percent, 10);
        assert_eq!(settings.packaging_cost, 12);
        assert!(settings.show_on_product_page);
        assert!(!settings.show_on_cart, "absent checkbox means unchecked");
        assert_eq!(settings.language, Language::Da);
    }

    #[test]
    fn test_form_tolerates_junk_numbers() {
        let settings = form("ten", "", "en").into_settings();
        assert_eq!(settings.discount_percent, 0);
        assert_eq!(settings.packaging_cost, 0);
    }

    #[test]
    fn test_form_clamps_discount_percent() {
        let settings = form("250", "8", "en").into_settings();
        assert_eq!(settings.discount_percent, 100);
    }

    #[test]
    fn test_form_defaults_unknown_language() {
        let settings = form("5", "8", "klingon").into_settings();
        assert_eq!(settings.language, Language::En);
    }

    #[test]
    fn test_settings_template_shows_flash_when_saved() {
        let template = SettingsTemplate {
            current_path: "/settings".to_string(),
            saved: true,
            settings: AppSettings::default(),
            language: "en",
        };

        let html = template.render().unwrap();
        assert!(html.contains("Settings saved"));
    }
}
