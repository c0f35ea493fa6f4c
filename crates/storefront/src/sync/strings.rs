//! Localized widget copy.
//!
//! The storefront ships English and Danish strings. The active language is
//! part of [`WidgetConfig`](crate::config::WidgetConfig) and can be changed
//! from the merchant dashboard without redeploying the widget.

use eco_packaging_core::Language;

/// Static copy for one widget language.
#[derive(Debug, Clone, Copy)]
pub struct WidgetStrings {
    /// Widget heading.
    pub title: &'static str,
    /// Label for the standard packaging option.
    pub standard_label: &'static str,
    /// Label for the minimal packaging option.
    pub minimal_label: &'static str,
    /// Hint shown under the minimal option.
    pub minimal_hint: &'static str,
    /// Badge text while minimal packaging is selected.
    pub badge: &'static str,
    /// Shown while a cart update is in flight.
    pub updating: &'static str,
    /// Confirmation after a choice was applied to the cart.
    pub saved: &'static str,
    /// Prefix for error status lines.
    pub error_prefix: &'static str,
    /// Notice when no cart item qualifies for the discount.
    pub ineligible_items: &'static str,
}

const EN: WidgetStrings = WidgetStrings {
    title: "Eco-friendly packaging",
    standard_label: "Standard packaging",
    minimal_label: "Minimal packaging",
    minimal_hint: "Less material, discount applied at checkout",
    badge: "Eco packaging selected",
    updating: "Updating cart...",
    saved: "Packaging preference saved",
    error_prefix: "Error:",
    ineligible_items: "Discount not available for items in your cart",
};

const DA: WidgetStrings = WidgetStrings {
    title: "Miljøvenlig emballage",
    standard_label: "Standardemballage",
    minimal_label: "Minimal emballage",
    minimal_hint: "Mindre materiale, rabat ved kassen",
    badge: "Miljøemballage valgt",
    updating: "Opdaterer kurv...",
    saved: "Emballagevalg gemt",
    error_prefix: "Fejl:",
    ineligible_items: "Rabatten gælder ikke varerne i din kurv",
};

/// Returns the string table for `language`.
#[must_use]
pub const fn for_language(language: Language) -> &'static WidgetStrings {
    match language {
        Language::En => &EN,
        Language::Da => &DA,
    }
}
