//! Core types for the eco-packaging app.
//!
//! This module provides the domain types shared by the storefront widget,
//! the admin panel, and the CLI.

pub mod choice;
pub mod settings;

pub use choice::{
    ECO_PACKAGING_ATTRIBUTE, ECO_PACKAGING_STORAGE_KEY, PackagingChoice, ParsePackagingChoiceError,
};
pub use settings::{AppSettings, Language, SETTINGS_STORAGE_KEY};
