//! The host form-field contract.
//!
//! A stored icon value is a sanitized name or the empty string. Values are
//! sanitized on the way in ([`FieldSettings::update_value`]) and on the way
//! out ([`FieldSettings::load_value`]); templates read them through
//! [`FieldSettings::format_value`].

use serde::{Deserialize, Serialize};

use crate::markup::{MarkupResolver, sanitize_stored_value};

/// Message shown when a required selection is missing.
pub const REQUIRED_MESSAGE: &str = "Please select an icon.";

/// What templates receive for a stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnFormat {
    /// The icon name.
    #[default]
    Name,
    /// Decorated standalone SVG markup.
    Svg,
}

/// A required selection is missing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationFailure {
    /// User-facing message.
    pub message: String,
}

impl ValidationFailure {
    fn required() -> Self {
        Self {
            message: REQUIRED_MESSAGE.to_string(),
        }
    }
}

/// Host-provided field configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    /// Whether an empty value passes validation.
    pub allow_null: bool,
    /// Whether the picker shows a clear button.
    pub allow_clear: bool,
    /// Label shown when nothing is selected.
    pub placeholder: String,
    pub return_format: ReturnFormat,
    /// Value used when nothing has been stored yet.
    pub default_value: String,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            allow_null: false,
            allow_clear: true,
            placeholder: "Select an icon".to_string(),
            return_format: ReturnFormat::Name,
            default_value: String::new(),
        }
    }
}

impl FieldSettings {
    /// Value to seed the picker with, from what storage holds.
    ///
    /// A missing value falls back to `default_value`.
    pub fn load_value(&self, stored: Option<&str>) -> String {
        match stored {
            Some(value) => sanitize_stored_value(value),
            None => sanitize_stored_value(&self.default_value),
        }
    }

    /// Value to persist, from what the form submitted.
    pub fn update_value(&self, submitted: &str) -> String {
        sanitize_stored_value(submitted)
    }

    /// Check a submitted value.
    pub fn validate_value(&self, submitted: &str) -> Result<(), ValidationFailure> {
        if !self.allow_null && sanitize_stored_value(submitted).is_empty() {
            return Err(ValidationFailure::required());
        }
        Ok(())
    }

    /// Value handed to templates.
    ///
    /// In [`ReturnFormat::Svg`] mode the value is resolved through `resolver`
    /// with default options; without a resolver, or on failure, the result is
    /// empty.
    pub async fn format_value(&self, stored: &str, resolver: Option<&MarkupResolver>) -> String {
        let name = sanitize_stored_value(stored);
        match self.return_format {
            ReturnFormat::Name => name,
            ReturnFormat::Svg => match resolver {
                Some(resolver) if !name.is_empty() => resolver.resolve(&name, None).await,
                _ => String::new(),
            },
        }
    }
}
