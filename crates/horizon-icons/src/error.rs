//! Error types for the icon crate.

use std::path::PathBuf;

use horizon_icons_net::NetworkError;

/// Result type alias for icon operations.
pub type Result<T> = std::result::Result<T, IconError>;

/// Errors that can occur while loading or resolving icons.
///
/// None of these reach template callers: the resolution API collapses every
/// failure to an empty string.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    /// An empty or unsafe icon identifier.
    #[error("invalid icon identifier {0:?}")]
    InvalidIdentifier(String),

    /// A sprite or markup fetch failed.
    #[error("asset unavailable: {0}")]
    AssetUnavailable(#[from] NetworkError),

    /// The fetched document is not usable SVG markup.
    #[error("invalid markup for '{name}': {message}")]
    InvalidMarkup { name: String, message: String },

    /// The icon catalog could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Configuration could not be parsed or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading or writing a file failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IconError {
    /// Create an invalid-markup error.
    pub fn invalid_markup(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidMarkup {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from a failed asset fetch.
    pub fn is_asset_unavailable(&self) -> bool {
        matches!(self, Self::AssetUnavailable(_))
    }
}
