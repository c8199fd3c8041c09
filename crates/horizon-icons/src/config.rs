//! Runtime configuration.
//!
//! Configuration is plain serde data, usually read from a TOML file next to
//! the host application's other settings:
//!
//! ```toml
//! sprite_url = "https://unpkg.com/lucide-static@latest/sprite.svg"
//! markup_url_template = "https://unpkg.com/lucide-static@latest/icons/{name}.svg"
//! cache_ttl_secs = 604800
//!
//! [picker]
//! page_size = 100
//! search_debounce_ms = 200
//! ```
//!
//! Every field has a default, so an empty document is a valid configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use horizon_icons_net::{HttpClient, HttpClientBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{IconError, Result};

/// Placeholder substituted with the sanitized icon name in markup URLs.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// One week, the lifetime of a cached markup entry.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Longest accepted `cache_ttl_secs`: ten years.
pub const MAX_CACHE_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconsConfig {
    /// Location of the symbol sprite document.
    pub sprite_url: String,
    /// Location of standalone per-icon markup; must contain `{name}`.
    pub markup_url_template: String,
    /// Lifetime of cached markup entries, in seconds.
    pub cache_ttl_secs: u64,
    /// Timeout for asset fetches, in seconds.
    pub http_timeout_secs: u64,
    /// Directory for the durable markup cache. Defaults to the platform
    /// cache directory.
    pub cache_dir: Option<PathBuf>,
    /// Picker behaviour.
    pub picker: PickerConfig,
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            sprite_url: "https://unpkg.com/lucide-static@latest/sprite.svg".to_string(),
            markup_url_template: "https://unpkg.com/lucide-static@latest/icons/{name}.svg"
                .to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            http_timeout_secs: 10,
            cache_dir: None,
            picker: PickerConfig::default(),
        }
    }
}

impl IconsConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| IconError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| IconError::io(path, e))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&source),
            Some("toml") | None => Self::from_toml_str(&source),
            Some(other) => Err(IconError::Config(format!(
                "unsupported configuration format '.{other}'"
            ))),
        }
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if !self.markup_url_template.contains(NAME_PLACEHOLDER) {
            return Err(IconError::Config(format!(
                "markup_url_template must contain {NAME_PLACEHOLDER}"
            )));
        }
        if self.sprite_url.trim().is_empty() {
            return Err(IconError::Config("sprite_url must not be empty".into()));
        }
        if self.cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(IconError::Config(format!(
                "cache_ttl_secs must be at most {MAX_CACHE_TTL_SECS}"
            )));
        }
        self.picker.validate()
    }

    /// Lifetime of cached markup entries.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Timeout for asset fetches.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Substitute an (already sanitized) icon name into the markup template.
    pub fn markup_url(&self, name: &str) -> String {
        self.markup_url_template.replace(NAME_PLACEHOLDER, name)
    }

    /// Directory for the durable markup cache.
    ///
    /// Returns `None` when no directory is configured and the platform does
    /// not expose a cache location.
    pub fn resolved_cache_dir(&self) -> Option<PathBuf> {
        self.cache_dir.clone().or_else(|| {
            directories::ProjectDirs::from("com", "Horizon Analytic Studios", "horizon-icons")
                .map(|dirs| dirs.cache_dir().join("markup"))
        })
    }

    /// Build the HTTP client used for asset fetches.
    pub fn http_client(&self) -> Result<HttpClient> {
        Ok(HttpClientBuilder::new()
            .timeout(self.http_timeout())
            .build()?)
    }
}

/// Picker behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Number of icons rendered per page.
    pub page_size: usize,
    /// Quiet period before a typed query is applied, in milliseconds.
    pub search_debounce_ms: u64,
    /// Quiet period before the grid scroll position is checked, in milliseconds.
    pub scroll_debounce_ms: u64,
    /// Distance from the bottom of the grid at which the next page loads.
    pub scroll_threshold: f32,
    /// Icons per grid row.
    pub grid_columns: usize,
    /// Height of one grid row.
    pub grid_row_height: f32,
    /// Visible height of the grid viewport.
    pub grid_height: f32,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            search_debounce_ms: 200,
            scroll_debounce_ms: 100,
            scroll_threshold: 100.0,
            grid_columns: 8,
            grid_row_height: 40.0,
            grid_height: 320.0,
        }
    }
}

impl PickerConfig {
    /// Check that the layout values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(IconError::Config("picker.page_size must be positive".into()));
        }
        if self.grid_columns == 0 {
            return Err(IconError::Config("picker.grid_columns must be positive".into()));
        }
        if !(self.grid_row_height > 0.0) || !(self.grid_height > 0.0) {
            return Err(IconError::Config("picker grid dimensions must be positive".into()));
        }
        Ok(())
    }

    /// Search debounce period.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Scroll-check debounce period.
    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = IconsConfig::from_toml_str("").unwrap();
        assert_eq!(config, IconsConfig::default());
        assert_eq!(config.cache_ttl(), Duration::from_secs(604_800));
        assert_eq!(config.picker.page_size, 100);
    }

    #[test]
    fn test_partial_toml() {
        let config = IconsConfig::from_toml_str(
            r#"
            sprite_url = "https://cdn.example.com/sprite.svg"
            markup_url_template = "https://cdn.example.com/icons/{name}.svg"

            [picker]
            page_size = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.sprite_url, "https://cdn.example.com/sprite.svg");
        assert_eq!(config.picker.page_size, 50);
        assert_eq!(config.picker.search_debounce_ms, 200);
        assert_eq!(
            config.markup_url("rocket"),
            "https://cdn.example.com/icons/rocket.svg"
        );
    }

    #[test]
    fn test_template_without_placeholder_is_rejected() {
        let err = IconsConfig::from_toml_str(r#"markup_url_template = "https://x/icon.svg""#)
            .unwrap_err();
        assert!(matches!(err, IconError::Config(_)));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let err = IconsConfig::from_json_str(r#"{"picker": {"page_size": 0}}"#).unwrap_err();
        assert!(matches!(err, IconError::Config(_)));
    }

    #[test]
    fn test_oversized_cache_ttl_is_rejected() {
        let err = IconsConfig::from_toml_str("cache_ttl_secs = 9223372036854775807").unwrap_err();
        assert!(matches!(err, IconError::Config(_)));

        let config =
            IconsConfig::from_toml_str(&format!("cache_ttl_secs = {MAX_CACHE_TTL_SECS}")).unwrap();
        assert_eq!(config.cache_ttl(), Duration::from_secs(MAX_CACHE_TTL_SECS));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icons.toml");
        std::fs::write(&path, "cache_ttl_secs = 60\n").unwrap();

        let config = IconsConfig::load(&path).unwrap();
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_explicit_cache_dir_wins() {
        let config = IconsConfig {
            cache_dir: Some(PathBuf::from("/tmp/icons")),
            ..Default::default()
        };
        assert_eq!(config.resolved_cache_dir(), Some(PathBuf::from("/tmp/icons")));
    }
}
