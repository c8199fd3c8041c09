//! Horizon Icons: a searchable icon picker and SVG markup resolution.
//!
//! The crate has two independent halves:
//!
//! - **Picking.** [`IconPicker`] lets an editor choose one icon out of a large
//!   [`IconCatalog`]. The grid renders lightweight references into a shared
//!   symbol sprite loaded once per page by [`SpriteLoader`], and results are
//!   rendered a page at a time as the grid scrolls.
//! - **Rendering.** [`MarkupResolver`] turns a stored icon name into
//!   standalone SVG markup for templates, with a durable cache in front of the
//!   network. [`resolve_icon_markup`] is the template-facing entry point and
//!   returns an empty string on any failure.
//!
//! Stored values pass through the [`field`] contract, which sanitizes names
//! and validates required selections.
//!
//! # Resolving Markup
//!
//! ```ignore
//! use std::sync::Arc;
//! use horizon_icons::{IconsConfig, MarkupOptions, MarkupResolver, resolve_icon_markup};
//!
//! let config = IconsConfig::load("icons.toml")?;
//! MarkupResolver::install_global(Arc::new(MarkupResolver::from_config(&config)?));
//!
//! let svg = resolve_icon_markup("rocket", Some(&MarkupOptions::new().width(32).height(32)));
//! ```

pub mod catalog;
pub mod config;
pub mod document;
mod error;
pub mod fetch;
pub mod field;
pub mod markup;
pub mod picker;
pub mod sprite;

pub use catalog::{IconCatalog, IconEntry};
pub use config::{IconsConfig, PickerConfig};
pub use document::{Document, ElementId, ListenerId, ListenerKind, ScrollMetrics, SharedDocument};
pub use error::{IconError, Result};
pub use fetch::{AssetFetcher, LocalAssets};
pub use field::{FieldSettings, ReturnFormat, ValidationFailure};
pub use markup::{
    FileCache, MarkupCache, MarkupOptions, MarkupResolver, MemoryCache, resolve_icon_markup,
    resolve_icon_markup_async, sanitize_icon_name,
};
pub use picker::{Component, IconPicker, Key, PickerEvent};
pub use sprite::{Sprite, SpriteLoadState, SpriteLoader};

// Re-exported so hosts can drive pickers and configure fetching without
// depending on the lower crates directly.
pub use horizon_icons_core::{Clock, ManualClock, Signal, SystemClock};
pub use horizon_icons_net::{HttpClient, HttpClientBuilder, NetworkError};
