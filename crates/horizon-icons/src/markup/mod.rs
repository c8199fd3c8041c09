//! Standalone icon markup: name sanitation, caching, decoration and
//! resolution.

mod cache;
mod decorate;
mod resolver;
mod sanitize;

pub use cache::{FileCache, MarkupCache, MemoryCache};
pub use decorate::{MarkupOptions, decorate_markup};
pub use resolver::{
    DEFAULT_CACHE_TTL, MarkupResolver, resolve_icon_markup, resolve_icon_markup_async,
};
pub use sanitize::{MAX_NAME_LEN, sanitize_icon_name, sanitize_stored_value};
