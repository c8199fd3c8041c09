//! Standalone markup resolution.
//!
//! [`MarkupResolver`] turns an icon name into self-contained SVG markup for
//! contexts that cannot reference the page sprite (emails, feeds, server-side
//! templates). Resolution goes:
//!
//! 1. sanitize the name; an unsafe name resolves to `""` without any I/O;
//! 2. look the name up in the [`MarkupCache`];
//! 3. on a miss, fetch `markup_url_template` with the name substituted,
//!    check it holds an `<svg>` element and store it for one week;
//! 4. decorate a copy with the caller's [`MarkupOptions`].
//!
//! The cache holds undecorated markup, so one entry serves every option set.
//! Failures are never cached.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use horizon_icons_net::runtime;
use parking_lot::RwLock;

use super::cache::{FileCache, MarkupCache, MemoryCache};
use super::decorate::{MarkupOptions, decorate_markup};
use super::sanitize::sanitize_icon_name;
use crate::config::{DEFAULT_CACHE_TTL_SECS, IconsConfig, NAME_PLACEHOLDER};
use crate::error::{IconError, Result};
use crate::fetch::AssetFetcher;

/// Lifetime of a cached entry.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(DEFAULT_CACHE_TTL_SECS);

static GLOBAL_RESOLVER: OnceLock<RwLock<Option<Arc<MarkupResolver>>>> = OnceLock::new();

fn global_slot() -> &'static RwLock<Option<Arc<MarkupResolver>>> {
    GLOBAL_RESOLVER.get_or_init(|| RwLock::new(None))
}

/// Resolves icon names to decorated standalone markup.
pub struct MarkupResolver {
    fetcher: Arc<dyn AssetFetcher>,
    cache: Arc<dyn MarkupCache>,
    url_template: String,
    ttl: Duration,
}

impl MarkupResolver {
    /// Create a resolver.
    ///
    /// `url_template` must contain `{name}`.
    pub fn new(
        fetcher: Arc<dyn AssetFetcher>,
        cache: Arc<dyn MarkupCache>,
        url_template: impl Into<String>,
    ) -> Result<Self> {
        let url_template = url_template.into();
        if !url_template.contains(NAME_PLACEHOLDER) {
            return Err(IconError::Config(format!(
                "markup URL template {url_template:?} lacks {NAME_PLACEHOLDER}"
            )));
        }
        Ok(Self {
            fetcher,
            cache,
            url_template,
            ttl: DEFAULT_CACHE_TTL,
        })
    }

    /// Override the cache lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Build a resolver from configuration.
    ///
    /// Uses the durable file cache when a cache directory is available and
    /// falls back to an in-memory cache otherwise.
    pub fn from_config(config: &IconsConfig) -> Result<Self> {
        let client = config.http_client()?;
        let cache: Arc<dyn MarkupCache> = match config.resolved_cache_dir() {
            Some(dir) => match FileCache::open(&dir) {
                Ok(cache) => Arc::new(cache),
                Err(err) => {
                    tracing::warn!(
                        target: "horizon_icons::markup",
                        error = %err,
                        "durable markup cache unavailable, using memory cache"
                    );
                    Arc::new(MemoryCache::new())
                }
            },
            None => Arc::new(MemoryCache::new()),
        };
        Ok(Self::new(Arc::new(client), cache, config.markup_url_template.clone())?
            .with_ttl(config.cache_ttl()))
    }

    /// Install the resolver used by [`resolve_icon_markup`].
    pub fn install_global(resolver: Arc<MarkupResolver>) -> Option<Arc<MarkupResolver>> {
        global_slot().write().replace(resolver)
    }

    /// The installed resolver.
    pub fn global() -> Option<Arc<MarkupResolver>> {
        global_slot().read().clone()
    }

    /// Remove the installed resolver.
    pub fn reset_global() -> Option<Arc<MarkupResolver>> {
        global_slot().write().take()
    }

    /// Cache lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Source location for a sanitized name.
    pub fn url_for(&self, name: &str) -> String {
        self.url_template.replace(NAME_PLACEHOLDER, name)
    }

    /// Resolve to decorated markup, or `""` on any failure.
    pub async fn resolve(&self, raw_name: &str, opts: Option<&MarkupOptions>) -> String {
        match self.try_resolve(raw_name, opts).await {
            Ok(markup) => markup,
            Err(err) => {
                match &err {
                    IconError::InvalidIdentifier(_) => tracing::debug!(
                        target: "horizon_icons::markup",
                        error = %err,
                        "rejected icon name"
                    ),
                    _ => tracing::warn!(
                        target: "horizon_icons::markup",
                        error = %err,
                        "markup resolution failed"
                    ),
                }
                String::new()
            }
        }
    }

    /// Resolve to decorated markup, reporting why resolution failed.
    pub async fn try_resolve(&self, raw_name: &str, opts: Option<&MarkupOptions>) -> Result<String> {
        let name = sanitize_icon_name(raw_name)
            .ok_or_else(|| IconError::InvalidIdentifier(raw_name.to_string()))?;
        let base = self.base_markup(&name).await?;
        let default_opts;
        let opts = match opts {
            Some(opts) => opts,
            None => {
                default_opts = MarkupOptions::default();
                &default_opts
            }
        };
        decorate_markup(&base, &name, opts)
            .ok_or_else(|| IconError::invalid_markup(&name, "no <svg> element"))
    }

    /// Blocking variant of [`resolve`](Self::resolve) for synchronous callers.
    ///
    /// Runs on the shared network runtime; must not be called from inside an
    /// async context.
    pub fn resolve_blocking(&self, raw_name: &str, opts: Option<&MarkupOptions>) -> String {
        runtime::block_on(self.resolve(raw_name, opts))
    }

    #[tracing::instrument(
        name = "horizon_icons::resolve",
        skip(self),
        target = "horizon_icons::markup",
        level = "debug"
    )]
    async fn base_markup(&self, name: &str) -> Result<String> {
        if let Some(cached) = self.cache.get(name) {
            tracing::trace!(target: "horizon_icons::markup", name, "cache hit");
            return Ok(cached);
        }

        let url = self.url_for(name);
        tracing::debug!(target: "horizon_icons::markup", %url, "fetching markup");
        let markup = self.fetcher.fetch_text(&url).await?;
        if decorate_markup(&markup, name, &MarkupOptions::default()).is_none() {
            return Err(IconError::invalid_markup(name, "no <svg> element"));
        }

        if let Err(err) = self.cache.set(name, &markup, self.ttl) {
            tracing::warn!(
                target: "horizon_icons::markup",
                name,
                error = %err,
                "failed to cache markup"
            );
        }
        Ok(markup)
    }
}

impl std::fmt::Debug for MarkupResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkupResolver")
            .field("url_template", &self.url_template)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Resolve an icon through the installed resolver.
///
/// Returns `""` when no resolver is installed or resolution fails. Blocks on
/// the shared network runtime, so call [`resolve_icon_markup_async`] from
/// async code instead.
pub fn resolve_icon_markup(name: &str, opts: Option<&MarkupOptions>) -> String {
    match MarkupResolver::global() {
        Some(resolver) => resolver.resolve_blocking(name, opts),
        None => {
            tracing::debug!(target: "horizon_icons::markup", "no markup resolver installed");
            String::new()
        }
    }
}

/// Async form of [`resolve_icon_markup`].
pub async fn resolve_icon_markup_async(name: &str, opts: Option<&MarkupOptions>) -> String {
    match MarkupResolver::global() {
        Some(resolver) => resolver.resolve(name, opts).await,
        None => String::new(),
    }
}
