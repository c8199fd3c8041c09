//! The shared symbol sprite.
//!
//! Every icon in the picker grid renders as a `<use href="#name">` reference
//! into one sprite document that is fetched once and attached to the page in a
//! hidden container. [`SpriteLoader`] owns that lifecycle:
//!
//! - concurrent [`SpriteLoader::ensure_loaded`] calls share one in-flight fetch;
//! - a successful load is attached to the document exactly once and is final;
//! - a failed load is handed to every waiter and then forgotten, so the next
//!   call fetches again.
//!
//! Hosts usually create one loader per page and install it with
//! [`SpriteLoader::install_global`].

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, OnceLock};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use horizon_icons_net::NetworkError;
use parking_lot::{Mutex, RwLock};
use regex::Regex;

use crate::document::SharedDocument;
use crate::fetch::AssetFetcher;

static SYMBOL_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<symbol\b[^>]*?\bid\s*=\s*["']([^"']+)["']"#).expect("symbol id pattern")
});

/// A parsed sprite document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    markup: String,
    symbols: HashSet<String>,
}

impl Sprite {
    /// Parse sprite markup.
    ///
    /// Returns `None` when the document defines no `<symbol id="...">`.
    pub fn parse(markup: impl Into<String>) -> Option<Self> {
        let markup = markup.into();
        let symbols: HashSet<String> = SYMBOL_ID
            .captures_iter(&markup)
            .map(|caps| caps[1].to_string())
            .collect();
        if symbols.is_empty() {
            return None;
        }
        Some(Self { markup, symbols })
    }

    /// The raw sprite document.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Number of distinct symbols.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Whether a symbol with this id exists.
    pub fn has_symbol(&self, name: &str) -> bool {
        self.symbols.contains(name)
    }

    /// The fragment reference for an icon in this sprite.
    pub fn href(name: &str) -> String {
        format!("#{name}")
    }
}

/// Observable load state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteLoadState {
    /// Nothing fetched yet, or the last attempt failed.
    Unloaded,
    /// A fetch is in flight.
    Loading,
    /// The sprite is attached to the document.
    Loaded,
}

type LoadFuture = Shared<BoxFuture<'static, Result<Arc<Sprite>, NetworkError>>>;

enum Slot {
    Unloaded,
    Loading { generation: u64, load: LoadFuture },
    Loaded(Arc<Sprite>),
}

struct SlotState {
    slot: Slot,
    generation: u64,
}

static GLOBAL_LOADER: OnceLock<RwLock<Option<Arc<SpriteLoader>>>> = OnceLock::new();

fn global_slot() -> &'static RwLock<Option<Arc<SpriteLoader>>> {
    GLOBAL_LOADER.get_or_init(|| RwLock::new(None))
}

/// Fetches the sprite once and attaches it to a document.
pub struct SpriteLoader {
    fetcher: Arc<dyn AssetFetcher>,
    location: String,
    document: SharedDocument,
    state: Mutex<SlotState>,
    fetch_count: AtomicUsize,
}

impl SpriteLoader {
    /// Create a loader for the sprite at `location`.
    pub fn new(
        fetcher: Arc<dyn AssetFetcher>,
        location: impl Into<String>,
        document: SharedDocument,
    ) -> Self {
        Self {
            fetcher,
            location: location.into(),
            document,
            state: Mutex::new(SlotState {
                slot: Slot::Unloaded,
                generation: 0,
            }),
            fetch_count: AtomicUsize::new(0),
        }
    }

    /// Install the page-wide loader, returning the one it replaces.
    pub fn install_global(loader: Arc<SpriteLoader>) -> Option<Arc<SpriteLoader>> {
        global_slot().write().replace(loader)
    }

    /// The page-wide loader, if installed.
    pub fn global() -> Option<Arc<SpriteLoader>> {
        global_slot().read().clone()
    }

    /// Remove the page-wide loader.
    pub fn reset_global() -> Option<Arc<SpriteLoader>> {
        global_slot().write().take()
    }

    /// Where the sprite is fetched from.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The document the sprite is attached to.
    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    /// Current load state.
    pub fn state(&self) -> SpriteLoadState {
        match self.state.lock().slot {
            Slot::Unloaded => SpriteLoadState::Unloaded,
            Slot::Loading { .. } => SpriteLoadState::Loading,
            Slot::Loaded(_) => SpriteLoadState::Loaded,
        }
    }

    /// Whether the sprite is attached.
    pub fn is_loaded(&self) -> bool {
        self.state() == SpriteLoadState::Loaded
    }

    /// The loaded sprite.
    pub fn sprite(&self) -> Option<Arc<Sprite>> {
        match &self.state.lock().slot {
            Slot::Loaded(sprite) => Some(sprite.clone()),
            _ => None,
        }
    }

    /// Number of fetches started so far.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Forget any loaded or in-flight sprite.
    ///
    /// An in-flight fetch still completes for its current waiters but no
    /// longer updates this loader. The attached container stays in the
    /// document.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.slot = Slot::Unloaded;
    }

    /// Make sure the sprite is fetched and attached.
    ///
    /// Resolves immediately once loaded. Concurrent callers share a single
    /// fetch and all observe its outcome.
    pub async fn ensure_loaded(&self) -> Result<Arc<Sprite>, NetworkError> {
        let (generation, load) = {
            let mut state = self.state.lock();
            match &state.slot {
                Slot::Loaded(sprite) => return Ok(sprite.clone()),
                Slot::Loading { generation, load } => (*generation, load.clone()),
                Slot::Unloaded => {
                    state.generation += 1;
                    let generation = state.generation;
                    let load = self.start_fetch();
                    state.slot = Slot::Loading {
                        generation,
                        load: load.clone(),
                    };
                    (generation, load)
                }
            }
        };

        let result = load.await;

        let mut state = self.state.lock();
        let current = matches!(
            &state.slot,
            Slot::Loading { generation: g, .. } if *g == generation
        );
        match result {
            Ok(sprite) => {
                if current {
                    self.document.lock().attach_sprite(&sprite);
                    state.slot = Slot::Loaded(sprite.clone());
                }
                Ok(sprite)
            }
            Err(err) => {
                if current {
                    tracing::warn!(
                        target: "horizon_icons::sprite",
                        location = %self.location,
                        error = %err,
                        retryable = err.is_transient(),
                        "sprite load failed"
                    );
                    state.slot = Slot::Unloaded;
                }
                Err(err)
            }
        }
    }

    fn start_fetch(&self) -> LoadFuture {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(target: "horizon_icons::sprite", location = %self.location, "fetching sprite");

        let fetch = self.fetcher.fetch_text(&self.location);
        async move {
            let markup = fetch.await?;
            Sprite::parse(markup)
                .map(Arc::new)
                .ok_or_else(|| NetworkError::InvalidBody("sprite defines no symbols".to_string()))
        }
        .boxed()
        .shared()
    }
}

impl std::fmt::Debug for SpriteLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpriteLoader")
            .field("location", &self.location)
            .field("state", &self.state())
            .field("fetch_count", &self.fetch_count())
            .finish()
    }
}
