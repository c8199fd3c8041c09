//! Asset fetching seam.
//!
//! The sprite loader and the markup resolver only need "give me the text at
//! this location". [`AssetFetcher`] is that seam: [`HttpClient`] implements it
//! for remote assets, [`LocalAssets`] for files shipped next to the host, and
//! tests substitute counting fakes.

use std::path::{Path, PathBuf};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use horizon_icons_net::{HttpClient, NetworkError};

/// Fetches text documents.
///
/// A successful result is never empty; implementations report an empty or
/// whitespace-only body as [`NetworkError::InvalidBody`].
pub trait AssetFetcher: Send + Sync {
    /// Fetch the document at `location`.
    fn fetch_text(&self, location: &str) -> BoxFuture<'static, Result<String, NetworkError>>;
}

impl AssetFetcher for HttpClient {
    fn fetch_text(&self, location: &str) -> BoxFuture<'static, Result<String, NetworkError>> {
        let client = self.clone();
        let location = location.to_string();
        async move { HttpClient::fetch_text(&client, location).await }.boxed()
    }
}

/// Reads assets from a local directory.
///
/// Locations are taken relative to `root`; absolute locations are used as-is.
#[derive(Debug, Clone)]
pub struct LocalAssets {
    root: PathBuf,
}

impl LocalAssets {
    /// Serve files under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The asset directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetFetcher for LocalAssets {
    fn fetch_text(&self, location: &str) -> BoxFuture<'static, Result<String, NetworkError>> {
        let path = self.root.join(location);
        async move {
            let body = tokio::fs::read_to_string(&path).await?;
            if body.trim().is_empty() {
                return Err(NetworkError::InvalidBody("empty body".to_string()));
            }
            Ok(body)
        }
        .boxed()
    }
}
