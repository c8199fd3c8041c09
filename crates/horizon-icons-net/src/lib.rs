//! Networking module for Horizon Icons.
//!
//! Icon assets (the symbol sprite and standalone per-icon markup) are plain
//! text documents fetched over HTTP. This crate wraps `reqwest` with the
//! policy the rest of the workspace relies on: every request has a timeout,
//! and a non-2xx status or an empty body is an error.
//!
//! # Fetching Text
//!
//! ```ignore
//! use std::time::Duration;
//! use horizon_icons_net::HttpClient;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//!
//! let svg = client.fetch_text("https://cdn.example.com/icons/rocket.svg").await?;
//! ```

mod error;
pub mod http;

pub use error::{NetworkError, Result};

// Re-export commonly used types at the crate root
pub use http::{HttpClient, HttpClientBuilder, HttpClientConfig, runtime};
