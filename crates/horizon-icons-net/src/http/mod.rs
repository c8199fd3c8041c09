//! HTTP client for Horizon Icons.
//!
//! # Example
//!
//! ```ignore
//! use horizon_icons_net::http::HttpClient;
//!
//! let client = HttpClient::new();
//!
//! // 2xx with a non-empty body, or an error
//! let svg = client.fetch_text("https://cdn.example.com/icons/rocket.svg").await?;
//! ```

mod client;
pub mod runtime;

pub use client::{HttpClient, HttpClientBuilder, HttpClientConfig};
