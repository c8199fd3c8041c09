//! Logging facilities for Horizon Icons.
//!
//! Horizon Icons uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the host installs a subscriber:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_icons=debug,horizon_icons_net=info")
//!         .init();
//! }
//! ```
//!
//! Asset failures (sprite or markup fetches) are reported at `warn` level on
//! the [`targets::SPRITE`] and [`targets::MARKUP`] targets and never escalate
//! past the component that observed them.

/// Span names used throughout Horizon Icons for tracing.
pub mod span_names {
    /// Catalog filtering span.
    pub const FILTER: &str = "horizon_icons::filter";
    /// Grid page rendering span.
    pub const RENDER_PAGE: &str = "horizon_icons::render_page";
    /// Markup resolution span.
    pub const RESOLVE: &str = "horizon_icons::resolve";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core target.
    pub const CORE: &str = "horizon_icons_core";
    /// Timer system target.
    pub const TIMER: &str = "horizon_icons_core::timer";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_icons_core::signal";
    /// HTTP client target.
    pub const HTTP: &str = "horizon_icons_net::http";
    /// Icon catalog target.
    pub const CATALOG: &str = "horizon_icons::catalog";
    /// Sprite loader target.
    pub const SPRITE: &str = "horizon_icons::sprite";
    /// Markup resolver and cache target.
    pub const MARKUP: &str = "horizon_icons::markup";
    /// Picker component target.
    pub const PICKER: &str = "horizon_icons::picker";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "horizon_icons::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are thin wrappers around the `tracing` crate macros with consistent
/// target naming.
#[macro_export]
macro_rules! icons_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_icons_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! icons_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_icons_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! icons_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "horizon_icons_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! icons_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "horizon_icons_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! icons_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "horizon_icons_core", $($arg)*)
    };
}
