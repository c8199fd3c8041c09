//! Runtime management for async operations.
//!
//! Template rendering code is usually synchronous; it reaches the async
//! fetchers through [`block_on`] on a shared runtime.

use std::sync::OnceLock;

use tokio::runtime::Runtime;

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Initialize the async runtime.
///
/// If not called explicitly, a runtime will be created on first use.
pub fn init() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("horizon-icons-io")
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime")
    })
}

/// Get a reference to the async runtime.
///
/// Initializes the runtime if it hasn't been created yet.
pub fn get() -> &'static Runtime {
    init()
}

/// Block on a future using the global runtime.
///
/// # Warning
///
/// Do not call this from within an async context, as it will panic when the
/// current thread is already driving a runtime.
pub fn block_on<F: std::future::Future>(future: F) -> F::Output {
    get().block_on(future)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_on_runs_future() {
        assert_eq!(block_on(async { 40 + 2 }), 42);
    }
}
