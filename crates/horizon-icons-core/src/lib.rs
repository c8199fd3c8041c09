//! Core systems for Horizon Icons.
//!
//! This crate provides the foundational pieces shared by the icon picker and
//! the markup resolver:
//!
//! - **Signal/Slot System**: Type-safe change notification
//! - **Property System**: Values with change detection
//! - **Clock**: Injectable time source (system or manual)
//! - **Timers**: One-shot timers used for debouncing input
//! - **Logging**: `tracing` targets and helper macros
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_icons_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<String>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit("rocket".to_string());
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Debounce Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use horizon_icons_core::{ManualClock, TimerManager};
//!
//! let clock = Arc::new(ManualClock::new());
//! let mut timers = TimerManager::new(clock.clone());
//!
//! let first = timers.start_one_shot(Duration::from_millis(200));
//! // A newer input cancels the pending firing.
//! timers.stop(first).unwrap();
//! let second = timers.start_one_shot(Duration::from_millis(200));
//!
//! clock.advance(Duration::from_millis(200));
//! assert_eq!(timers.process_expired(), vec![second]);
//! ```

mod clock;
mod error;
pub mod logging;
pub mod property;
pub mod signal;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, Result, TimerError};
pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionId, Signal};
pub use timer::{TimerId, TimerManager};
