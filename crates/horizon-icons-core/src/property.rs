//! Property system for Horizon Icons.
//!
//! A [`Property<T>`] wraps a value and reports whether a write actually
//! changed it, so the owner knows when to emit its notification signal.
//!
//! # Example
//!
//! ```
//! use horizon_icons_core::{Property, Signal};
//!
//! struct Field {
//!     value: Property<String>,
//!     value_changed: Signal<String>,
//! }
//!
//! impl Field {
//!     fn set_value(&self, new_value: &str) {
//!         if self.value.set(new_value.to_string()) {
//!             self.value_changed.emit(new_value.to_string());
//!         }
//!     }
//! }
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A reactive property that tracks changes.
///
/// `Property<T>` uses interior mutability with `RwLock` and is `Send + Sync`.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    ///
    /// The caller should emit the associated notification signal when this
    /// returns `true`.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Property").field(&*self.value.read()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_set_reports_change() {
        let prop = Property::new(String::new());
        assert!(!prop.set(String::new()));
        assert!(prop.set("rocket".to_string()));
        assert_eq!(prop.get(), "rocket");
    }
}
