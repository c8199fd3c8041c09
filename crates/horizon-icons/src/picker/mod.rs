//! The searchable icon picker.
//!
//! [`IconPicker`] is a component mounted into a [`Document`](crate::Document).
//! It holds the search query, the filtered results, the pagination cursor and
//! the selected value in a [`PickerState`], renders through a [`PickerView`],
//! and reports user-made value changes on a signal the host form observes.
//!
//! # Example
//!
//! ```ignore
//! use horizon_icons::picker::{Component, IconPicker, PickerEvent};
//!
//! let mut picker = IconPicker::builder(document, catalog, sprite)
//!     .settings(settings)
//!     .stored_value("rocket")
//!     .mount()
//!     .await;
//!
//! picker.value_changed().connect(|value| save_field(value));
//!
//! picker.handle_event(PickerEvent::SummaryClicked).await;
//! picker.handle_event(PickerEvent::QueryInput("launch".into())).await;
//! ```

mod controller;
mod events;
mod state;
mod view;

pub use controller::{Component, IconPicker, IconPickerBuilder};
pub use events::{Key, PickerEvent};
pub use state::{PickerPhase, PickerState};
pub use view::{EMPTY_CLASS, ICON_ATTR, PickerView, SELECTED_CLASS};
