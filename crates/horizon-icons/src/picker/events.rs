//! Input delivered to a mounted picker.

use crate::document::ElementId;

/// Keys the picker reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    /// Any other key; ignored.
    Other,
}

/// An event routed to [`IconPicker::handle_event`](super::IconPicker).
#[derive(Debug, Clone, PartialEq)]
pub enum PickerEvent {
    /// The summary control (preview and label) was clicked.
    SummaryClicked,
    /// The clear button inside the summary was clicked.
    ClearClicked,
    /// A click landed somewhere in the document.
    DocumentClicked { target: ElementId },
    /// A key was pressed while the picker had focus.
    KeyDown(Key),
    /// The search input changed.
    QueryInput(String),
    /// The grid was scrolled to `scroll_top`.
    GridScrolled { scroll_top: f32 },
    /// A grid entry was clicked.
    IconClicked(String),
    /// Time passed; fire any due debounce timers.
    Tick,
}
