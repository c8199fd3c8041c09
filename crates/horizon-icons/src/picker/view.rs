//! The picker's element subtree.
//!
//! ```text
//! div.icon-picker
//! ├── div.icon-picker-summary           (click: toggle)
//! │   ├── span.icon-picker-preview      (sprite reference or empty)
//! │   ├── span.icon-picker-label
//! │   └── button.icon-picker-clear      (only with a value and allow_clear)
//! ├── div.icon-picker-dropdown [hidden]
//! │   ├── input.icon-picker-search
//! │   ├── div.icon-picker-grid          (scroll listener)
//! │   ├── p.icon-picker-no-results [hidden]
//! │   └── p.icon-picker-unavailable [hidden]
//! ├── p.icon-picker-error [hidden]
//! └── input[type=hidden]                (mirrors the value)
//! ```

use std::collections::HashMap;

use crate::config::PickerConfig;
use crate::document::{Document, ElementId, ScrollMetrics};
use crate::field::FieldSettings;
use crate::sprite::Sprite;

pub const SELECTED_CLASS: &str = "is-selected";
pub const EMPTY_CLASS: &str = "is-empty";
pub const ICON_ATTR: &str = "data-icon";

/// Element ids of one mounted picker.
#[derive(Debug)]
pub struct PickerView {
    pub root: ElementId,
    pub summary: ElementId,
    pub preview: ElementId,
    pub label: ElementId,
    pub clear_button: Option<ElementId>,
    pub dropdown: ElementId,
    pub search_input: ElementId,
    pub grid: ElementId,
    pub no_results: ElementId,
    pub unavailable: ElementId,
    pub error_message: ElementId,
    pub host_input: ElementId,
    items: HashMap<String, ElementId>,
    selected_item: Option<ElementId>,
}

impl PickerView {
    /// Build the subtree under `parent`.
    pub fn build(doc: &mut Document, parent: ElementId, field_name: &str) -> Self {
        let root = element(doc, parent, "div", "icon-picker");

        let summary = element(doc, root, "div", "icon-picker-summary");
        doc.set_attribute(summary, "role", "button");
        doc.set_attribute(summary, "tabindex", "0");
        let preview = element(doc, summary, "span", "icon-picker-preview");
        let label = element(doc, summary, "span", "icon-picker-label");

        let dropdown = element(doc, root, "div", "icon-picker-dropdown");
        doc.set_hidden(dropdown, true);
        let search_input = element(doc, dropdown, "input", "icon-picker-search");
        doc.set_attribute(search_input, "type", "search");
        doc.set_attribute(search_input, "placeholder", "Search icons");
        let grid = element(doc, dropdown, "div", "icon-picker-grid");
        doc.set_attribute(grid, "role", "listbox");
        let no_results = element(doc, dropdown, "p", "icon-picker-no-results");
        doc.set_text(no_results, "No icons found");
        doc.set_hidden(no_results, true);
        let unavailable = element(doc, dropdown, "p", "icon-picker-unavailable");
        doc.set_text(unavailable, "Icons could not be loaded");
        doc.set_hidden(unavailable, true);

        let error_message = element(doc, root, "p", "icon-picker-error");
        doc.set_hidden(error_message, true);

        let host_input = doc.create_element("input");
        doc.set_attribute(host_input, "type", "hidden");
        doc.set_attribute(host_input, "name", field_name);
        doc.set_attribute(host_input, "value", "");
        doc.append_child(root, host_input);

        Self {
            root,
            summary,
            preview,
            label,
            clear_button: None,
            dropdown,
            search_input,
            grid,
            no_results,
            unavailable,
            error_message,
            host_input,
            items: HashMap::new(),
            selected_item: None,
        }
    }

    /// Show `value` (or the placeholder) in the summary and mirror it into
    /// the hidden input.
    pub fn render_value(&mut self, doc: &mut Document, value: &str, settings: &FieldSettings) {
        doc.remove_children(self.preview);
        if value.is_empty() {
            doc.add_class(self.preview, EMPTY_CLASS);
            doc.set_text(self.label, settings.placeholder.clone());
            self.remove_clear_button(doc);
        } else {
            doc.remove_class(self.preview, EMPTY_CLASS);
            let icon = sprite_reference(doc, value);
            doc.append_child(self.preview, icon);
            doc.set_text(self.label, value);
            if settings.allow_clear {
                self.ensure_clear_button(doc);
            }
        }
        doc.set_attribute(self.host_input, "value", value);
    }

    fn ensure_clear_button(&mut self, doc: &mut Document) {
        if self.clear_button.is_some_and(|id| doc.exists(id)) {
            return;
        }
        let button = element(doc, self.summary, "button", "icon-picker-clear");
        doc.set_attribute(button, "type", "button");
        doc.set_attribute(button, "aria-label", "Clear selection");
        doc.set_text(button, "×");
        self.clear_button = Some(button);
    }

    fn remove_clear_button(&mut self, doc: &mut Document) {
        if let Some(button) = self.clear_button.take() {
            doc.remove(button);
        }
    }

    /// Show or hide the dropdown.
    pub fn set_open(&self, doc: &mut Document, open: bool) {
        doc.set_hidden(self.dropdown, !open);
        doc.set_attribute(self.summary, "aria-expanded", if open { "true" } else { "false" });
    }

    /// Remove every grid entry.
    pub fn clear_grid(&mut self, doc: &mut Document) {
        doc.remove_children(self.grid);
        self.items.clear();
        self.selected_item = None;
    }

    /// Append one grid entry for `name`.
    pub fn append_icon(&mut self, doc: &mut Document, name: &str, selected: bool) -> ElementId {
        let item = element(doc, self.grid, "button", "icon-picker-item");
        doc.set_attribute(item, "type", "button");
        doc.set_attribute(item, "role", "option");
        doc.set_attribute(item, ICON_ATTR, name);
        doc.set_attribute(item, "title", name);
        let icon = sprite_reference(doc, name);
        doc.append_child(item, icon);
        self.items.insert(name.to_string(), item);
        if selected {
            self.mark_selected(doc, Some(name));
        }
        item
    }

    /// Grid entry for `name`.
    pub fn item(&self, name: &str) -> Option<ElementId> {
        self.items.get(name).copied()
    }

    /// Number of grid entries.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Name bound to a grid entry or one of its descendants.
    pub fn icon_at(&self, doc: &Document, target: ElementId) -> Option<String> {
        self.items
            .iter()
            .find(|&(_, &item)| doc.contains(item, target))
            .map(|(name, _)| name.clone())
    }

    /// Move the selection mark to `name`, or drop it.
    pub fn mark_selected(&mut self, doc: &mut Document, name: Option<&str>) {
        if let Some(previous) = self.selected_item.take() {
            doc.remove_class(previous, SELECTED_CLASS);
            doc.set_attribute(previous, "aria-selected", "false");
        }
        if let Some(item) = name.and_then(|n| self.item(n)) {
            doc.add_class(item, SELECTED_CLASS);
            doc.set_attribute(item, "aria-selected", "true");
            self.selected_item = Some(item);
        }
    }

    /// Update the grid's scroll geometry after entries were added.
    pub fn update_grid_metrics(&self, doc: &mut Document, config: &PickerConfig) {
        let rows = self.items.len().div_ceil(config.grid_columns.max(1));
        let current = doc.scroll_metrics(self.grid);
        let mut metrics = ScrollMetrics {
            scroll_top: current.scroll_top,
            scroll_height: rows as f32 * config.grid_row_height,
            client_height: config.grid_height,
        };
        metrics.scroll_top = metrics.scroll_top.clamp(0.0, metrics.max_scroll_top());
        doc.set_scroll_metrics(self.grid, metrics);
    }

    /// Scroll so grid slot `index` sits in the middle of the viewport.
    pub fn scroll_to_index(&self, doc: &mut Document, index: usize, config: &PickerConfig) {
        let row = index / config.grid_columns.max(1);
        let top = row as f32 * config.grid_row_height;
        let centered = top - (config.grid_height - config.grid_row_height) / 2.0;
        doc.set_scroll_top(self.grid, centered);
    }

    pub fn set_no_results(&self, doc: &mut Document, visible: bool) {
        doc.set_hidden(self.no_results, !visible);
    }

    pub fn set_unavailable(&self, doc: &mut Document, visible: bool) {
        doc.set_hidden(self.unavailable, !visible);
    }

    /// Show a validation message, or hide it with `None`.
    pub fn set_error(&self, doc: &mut Document, message: Option<&str>) {
        match message {
            Some(message) => {
                doc.set_text(self.error_message, message);
                doc.set_hidden(self.error_message, false);
            }
            None => doc.set_hidden(self.error_message, true),
        }
    }
}

fn element(doc: &mut Document, parent: ElementId, tag: &str, class: &str) -> ElementId {
    let id = doc.create_element(tag);
    doc.add_class(id, class);
    doc.append_child(parent, id);
    id
}

/// `<svg class="icon" aria-hidden="true"><use href="#name"></use></svg>`
fn sprite_reference(doc: &mut Document, name: &str) -> ElementId {
    let svg = doc.create_element("svg");
    doc.add_class(svg, "icon");
    doc.set_attribute(svg, "aria-hidden", "true");
    let use_el = doc.create_element("use");
    doc.set_attribute(use_el, "href", Sprite::href(name));
    doc.append_child(svg, use_el);
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted() -> (Document, PickerView) {
        let mut doc = Document::new();
        let body = doc.body();
        let view = PickerView::build(&mut doc, body, "icon");
        (doc, view)
    }

    #[test]
    fn test_build_structure() {
        let (doc, view) = mounted();
        assert!(doc.is_attached(view.grid));
        assert!(doc.is_hidden(view.dropdown));
        assert!(doc.is_hidden(view.no_results));
        assert!(doc.contains(view.summary, view.preview));
        assert_eq!(doc.attribute(view.host_input, "name"), Some("icon"));
        assert!(view.clear_button.is_none());
    }

    #[test]
    fn test_render_value_toggles_clear_button() {
        let (mut doc, mut view) = mounted();
        let settings = FieldSettings::default();

        view.render_value(&mut doc, "rocket", &settings);
        assert_eq!(doc.text(view.label), Some("rocket"));
        assert_eq!(doc.attribute(view.host_input, "value"), Some("rocket"));
        assert!(view.clear_button.is_some());
        assert!(doc.to_html(view.preview).contains(r##"<use href="#rocket"></use>"##));

        view.render_value(&mut doc, "", &settings);
        assert_eq!(doc.text(view.label), Some("Select an icon"));
        assert!(doc.has_class(view.preview, EMPTY_CLASS));
        assert!(view.clear_button.is_none());
    }

    #[test]
    fn test_clear_button_respects_settings() {
        let (mut doc, mut view) = mounted();
        let settings = FieldSettings {
            allow_clear: false,
            ..Default::default()
        };
        view.render_value(&mut doc, "rocket", &settings);
        assert!(view.clear_button.is_none());
    }

    #[test]
    fn test_single_selection_mark() {
        let (mut doc, mut view) = mounted();
        view.append_icon(&mut doc, "rocket", false);
        view.append_icon(&mut doc, "settings", true);
        view.mark_selected(&mut doc, Some("rocket"));

        let marked = doc.find_by_class(view.grid, SELECTED_CLASS);
        assert_eq!(marked, vec![view.item("rocket").unwrap()]);
    }

    #[test]
    fn test_icon_at_resolves_descendants() {
        let (mut doc, mut view) = mounted();
        let item = view.append_icon(&mut doc, "rocket", false);
        let svg = doc.get(item).unwrap().children()[0];
        assert_eq!(view.icon_at(&doc, svg).as_deref(), Some("rocket"));
        assert_eq!(view.icon_at(&doc, view.grid), None);
    }
}
