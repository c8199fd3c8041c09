//! Picker state: query, filtered results, pagination and selection.
//!
//! Results are rendered in fixed-size pages. The half-open window for page
//! `p` is `[p * page_size, min((p + 1) * page_size, filtered_len))`. Appending
//! a page never re-renders a name already in the grid, and a fresh filter
//! starts again from page 0 with an empty grid.

use std::collections::HashSet;
use std::sync::Arc;

use horizon_icons_core::PerfSpan;
use horizon_icons_core::Property;
use horizon_icons_core::logging::span_names;

use crate::catalog::IconCatalog;

/// Whether the dropdown is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PickerPhase {
    #[default]
    Closed,
    Open,
}

/// Mutable state of one picker instance.
#[derive(Debug)]
pub struct PickerState {
    catalog: Arc<IconCatalog>,
    page_size: usize,
    query: String,
    /// Catalog positions matching `query`, in display order.
    filtered: Vec<usize>,
    page: usize,
    rendered: HashSet<usize>,
    rendered_order: Vec<usize>,
    selected: Property<String>,
    phase: PickerPhase,
}

impl PickerState {
    /// Create state showing the whole catalog, nothing rendered yet.
    ///
    /// A zero `page_size` is treated as 1.
    pub fn new(catalog: Arc<IconCatalog>, page_size: usize) -> Self {
        let filtered = (0..catalog.len()).collect();
        Self {
            catalog,
            page_size: page_size.max(1),
            query: String::new(),
            filtered,
            page: 0,
            rendered: HashSet::new(),
            rendered_order: Vec::new(),
            selected: Property::new(String::new()),
            phase: PickerPhase::Closed,
        }
    }

    pub fn catalog(&self) -> &Arc<IconCatalog> {
        &self.catalog
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Raw query text as last applied.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Names matching the current query.
    pub fn filtered_names(&self) -> Vec<&str> {
        self.names(&self.filtered)
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Index of the last rendered page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of pages the current results span.
    pub fn page_count(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size)
    }

    /// Whether another page can be appended.
    pub fn has_more_pages(&self) -> bool {
        (self.page + 1) * self.page_size < self.filtered.len()
    }

    /// Names in the grid, in render order.
    pub fn rendered_names(&self) -> Vec<&str> {
        self.names(&self.rendered_order)
    }

    pub fn rendered_len(&self) -> usize {
        self.rendered_order.len()
    }

    /// Whether `name` is in the grid.
    pub fn is_rendered(&self, name: &str) -> bool {
        self.catalog
            .position(name)
            .is_some_and(|pos| self.rendered.contains(&pos))
    }

    /// Grid slot of `name`, if rendered.
    pub fn rendered_index(&self, name: &str) -> Option<usize> {
        let pos = self.catalog.position(name)?;
        self.rendered_order.iter().position(|&p| p == pos)
    }

    /// First name in the grid.
    pub fn first_rendered(&self) -> Option<&str> {
        self.rendered_order
            .first()
            .and_then(|&pos| self.catalog.entry_at(pos))
            .map(|e| e.name.as_str())
    }

    /// Whether `name` matches the current query.
    pub fn is_filtered(&self, name: &str) -> bool {
        self.catalog
            .position(name)
            .is_some_and(|pos| self.filtered.binary_search(&pos).is_ok())
    }

    /// Position of `name` within the filtered results.
    pub fn filtered_index(&self, name: &str) -> Option<usize> {
        let pos = self.catalog.position(name)?;
        self.filtered.binary_search(&pos).ok()
    }

    /// The externally visible value; empty means no selection.
    pub fn selected_value(&self) -> String {
        self.selected.get()
    }

    /// Change the selection. Returns `true` if the value changed.
    pub fn set_selected(&self, value: impl Into<String>) -> bool {
        self.selected.set(value.into())
    }

    pub fn phase(&self) -> PickerPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == PickerPhase::Open
    }

    pub fn set_phase(&mut self, phase: PickerPhase) {
        self.phase = phase;
    }

    /// Apply a new query. The grid must then be re-rendered from page 0.
    pub fn apply_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.filtered = self.catalog.filter_indices(query);
        self.page = 0;
        self.rendered.clear();
        self.rendered_order.clear();
    }

    /// Render page `page`, returning the catalog positions newly added.
    ///
    /// Without `append` the grid is cleared first. A page past the end of the
    /// results renders nothing and leaves the state unchanged.
    pub fn render_page(&mut self, page: usize, append: bool) -> Vec<usize> {
        let _span = PerfSpan::new(span_names::RENDER_PAGE);
        if !append {
            self.rendered.clear();
            self.rendered_order.clear();
            self.page = 0;
        }

        let start = page * self.page_size;
        if start >= self.filtered.len() {
            return Vec::new();
        }
        let end = (start + self.page_size).min(self.filtered.len());

        let mut added = Vec::with_capacity(end - start);
        for &pos in &self.filtered[start..end] {
            if self.rendered.insert(pos) {
                self.rendered_order.push(pos);
                added.push(pos);
            }
        }
        self.page = page;

        tracing::trace!(
            target: "horizon_icons::picker",
            page,
            added = added.len(),
            rendered = self.rendered_order.len(),
            "rendered page"
        );
        added
    }

    /// Append the next page, or `None` when every page is rendered.
    pub fn advance_page(&mut self) -> Option<Vec<usize>> {
        if !self.has_more_pages() {
            return None;
        }
        Some(self.render_page(self.page + 1, true))
    }

    fn names(&self, positions: &[usize]) -> Vec<&str> {
        positions
            .iter()
            .filter_map(|&pos| self.catalog.entry_at(pos))
            .map(|e| e.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::IconEntry;

    fn numbered(count: usize) -> Arc<IconCatalog> {
        Arc::new(
            IconCatalog::from_entries(
                (0..count).map(|i| IconEntry::new(format!("icon-{i}"), [format!("tag{}", i % 7)])),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_pages_of_250() {
        let mut state = PickerState::new(numbered(250), 100);
        assert_eq!(state.page_count(), 3);

        assert_eq!(state.render_page(0, false).len(), 100);
        assert_eq!(state.advance_page().map(|p| p.len()), Some(100));
        assert_eq!(state.rendered_len(), 200);

        let unique: HashSet<&str> = state.rendered_names().into_iter().collect();
        assert_eq!(unique.len(), 200);

        assert_eq!(state.advance_page().map(|p| p.len()), Some(50));
        assert_eq!(state.page(), 2);

        assert_eq!(state.advance_page(), None);
        assert_eq!(state.page(), 2);
        assert_eq!(state.rendered_len(), 250);
    }

    #[test]
    fn test_append_skips_rendered_names() {
        let mut state = PickerState::new(numbered(150), 100);
        state.render_page(0, false);
        assert!(state.render_page(0, true).is_empty());
        assert_eq!(state.rendered_len(), 100);
    }

    #[test]
    fn test_page_past_end_is_noop() {
        let mut state = PickerState::new(numbered(10), 100);
        state.render_page(0, false);
        assert!(state.render_page(5, true).is_empty());
        assert_eq!(state.page(), 0);
        assert_eq!(state.rendered_len(), 10);
    }

    #[test]
    fn test_query_resets_pagination() {
        let mut state = PickerState::new(numbered(250), 100);
        state.render_page(0, false);
        state.advance_page();

        state.apply_query("tag3");
        assert_eq!(state.page(), 0);
        assert_eq!(state.rendered_len(), 0);

        state.render_page(0, false);
        assert!(state.rendered_names().iter().all(|n| state.is_filtered(n)));
        assert_eq!(state.filtered_len(), state.rendered_len());
    }

    #[test]
    fn test_selection_property() {
        let state = PickerState::new(numbered(3), 100);
        assert_eq!(state.selected_value(), "");
        assert!(state.set_selected("icon-1"));
        assert!(!state.set_selected("icon-1"));
        assert_eq!(state.selected_value(), "icon-1");
    }

    #[test]
    fn test_rendered_lookup() {
        let mut state = PickerState::new(numbered(5), 2);
        state.render_page(0, false);
        assert_eq!(state.first_rendered(), Some("icon-0"));
        assert_eq!(state.rendered_index("icon-1"), Some(1));
        assert!(!state.is_rendered("icon-4"));
        assert_eq!(state.filtered_index("icon-4"), Some(4));
    }
}
