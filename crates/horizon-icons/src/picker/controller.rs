//! The icon picker component.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use horizon_icons_core::{Clock, Signal, SystemClock, TimerId, TimerManager};

use super::events::{Key, PickerEvent};
use super::state::{PickerPhase, PickerState};
use super::view::PickerView;
use crate::catalog::IconCatalog;
use crate::config::PickerConfig;
use crate::document::{Document, ElementId, ListenerId, ListenerKind, SharedDocument};
use crate::field::{FieldSettings, ValidationFailure};
use crate::markup::sanitize_stored_value;
use crate::sprite::SpriteLoader;

/// Lifecycle shared by mountable UI components.
pub trait Component {
    /// Input the component reacts to.
    type Event;

    /// Process one event. Returns `true` if the event was consumed.
    fn handle_event(&mut self, event: Self::Event) -> impl Future<Output = bool>;

    /// Remove listeners, cancel timers and detach the subtree.
    fn unmount(&mut self);

    /// Whether the component is still attached.
    fn is_mounted(&self) -> bool;
}

/// Configures and mounts an [`IconPicker`].
pub struct IconPickerBuilder {
    document: SharedDocument,
    catalog: Arc<IconCatalog>,
    sprite: Arc<SpriteLoader>,
    settings: FieldSettings,
    config: PickerConfig,
    clock: Arc<dyn Clock>,
    stored_value: Option<String>,
    parent: Option<ElementId>,
    field_name: String,
}

impl IconPickerBuilder {
    /// Host field configuration.
    pub fn settings(mut self, settings: FieldSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Layout and timing configuration.
    pub fn config(mut self, config: PickerConfig) -> Self {
        self.config = config;
        self
    }

    /// Time source for the debounce timers.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The value currently stored in the host field.
    pub fn stored_value(mut self, value: impl Into<String>) -> Self {
        self.stored_value = Some(value.into());
        self
    }

    /// Element to mount under. Defaults to `<body>`.
    pub fn parent(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// `name` of the hidden input carrying the value.
    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = name.into();
        self
    }

    /// Build the subtree, register listeners and render the initial value.
    ///
    /// With a non-empty initial value the sprite is loaded first so the
    /// preview can reference it; a failed load is logged and the preview is
    /// rendered anyway.
    pub async fn mount(self) -> IconPicker {
        let initial = self.settings.load_value(self.stored_value.as_deref());
        let state = PickerState::new(self.catalog.clone(), self.config.page_size);
        state.set_selected(initial.clone());

        let (view, click_listener, scroll_listener) = {
            let mut doc = self.document.lock();
            let parent = self.parent.unwrap_or_else(|| doc.body());
            let view = PickerView::build(&mut doc, parent, &self.field_name);
            let body = doc.body();
            let click = doc.add_listener(body, ListenerKind::Click);
            let scroll = doc.add_listener(view.grid, ListenerKind::Scroll);
            (view, click, scroll)
        };

        let mut picker = IconPicker {
            document: self.document,
            catalog: self.catalog,
            sprite: self.sprite,
            settings: self.settings,
            config: self.config,
            state,
            view,
            timers: TimerManager::new(self.clock),
            search_timer: None,
            scroll_timer: None,
            pending_query: None,
            click_listener: Some(click_listener),
            scroll_listener: Some(scroll_listener),
            value_changed: Signal::new(),
            sprite_available: true,
            mounted: true,
        };

        if !initial.is_empty() {
            picker.ensure_sprite().await;
        }
        let document = picker.document.clone();
        let mut doc = document.lock();
        picker.view.render_value(&mut doc, &initial, &picker.settings);

        tracing::debug!(
            target: "horizon_icons::picker",
            value = %initial,
            icons = picker.catalog.len(),
            "picker mounted"
        );
        drop(doc);
        picker
    }
}

/// A searchable, paginated icon picker bound to one host form field.
///
/// The picker owns its subtree in a shared [`Document`] and a pair of
/// listeners (a document-level click listener and the grid's scroll
/// listener). Input arrives through [`Component::handle_event`]; value changes
/// made by the user are announced on [`IconPicker::value_changed`].
///
/// Searching and scroll checks are debounced on independent timers. Deliver
/// [`PickerEvent::Tick`] once [`IconPicker::next_deadline`] has elapsed to
/// fire them.
pub struct IconPicker {
    document: SharedDocument,
    catalog: Arc<IconCatalog>,
    sprite: Arc<SpriteLoader>,
    settings: FieldSettings,
    config: PickerConfig,
    state: PickerState,
    view: PickerView,
    timers: TimerManager,
    search_timer: Option<TimerId>,
    scroll_timer: Option<TimerId>,
    pending_query: Option<String>,
    click_listener: Option<ListenerId>,
    scroll_listener: Option<ListenerId>,
    value_changed: Signal<String>,
    sprite_available: bool,
    mounted: bool,
}

impl IconPicker {
    /// Start configuring a picker.
    pub fn builder(
        document: SharedDocument,
        catalog: Arc<IconCatalog>,
        sprite: Arc<SpriteLoader>,
    ) -> IconPickerBuilder {
        IconPickerBuilder {
            document,
            catalog,
            sprite,
            settings: FieldSettings::default(),
            config: PickerConfig::default(),
            clock: Arc::new(SystemClock),
            stored_value: None,
            parent: None,
            field_name: "icon".to_string(),
        }
    }

    /// Emitted with the new value whenever the user changes the selection.
    pub fn value_changed(&self) -> &Signal<String> {
        &self.value_changed
    }

    /// Current value; empty means no selection.
    pub fn value(&self) -> String {
        self.state.selected_value()
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn state(&self) -> &PickerState {
        &self.state
    }

    pub fn view(&self) -> &PickerView {
        &self.view
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn settings(&self) -> &FieldSettings {
        &self.settings
    }

    /// Whether the last sprite load failed.
    pub fn sprite_unavailable(&self) -> bool {
        !self.sprite_available
    }

    /// Time until the next debounce timer is due.
    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.timers.time_until_next()
    }

    /// Set the value from the host side.
    ///
    /// A non-empty value waits for the sprite before the preview is rendered.
    /// Does not emit [`value_changed`](Self::value_changed), so a host
    /// syncing its own value does not hear it echoed back.
    pub async fn set_value(&mut self, value: &str) {
        let value = sanitize_stored_value(value);
        self.state.set_selected(value.clone());
        if !value.is_empty() {
            self.ensure_sprite().await;
        }
        let document = self.document.clone();
        let mut doc = document.lock();
        self.view.render_value(&mut doc, &value, &self.settings);
        self.view.mark_selected(&mut doc, Some(value.as_str()).filter(|v| !v.is_empty()));
    }

    /// Check the value against the field's requirements, showing the
    /// validation message on failure.
    pub fn validate(&mut self) -> Result<(), ValidationFailure> {
        let result = self.settings.validate_value(&self.value());
        let document = self.document.clone();
        let mut doc = document.lock();
        self.view
            .set_error(&mut doc, result.as_ref().err().map(|e| e.message.as_str()));
        result
    }

    /// Open the dropdown.
    ///
    /// Waits for the sprite, resets the search, renders the first page,
    /// focuses the search input and scrolls the selection into view.
    pub async fn open(&mut self) {
        if !self.mounted || self.state.is_open() {
            return;
        }
        let loaded = self.ensure_sprite().await;

        self.cancel_timers();
        self.state.apply_query("");
        self.state.set_phase(PickerPhase::Open);

        let document = self.document.clone();
        let mut doc = document.lock();
        doc.set_attribute(self.view.search_input, "value", "");
        self.render_fresh(&mut doc);
        self.view.set_unavailable(&mut doc, !loaded);
        self.view.set_open(&mut doc, true);
        doc.focus(self.view.search_input);
        self.scroll_selection_into_view(&mut doc);

        tracing::debug!(
            target: "horizon_icons::picker",
            rendered = self.state.rendered_len(),
            sprite_loaded = loaded,
            "picker opened"
        );
    }

    /// Close the dropdown. With `return_focus` the summary control regains
    /// keyboard focus.
    pub fn close(&mut self, return_focus: bool) {
        if !self.state.is_open() {
            return;
        }
        self.cancel_timers();
        self.state.set_phase(PickerPhase::Closed);

        let document = self.document.clone();
        let mut doc = document.lock();
        self.view.set_open(&mut doc, false);
        if return_focus {
            doc.focus(self.view.summary);
        }
        tracing::trace!(target: "horizon_icons::picker", "picker closed");
    }

    /// Select `name`, close the dropdown and notify the host.
    ///
    /// Names that are not in the catalog are ignored.
    pub fn select_icon(&mut self, name: &str) -> bool {
        if !self.catalog.contains(name) {
            tracing::debug!(target: "horizon_icons::picker", name, "ignoring unknown icon");
            return false;
        }
        let changed = self.state.set_selected(name);
        {
            let document = self.document.clone();
            let mut doc = document.lock();
            self.view.render_value(&mut doc, name, &self.settings);
            self.view.mark_selected(&mut doc, Some(name));
            self.view.set_error(&mut doc, None);
        }
        self.close(false);

        if changed {
            tracing::debug!(target: "horizon_icons::picker", name, "icon selected");
            self.value_changed.emit(name.to_string());
        }
        true
    }

    /// Clear the selection and notify the host. Works open or closed.
    pub fn clear(&mut self) {
        let changed = self.state.set_selected(String::new());
        {
            let document = self.document.clone();
            let mut doc = document.lock();
            self.view.render_value(&mut doc, "", &self.settings);
            self.view.mark_selected(&mut doc, None);
        }
        if changed {
            tracing::debug!(target: "horizon_icons::picker", "selection cleared");
            self.value_changed.emit(String::new());
        }
    }

    async fn toggle(&mut self) {
        if self.state.is_open() {
            self.close(false);
        } else {
            self.open().await;
        }
    }

    async fn ensure_sprite(&mut self) -> bool {
        match self.sprite.ensure_loaded().await {
            Ok(_) => self.sprite_available = true,
            Err(err) => {
                tracing::warn!(
                    target: "horizon_icons::picker",
                    error = %err,
                    "icons unavailable, sprite failed to load"
                );
                self.sprite_available = false;
            }
        }
        self.sprite_available
    }

    fn schedule_search(&mut self, query: String) {
        if let Some(id) = self.search_timer.take() {
            let _ = self.timers.stop(id);
        }
        self.pending_query = Some(query);
        self.search_timer = Some(self.timers.start_one_shot(self.config.search_debounce()));
    }

    fn schedule_scroll_check(&mut self) {
        if let Some(id) = self.scroll_timer.take() {
            let _ = self.timers.stop(id);
        }
        self.scroll_timer = Some(self.timers.start_one_shot(self.config.scroll_debounce()));
    }

    fn cancel_timers(&mut self) {
        for id in [self.search_timer.take(), self.scroll_timer.take()].into_iter().flatten() {
            let _ = self.timers.stop(id);
        }
        self.pending_query = None;
    }

    fn process_timers(&mut self) -> bool {
        let fired = self.timers.process_expired();
        for id in &fired {
            if self.search_timer == Some(*id) {
                self.search_timer = None;
                self.flush_search();
            } else if self.scroll_timer == Some(*id) {
                self.scroll_timer = None;
                self.check_scroll();
            }
        }
        !fired.is_empty()
    }

    /// Apply a pending query now instead of waiting for its timer.
    fn flush_search(&mut self) {
        if let Some(id) = self.search_timer.take() {
            let _ = self.timers.stop(id);
        }
        let Some(query) = self.pending_query.take() else {
            return;
        };
        if !self.state.is_open() {
            return;
        }
        self.state.apply_query(&query);

        let document = self.document.clone();
        let mut doc = document.lock();
        doc.set_scroll_top(self.view.grid, 0.0);
        self.render_fresh(&mut doc);
        tracing::debug!(
            target: "horizon_icons::picker",
            query = %query,
            matches = self.state.filtered_len(),
            "search applied"
        );
    }

    /// Append the next page when the grid is scrolled near its end.
    fn check_scroll(&mut self) {
        if !self.state.is_open() {
            return;
        }
        let document = self.document.clone();
        let mut doc = document.lock();
        let metrics = doc.scroll_metrics(self.view.grid);
        if metrics.distance_to_bottom() > self.config.scroll_threshold {
            return;
        }
        if let Some(added) = self.state.advance_page() {
            self.append_positions(&mut doc, &added);
        }
    }

    /// Clear the grid and render page 0 of the current results.
    fn render_fresh(&mut self, doc: &mut Document) {
        self.view.clear_grid(doc);
        let added = self.state.render_page(0, false);
        self.append_positions(doc, &added);
        self.view
            .set_no_results(doc, self.state.filtered_len() == 0);
    }

    fn append_positions(&mut self, doc: &mut Document, positions: &[usize]) {
        let selected = self.state.selected_value();
        for &pos in positions {
            if let Some(entry) = self.catalog.entry_at(pos) {
                self.view
                    .append_icon(doc, &entry.name, !selected.is_empty() && entry.name == selected);
            }
        }
        self.view.update_grid_metrics(doc, &self.config);
    }

    fn scroll_selection_into_view(&mut self, doc: &mut Document) {
        let selected = self.state.selected_value();
        if selected.is_empty() || !self.state.is_filtered(&selected) {
            return;
        }
        while !self.state.is_rendered(&selected) {
            match self.state.advance_page() {
                Some(added) => self.append_positions(doc, &added),
                None => break,
            }
        }
        if let Some(index) = self.state.rendered_index(&selected) {
            self.view.scroll_to_index(doc, index, &self.config);
        }
    }

    /// Route a click through the subtree.
    async fn handle_click(&mut self, target: ElementId) -> bool {
        enum Hit {
            Outside,
            Clear,
            Summary,
            Icon(String),
            Inside,
        }

        let hit = {
            let doc = self.document.lock();
            if !doc.contains(self.view.root, target) {
                Hit::Outside
            } else if self
                .view
                .clear_button
                .is_some_and(|button| doc.contains(button, target))
            {
                Hit::Clear
            } else if doc.contains(self.view.summary, target) {
                Hit::Summary
            } else if let Some(name) = self.view.icon_at(&doc, target) {
                Hit::Icon(name)
            } else {
                Hit::Inside
            }
        };

        match hit {
            Hit::Outside if self.state.is_open() => {
                self.close(false);
                true
            }
            Hit::Outside | Hit::Inside => false,
            Hit::Clear => {
                self.clear();
                true
            }
            Hit::Summary => {
                self.toggle().await;
                true
            }
            Hit::Icon(name) => self.select_icon(&name),
        }
    }
}

impl Component for IconPicker {
    type Event = PickerEvent;

    async fn handle_event(&mut self, event: PickerEvent) -> bool {
        if !self.mounted {
            return false;
        }
        match event {
            PickerEvent::SummaryClicked => {
                self.toggle().await;
                true
            }
            PickerEvent::ClearClicked => {
                self.clear();
                true
            }
            PickerEvent::DocumentClicked { target } => self.handle_click(target).await,
            PickerEvent::KeyDown(Key::Escape) if self.state.is_open() => {
                self.close(true);
                true
            }
            PickerEvent::KeyDown(Key::Enter) if self.state.is_open() => {
                self.flush_search();
                match self.state.first_rendered().map(str::to_string) {
                    Some(first) => self.select_icon(&first),
                    None => false,
                }
            }
            PickerEvent::KeyDown(_) => false,
            PickerEvent::QueryInput(query) if self.state.is_open() => {
                self.schedule_search(query);
                true
            }
            PickerEvent::GridScrolled { scroll_top } if self.state.is_open() => {
                self.document.lock().set_scroll_top(self.view.grid, scroll_top);
                self.schedule_scroll_check();
                true
            }
            PickerEvent::QueryInput(_) | PickerEvent::GridScrolled { .. } => false,
            PickerEvent::IconClicked(name) => self.select_icon(&name),
            PickerEvent::Tick => self.process_timers(),
        }
    }

    fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.timers.stop_all();
        self.search_timer = None;
        self.scroll_timer = None;
        self.pending_query = None;
        self.state.set_phase(PickerPhase::Closed);

        let mut doc = self.document.lock();
        for listener in [self.click_listener.take(), self.scroll_listener.take()]
            .into_iter()
            .flatten()
        {
            doc.remove_listener(listener);
        }
        doc.remove(self.view.root);
        drop(doc);

        self.value_changed.disconnect_all();
        tracing::debug!(target: "horizon_icons::picker", "picker unmounted");
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl Drop for IconPicker {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for IconPicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconPicker")
            .field("value", &self.value())
            .field("phase", &self.state.phase())
            .field("query", &self.state.query())
            .field("rendered", &self.state.rendered_len())
            .field("mounted", &self.mounted)
            .finish()
    }
}
