//! An owned element tree.
//!
//! The picker renders into a [`Document`]: an arena of elements addressed by
//! [`ElementId`] keys. Each picker instance keeps the ids of the elements it
//! created and the [`ListenerId`]s it registered, so everything it added can
//! be removed again on unmount.
//!
//! The tree is deliberately small. It knows about tags, attributes, classes,
//! text, raw inner markup (for the sprite), scroll metrics and focus, which is
//! everything the picker reads or writes. [`Document::to_html`] serializes a
//! subtree for hosts that render server-side.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::sprite::Sprite;

new_key_type! {
    /// Key of an element in a [`Document`].
    pub struct ElementId;

    /// Key of a registered event listener.
    pub struct ListenerId;
}

/// A document shared between picker instances and the sprite loader.
pub type SharedDocument = Arc<Mutex<Document>>;

/// Events a listener can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Pointer clicks anywhere inside the target.
    Click,
    /// Scroll position changes of the target.
    Scroll,
}

/// Scroll geometry of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top.
    pub scroll_top: f32,
    /// Total content height.
    pub scroll_height: f32,
    /// Visible height.
    pub client_height: f32,
}

impl ScrollMetrics {
    /// Distance between the bottom of the viewport and the end of the content.
    pub fn distance_to_bottom(&self) -> f32 {
        (self.scroll_height - self.scroll_top - self.client_height).max(0.0)
    }

    /// Largest valid `scroll_top`.
    pub fn max_scroll_top(&self) -> f32 {
        (self.scroll_height - self.client_height).max(0.0)
    }
}

/// A single element.
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    text: Option<String>,
    inner_markup: Option<String>,
    children: Vec<ElementId>,
    parent: Option<ElementId>,
    scroll: ScrollMetrics,
}

impl Element {
    /// Tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Class list in insertion order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Whether the element carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Text content, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Child elements.
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Parent element.
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Whether the `hidden` attribute is set.
    pub fn is_hidden(&self) -> bool {
        self.attributes.contains_key("hidden")
    }

    /// Scroll geometry.
    pub fn scroll(&self) -> ScrollMetrics {
        self.scroll
    }
}

#[derive(Debug, Clone, Copy)]
struct Listener {
    target: ElementId,
    kind: ListenerKind,
}

/// An arena-backed element tree with a listener registry.
#[derive(Debug)]
pub struct Document {
    elements: SlotMap<ElementId, Element>,
    listeners: SlotMap<ListenerId, Listener>,
    body: ElementId,
    focused: Option<ElementId>,
    sprite_container: Option<ElementId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only a `<body>`.
    pub fn new() -> Self {
        let mut elements = SlotMap::with_key();
        let body = elements.insert(Element {
            tag: "body".to_string(),
            ..Default::default()
        });
        Self {
            elements,
            listeners: SlotMap::with_key(),
            body,
            focused: None,
            sprite_container: None,
        }
    }

    /// Wrap in the shared handle used by pickers and the sprite loader.
    pub fn into_shared(self) -> SharedDocument {
        Arc::new(Mutex::new(self))
    }

    /// The root element.
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Look up an element.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Whether `id` refers to a live element.
    pub fn exists(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Number of live elements, including `<body>`.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.elements.insert(Element {
            tag: tag.to_string(),
            ..Default::default()
        })
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    ///
    /// Returns `false` if either id is dead or the move would create a cycle.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if !self.exists(parent) || !self.exists(child) || self.contains(child, parent) {
            return false;
        }
        self.detach(child);
        self.elements[parent].children.push(child);
        self.elements[child].parent = Some(parent);
        true
    }

    /// Remove an element and its whole subtree.
    ///
    /// Listeners targeting removed elements are dropped with them.
    pub fn remove(&mut self, id: ElementId) {
        if id == self.body || !self.exists(id) {
            return;
        }
        self.detach(id);
        for removed in self.descendants_inclusive(id) {
            self.forget(removed);
        }
    }

    /// Remove all children of `id`.
    pub fn remove_children(&mut self, id: ElementId) {
        let Some(element) = self.elements.get_mut(id) else {
            return;
        };
        let children = std::mem::take(&mut element.children);
        for child in children {
            if let Some(el) = self.elements.get_mut(child) {
                el.parent = None;
            }
            for removed in self.descendants_inclusive(child) {
                self.forget(removed);
            }
        }
    }

    /// Whether `node` is `ancestor` or lies inside it.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.elements.get(id).and_then(|e| e.parent);
        }
        false
    }

    /// Whether `id` is reachable from `<body>`.
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.exists(id) && self.contains(self.body, id)
    }

    /// Set an attribute.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.elements.get_mut(id) {
            el.attributes.insert(name.to_string(), value.into());
        }
    }

    /// Remove an attribute.
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        if let Some(el) = self.elements.get_mut(id) {
            el.attributes.remove(name);
        }
    }

    /// Read an attribute.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements.get(id).and_then(|e| e.attribute(name))
    }

    /// Add a class if not already present.
    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.elements.get_mut(id)
            && !el.has_class(class)
        {
            el.classes.push(class.to_string());
        }
    }

    /// Remove a class.
    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.elements.get_mut(id) {
            el.classes.retain(|c| c != class);
        }
    }

    /// Whether the element carries `class`.
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.has_class(class))
    }

    /// Replace the text content.
    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(el) = self.elements.get_mut(id) {
            el.text = Some(text.into());
        }
    }

    /// Text content.
    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.elements.get(id).and_then(|e| e.text())
    }

    /// Toggle the `hidden` attribute.
    pub fn set_hidden(&mut self, id: ElementId, hidden: bool) {
        if hidden {
            self.set_attribute(id, "hidden", "");
        } else {
            self.remove_attribute(id, "hidden");
        }
    }

    /// Whether the `hidden` attribute is set.
    pub fn is_hidden(&self, id: ElementId) -> bool {
        self.elements.get(id).is_some_and(Element::is_hidden)
    }

    /// Move keyboard focus.
    pub fn focus(&mut self, id: ElementId) {
        if self.exists(id) {
            self.focused = Some(id);
        }
    }

    /// The focused element.
    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Scroll geometry of an element.
    pub fn scroll_metrics(&self, id: ElementId) -> ScrollMetrics {
        self.elements.get(id).map(|e| e.scroll).unwrap_or_default()
    }

    /// Replace the scroll geometry of an element.
    pub fn set_scroll_metrics(&mut self, id: ElementId, metrics: ScrollMetrics) {
        if let Some(el) = self.elements.get_mut(id) {
            el.scroll = metrics;
        }
    }

    /// Set the scroll offset, clamped to the content.
    pub fn set_scroll_top(&mut self, id: ElementId, scroll_top: f32) {
        if let Some(el) = self.elements.get_mut(id) {
            el.scroll.scroll_top = scroll_top.clamp(0.0, el.scroll.max_scroll_top());
        }
    }

    /// Register a listener on `target`.
    pub fn add_listener(&mut self, target: ElementId, kind: ListenerKind) -> ListenerId {
        self.listeners.insert(Listener { target, kind })
    }

    /// Unregister a listener. Returns `false` if it was already gone.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    /// Total number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of listeners of `kind` registered on `target`.
    pub fn listeners_on(&self, target: ElementId, kind: ListenerKind) -> usize {
        self.listeners
            .values()
            .filter(|l| l.target == target && l.kind == kind)
            .count()
    }

    /// Insert the hidden sprite container holding `sprite`.
    ///
    /// Only the first call inserts anything; later calls return the existing
    /// container.
    pub fn attach_sprite(&mut self, sprite: &Sprite) -> ElementId {
        if let Some(existing) = self.sprite_container.filter(|&id| self.exists(id)) {
            return existing;
        }
        let container = self.create_element("div");
        self.set_attribute(container, "aria-hidden", "true");
        self.set_hidden(container, true);
        self.add_class(container, "icon-sprite");
        self.elements[container].inner_markup = Some(sprite.markup().to_string());
        let body = self.body;
        self.append_child(body, container);
        self.sprite_container = Some(container);
        tracing::debug!(
            target: "horizon_icons::sprite",
            symbols = sprite.symbol_count(),
            "sprite attached to document"
        );
        container
    }

    /// The sprite container, once attached.
    pub fn sprite_container(&self) -> Option<ElementId> {
        self.sprite_container.filter(|&id| self.exists(id))
    }

    /// First element under `root` (inclusive, depth-first) whose attribute
    /// `name` equals `value`.
    pub fn find_by_attribute(&self, root: ElementId, name: &str, value: &str) -> Option<ElementId> {
        self.descendants_inclusive(root)
            .into_iter()
            .find(|&id| self.attribute(id, name) == Some(value))
    }

    /// Ids under `root` (inclusive) carrying `class`, in document order.
    pub fn find_by_class(&self, root: ElementId, class: &str) -> Vec<ElementId> {
        self.descendants_inclusive(root)
            .into_iter()
            .filter(|&id| self.has_class(id, class))
            .collect()
    }

    /// Serialize a subtree as HTML.
    pub fn to_html(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: ElementId, out: &mut String) {
        let Some(el) = self.elements.get(id) else {
            return;
        };
        out.push('<');
        out.push_str(&el.tag);
        if !el.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&escape_attr(&el.classes.join(" ")));
            out.push('"');
        }
        for (name, value) in &el.attributes {
            out.push(' ');
            out.push_str(name);
            if !value.is_empty() {
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
        }
        out.push('>');
        if is_void(&el.tag) {
            return;
        }
        if let Some(text) = &el.text {
            out.push_str(&escape_text(text));
        }
        if let Some(markup) = &el.inner_markup {
            out.push_str(markup);
        }
        for &child in &el.children {
            self.write_html(child, out);
        }
        out.push_str("</");
        out.push_str(&el.tag);
        out.push('>');
    }

    fn detach(&mut self, id: ElementId) {
        if let Some(parent) = self.elements.get(id).and_then(|e| e.parent)
            && let Some(p) = self.elements.get_mut(parent)
        {
            p.children.retain(|&c| c != id);
        }
        if let Some(el) = self.elements.get_mut(id) {
            el.parent = None;
        }
    }

    fn forget(&mut self, id: ElementId) {
        self.elements.remove(id);
        self.listeners.retain(|_, l| l.target != id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        if self.sprite_container == Some(id) {
            self.sprite_container = None;
        }
    }

    fn descendants_inclusive(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(el) = self.elements.get(id) else {
                continue;
            };
            out.push(id);
            stack.extend(el.children.iter().rev().copied());
        }
        out
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "input" | "br" | "img" | "hr")
}

/// Escape text content for HTML.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape an attribute value for a double-quoted HTML attribute.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
