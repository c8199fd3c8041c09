//! Presentation attributes for standalone markup.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::escape_attr;

static SVG_OPEN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<svg\b([^>]*?)(/?)>").expect("svg tag pattern"));

static PRESENTATION_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s(?:class|width|height|stroke)\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>/]+)"#)
        .expect("presentation attribute pattern")
});

/// Caller-adjustable attributes applied to the root `<svg>` element.
///
/// ```
/// use horizon_icons::markup::MarkupOptions;
///
/// let opts = MarkupOptions::new().width(32).height(32).stroke_color("#ff0000");
/// assert_eq!(opts.class_list("rocket"), "icon icon-rocket");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupOptions {
    /// Replaces the default `icon icon-<name>` class list.
    pub class_name: Option<String>,
    pub width: String,
    pub height: String,
    pub stroke_color: String,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            class_name: None,
            width: "24".to_string(),
            height: "24".to_string(),
            stroke_color: "currentColor".to_string(),
        }
    }
}

impl MarkupOptions {
    /// Default options: 24x24, `currentColor` stroke.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the class list.
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Set the width attribute.
    pub fn width(mut self, width: impl ToString) -> Self {
        self.width = width.to_string();
        self
    }

    /// Set the height attribute.
    pub fn height(mut self, height: impl ToString) -> Self {
        self.height = height.to_string();
        self
    }

    /// Set the stroke color.
    pub fn stroke_color(mut self, color: impl Into<String>) -> Self {
        self.stroke_color = color.into();
        self
    }

    /// Effective class list for `name`.
    pub fn class_list(&self, name: &str) -> String {
        match &self.class_name {
            Some(class_name) => class_name.clone(),
            None => format!("icon icon-{name}"),
        }
    }
}

/// Apply `opts` to the first `<svg>` opening tag of `markup`.
///
/// Existing `class`, `width`, `height` and `stroke` attributes on that tag are
/// replaced so each appears exactly once; nested elements are left alone.
/// Returns `None` if `markup` has no `<svg>` element.
pub fn decorate_markup(markup: &str, name: &str, opts: &MarkupOptions) -> Option<String> {
    let caps = SVG_OPEN_TAG.captures(markup)?;
    let whole = caps.get(0)?;
    let existing = PRESENTATION_ATTR.replace_all(&caps[1], "");
    let self_closing = &caps[2];

    let mut out = String::with_capacity(markup.len() + 96);
    out.push_str(&markup[..whole.start()]);
    out.push_str("<svg");
    out.push_str(&format!(
        " class=\"{}\" width=\"{}\" height=\"{}\" stroke=\"{}\"",
        escape_attr(&opts.class_list(name)),
        escape_attr(&opts.width),
        escape_attr(&opts.height),
        escape_attr(&opts.stroke_color),
    ));
    out.push_str(existing.trim_end());
    out.push_str(self_closing);
    out.push('>');
    out.push_str(&markup[whole.end()..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LUCIDE_ROCKET: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" class="lucide lucide-rocket"><path d="M4.5 16.5c-1.5 1.26-2 5-2 5"/></svg>"#;

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_defaults_replace_existing_attributes() {
        let out = decorate_markup(LUCIDE_ROCKET, "rocket", &MarkupOptions::default()).unwrap();

        assert!(out.starts_with(
            r#"<svg class="icon icon-rocket" width="24" height="24" stroke="currentColor" xmlns="#
        ));
        assert_eq!(count(&out, " class="), 1);
        assert_eq!(count(&out, " width="), 1);
        assert_eq!(count(&out, " stroke="), 1);
        assert!(out.contains(r#"stroke-width="2""#));
        assert!(out.contains(r#"viewBox="0 0 24 24""#));
        assert!(out.ends_with(r#"<path d="M4.5 16.5c-1.5 1.26-2 5-2 5"/></svg>"#));
    }

    #[test]
    fn test_custom_options() {
        let opts = MarkupOptions::new()
            .class_name("nav-icon")
            .width(16)
            .height("1em")
            .stroke_color("#333");
        let out = decorate_markup("<svg><path/></svg>", "home", &opts).unwrap();
        assert_eq!(
            out,
            r##"<svg class="nav-icon" width="16" height="1em" stroke="#333"><path/></svg>"##
        );
    }

    #[test]
    fn test_same_base_decorates_differently() {
        let base = "<svg viewBox=\"0 0 24 24\"></svg>";
        let small = decorate_markup(base, "x", &MarkupOptions::new().width(12)).unwrap();
        let large = decorate_markup(base, "x", &MarkupOptions::new().width(48)).unwrap();
        assert!(small.contains("width=\"12\""));
        assert!(large.contains("width=\"48\""));
        assert!(!large.contains("width=\"12\""));
    }

    #[test]
    fn test_leading_prolog_and_self_closing() {
        let out = decorate_markup("<?xml version=\"1.0\"?>\n<svg width='10'/>", "dot", &MarkupOptions::default())
            .unwrap();
        assert_eq!(
            out,
            "<?xml version=\"1.0\"?>\n<svg class=\"icon icon-dot\" width=\"24\" height=\"24\" stroke=\"currentColor\"/>"
        );
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let opts = MarkupOptions::new().class_name("a\" onload=\"x");
        let out = decorate_markup("<svg></svg>", "x", &opts).unwrap();
        assert!(out.contains("class=\"a&quot; onload=&quot;x\""));
    }

    #[test]
    fn test_no_svg_element() {
        assert_eq!(decorate_markup("<html></html>", "x", &MarkupOptions::default()), None);
    }
}
