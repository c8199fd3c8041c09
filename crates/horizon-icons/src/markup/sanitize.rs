//! Icon identifier sanitation.
//!
//! An icon name ends up in cache keys, file names and remote paths, so it is
//! reduced to a conservative token before any of those are built: ASCII
//! lowercase letters, digits, `-` and `_`, starting with a letter or digit.

/// Longest identifier accepted.
pub const MAX_NAME_LEN: usize = 128;

/// Reduce `raw` to a safe icon token.
///
/// Surrounding whitespace is trimmed and ASCII letters are lowercased. Any
/// other character outside `[a-z0-9_-]` rejects the whole name rather than
/// being stripped, so `"../etc/passwd"` never collapses into `"etcpasswd"`.
///
/// ```
/// use horizon_icons::markup::sanitize_icon_name;
///
/// assert_eq!(sanitize_icon_name(" Rocket-Ship ").as_deref(), Some("rocket-ship"));
/// assert_eq!(sanitize_icon_name("../etc/passwd"), None);
/// assert_eq!(sanitize_icon_name(""), None);
/// ```
pub fn sanitize_icon_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_NAME_LEN {
        return None;
    }

    let name = trimmed.to_ascii_lowercase();
    let mut chars = name.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphanumeric() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        Some(name)
    } else {
        None
    }
}

/// Sanitize a value on its way into or out of storage.
///
/// Unlike [`sanitize_icon_name`] this never fails: an unsafe value becomes the
/// empty string, which the field contract treats as "no selection".
pub fn sanitize_stored_value(raw: &str) -> String {
    sanitize_icon_name(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_kebab_and_snake_case() {
        assert_eq!(sanitize_icon_name("arrow-up-right").as_deref(), Some("arrow-up-right"));
        assert_eq!(sanitize_icon_name("align_left").as_deref(), Some("align_left"));
        assert_eq!(sanitize_icon_name("Box3").as_deref(), Some("box3"));
    }

    #[test]
    fn test_rejects_traversal_and_markup() {
        for raw in ["../etc/passwd", "a/b", "..", "rocket.svg", "<svg>", "a b", "-lead"] {
            assert_eq!(sanitize_icon_name(raw), None, "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_rejects_non_ascii() {
        assert_eq!(sanitize_icon_name("ĉapelo"), None);
    }

    #[test]
    fn test_length_limit() {
        let long = "a".repeat(MAX_NAME_LEN + 1);
        assert_eq!(sanitize_icon_name(&long), None);
        assert!(sanitize_icon_name(&long[..MAX_NAME_LEN]).is_some());
    }

    #[test]
    fn test_stored_value_collapses_to_empty() {
        assert_eq!(sanitize_stored_value("settings"), "settings");
        assert_eq!(sanitize_stored_value("../../x"), "");
        assert_eq!(sanitize_stored_value("   "), "");
    }
}
