//! Anchor slug generation shared by every adapter and by link normalization.
//!
//! A cross-reference only resolves when the anchor written next to a member's
//! heading and the anchor computed from a link to it come out of the same rule,
//! so there is exactly one: lowercase, and every character that is not ASCII
//! alphanumeric becomes `_`.

/// Slugify arbitrary text into an anchor component.
pub fn slug(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Anchor for the page a URL points at: the trailing path segment without `.html`.
///
/// `../driver/struct.Connection.html` → `struct_connection`
pub fn anchor_from_url(url: &str) -> String {
    let path = url.split('#').next().unwrap_or(url);
    let segment = path.rsplit('/').next().unwrap_or(path);
    slug(segment.strip_suffix(".html").unwrap_or(segment))
}

/// Anchor of a member owned by the class anchored at `class_anchor`.
pub fn member_anchor(class_anchor: &str, member: &str) -> String {
    format!("{}_{}", class_anchor, slug(member))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases_and_replaces() {
        assert_eq!(slug("method.open"), "method_open");
        assert_eq!(slug("Trait Foo"), "trait_foo");
        assert_eq!(slug("open(java.lang.String)"), "open_java_lang_string_");
    }

    #[test]
    fn slug_keeps_digits() {
        assert_eq!(slug("method.fmt-1"), "method_fmt_1");
    }

    #[test]
    fn anchor_from_relative_url() {
        assert_eq!(
            anchor_from_url("../driver/struct.Connection.html"),
            "struct_connection"
        );
        assert_eq!(anchor_from_url("Foo.html"), "foo");
    }

    #[test]
    fn anchor_from_url_ignores_fragment() {
        assert_eq!(anchor_from_url("trait.Drop.html#tymethod.drop"), "trait_drop");
    }

    #[test]
    fn member_anchor_is_namespaced() {
        assert_eq!(
            member_anchor("struct_connection", "method.open"),
            "struct_connection_method_open"
        );
    }
}
