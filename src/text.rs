//! Inline HTML → AsciiDoc inline markup.
//!
//! Documentation prose arrives as HTML fragments. Each fragment is rewritten
//! into plain text carrying canonical tokens:
//!
//! - `<code>x</code>` → `` `x` ``
//! - `<em>x</em>` / `<i>x</i>` → `_x_`
//! - `<a href="Page.html#frag">text</a>` → `<<#_page_frag,text>>`
//! - every other tag is dropped, entities are decoded, glyphs are made ASCII

use crate::anchor::{anchor_from_url, slug};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static RE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<code(?:\s[^>]*)?>(.*?)</code>").unwrap());

static RE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a\s[^>]*?href="([^"]*)"[^>]*>(.*?)</a>"#).unwrap()
});

static RE_EM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<(?:em|i)(?:\s[^>]*)?>(.*?)</(?:em|i)>").unwrap());

// Tag names start with a letter, so `<<#_anchor,text>>` tokens survive.
static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z][^>]*>").unwrap());

static RE_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap());

static RE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Typeset glyphs generators put into signatures and prose.
const GLYPHS: &[(&str, &str)] = &[
    ("\u{2192}", "->"),
    ("\u{00b6}", ""),
    ("\u{200b}", ""),
    ("\u{00a0}", " "),
];

/// How an ecosystem's hyperlinks map onto anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// `struct.Foo.html#method.bar` → page anchor + fragment (rustdoc, javadoc)
    PageFragment,
    /// `mod.html#pkg.mod.Foo.bar` → qualified name from the first class component (sphinx)
    QualifiedName,
}

/// Link resolution context for one page.
#[derive(Debug, Clone, Copy)]
pub struct Links<'a> {
    pub style: LinkStyle,
    /// Anchor of the page the fragment came from, for `#fragment`-only links
    pub page_anchor: &'a str,
}

/// Normalize an HTML fragment into AsciiDoc inline text.
pub fn normalize(html: &str, links: Links<'_>) -> String {
    let text = replace_code(html);
    let text = replace_links(&text, links);
    let text = replace_emphasis(&text);
    let text = RE_TAG.replace_all(&text, "");
    let text = replace_glyphs(&decode_entities(&text));
    collapse_whitespace(&text)
}

/// Clean up rendered signature text, keeping its line structure.
pub fn normalize_signature(text: &str) -> String {
    let text = replace_glyphs(&decode_entities(text));
    text.lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Collapse every whitespace run into one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    RE_SPACES.replace_all(text, " ").trim().to_string()
}

/// Anchor a relative link points at, or `None` for external links.
pub fn cross_ref_anchor(href: &str, links: Links<'_>) -> Option<String> {
    let (path, fragment) = match href.split_once('#') {
        Some((p, f)) => (p, Some(f).filter(|f| !f.is_empty())),
        None => (href, None),
    };
    if path.contains(':') || (path.is_empty() && fragment.is_none()) {
        return None;
    }

    match links.style {
        LinkStyle::PageFragment => {
            let page = if path.is_empty() {
                links.page_anchor.to_string()
            } else {
                anchor_from_url(path)
            };
            Some(match fragment {
                Some(f) => format!("{}_{}", page, slug(f)),
                None => page,
            })
        }
        LinkStyle::QualifiedName => match fragment {
            Some(f) => Some(qualified_anchor(f)),
            None => Some(anchor_from_url(path)),
        },
    }
}

/// `typedb.driver.Driver.open` → `driver_open`: drop the module path before the
/// first capitalised component, so members such as `TransactionType.READ` stay
/// under their class.
fn qualified_anchor(name: &str) -> String {
    let parts: Vec<&str> = name.split('.').collect();
    let start = parts
        .iter()
        .position(|p| p.starts_with(|c: char| c.is_ascii_uppercase()))
        .unwrap_or(parts.len() - 1);
    slug(&parts[start..].join("."))
}

fn replace_code(html: &str) -> String {
    RE_CODE
        .replace_all(html, |caps: &Captures| {
            format!("`{}`", RE_TAG.replace_all(&caps[1], ""))
        })
        .into_owned()
}

fn replace_links(html: &str, links: Links<'_>) -> String {
    RE_LINK
        .replace_all(html, |caps: &Captures| {
            let text = RE_TAG.replace_all(&caps[2], "");
            let text = collapse_whitespace(&text);
            match cross_ref_anchor(&caps[1], links) {
                Some(anchor) => format!("<<#_{},{}>>", anchor, text),
                None => text,
            }
        })
        .into_owned()
}

fn replace_emphasis(html: &str) -> String {
    RE_EM.replace_all(html, "_${1}_").into_owned()
}

fn replace_glyphs(text: &str) -> String {
    GLYPHS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

fn decode_entities(text: &str) -> String {
    RE_ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                "ndash" => Some('\u{2013}'),
                "mdash" => Some('\u{2014}'),
                "rarr" => Some('\u{2192}'),
                "para" => Some('\u{b6}'),
                _ => numeric_entity(entity),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn numeric_entity(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}
