//! Source adapters: one per documentation generator, behind a shared contract.
//!
//! Every adapter turns a parsed HTML page into [`Class`] records. They differ
//! only in DOM selectors and in which implicit base types they drop; text
//! normalization, signature parsing and anchor derivation are shared.

/// A CSS selector compiled once, keeping its source text for error reports.
macro_rules! query {
    ($css:literal) => {{
        static SELECTOR: std::sync::LazyLock<scraper::Selector> =
            std::sync::LazyLock::new(|| scraper::Selector::parse($css).unwrap());
        $crate::parser::Query::new($css, &SELECTOR)
    }};
}

pub mod javadoc;
pub mod merge;
pub mod rustdoc;
pub mod sphinx;

use crate::anchor::anchor_from_url;
use crate::error::{DocError, Result};
use crate::model::{Class, SymbolKind, Variable};
use crate::signature::Params;
use crate::text::{collapse_whitespace, normalize, LinkStyle, Links};
use scraper::{ElementRef, Html, Selector};
use std::path::Path;

/// Source documentation generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Ecosystem {
    /// rustdoc output
    Rust,
    /// Sphinx autodoc output
    Python,
    /// Javadoc output
    Java,
}

impl Ecosystem {
    /// Language tag for source listings.
    pub fn language(self) -> &'static str {
        match self {
            Ecosystem::Rust => "rust",
            Ecosystem::Python => "python",
            Ecosystem::Java => "java",
        }
    }

    /// Create the adapter for this ecosystem. `markers` narrows Sphinx page discovery.
    pub fn adapter(self, markers: &[String]) -> Box<dyn SourceAdapter> {
        match self {
            Ecosystem::Rust => Box::new(rustdoc::RustdocAdapter),
            Ecosystem::Python => Box::new(sphinx::SphinxAdapter::new(markers)),
            Ecosystem::Java => Box::new(javadoc::JavadocAdapter),
        }
    }
}

/// One parsed HTML page of one mode.
pub struct Page {
    /// Path used in error messages
    pub path: String,
    /// Anchor of the page itself, derived from its file name
    pub anchor: String,
    /// Build configuration the page was generated under
    pub mode: String,
    document: Html,
}

impl Page {
    pub fn new(path: &Path, html: &str, mode: &str) -> Self {
        let path = path.to_string_lossy().to_string();
        Page {
            anchor: anchor_from_url(&path),
            path,
            mode: mode.to_string(),
            document: Html::parse_document(html),
        }
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    pub fn links(&self, style: LinkStyle) -> Links<'_> {
        Links {
            style,
            page_anchor: &self.anchor,
        }
    }
}

/// Capability set every ecosystem implements.
pub trait SourceAdapter: Send + Sync {
    /// Whether a file found during the directory walk is an API page.
    fn accepts(&self, path: &Path) -> bool;

    /// Symbols declared by a page, with the element scoping each one.
    /// Pages declaring nothing return an empty list.
    fn symbols<'a>(&self, page: &'a Page) -> Result<Vec<(SymbolKind, ElementRef<'a>)>>;

    fn parse_class(&self, scope: ElementRef<'_>, page: &Page) -> Result<Class>;

    /// Interfaces and traits. Ecosystems without them never report
    /// [`SymbolKind::Trait`], so the default reads the page as a class.
    fn parse_trait(&self, scope: ElementRef<'_>, page: &Page) -> Result<Class> {
        self.parse_class(scope, page)
    }

    fn parse_enum(&self, scope: ElementRef<'_>, page: &Page) -> Result<Class>;
}

/// Parse every symbol a page declares.
pub fn parse_page(adapter: &dyn SourceAdapter, page: &Page) -> Result<Vec<Class>> {
    adapter
        .symbols(page)?
        .into_iter()
        .map(|(kind, scope)| match kind {
            SymbolKind::Class => adapter.parse_class(scope, page),
            SymbolKind::Trait => adapter.parse_trait(scope, page),
            SymbolKind::Enum => adapter.parse_enum(scope, page),
        })
        .collect()
}

/// Static selector plus the text it was compiled from.
#[derive(Clone, Copy)]
pub struct Query {
    css: &'static str,
    selector: &'static Selector,
}

impl Query {
    pub fn new(css: &'static str, selector: &'static Selector) -> Self {
        Query { css, selector }
    }

    pub fn first<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        scope.select(self.selector).next()
    }

    pub fn all<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        scope.select(self.selector).collect()
    }

    /// First match, or a structural mismatch naming this selector.
    pub fn require<'a>(&self, scope: ElementRef<'a>, page: &Page) -> Result<ElementRef<'a>> {
        self.first(scope)
            .ok_or_else(|| DocError::structural(&page.path, self.css))
    }
}

// -- DOM helpers --------------------------------------------------------------

/// Whitespace-collapsed text content.
pub fn text_of(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Text content with line structure intact (code listings).
pub fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim_end().to_string()
}

/// Text content with rustdoc's line-break markup turned into newlines.
///
/// Where clauses sit in `<div class="where">` (current rustdoc) or in a
/// `<span class="where fmt-newline">` holding `<br>` breaks (older rustdoc).
/// Neither carries a newline character in its text.
pub fn signature_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_signature_text(element, &mut out);
    out
}

fn push_signature_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            if is_tag(child, "br") {
                out.push('\n');
                continue;
            }
            if starts_line(child) {
                out.push('\n');
            }
            push_signature_text(child, out);
        }
    }
}

fn starts_line(element: ElementRef<'_>) -> bool {
    (is_tag(element, "div") && has_class(element, "where"))
        || element.value().classes().any(|c| c.contains("newline"))
}

pub fn next_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

pub fn child_elements(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element.children().filter_map(ElementRef::wrap)
}

pub fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

pub fn is_tag(element: ElementRef<'_>, name: &str) -> bool {
    element.value().name() == name
}

/// Normalized `<p>` children of `element`, empty paragraphs dropped.
pub fn paragraphs(element: ElementRef<'_>, links: Links<'_>) -> Vec<String> {
    child_elements(element)
        .filter(|e| is_tag(*e, "p"))
        .map(|p| normalize(&p.inner_html(), links))
        .filter(|p| !p.is_empty())
        .collect()
}

/// Strip a leading documented name and its separator from a normalized
/// argument line: `` `uri` – The address `` → `The address`.
pub fn strip_arg_name(line: &str, name: &str) -> String {
    let rest = line
        .strip_prefix(&format!("`{}`", name))
        .or_else(|| line.strip_prefix(name))
        .unwrap_or(line);
    rest.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '\u{2013}' | '\u{2014}' | ':'))
        .to_string()
}

/// Cross-check prose-documented arguments against the parsed signature and
/// attach declared types and defaults.
pub fn document_args(
    page: &Page,
    method: &str,
    params: &Params,
    documented: Vec<(String, String)>,
) -> Result<Vec<Variable>> {
    documented
        .into_iter()
        .map(|(name, description)| {
            let param = params.get(&name).ok_or_else(|| DocError::SignatureConsistency {
                page: page.path.clone(),
                method: method.to_string(),
                param: name.clone(),
            })?;
            Ok(Variable {
                ty: param.ty.clone(),
                default_value: param.default.clone(),
                description: Some(description).filter(|d| !d.is_empty()),
                name,
                anchor: None,
            })
        })
        .collect()
}
