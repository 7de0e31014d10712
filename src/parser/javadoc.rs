//! Javadoc adapter (Java, JDK 17+ standard doclet).

use super::{
    child_elements, document_args, has_class, is_tag, raw_text, strip_arg_name, text_of, Page,
    SourceAdapter,
};
use crate::anchor::member_anchor;
use crate::error::Result;
use crate::model::{Class, EnumConstant, Method, SymbolKind, Variable};
use crate::signature::{parse_parameters, Grammar};
use crate::text::{collapse_whitespace, normalize, normalize_signature, LinkStyle, Links};
use regex::Regex;
use scraper::ElementRef;
use std::collections::BTreeSet;
use std::path::{Component, Path};
use std::sync::LazyLock;

static RE_PRE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<pre[^>]*>.*?</pre>").unwrap());

static RE_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?p(?:\s[^>]*)?>").unwrap());

const LINKS: LinkStyle = LinkStyle::PageFragment;

/// Title prefixes, longest first.
const TITLE_KINDS: &[(&str, SymbolKind)] = &[
    ("Annotation Interface ", SymbolKind::Trait),
    ("Enum Class ", SymbolKind::Enum),
    ("Record Class ", SymbolKind::Class),
    ("Interface ", SymbolKind::Trait),
    ("Class ", SymbolKind::Class),
    ("Enum ", SymbolKind::Enum),
    ("Record ", SymbolKind::Class),
];

/// Supertypes every type of a kind carries.
const IMPLICIT_SUPERTYPES: &[&str] = &[
    "Object",
    "Enum",
    "Record",
    "Comparable",
    "Serializable",
    "Constable",
];

/// Methods the compiler generates for every enum.
const IMPLICIT_ENUM_METHODS: &[&str] = &["values", "valueOf"];

pub struct JavadocAdapter;

impl SourceAdapter for JavadocAdapter {
    fn accepts(&self, path: &Path) -> bool {
        let in_class_use = path
            .components()
            .any(|c| matches!(c, Component::Normal(name) if name == "class-use"));
        let type_page = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(".html"))
            .is_some_and(|stem| {
                !stem.contains('-') && stem.starts_with(|c: char| c.is_ascii_uppercase())
            });
        type_page && !in_class_use
    }

    fn symbols<'a>(&self, page: &'a Page) -> Result<Vec<(SymbolKind, ElementRef<'a>)>> {
        let Some(title) = query!("h1.title").first(page.root()) else {
            return Ok(Vec::new());
        };
        Ok(title_kind(&text_of(title))
            .map(|(kind, _)| (kind, page.root()))
            .into_iter()
            .collect())
    }

    fn parse_class(&self, scope: ElementRef<'_>, page: &Page) -> Result<Class> {
        parse_type(scope, page, SymbolKind::Class)
    }

    fn parse_trait(&self, scope: ElementRef<'_>, page: &Page) -> Result<Class> {
        let mut class = parse_type(scope, page, SymbolKind::Trait)?;
        let notes = query!("section.class-description")
            .first(scope)
            .and_then(class_notes);
        class.trait_implementors = note_entries(notes, "All Known Implementing Classes")
            .into_iter()
            .flat_map(type_list)
            .collect();
        Ok(class)
    }

    fn parse_enum(&self, scope: ElementRef<'_>, page: &Page) -> Result<Class> {
        let mut class = parse_type(scope, page, SymbolKind::Enum)?;
        class
            .methods
            .retain(|m| !IMPLICIT_ENUM_METHODS.contains(&m.name.as_str()));
        class.enum_constants = query!("section.constant-details section.detail")
            .all(scope)
            .into_iter()
            .map(|detail| {
                Ok(EnumConstant {
                    name: text_of(query!("h3").require(detail, page)?),
                    value: None,
                })
            })
            .collect::<Result<_>>()?;
        Ok(class)
    }
}

/// Kind and simple name from a page title such as `Interface Driver`.
fn title_kind(title: &str) -> Option<(SymbolKind, &str)> {
    TITLE_KINDS
        .iter()
        .find_map(|(prefix, kind)| title.strip_prefix(prefix).map(|name| (*kind, name.trim())))
}

fn parse_type(scope: ElementRef<'_>, page: &Page, kind: SymbolKind) -> Result<Class> {
    let links = page.links(LINKS);
    let title = text_of(query!("h1.title").require(scope, page)?);
    let name = title_kind(&title).map_or(title.as_str(), |(_, name)| name);
    let header = query!("section.class-description").require(scope, page)?;

    let (description, examples) = match child_elements(header).find(|e| has_class(*e, "block")) {
        Some(block) => (block_paragraphs(block, links), block_examples(block)),
        None => (Vec::new(), Vec::new()),
    };

    let methods = query!("section.method-details section.detail")
        .all(scope)
        .into_iter()
        .map(|detail| parse_method(detail, page))
        .collect::<Result<Vec<_>>>()?;

    let fields = query!("section.field-details section.detail")
        .all(scope)
        .into_iter()
        .map(|detail| parse_field(detail, page))
        .collect::<Result<Vec<_>>>()?;

    Ok(Class {
        description,
        examples,
        fields,
        methods,
        super_classes: super_types(header, kind),
        ..Class::new(name, &page.anchor, kind)
    })
}

/// The notes list directly under the class description header.
fn class_notes(header: ElementRef<'_>) -> Option<ElementRef<'_>> {
    child_elements(header).find(|e| is_tag(*e, "dl") && has_class(*e, "notes"))
}

/// `<dd>` elements following the `<dt>` titled `title` in a notes list.
fn note_entries<'a>(notes: Option<ElementRef<'a>>, title: &str) -> Vec<ElementRef<'a>> {
    let Some(notes) = notes else {
        return Vec::new();
    };
    let mut current = String::new();
    let mut entries = Vec::new();
    for child in child_elements(notes) {
        if is_tag(child, "dt") {
            current = text_of(child).trim_end_matches(':').to_string();
        } else if is_tag(child, "dd") && current == title {
            entries.push(child);
        }
    }
    entries
}

/// Type names listed in one notes entry, separated by `, `.
fn type_list(dd: ElementRef<'_>) -> Vec<String> {
    text_of(dd)
        .split(", ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_implicit_supertype(name: &str) -> bool {
    let raw = name.split('<').next().unwrap_or(name);
    let simple = raw.rsplit('.').next().unwrap_or(raw);
    IMPLICIT_SUPERTYPES.contains(&simple)
}

fn super_types(header: ElementRef<'_>, kind: SymbolKind) -> BTreeSet<String> {
    let notes = class_notes(header);
    let mut types: Vec<String> = ["All Superinterfaces", "All Implemented Interfaces"]
        .iter()
        .flat_map(|title| note_entries(notes, title))
        .flat_map(type_list)
        .collect();

    // Interfaces list their parents under "All Superinterfaces" already
    if kind != SymbolKind::Trait {
        if let Some(clause) = query!(".extends-implements").first(header) {
            let clause = text_of(clause);
            if let Some(parent) = clause
                .strip_prefix("extends ")
                .and_then(|rest| rest.split_whitespace().next())
            {
                types.push(parent.to_string());
            }
        }
    }

    types
        .into_iter()
        .filter(|t| !is_implicit_supertype(t))
        .collect()
}

/// Description paragraphs of a `div.block`, code listings removed.
fn block_paragraphs(block: ElementRef<'_>, links: Links<'_>) -> Vec<String> {
    let html = block.inner_html();
    let html = RE_PRE.replace_all(&html, "");
    RE_PARAGRAPH
        .split(&html)
        .map(|p| normalize(p, links))
        .filter(|p| !p.is_empty())
        .collect()
}

fn block_examples(block: ElementRef<'_>) -> Vec<String> {
    query!("pre")
        .all(block)
        .into_iter()
        .map(raw_text)
        .filter(|e| !e.is_empty())
        .collect()
}

fn detail_block(detail: ElementRef<'_>) -> Option<ElementRef<'_>> {
    query!("div.block").first(detail)
}

fn parse_method(detail: ElementRef<'_>, page: &Page) -> Result<Method> {
    let links = page.links(LINKS);
    let name = text_of(query!("h3").require(detail, page)?);
    let signature_el = query!("div.member-signature").require(detail, page)?;
    let signature = collapse_whitespace(&normalize_signature(
        &signature_el.text().collect::<String>(),
    ));
    let id = detail.value().id().unwrap_or(&name);

    let notes = query!("dl.notes").first(detail);
    let documented = note_entries(notes, "Parameters")
        .into_iter()
        .map(|dd| {
            let arg = text_of(query!("code").require(dd, page)?);
            let line = normalize(&dd.inner_html(), links);
            Ok((arg.clone(), strip_arg_name(&line, &arg)))
        })
        .collect::<Result<Vec<_>>>()?;
    let params = parse_parameters(&signature, Grammar::JAVA);
    let args = document_args(page, &name, &params, documented)?;

    let return_description = note_entries(notes, "Returns")
        .into_iter()
        .map(|dd| normalize(&dd.inner_html(), links))
        .collect::<Vec<_>>()
        .join(" ");

    let block = detail_block(detail);
    Ok(Method {
        anchor: member_anchor(&page.anchor, id),
        return_type: query!("span.return-type")
            .first(signature_el)
            .map(text_of)
            .filter(|t| t != "void"),
        return_description: Some(return_description).filter(|d| !d.is_empty()),
        description: block.map(|b| block_paragraphs(b, links)).unwrap_or_default(),
        examples: block.map(block_examples).unwrap_or_default(),
        args,
        mode: Some(page.mode.clone()),
        name,
        signature,
    })
}

fn parse_field(detail: ElementRef<'_>, page: &Page) -> Result<Variable> {
    let name = text_of(query!("h3").require(detail, page)?);
    let signature = query!("div.member-signature").require(detail, page)?;
    let description = detail_block(detail)
        .map(|b| block_paragraphs(b, page.links(LINKS)).join("\n\n"))
        .filter(|d| !d.is_empty());

    Ok(Variable {
        anchor: Some(member_anchor(
            &page.anchor,
            detail.value().id().unwrap_or(&name),
        )),
        ty: query!("span.return-type").first(signature).map(text_of),
        name,
        description,
        default_value: None,
    })
}
