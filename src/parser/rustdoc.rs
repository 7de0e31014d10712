//! rustdoc adapter.
//!
//! One page per item: `struct.Name.html`, `trait.Name.html`, `enum.Name.html`.
//! Members come from inherent impls, plus impls of traits documented in the
//! same crate (external trait impls such as `Debug` are skipped). Argument
//! documentation is the usual rustdoc bullet list whose items start with the
//! parameter in backticks:
//!
//! ```text
//! * `uri` – The address of the server
//! ```

use super::{
    child_elements, document_args, has_class, is_tag, next_element, paragraphs, raw_text,
    signature_text, strip_arg_name, text_of, Page, SourceAdapter,
};
use crate::anchor::member_anchor;
use crate::error::Result;
use crate::model::{Class, EnumConstant, Method, SymbolKind, Variable};
use crate::signature::{parse_parameters, return_type, Grammar};
use crate::text::{normalize, normalize_signature, LinkStyle};
use scraper::ElementRef;
use std::collections::BTreeSet;
use std::path::Path;

const LINKS: LinkStyle = LinkStyle::PageFragment;

/// Item page prefixes rustdoc uses for the symbols we publish.
const ITEM_PREFIXES: &[&str] = &["struct.", "trait.", "enum."];

pub struct RustdocAdapter;

impl SourceAdapter for RustdocAdapter {
    fn accepts(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        name.ends_with(".html") && ITEM_PREFIXES.iter().any(|p| name.starts_with(p))
    }

    fn symbols<'a>(&self, page: &'a Page) -> Result<Vec<(SymbolKind, ElementRef<'a>)>> {
        let root = page.root();
        let kind = if query!(".main-heading h1 .struct").first(root).is_some() {
            SymbolKind::Class
        } else if query!(".main-heading h1 .trait").first(root).is_some() {
            SymbolKind::Trait
        } else if query!(".main-heading h1 .enum").first(root).is_some() {
            SymbolKind::Enum
        } else {
            return Ok(Vec::new());
        };
        Ok(vec![(kind, root)])
    }

    fn parse_class(&self, scope: ElementRef<'_>, page: &Page) -> Result<Class> {
        let name = text_of(query!(".main-heading h1 .struct").require(scope, page)?);

        let fields = query!(".structfield")
            .all(scope)
            .into_iter()
            .map(|field| parse_field(field, page))
            .collect::<Result<Vec<_>>>()?;

        let mut methods = parse_methods(inherent_methods(scope), page)?;
        methods.extend(parse_methods(local_trait_methods(scope), page)?);

        Ok(Class {
            description: description(scope, page),
            fields,
            methods,
            super_classes: implemented_traits(scope),
            ..Class::new(name, &page.anchor, SymbolKind::Class)
        })
    }

    fn parse_trait(&self, scope: ElementRef<'_>, page: &Page) -> Result<Class> {
        let name = text_of(query!(".main-heading h1 .trait").require(scope, page)?);

        let mut toggles = query!("#required-methods + .methods details.method-toggle").all(scope);
        toggles.extend(query!("#provided-methods + .methods details.method-toggle").all(scope));
        let methods = parse_methods(documented_only(toggles), page)?;

        let trait_implementors = query!("#implementors-list .code-header")
            .all(scope)
            .into_iter()
            .filter_map(|header| {
                let text = text_of(header);
                text.rsplit_once(" for ").map(|(_, ty)| ty.to_string())
            })
            .collect();

        Ok(Class {
            description: description(scope, page),
            methods,
            trait_implementors,
            ..Class::new(format!("Trait {}", name), &page.anchor, SymbolKind::Trait)
        })
    }

    fn parse_enum(&self, scope: ElementRef<'_>, page: &Page) -> Result<Class> {
        let name = text_of(query!(".main-heading h1 .enum").require(scope, page)?);

        let enum_constants = query!("section.variant")
            .all(scope)
            .into_iter()
            .map(|variant| {
                Ok(EnumConstant {
                    name: text_of(query!("h3").require(variant, page)?),
                    value: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Class {
            description: description(scope, page),
            enum_constants,
            methods: parse_methods(inherent_methods(scope), page)?,
            ..Class::new(name, &page.anchor, SymbolKind::Enum)
        })
    }
}

/// Top-level item documentation.
fn description(scope: ElementRef<'_>, page: &Page) -> Vec<String> {
    query!(".item-decl + details.top-doc .docblock")
        .first(scope)
        .map(|block| paragraphs(block, page.links(LINKS)))
        .unwrap_or_default()
}

/// Method toggles carrying documentation (undocumented methods have no toggle).
fn documented_only(toggles: Vec<ElementRef<'_>>) -> Vec<ElementRef<'_>> {
    toggles
        .into_iter()
        .filter(|t| query!("summary section.method").first(*t).is_some())
        .collect()
}

fn inherent_methods(scope: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    documented_only(query!("#implementations-list details.method-toggle").all(scope))
}

/// Methods of impl blocks whose trait links inside the crate's own docs.
fn local_trait_methods(scope: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut toggles = Vec::new();
    for summary in query!("#trait-implementations-list summary").all(scope) {
        if query!("h3 a.trait[href^='http']").first(summary).is_some() {
            continue;
        }
        if let Some(items) = next_element(summary).filter(|e| has_class(*e, "impl-items")) {
            toggles.extend(query!("details.method-toggle").all(items));
        }
    }
    documented_only(toggles)
}

/// Trait names from the sidebar's "Trait Implementations" block.
fn implemented_traits(scope: ElementRef<'_>) -> BTreeSet<String> {
    query!(".sidebar-elems h3")
        .all(scope)
        .into_iter()
        .filter(|h3| query!("a[href='#trait-implementations']").first(*h3).is_some())
        .filter_map(next_element)
        .flat_map(|list| child_elements(list).map(text_of).collect::<Vec<_>>())
        .filter(|t| !t.is_empty())
        .collect()
}

fn parse_methods(toggles: Vec<ElementRef<'_>>, page: &Page) -> Result<Vec<Method>> {
    toggles
        .into_iter()
        .map(|toggle| parse_method(toggle, page))
        .collect()
}

fn parse_method(toggle: ElementRef<'_>, page: &Page) -> Result<Method> {
    let links = page.links(LINKS);
    let header = query!("summary section h4").require(toggle, page)?;
    let signature = normalize_signature(&signature_text(header));
    let fn_link = query!("summary section h4 a.fn").require(toggle, page)?;
    let name = text_of(fn_link);

    // The section id is what other pages link to (`#method.open`).
    let section = query!("summary section.method").require(toggle, page)?;
    let member = section
        .value()
        .id()
        .or_else(|| {
            fn_link
                .value()
                .attr("href")
                .and_then(|h| h.split_once('#'))
                .map(|(_, fragment)| fragment)
        })
        .unwrap_or(&name)
        .to_string();

    let docblock = query!("div.docblock").first(toggle);
    let mut description = docblock
        .map(|block| paragraphs(block, links))
        .unwrap_or_default();
    if description.is_empty() {
        description = query!("div.docblock a")
            .all(toggle)
            .into_iter()
            .filter(|a| text_of(*a).contains("Read more"))
            .map(|a| normalize(&a.html(), links))
            .collect();
    }

    let examples = query!("div.docblock div.example-wrap pre")
        .all(toggle)
        .into_iter()
        .map(raw_text)
        .collect();

    let documented = query!("div.docblock ul > li")
        .all(toggle)
        .into_iter()
        .filter_map(|item| {
            let code = child_elements(item).next().filter(|c| is_tag(*c, "code"))?;
            let arg = text_of(code);
            if !text_of(item).starts_with(&arg) {
                return None;
            }
            let line = normalize(&item.inner_html(), links);
            Some((arg.clone(), strip_arg_name(&line, &arg)))
        })
        .collect();

    let params = parse_parameters(&signature, Grammar::RUST);
    let args = document_args(page, &name, &params, documented)?;

    Ok(Method {
        anchor: member_anchor(&page.anchor, &member),
        return_type: return_type(&signature, Grammar::RUST),
        args,
        description,
        examples,
        mode: Some(page.mode.clone()),
        name,
        signature,
        ..Default::default()
    })
}

fn parse_field(field: ElementRef<'_>, page: &Page) -> Result<Variable> {
    let declaration = text_of(query!("code").require(field, page)?);
    let (name, ty) = match declaration.split_once(": ") {
        Some((name, ty)) => (name.to_string(), Some(ty.to_string())),
        None => (declaration.clone(), None),
    };

    let description = next_element(field)
        .and_then(|next| {
            if has_class(next, "docblock") {
                Some(next)
            } else {
                query!(".docblock").first(next)
            }
        })
        .map(|block| normalize(&block.inner_html(), page.links(LINKS)))
        .filter(|d| !d.is_empty());

    let member = field.value().id().unwrap_or(&name).to_string();

    Ok(Variable {
        anchor: Some(member_anchor(&page.anchor, &member)),
        description,
        name,
        ty,
        default_value: None,
    })
}
