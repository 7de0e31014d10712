//! Sphinx autodoc adapter (Python).
//!
//! Module pages hold any number of `dl.class` blocks; each one is a symbol.
//! Python has no separate interface construct, so traits are never reported.

use super::{
    child_elements, document_args, is_tag, next_element, paragraphs, raw_text, strip_arg_name,
    text_of, Page, SourceAdapter,
};
use crate::anchor::{member_anchor, slug};
use crate::error::{DocError, Result};
use crate::model::{Class, EnumConstant, Method, SymbolKind, Variable};
use crate::signature::{parse_parameters, return_type, Grammar};
use crate::text::{collapse_whitespace, normalize, normalize_signature, LinkStyle};
use scraper::ElementRef;
use std::collections::BTreeSet;
use std::path::Path;

const LINKS: LinkStyle = LinkStyle::QualifiedName;

/// Path markers of API module pages when none are configured.
const DEFAULT_MARKERS: &[&str] = &[".api.", ".common."];

/// Bases every class carries that say nothing about its API.
const IMPLICIT_BASES: &[&str] = &["ABC", "Enum", "object", "Generic[T]"];

/// Properties exposing the native binding handle.
const HIDDEN_PROPERTIES: &[&str] = &["native_object"];

pub struct SphinxAdapter {
    markers: Vec<String>,
}

impl SphinxAdapter {
    pub fn new(markers: &[String]) -> Self {
        let markers = if markers.is_empty() {
            DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect()
        } else {
            markers.to_vec()
        };
        SphinxAdapter { markers }
    }
}

impl SourceAdapter for SphinxAdapter {
    fn accepts(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        path.ends_with(".html") && self.markers.iter().any(|m| path.contains(m.as_str()))
    }

    fn symbols<'a>(&self, page: &'a Page) -> Result<Vec<(SymbolKind, ElementRef<'a>)>> {
        query!("dl.class")
            .all(page.root())
            .into_iter()
            .map(|class| {
                let lead = query!("dt.sig-object + dd > p").require(class, page)?;
                let kind = if text_of(lead).contains("Enum") {
                    SymbolKind::Enum
                } else {
                    SymbolKind::Class
                };
                Ok((kind, class))
            })
            .collect()
    }

    fn parse_class(&self, scope: ElementRef<'_>, page: &Page) -> Result<Class> {
        let header = parse_header(scope, page)?;
        let anchor = slug(&header.name);

        let methods = query!("dl.method")
            .all(header.details)
            .into_iter()
            .map(|m| parse_method(m, &anchor, page))
            .collect::<Result<Vec<_>>>()?;

        let fields = query!("dl.property")
            .all(header.details)
            .into_iter()
            .map(|p| parse_property(p, &anchor, page))
            .filter(|p| {
                !matches!(p, Ok(v) if HIDDEN_PROPERTIES.contains(&v.name.as_str()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Class {
            description: header.description,
            examples: header.examples,
            fields,
            methods,
            super_classes: header.super_classes,
            ..Class::new(header.name, anchor, SymbolKind::Class)
        })
    }

    fn parse_enum(&self, scope: ElementRef<'_>, page: &Page) -> Result<Class> {
        let header = parse_header(scope, page)?;
        let anchor = slug(&header.name);

        let methods = query!("dl.method")
            .all(header.details)
            .into_iter()
            .map(|m| parse_method(m, &anchor, page))
            .collect::<Result<Vec<_>>>()?;

        let enum_constants = query!("dl.attribute")
            .all(header.details)
            .into_iter()
            .map(|a| parse_enum_constant(a, page))
            .collect::<Result<Vec<_>>>()?;

        Ok(Class {
            description: header.description,
            examples: header.examples,
            enum_constants,
            methods,
            super_classes: header.super_classes,
            ..Class::new(header.name, anchor, SymbolKind::Enum)
        })
    }
}

/// Class-level data shared by classes and enums.
struct Header<'a> {
    name: String,
    details: ElementRef<'a>,
    description: Vec<String>,
    examples: Vec<String>,
    super_classes: BTreeSet<String>,
}

fn parse_header<'a>(scope: ElementRef<'a>, page: &Page) -> Result<Header<'a>> {
    let links = page.links(LINKS);
    let signature = query!("dt.sig-object").require(scope, page)?;
    let name = text_of(query!("span.sig-name").require(signature, page)?);
    let details = next_element(signature)
        .filter(|e| is_tag(*e, "dd"))
        .ok_or_else(|| DocError::structural(&page.path, "dt.sig-object + dd"))?;

    let (bases, description): (Vec<_>, Vec<_>) = child_elements(details)
        .filter(|e| is_tag(*e, "p"))
        .partition(|p| text_of(*p).starts_with("Bases:"));

    let super_classes = bases
        .into_iter()
        .flat_map(|p| {
            let text = text_of(p);
            text["Bases:".len()..]
                .split(", ")
                .map(|b| b.trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|b| !b.is_empty() && !is_implicit_base(b))
        .collect();

    let description = description
        .into_iter()
        .map(|p| normalize(&p.inner_html(), links))
        .filter(|p| !p.is_empty())
        .collect();

    Ok(Header {
        examples: examples(details),
        name,
        details,
        description,
        super_classes,
    })
}

fn is_implicit_base(base: &str) -> bool {
    IMPLICIT_BASES.contains(&base) || base.starts_with("NativeWrapper")
}

/// Code blocks of the `Example`/`Examples` sections directly under `details`.
fn examples(details: ElementRef<'_>) -> Vec<String> {
    child_elements(details)
        .filter(|e| is_tag(*e, "section"))
        .filter(|s| {
            child_elements(*s)
                .next()
                .is_some_and(|heading| text_of(heading).contains("Example"))
        })
        .flat_map(|s| query!(".highlight").all(s))
        .map(raw_text)
        .collect()
}

/// Paragraphs of the field-list entry whose title contains `title`.
fn field_list_entry<'a>(details: ElementRef<'a>, title: &str) -> Vec<ElementRef<'a>> {
    query!("dl.field-list > dt")
        .all(details)
        .into_iter()
        .filter(|dt| text_of(*dt).contains(title))
        .filter_map(next_element)
        .flat_map(|dd| query!("p").all(dd))
        .collect()
}

fn parse_method(element: ElementRef<'_>, class_anchor: &str, page: &Page) -> Result<Method> {
    let links = page.links(LINKS);
    let signature_el = query!("dt.sig-object").require(element, page)?;
    let signature = collapse_whitespace(&normalize_signature(
        &signature_el.text().collect::<String>(),
    ));
    let name = text_of(query!("span.sig-name").require(signature_el, page)?);
    let details = next_element(signature_el)
        .filter(|e| is_tag(*e, "dd"))
        .ok_or_else(|| DocError::structural(&page.path, "dl.method > dd"))?;

    let documented = field_list_entry(details, "Parameters")
        .into_iter()
        .map(|p| {
            let arg = text_of(query!("strong").require(p, page)?);
            let line = normalize(&p.inner_html(), links);
            Ok((arg.clone(), strip_arg_name(&line, &arg)))
        })
        .collect::<Result<Vec<_>>>()?;

    let params = parse_parameters(&signature, Grammar::PYTHON);
    let args = document_args(page, &name, &params, documented)?;

    let return_description = field_list_entry(details, "Returns")
        .into_iter()
        .map(|p| normalize(&p.inner_html(), links))
        .collect::<Vec<_>>()
        .join(" ");

    Ok(Method {
        anchor: member_anchor(class_anchor, &name),
        return_type: return_type(&signature, Grammar::PYTHON),
        return_description: Some(return_description).filter(|d| !d.is_empty()),
        description: paragraphs(details, links),
        examples: examples(details),
        args,
        mode: Some(page.mode.clone()),
        name,
        signature,
    })
}

fn parse_property(element: ElementRef<'_>, class_anchor: &str, page: &Page) -> Result<Variable> {
    let signature = query!("dt.sig-object").require(element, page)?;
    let name = text_of(query!("span.sig-name").require(signature, page)?);
    let ty = query!("span.sig-name + .property")
        .first(signature)
        .map(|p| {
            text_of(p)
                .trim_start_matches(|c: char| !c.is_alphabetic())
                .to_string()
        })
        .filter(|t| !t.is_empty());

    let description = next_element(signature)
        .map(|dd| paragraphs(dd, page.links(LINKS)).join("\n\n"))
        .filter(|d| !d.is_empty());

    Ok(Variable {
        anchor: Some(member_anchor(class_anchor, &name)),
        name,
        ty,
        description,
        default_value: None,
    })
}

fn parse_enum_constant(element: ElementRef<'_>, page: &Page) -> Result<EnumConstant> {
    let signature = query!("dt.sig-object").require(element, page)?;
    let name = text_of(query!("span.sig-name").require(signature, page)?);
    let value = query!("span.sig-name + .property").first(signature).map(|p| {
        let text = text_of(p);
        text.strip_prefix("= ").unwrap_or(&text).to_string()
    });
    Ok(EnumConstant { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_page;

    const MODULE_PAGE: &str = r##"<!DOCTYPE html>
<html><body><section id="driver">
<dl class="py class">
<dt class="sig sig-object py" id="typedb.api.connection.driver.Driver">
<em class="property"><span class="pre">class</span><span class="w"> </span></em><span class="sig-prename descclassname"><span class="pre">typedb.api.connection.driver.</span></span><span class="sig-name descname"><span class="pre">Driver</span></span><a class="headerlink" href="#typedb.api.connection.driver.Driver">¶</a></dt>
<dd><p>Bases: <code class="xref py py-class docutils literal notranslate"><span class="pre">ABC</span></code>, <code class="xref py py-class docutils literal notranslate"><span class="pre">Closeable</span></code></p>
<p>A connection to a <em>TypeDB</em> server. See <a class="reference internal" href="typedb.api.connection.session.html#typedb.api.connection.session.Session.close"><code class="xref py py-meth docutils literal notranslate"><span class="pre">close()</span></code></a>.</p>
<section id="examples"><h3>Examples</h3>
<div class="highlight-python notranslate"><div class="highlight"><pre><span></span><span class="n">driver</span> <span class="o">=</span> <span class="n">TypeDB</span><span class="o">.</span><span class="n">core_driver</span><span class="p">()</span>
</pre></div></div></section>
<dl class="py method">
<dt class="sig sig-object py" id="typedb.api.connection.driver.Driver.open">
<span class="sig-name descname"><span class="pre">open</span></span><span class="sig-paren">(</span><em class="sig-param"><span class="n"><span class="pre">address</span></span><span class="p"><span class="pre">:</span></span><span class="w"> </span><span class="n"><span class="pre">str</span></span></em>, <em class="sig-param"><span class="n"><span class="pre">timeout</span></span><span class="p"><span class="pre">:</span></span><span class="w"> </span><span class="n"><span class="pre">int</span></span><span class="w"> </span><span class="o"><span class="pre">=</span></span><span class="w"> </span><span class="default_value"><span class="pre">30</span></span></em><span class="sig-paren">)</span> <span class="sig-return"><span class="sig-return-icon">&#x2192;</span> <span class="sig-return-typehint"><span class="pre">Session</span></span></span><a class="headerlink" href="#typedb.api.connection.driver.Driver.open">¶</a></dt>
<dd><p>Opens a session.</p>
<dl class="field-list simple">
<dt class="field-odd">Parameters<span class="colon">:</span></dt>
<dd class="field-odd"><ul class="simple">
<li><p><strong>address</strong> – The server address</p></li>
<li><p><strong>timeout</strong> – Seconds to wait</p></li>
</ul></dd>
<dt class="field-even">Returns<span class="colon">:</span></dt>
<dd class="field-even"><p>A new session</p></dd>
</dl>
<section id="id1"><h3>Examples</h3>
<div class="highlight-python notranslate"><div class="highlight"><pre><span class="n">driver</span><span class="o">.</span><span class="n">open</span><span class="p">(</span><span class="s2">&quot;localhost:1729&quot;</span><span class="p">)</span>
</pre></div></div></section>
</dd></dl>
<dl class="py property">
<dt class="sig sig-object py" id="typedb.api.connection.driver.Driver.is_open">
<em class="property"><span class="pre">property</span><span class="w"> </span></em><span class="sig-name descname"><span class="pre">is_open</span></span><em class="property"><span class="p"><span class="pre">:</span></span><span class="w"> </span><span class="pre">bool</span></em></dt>
<dd><p>Whether the driver is open.</p></dd></dl>
<dl class="py property">
<dt class="sig sig-object py" id="typedb.api.connection.driver.Driver.native_object">
<em class="property"><span class="pre">property</span><span class="w"> </span></em><span class="sig-name descname"><span class="pre">native_object</span></span></dt>
<dd></dd></dl>
</dd></dl>
<dl class="py class">
<dt class="sig sig-object py" id="typedb.api.connection.driver.TransactionType">
<em class="property"><span class="pre">class</span><span class="w"> </span></em><span class="sig-name descname"><span class="pre">TransactionType</span></span></dt>
<dd><p>Bases: <code class="xref py py-class docutils literal notranslate"><span class="pre">Enum</span></code></p>
<p>Transaction kind.</p>
<dl class="py attribute">
<dt class="sig sig-object py" id="typedb.api.connection.driver.TransactionType.READ">
<span class="sig-name descname"><span class="pre">READ</span></span><em class="property"><span class="w"> </span><span class="p"><span class="pre">=</span></span><span class="w"> </span><span class="pre">0</span></em></dt>
<dd></dd></dl>
<dl class="py attribute">
<dt class="sig sig-object py" id="typedb.api.connection.driver.TransactionType.WRITE">
<span class="sig-name descname"><span class="pre">WRITE</span></span><em class="property"><span class="w"> </span><span class="p"><span class="pre">=</span></span><span class="w"> </span><span class="pre">1</span></em></dt>
<dd></dd></dl>
</dd></dl>
</section></body></html>"##;

    fn parse(html: &str) -> Result<Vec<Class>> {
        let page = Page::new(
            Path::new("python/typedb.api.connection.driver.html"),
            html,
            "default",
        );
        parse_page(&SphinxAdapter::new(&[]), &page)
    }

    #[test]
    fn accepts_marked_module_pages() {
        let adapter = SphinxAdapter::new(&[]);
        assert!(adapter.accepts(Path::new("out/typedb.api.connection.driver.html")));
        assert!(adapter.accepts(Path::new("out/typedb.common.exception.html")));
        assert!(!adapter.accepts(Path::new("out/genindex.html")));
        assert!(!adapter.accepts(Path::new("out/typedb.api.connection.driver.txt")));
    }

    #[test]
    fn custom_markers() {
        let adapter = SphinxAdapter::new(&["driver".to_string()]);
        assert!(adapter.accepts(Path::new("out/typedb.driver.html")));
        assert!(!adapter.accepts(Path::new("out/typedb.api.html")));
    }

    #[test]
    fn classes_and_enums_on_one_page() {
        let classes = parse(MODULE_PAGE).unwrap();
        let kinds: Vec<_> = classes.iter().map(|c| (c.name.as_str(), c.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("Driver", SymbolKind::Class),
                ("TransactionType", SymbolKind::Enum)
            ]
        );
    }

    #[test]
    fn class_header() {
        let classes = parse(MODULE_PAGE).unwrap();
        let driver = &classes[0];
        assert_eq!(driver.anchor, "driver");
        assert_eq!(
            driver.super_classes.iter().collect::<Vec<_>>(),
            vec!["Closeable"]
        );
        assert_eq!(
            driver.description,
            vec!["A connection to a _TypeDB_ server. See <<#_session_close,`close()`>>.".to_string()]
        );
        assert_eq!(driver.examples, vec!["driver = TypeDB.core_driver()".to_string()]);
    }

    #[test]
    fn method_with_defaults() {
        let classes = parse(MODULE_PAGE).unwrap();
        let open = &classes[0].methods[0];
        assert_eq!(open.name, "open");
        assert_eq!(open.anchor, "driver_open");
        assert_eq!(open.signature, "open(address: str, timeout: int = 30) -> Session");
        assert_eq!(open.return_type.as_deref(), Some("Session"));
        assert_eq!(open.return_description.as_deref(), Some("A new session"));
        assert_eq!(open.description, vec!["Opens a session.".to_string()]);
        assert_eq!(open.examples, vec!["driver.open(\"localhost:1729\")".to_string()]);

        let timeout = &open.args[1];
        assert_eq!(timeout.name, "timeout");
        assert_eq!(timeout.ty.as_deref(), Some("int"));
        assert_eq!(timeout.default_value.as_deref(), Some("30"));
        assert_eq!(timeout.description.as_deref(), Some("Seconds to wait"));
    }

    #[test]
    fn properties_skip_native_handle() {
        let classes = parse(MODULE_PAGE).unwrap();
        let fields = &classes[0].fields;
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "is_open");
        assert_eq!(fields[0].ty.as_deref(), Some("bool"));
        assert_eq!(fields[0].anchor.as_deref(), Some("driver_is_open"));
    }

    #[test]
    fn enum_members() {
        let classes = parse(MODULE_PAGE).unwrap();
        let kind = &classes[1];
        assert!(kind.super_classes.is_empty());
        let members: Vec<_> = kind
            .enum_constants
            .iter()
            .map(|c| (c.name.as_str(), c.value.as_deref()))
            .collect();
        assert_eq!(members, vec![("READ", Some("0")), ("WRITE", Some("1"))]);
    }

    #[test]
    fn class_without_details_paragraph_is_structural() {
        let html = r#"<html><body><dl class="py class"><dt class="sig sig-object py"><span class="sig-name">X</span></dt><dd></dd></dl></body></html>"#;
        let err = parse(html).unwrap_err();
        assert!(matches!(err, DocError::StructuralMismatch { ref selector, .. } if selector == "dt.sig-object + dd > p"));
    }
}
