//! AsciiDoc renderer.
//!
//! Section order is fixed: anchor and heading, description, examples, fields,
//! methods, enum constants, supertypes, implementors. Output depends only on
//! the record, so repeated runs produce identical files.

use crate::model::{Method, MethodEntry, RenderableClass, SymbolKind, Tagged, Variable};
use crate::render::Renderer;

pub struct AsciiDocRenderer {
    language: &'static str,
}

impl AsciiDocRenderer {
    pub fn new(language: &'static str) -> Self {
        AsciiDocRenderer { language }
    }
}

impl Renderer for AsciiDocRenderer {
    fn render(&self, class: &RenderableClass) -> String {
        assert!(!class.name.is_empty(), "class record without a name");
        assert!(!class.anchor.is_empty(), "class `{}` without an anchor", class.name);

        let mut lines: Vec<String> = Vec::new();

        lines.push(format!("[#_{}]", class.anchor));
        lines.push(format!("=== {}\n", class.name));

        for paragraph in &class.description {
            lines.push(paragraph.clone());
            lines.push(String::new());
        }

        if !class.examples.is_empty() {
            lines.push(".Examples".to_string());
            for example in &class.examples {
                self.push_listing(&mut lines, example);
            }
        }

        if !class.fields.is_empty() {
            render_fields(&mut lines, &class.fields);
        }

        for entry in &class.methods {
            self.render_method(&mut lines, entry, class.is_multi_mode());
        }

        if !class.enum_constants.is_empty() {
            push_table_header(&mut lines, "Enum constants", &["Name", "Value"]);
            for constant in &class.enum_constants {
                let value = constant.item.value.as_deref().map(code).unwrap_or_default();
                lines.push(row(&[code(&constant.item.name), with_mode_note(value, &constant.modes)]));
            }
            lines.push("|===\n".to_string());
        }

        if !class.super_classes.is_empty() {
            push_list(&mut lines, "Supertypes", class.super_classes.iter());
        }

        if class.kind == SymbolKind::Trait && !class.trait_implementors.is_empty() {
            push_list(&mut lines, "Implementors", class.trait_implementors.iter());
        }

        let mut output = lines.join("\n");
        output.truncate(output.trim_end().len());
        output.push('\n');
        output
    }

    fn file_extension(&self) -> &str {
        "adoc"
    }
}

impl AsciiDocRenderer {
    fn push_listing(&self, lines: &mut Vec<String>, body: &str) {
        lines.push(format!("[source,{}]", self.language));
        lines.push("----".to_string());
        lines.push(body.to_string());
        lines.push("----\n".to_string());
    }

    fn render_method(&self, lines: &mut Vec<String>, entry: &MethodEntry, multi_mode: bool) {
        assert!(!entry.anchor.is_empty(), "method `{}` without an anchor", entry.name);

        lines.push(format!("[#_{}]", entry.anchor));
        lines.push(format!("==== {}\n", entry.name));

        match entry.variants.as_slice() {
            [method] => {
                if let Some(mode) = method.mode.as_deref().filter(|_| multi_mode) {
                    lines.push("[NOTE]".to_string());
                    lines.push("====".to_string());
                    lines.push(format!("Only available in `{}` mode.", mode));
                    lines.push("====\n".to_string());
                }
                self.render_variant(lines, method);
            }
            variants => {
                lines.push("[tabs]".to_string());
                lines.push("====".to_string());
                for method in variants {
                    lines.push(format!("{}::", method.mode.as_deref().unwrap_or_default()));
                    lines.push("+".to_string());
                    lines.push("--".to_string());
                    let mut body = Vec::new();
                    self.render_variant(&mut body, method);
                    while body.last().is_some_and(|l: &String| l.is_empty()) {
                        body.pop();
                    }
                    if let Some(last) = body.last_mut() {
                        last.truncate(last.trim_end().len());
                    }
                    lines.extend(body);
                    lines.push("--\n".to_string());
                }
                lines.push("====\n".to_string());
            }
        }
    }

    fn render_variant(&self, lines: &mut Vec<String>, method: &Method) {
        self.push_listing(lines, &method.signature);

        for paragraph in &method.description {
            lines.push(paragraph.clone());
            lines.push(String::new());
        }

        if !method.args.is_empty() {
            push_table_header(
                lines,
                "Input parameters",
                &["Name", "Description", "Type", "Default Value"],
            );
            for arg in &method.args {
                lines.push(row(&[
                    code(&arg.name),
                    arg.description.clone().unwrap_or_default(),
                    arg.ty.as_deref().map(code).unwrap_or_default(),
                    arg.default_value.as_deref().map(code).unwrap_or_default(),
                ]));
            }
            lines.push("|===\n".to_string());
        }

        if method.return_type.is_some() || method.return_description.is_some() {
            lines.push("[caption=\"\"]".to_string());
            lines.push(".Returns".to_string());
            if let Some(ty) = &method.return_type {
                self.push_listing(lines, ty);
            }
            if let Some(description) = &method.return_description {
                lines.push(description.clone());
                lines.push(String::new());
            }
        }

        if !method.examples.is_empty() {
            lines.push("[caption=\"\"]".to_string());
            lines.push(".Code examples".to_string());
            for example in &method.examples {
                self.push_listing(lines, example);
            }
        }
    }
}

fn render_fields(lines: &mut Vec<String>, fields: &[Tagged<Variable>]) {
    push_table_header(lines, "Fields", &["Name", "Type", "Description"]);
    for field in fields {
        let description = field.item.description.clone().unwrap_or_default();
        // Inline target for links to the member (`#structfield.timeout`).
        let name = match &field.item.anchor {
            Some(anchor) => format!("[[_{}]]{}", anchor, code(&field.item.name)),
            None => code(&field.item.name),
        };
        lines.push(row(&[
            name,
            field.item.ty.as_deref().map(code).unwrap_or_default(),
            with_mode_note(description, &field.modes),
        ]));
    }
    lines.push("|===\n".to_string());
}

/// Append `_Only in `mode` mode._` to a cell when the member is one-sided.
fn with_mode_note(cell: String, modes: &[String]) -> String {
    if modes.is_empty() {
        return cell;
    }
    let modes = modes.iter().map(|m| code(m)).collect::<Vec<_>>().join(", ");
    let note = format!("_Only in {} mode._", modes);
    if cell.is_empty() {
        note
    } else {
        format!("{} {}", cell, note)
    }
}

fn push_table_header(lines: &mut Vec<String>, title: &str, columns: &[&str]) {
    lines.push("[caption=\"\"]".to_string());
    lines.push(format!(".{}", title));
    lines.push(format!("[cols=\"{}\"]", vec!["~"; columns.len()].join(",")));
    lines.push("[options=\"header\"]".to_string());
    lines.push("|===".to_string());
    lines.push(
        columns
            .iter()
            .map(|c| format!("|{}", c))
            .collect::<Vec<_>>()
            .join(" "),
    );
}

fn push_list<'a>(lines: &mut Vec<String>, title: &str, items: impl Iterator<Item = &'a String>) {
    lines.push(format!(".{}", title));
    for item in items {
        lines.push(format!("* {}", code(item)));
    }
    lines.push(String::new());
}

/// One table row of AsciiDoc cells; `|` inside a cell is escaped.
fn row(cells: &[String]) -> String {
    cells
        .iter()
        .map(|c| format!("a| {}", c.replace('|', "\\|")).trim_end().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn code(text: &str) -> String {
    format!("`{}`", text)
}
