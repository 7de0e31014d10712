//! Intermediate document model, independent of source HTML and output markup.

use std::collections::BTreeSet;

/// What kind of top-level symbol a page declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Class,
    Trait,
    Enum,
}

/// A documented class, struct, trait, interface or enum.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: String,
    pub anchor: String,
    pub kind: SymbolKind,
    /// Normalized description paragraphs
    pub description: Vec<String>,
    /// Literal code snippets attached to the class itself
    pub examples: Vec<String>,
    pub fields: Vec<Variable>,
    pub methods: Vec<Method>,
    pub enum_constants: Vec<EnumConstant>,
    /// Parent classes or implemented traits, implicit bases filtered out
    pub super_classes: BTreeSet<String>,
    /// Types implementing this trait (traits only)
    pub trait_implementors: BTreeSet<String>,
}

impl Class {
    /// A bare record for `name`; adapters fill in the rest.
    pub fn new(name: impl Into<String>, anchor: impl Into<String>, kind: SymbolKind) -> Self {
        Class {
            name: name.into(),
            anchor: anchor.into(),
            kind,
            description: Vec::new(),
            examples: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            enum_constants: Vec::new(),
            super_classes: BTreeSet::new(),
            trait_implementors: BTreeSet::new(),
        }
    }

    /// True when there is nothing worth publishing.
    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
            && self.examples.is_empty()
            && self.fields.is_empty()
            && self.methods.is_empty()
            && self.enum_constants.is_empty()
    }
}

/// A documented callable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Method {
    pub name: String,
    /// Normalized signature text, as shown in the listing block
    pub signature: String,
    /// `<class anchor>_<member anchor>`
    pub anchor: String,
    /// Arguments documented in prose, in documentation order
    pub args: Vec<Variable>,
    pub description: Vec<String>,
    pub examples: Vec<String>,
    pub return_type: Option<String>,
    pub return_description: Option<String>,
    /// Build configuration this variant was documented under; `None` when shared
    pub mode: Option<String>,
}

/// A parameter, field or property.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variable {
    pub name: String,
    pub ty: Option<String>,
    pub default_value: Option<String>,
    pub description: Option<String>,
    pub anchor: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstant {
    pub name: String,
    pub value: Option<String>,
}

/// A member together with the modes it is documented in.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<T> {
    pub item: T,
    /// Empty when the member is shared by every mode of the owning class
    pub modes: Vec<String>,
}

impl<T> Tagged<T> {
    pub fn shared(item: T) -> Self {
        Tagged {
            item,
            modes: Vec::new(),
        }
    }
}

/// All variants of one method, grouped under a single anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodEntry {
    pub anchor: String,
    pub name: String,
    /// One variant when shared or one-sided; one per mode when signatures differ
    pub variants: Vec<Method>,
}

impl MethodEntry {
    pub fn single(method: Method) -> Self {
        MethodEntry {
            anchor: method.anchor.clone(),
            name: method.name.clone(),
            variants: vec![method],
        }
    }
}

/// Renderer input: one symbol, possibly combined across modes.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableClass {
    pub name: String,
    pub anchor: String,
    pub kind: SymbolKind,
    pub description: Vec<String>,
    pub examples: Vec<String>,
    pub fields: Vec<Tagged<Variable>>,
    pub methods: Vec<MethodEntry>,
    pub enum_constants: Vec<Tagged<EnumConstant>>,
    pub super_classes: BTreeSet<String>,
    pub trait_implementors: BTreeSet<String>,
    /// Modes this record covers, primary first
    pub modes: Vec<String>,
}

impl RenderableClass {
    /// Single-variant form: no member is tagged since only one mode exists.
    pub fn single(class: Class, mode: &str) -> Self {
        RenderableClass {
            name: class.name,
            anchor: class.anchor,
            kind: class.kind,
            description: class.description,
            examples: class.examples,
            fields: class.fields.into_iter().map(Tagged::shared).collect(),
            methods: class.methods.into_iter().map(MethodEntry::single).collect(),
            enum_constants: class.enum_constants.into_iter().map(Tagged::shared).collect(),
            super_classes: class.super_classes,
            trait_implementors: class.trait_implementors,
            modes: vec![mode.to_string()],
        }
    }

    /// True when the record was combined from more than one mode.
    pub fn is_multi_mode(&self) -> bool {
        self.modes.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_class_detected() {
        let class = Class::new("Empty", "empty", SymbolKind::Class);
        assert!(class.is_empty());
    }

    #[test]
    fn class_with_constants_not_empty() {
        let mut class = Class::new("Colour", "colour", SymbolKind::Enum);
        class.enum_constants.push(EnumConstant {
            name: "Red".to_string(),
            value: None,
        });
        assert!(!class.is_empty());
    }

    #[test]
    fn single_covers_one_mode() {
        let mut class = Class::new("Connection", "struct_connection", SymbolKind::Class);
        class.methods.push(Method {
            name: "open".to_string(),
            anchor: "struct_connection_method_open".to_string(),
            mode: Some("sync".to_string()),
            ..Default::default()
        });
        let record = RenderableClass::single(class, "sync");
        assert_eq!(record.modes, vec!["sync".to_string()]);
        assert!(!record.is_multi_mode());
        assert_eq!(record.methods[0].variants.len(), 1);
    }
}
