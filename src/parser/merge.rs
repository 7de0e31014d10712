//! Combine the classes of two build configurations into renderable records.
//!
//! The primary mode decides which symbols exist. A symbol found only in the
//! secondary mode is dropped; a symbol found only in the primary mode renders
//! exactly as it would without a second mode.

use crate::model::{Class, EnumConstant, Method, MethodEntry, RenderableClass, Tagged, Variable};
use std::collections::BTreeMap;

/// Classes parsed from one input directory.
#[derive(Debug, Clone, Default)]
pub struct ParsedMode {
    pub mode: String,
    pub classes: BTreeMap<String, Class>,
}

impl ParsedMode {
    pub fn new(mode: impl Into<String>, classes: BTreeMap<String, Class>) -> Self {
        ParsedMode {
            mode: mode.into(),
            classes,
        }
    }

    /// Every class in its single-mode form.
    pub fn into_renderable(self) -> BTreeMap<String, RenderableClass> {
        let mode = self.mode;
        self.classes
            .into_iter()
            .map(|(name, class)| (name, RenderableClass::single(class, &mode)))
            .collect()
    }
}

/// Merge `secondary` into `primary`; the result has exactly primary's keys.
pub fn merge(primary: &ParsedMode, secondary: &ParsedMode) -> BTreeMap<String, RenderableClass> {
    primary
        .classes
        .iter()
        .map(|(name, class)| {
            let record = match secondary.classes.get(name) {
                Some(other) => merge_class(class, &primary.mode, other, &secondary.mode),
                None => RenderableClass::single(class.clone(), &primary.mode),
            };
            (name.clone(), record)
        })
        .collect()
}

fn merge_class(a: &Class, mode_a: &str, b: &Class, mode_b: &str) -> RenderableClass {
    RenderableClass {
        name: a.name.clone(),
        anchor: a.anchor.clone(),
        kind: a.kind,
        description: a.description.clone(),
        examples: a.examples.clone(),
        fields: merge_members(&a.fields, mode_a, &b.fields, mode_b, |f: &Variable| &f.name),
        methods: merge_methods(&a.methods, mode_a, &b.methods, mode_b),
        enum_constants: merge_members(
            &a.enum_constants,
            mode_a,
            &b.enum_constants,
            mode_b,
            |c: &EnumConstant| &c.name,
        ),
        super_classes: a.super_classes.union(&b.super_classes).cloned().collect(),
        trait_implementors: a
            .trait_implementors
            .union(&b.trait_implementors)
            .cloned()
            .collect(),
        modes: vec![mode_a.to_string(), mode_b.to_string()],
    }
}

fn tagged_method(method: &Method, mode: &str) -> Method {
    Method {
        mode: Some(mode.to_string()),
        ..method.clone()
    }
}

fn merge_methods(a: &[Method], mode_a: &str, b: &[Method], mode_b: &str) -> Vec<MethodEntry> {
    let mut entries: Vec<MethodEntry> = a
        .iter()
        .map(|method| match b.iter().find(|m| m.anchor == method.anchor) {
            Some(other) if other.signature == method.signature => MethodEntry::single(Method {
                mode: None,
                ..method.clone()
            }),
            Some(other) => MethodEntry {
                anchor: method.anchor.clone(),
                name: method.name.clone(),
                variants: vec![tagged_method(method, mode_a), tagged_method(other, mode_b)],
            },
            None => MethodEntry::single(tagged_method(method, mode_a)),
        })
        .collect();

    entries.extend(
        b.iter()
            .filter(|m| !a.iter().any(|x| x.anchor == m.anchor))
            .map(|m| MethodEntry::single(tagged_method(m, mode_b))),
    );
    entries
}

/// Fields and enum constants match by name. Equal members are shared; any
/// other member keeps the mode it came from.
fn merge_members<T, F>(a: &[T], mode_a: &str, b: &[T], mode_b: &str, name: F) -> Vec<Tagged<T>>
where
    T: Clone + PartialEq,
    F: Fn(&T) -> &String,
{
    let tagged = |member: &T, mode: &str| Tagged {
        item: member.clone(),
        modes: vec![mode.to_string()],
    };

    let mut members: Vec<_> = a
        .iter()
        .flat_map(|member| match b.iter().find(|m| name(m) == name(member)) {
            Some(other) if other == member => vec![Tagged::shared(member.clone())],
            Some(other) => vec![tagged(member, mode_a), tagged(other, mode_b)],
            None => vec![tagged(member, mode_a)],
        })
        .collect();

    members.extend(
        b.iter()
            .filter(|m| !a.iter().any(|x| name(x) == name(m)))
            .map(|m| tagged(m, mode_b)),
    );
    members
}
