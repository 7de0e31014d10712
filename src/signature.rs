//! Parameter and return-type extraction from rendered call signatures.
//!
//! The parameter list runs from the first `(` to its matching `)`. Parameters
//! are separated by a comma followed by whitespace. That split does not track
//! generic or bracket depth: `map: HashMap<K, V>` is cut into `map: HashMap<K`
//! and `V>`. Generators that print generic arguments without a space after the
//! comma (Javadoc) are unaffected. Output compatibility depends on this exact
//! grammar, so it is kept as is.

use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

static RE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s").unwrap());

static RE_TYPE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":\s").unwrap());

/// How one parameter segment is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    /// `name: Type` (rust, python)
    NameColonType,
    /// `Type name` (java)
    TypeSpaceName,
}

/// Ecosystem signature grammar.
#[derive(Debug, Clone, Copy)]
pub struct Grammar {
    pub style: ParamStyle,
    /// Whether `= value` after a parameter is a default value
    pub defaults: bool,
    /// Delimiter preceding the return type, if the signature carries one
    pub returns: Option<&'static str>,
}

impl Grammar {
    pub const RUST: Grammar = Grammar {
        style: ParamStyle::NameColonType,
        defaults: false,
        returns: Some(" -> "),
    };

    pub const PYTHON: Grammar = Grammar {
        style: ParamStyle::NameColonType,
        defaults: true,
        returns: Some("->"),
    };

    pub const JAVA: Grammar = Grammar {
        style: ParamStyle::TypeSpaceName,
        defaults: false,
        returns: None,
    };
}

/// Declared type and default of one parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Param {
    pub ty: Option<String>,
    pub default: Option<String>,
}

/// Parameters in declaration order, keyed by name.
pub type Params = IndexMap<String, Param>;

/// Extract the ordered parameter map from a signature.
pub fn parse_parameters(signature: &str, grammar: Grammar) -> Params {
    let Some(list) = parameter_list(signature) else {
        return Params::new();
    };

    RE_SEPARATOR
        .split(list)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| parse_segment(segment, grammar))
        .collect()
}

/// Text after the last returns delimiter, ignoring a `where` clause that starts
/// on its own line.
pub fn return_type(signature: &str, grammar: Grammar) -> Option<String> {
    let delimiter = grammar.returns?;
    let head = match signature.find("\nwhere") {
        Some(pos) => &signature[..pos],
        None => signature,
    };
    let (_, after) = head.rsplit_once(delimiter)?;
    let ty = after.trim();
    (!ty.is_empty()).then(|| ty.to_string())
}

/// Slice between the first `(` and the `)` that closes it.
fn parameter_list(signature: &str) -> Option<&str> {
    let open = signature.find('(')?;
    let mut depth = 0usize;
    for (i, c) in signature[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&signature[open + 1..open + i]);
                }
            }
            _ => {}
        }
    }
    // Unbalanced: fall back to the last closing paren
    let close = signature.rfind(')').filter(|&c| c > open)?;
    Some(&signature[open + 1..close])
}

fn parse_segment(segment: &str, grammar: Grammar) -> (String, Param) {
    let (decl, default) = if grammar.defaults {
        match segment.split_once('=') {
            Some((decl, value)) => (decl.trim(), Some(value.trim().to_string())),
            None => (segment, None),
        }
    } else {
        (segment, None)
    };

    let (name, ty) = match grammar.style {
        ParamStyle::NameColonType => match RE_TYPE_SEPARATOR.splitn(decl, 2).collect::<Vec<_>>()[..] {
            [name, ty] => (name.trim(), Some(ty.trim())),
            _ => (decl.trim(), None),
        },
        ParamStyle::TypeSpaceName => match decl.rsplit_once(char::is_whitespace) {
            Some((ty, name)) => (name.trim(), Some(ty.trim())),
            None => (decl.trim(), None),
        },
    };

    (
        name.to_string(),
        Param {
            ty: ty.filter(|t| !t.is_empty()).map(str::to_string),
            default,
        },
    )
}
