//! Node shape predicates used to locate mutation targets

use std::fmt;
use tree_sitter::Node;

/// Predicate selecting the node a mutation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTarget<'a> {
    /// The top-level program node
    Program,
    /// The first array literal expression
    FirstArrayLiteral,
    /// An object property with identifier key `name` and a string literal value
    StringProperty(&'a str),
    /// An import declaration whose module source equals the given path
    ImportFrom(&'a str),
    /// An `export interface` declaration with the given name
    ExportedInterface(&'a str),
}

impl MatchTarget<'_> {
    pub fn matches(&self, node: Node<'_>, source: &str) -> bool {
        match *self {
            MatchTarget::Program => node.kind() == "program",
            MatchTarget::FirstArrayLiteral => node.kind() == "array",
            MatchTarget::StringProperty(name) => {
                node.kind() == "pair"
                    && node
                        .child_by_field_name("key")
                        .is_some_and(|key| {
                            key.kind() == "property_identifier" && text(key, source) == name
                        })
                    && node
                        .child_by_field_name("value")
                        .is_some_and(|value| value.kind() == "string")
            }
            MatchTarget::ImportFrom(module) => {
                node.kind() == "import_statement"
                    && node
                        .child_by_field_name("source")
                        .is_some_and(|src| string_value(src, source) == Some(module))
            }
            MatchTarget::ExportedInterface(name) => {
                node.kind() == "export_statement"
                    && node
                        .child_by_field_name("declaration")
                        .filter(|decl| decl.kind() == "interface_declaration")
                        .and_then(|decl| decl.child_by_field_name("name"))
                        .is_some_and(|id| text(id, source) == name)
            }
        }
    }
}

impl fmt::Display for MatchTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTarget::Program => write!(f, "program"),
            MatchTarget::FirstArrayLiteral => write!(f, "array literal"),
            MatchTarget::StringProperty(name) => {
                write!(f, "object property `{}` with a string value", name)
            }
            MatchTarget::ImportFrom(module) => write!(f, "import from '{}'", module),
            MatchTarget::ExportedInterface(name) => write!(f, "exported interface `{}`", name),
        }
    }
}

fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

/// Contents of a string literal node without its quotes. Escapes are not decoded.
pub(crate) fn string_value<'s>(node: Node<'_>, source: &'s str) -> Option<&'s str> {
    if node.kind() != "string" {
        return None;
    }
    let raw = text(node, source);
    if raw.len() < 2 {
        return None;
    }
    Some(&raw[1..raw.len() - 1])
}
