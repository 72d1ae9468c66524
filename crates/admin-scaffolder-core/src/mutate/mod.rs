//! Source-to-source mutation of generated project files
//!
//! A mutation parses the file with tree-sitter, locates one target node by shape
//! (first match in pre-order), and splices a newly built node into the original
//! text. The result is re-parsed before it is returned, so callers never receive
//! output that no longer parses. Code outside the spliced ranges is untouched.
//!
//! Recognised shapes:
//! - an array literal of route objects
//! - top-level `export * from` statements
//! - an `export interface` with typed properties
//! - an import declaration with a named specifier list

pub mod build;
pub mod edit;
pub mod matcher;
pub mod tree;

use crate::naming::capitalize_first;
use build::{Literal, Style};
use edit::{Edit, EmptyLayout};
use matcher::MatchTarget;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tree::{Dialect, SyntaxTree};

/// Module the model registry imports state types from
pub const TYPE_IMPORT_SOURCE: &str = "../type";

/// Interface in the model registry that lists every store's state
pub const CONNECT_STATE_INTERFACE: &str = "ConnectState";

/// Position and message of a syntax problem (1-based line and column)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("failed to parse source at {0}")]
    Parse(Diagnostic),

    #[error("no {0} found")]
    TargetNotFound(String),

    #[error("mutated source no longer parses at {0}")]
    Serialization(Diagnostic),
}

impl MutationError {
    fn not_found(target: &MatchTarget<'_>) -> Self {
        MutationError::TargetNotFound(target.to_string())
    }
}

/// Layout options of a route entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutFlags {
    pub hide_nav: bool,
}

impl Default for LayoutFlags {
    fn default() -> Self {
        Self { hide_nav: true }
    }
}

/// Route descriptor appended to the route table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Path without the leading slash
    pub path_segment: String,
    /// Human readable route label
    pub route_name: String,
    pub component_path: String,
    pub layout: LayoutFlags,
}

impl RouteEntry {
    /// Route for `page` living in `project`, with the component under `component_prefix`
    pub fn for_page(page: &str, route_name: &str, project: &str, component_prefix: &str) -> Self {
        Self {
            path_segment: page.to_string(),
            route_name: route_name.to_string(),
            component_path: format!(
                "{}/{}/{}",
                component_prefix.trim_end_matches('/'),
                project,
                page
            ),
            layout: LayoutFlags::default(),
        }
    }

    fn to_literal(&self) -> Literal {
        Literal::object([
            (
                "path",
                Literal::Str(format!("/{}", self.path_segment.trim_start_matches('/'))),
            ),
            ("exact", Literal::Bool(true)),
            ("name", Literal::Str(self.route_name.clone())),
            ("component", Literal::Str(self.component_path.clone())),
            (
                "layout",
                Literal::object([("hideNav", Literal::Bool(self.layout.hide_nav))]),
            ),
        ])
    }
}

/// Registration of a model's state type in the model registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelBinding {
    /// Imported type, e.g. `OrderListState`
    pub state_type_name: String,
    /// Property added to the registry interface, e.g. `orderListStore`
    pub store_namespace: String,
}

impl ModelBinding {
    pub fn for_model(name: &str) -> Self {
        Self {
            state_type_name: format!("{}State", capitalize_first(name)),
            store_namespace: format!("{}Store", name),
        }
    }
}

/// One structural edit to apply to a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRequest {
    AddRouteEntry(RouteEntry),
    AddTypeExport { module_name: String },
    AddModelBinding(ModelBinding),
    ReplaceComponentPath { new_path: String },
}

impl MutationRequest {
    /// Short description for progress messages
    pub fn describe(&self) -> String {
        match self {
            MutationRequest::AddRouteEntry(route) => {
                format!("add route /{}", route.path_segment.trim_start_matches('/'))
            }
            MutationRequest::AddTypeExport { module_name } => {
                format!("export types from ./{}", module_name)
            }
            MutationRequest::AddModelBinding(binding) => {
                format!("register {}", binding.store_namespace)
            }
            MutationRequest::ReplaceComponentPath { new_path } => {
                format!("point component at {}", new_path)
            }
        }
    }
}

/// Applies mutation requests to source text. Holds no state between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceMutator {
    dialect: Dialect,
}

impl SourceMutator {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Mutator for the dialect implied by `path`
    pub fn for_path(path: &Path) -> Self {
        Self::new(Dialect::from_path(path))
    }

    /// Parse `source`, apply `request`, and return the new text
    pub fn mutate(&self, source: &str, request: &MutationRequest) -> Result<String, MutationError> {
        let tree = SyntaxTree::parse(source, self.dialect)?;
        let style = Style::detect(&tree);

        let edits = match request {
            MutationRequest::AddRouteEntry(route) => add_route_entry(&tree, &style, route)?,
            MutationRequest::AddTypeExport { module_name } => {
                add_type_export(&tree, &style, module_name)?
            }
            MutationRequest::AddModelBinding(binding) => {
                add_model_binding(&tree, &style, binding)?
            }
            MutationRequest::ReplaceComponentPath { new_path } => {
                replace_component_path(&tree, &style, new_path)?
            }
        };

        self.serialize(&tree, &edits)
    }

    /// Splice `edits` into the tree's text and check the result still parses
    fn serialize(&self, tree: &SyntaxTree, edits: &[Edit]) -> Result<String, MutationError> {
        let output = edit::apply(tree.source(), edits);
        tree::validate(&output, self.dialect).map_err(MutationError::Serialization)?;
        Ok(output)
    }
}

/// Convenience wrapper for a TypeScript source file
pub fn mutate(source: &str, request: &MutationRequest) -> Result<String, MutationError> {
    SourceMutator::default().mutate(source, request)
}

fn add_route_entry(
    tree: &SyntaxTree,
    style: &Style,
    route: &RouteEntry,
) -> Result<Vec<Edit>, MutationError> {
    let target = MatchTarget::FirstArrayLiteral;
    let array = tree
        .find_first(&target)
        .ok_or_else(|| MutationError::not_found(&target))?;

    let literal = route.to_literal();
    let members = tree.members(array);
    let edit = edit::append_to_comma_list(
        tree.source(),
        array,
        &members,
        style,
        EmptyLayout::Block,
        |indent| literal.render(style, indent),
    );
    Ok(vec![edit])
}

fn add_type_export(
    tree: &SyntaxTree,
    style: &Style,
    module_name: &str,
) -> Result<Vec<Edit>, MutationError> {
    let target = MatchTarget::Program;
    let program = tree
        .find_first(&target)
        .ok_or_else(|| MutationError::not_found(&target))?;

    let source = tree.source();
    let end = program.end_byte().max(source.len());
    let separator = if source.is_empty() || source.ends_with('\n') {
        ""
    } else {
        style.newline
    };
    let statement = format!(
        "{}export * from {};{}",
        separator,
        style.quote(&format!("./{}", module_name)),
        style.newline
    );
    Ok(vec![Edit::insert(end, statement)])
}

fn add_model_binding(
    tree: &SyntaxTree,
    style: &Style,
    binding: &ModelBinding,
) -> Result<Vec<Edit>, MutationError> {
    let source = tree.source();

    // (a) named specifier on the import from ../type
    let import_target = MatchTarget::ImportFrom(TYPE_IMPORT_SOURCE);
    let import = tree
        .find_first(&import_target)
        .ok_or_else(|| MutationError::not_found(&import_target))?;
    let import_edit = add_import_specifier(tree, style, import, &binding.state_type_name)
        .ok_or_else(|| {
            MutationError::TargetNotFound(format!(
                "named import list on {}",
                import_target
            ))
        })?;

    // (b) property on the registry interface
    let interface_target = MatchTarget::ExportedInterface(CONNECT_STATE_INTERFACE);
    let body = tree
        .find_first(&interface_target)
        .and_then(|export| export.child_by_field_name("declaration"))
        .and_then(|decl| decl.child_by_field_name("body"))
        .ok_or_else(|| MutationError::not_found(&interface_target))?;
    let members = tree.members(body);
    let property = format!("{}: {}", binding.store_namespace, binding.state_type_name);
    let property_edit =
        edit::append_to_member_list(source, body, &members, style, &property);

    Ok(vec![import_edit, property_edit])
}

/// Edit adding `name` to the import's named specifiers. `None` for namespace and
/// side-effect imports, which cannot take named specifiers.
fn add_import_specifier(
    tree: &SyntaxTree,
    style: &Style,
    import: tree_sitter::Node<'_>,
    name: &str,
) -> Option<Edit> {
    let mut cursor = import.walk();
    let clause = import
        .children(&mut cursor)
        .find(|child| child.kind() == "import_clause")?;

    let mut cursor = clause.walk();
    let parts: Vec<_> = clause.named_children(&mut cursor).collect();

    if let Some(named) = parts.iter().find(|p| p.kind() == "named_imports") {
        let specifiers: Vec<_> = tree
            .members(*named)
            .into_iter()
            .filter(|s| s.kind() == "import_specifier")
            .collect();
        return Some(edit::append_to_comma_list(
            tree.source(),
            *named,
            &specifiers,
            style,
            EmptyLayout::Inline,
            |_| name.to_string(),
        ));
    }

    if parts.iter().any(|p| p.kind() == "namespace_import") {
        return None;
    }

    // default import only: `import Foo from` becomes `import Foo, { Name } from`
    let default = parts.iter().find(|p| p.kind() == "identifier")?;
    Some(Edit::insert(default.end_byte(), format!(", {{ {} }}", name)))
}

fn replace_component_path(
    tree: &SyntaxTree,
    style: &Style,
    new_path: &str,
) -> Result<Vec<Edit>, MutationError> {
    let target = MatchTarget::StringProperty("component");
    let value = tree
        .find_first(&target)
        .and_then(|pair| pair.child_by_field_name("value"))
        .ok_or_else(|| MutationError::not_found(&target))?;

    // keep the quote the existing literal was written with
    let quote = tree.text(value).chars().next().unwrap_or(style.quote);
    Ok(vec![Edit::replace(value, build::quote_with(new_path, quote))])
}
