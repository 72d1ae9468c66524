//! Parsing source text into a tree-sitter syntax tree

use super::matcher::MatchTarget;
use super::{Diagnostic, MutationError};
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// Module dialect a source file is parsed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    TypeScript,
    Tsx,
}

impl Dialect {
    /// Pick the dialect from a file extension (`.tsx`/`.jsx` need the JSX-aware grammar)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("tsx") | Some("jsx") => Dialect::Tsx,
            _ => Dialect::TypeScript,
        }
    }

    fn grammar(&self) -> tree_sitter::Language {
        match self {
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// A parsed source file. Owns its text so node byte ranges always index into it.
pub struct SyntaxTree {
    source: String,
    tree: Tree,
}

impl SyntaxTree {
    /// Parse `source`, failing with the first error or missing node the parser reports
    pub fn parse(source: &str, dialect: Dialect) -> Result<Self, MutationError> {
        let tree = parse_tree(source, dialect).map_err(MutationError::Parse)?;
        if let Some(diagnostic) = first_error(tree.root_node()) {
            return Err(MutationError::Parse(diagnostic));
        }
        Ok(Self {
            source: source.to_string(),
            tree,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Text covered by a node
    pub fn text(&self, node: Node<'_>) -> &str {
        &self.source[node.byte_range()]
    }

    /// First node in pre-order that satisfies `target`
    pub fn find_first(&self, target: &MatchTarget<'_>) -> Option<Node<'_>> {
        let mut cursor = self.tree.walk();
        loop {
            let node = cursor.node();
            if target.matches(node, &self.source) {
                return Some(node);
            }
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return None;
                }
            }
        }
    }

    /// Named children of `node`, skipping comments
    pub fn members<'t>(&self, node: Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .collect()
    }
}

/// Re-parse emitted text and report the first syntax problem in it, if any
pub fn validate(source: &str, dialect: Dialect) -> Result<(), Diagnostic> {
    let tree = parse_tree(source, dialect)?;
    match first_error(tree.root_node()) {
        Some(diagnostic) => Err(diagnostic),
        None => Ok(()),
    }
}

fn parse_tree(source: &str, dialect: Dialect) -> Result<Tree, Diagnostic> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.grammar())
        .map_err(|e| Diagnostic::new(0, 0, format!("failed to load grammar: {}", e)))?;
    parser
        .parse(source, None)
        .ok_or_else(|| Diagnostic::new(0, 0, "parser returned no tree"))
}

/// Depth-first search for the first ERROR or MISSING node
fn first_error(node: Node<'_>) -> Option<Diagnostic> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        let point = node.start_position();
        let message = if node.is_missing() {
            format!("missing `{}`", node.kind())
        } else {
            "unexpected syntax".to_string()
        };
        return Some(Diagnostic::new(point.row + 1, point.column + 1, message));
    }

    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .find_map(first_error)
        // has_error was set but no child carries it; point at the node itself
        .or_else(|| {
            let point = node.start_position();
            Some(Diagnostic::new(
                point.row + 1,
                point.column + 1,
                "unexpected syntax",
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_path() {
        assert_eq!(Dialect::from_path(Path::new("src/router/index.ts")), Dialect::TypeScript);
        assert_eq!(Dialect::from_path(Path::new("models/connect.d.ts")), Dialect::TypeScript);
        assert_eq!(Dialect::from_path(Path::new("src/App.tsx")), Dialect::Tsx);
        assert_eq!(Dialect::from_path(Path::new("Makefile")), Dialect::TypeScript);
    }

    #[test]
    fn test_parse_reports_position_of_error() {
        let err = SyntaxTree::parse("const a = [1, 2;\n", Dialect::TypeScript)
            .err()
            .expect("truncated array must not parse");
        match err {
            MutationError::Parse(d) => assert_eq!(d.line, 1),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_members_skip_comments() {
        let tree = SyntaxTree::parse("const a = [\n  // first\n  1,\n  2,\n];\n", Dialect::TypeScript)
            .expect("valid source");
        let array = tree
            .find_first(&MatchTarget::FirstArrayLiteral)
            .expect("array present");
        let members = tree.members(array);
        assert_eq!(members.len(), 2);
        assert_eq!(tree.text(members[1]), "2");
    }

    #[test]
    fn test_validate_accepts_valid_source() {
        assert!(validate("export * from './a';\n", Dialect::TypeScript).is_ok());
        assert!(validate("export * from './a'\nexport {", Dialect::TypeScript).is_err());
    }
}
