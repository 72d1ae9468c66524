//! Construction and rendering of new nodes in the host file's style

use super::matcher::string_value;
use super::tree::SyntaxTree;

/// Quote, indentation and line ending conventions of the file being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub quote: char,
    pub indent_unit: String,
    /// `"\n"` or `"\r\n"`
    pub newline: &'static str,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            quote: '"',
            indent_unit: "  ".to_string(),
            newline: "\n",
        }
    }
}

impl Style {
    /// Infer the style from the first string literal, the shallowest indented line
    /// and the first line break
    pub fn detect(tree: &SyntaxTree) -> Self {
        let mut style = Style::default();

        if let Some(pos) = tree.source().find('\n') {
            if tree.source()[..pos].ends_with('\r') {
                style.newline = "\r\n";
            }
        }

        if let Some(quote) = first_string_quote(tree) {
            style.quote = quote;
        }

        let mut narrowest: Option<usize> = None;
        for line in tree.source().lines() {
            let trimmed = line.trim_start_matches([' ', '\t']);
            // blank lines and block comment continuations say nothing about indentation
            if trimmed.is_empty() || trimmed.starts_with('*') || trimmed.len() == line.len() {
                continue;
            }
            if line.starts_with('\t') {
                style.indent_unit = "\t".to_string();
                return style;
            }
            let width = line.len() - trimmed.len();
            narrowest = Some(narrowest.map_or(width, |w| w.min(width)));
        }
        if let Some(width) = narrowest.filter(|w| (2..=8).contains(w)) {
            style.indent_unit = " ".repeat(width);
        }
        style
    }

    /// Quote `value` as a string literal, escaping what the quote character requires
    pub fn quote(&self, value: &str) -> String {
        quote_with(value, self.quote)
    }
}

fn first_string_quote(tree: &SyntaxTree) -> Option<char> {
    let mut stack = vec![tree.root()];
    while let Some(node) = stack.pop() {
        if node.kind() == "string" && string_value(node, tree.source()).is_some() {
            return tree.text(node).chars().next();
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        // reversed so the leftmost child is visited first
        stack.extend(children.into_iter().rev());
    }
    None
}

pub(crate) fn quote_with(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// A literal expression built for insertion
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Bool(bool),
    /// Object literal; keys are emitted as bare identifiers in the given order
    Object(Vec<(String, Literal)>),
}

impl Literal {
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Literal)>) -> Self {
        Literal::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Render with the closing brace at `indent`; nested lines get one more indent unit
    pub fn render(&self, style: &Style, indent: &str) -> String {
        match self {
            Literal::Str(value) => style.quote(value),
            Literal::Bool(value) => value.to_string(),
            Literal::Object(fields) if fields.is_empty() => "{}".to_string(),
            Literal::Object(fields) => {
                let inner = format!("{}{}", indent, style.indent_unit);
                let body: Vec<String> = fields
                    .iter()
                    .map(|(key, value)| {
                        format!("{}{}: {}", inner, key, value.render(style, &inner))
                    })
                    .collect();
                let nl = style.newline;
                format!(
                    "{{{}{}{}{}}}",
                    nl,
                    body.join(&format!(",{}", nl)),
                    nl,
                    indent
                )
            }
        }
    }
}
