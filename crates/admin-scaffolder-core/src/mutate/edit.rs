//! Text edits against the original source and the list-append policies that produce them

use super::build::Style;
use tree_sitter::Node;

/// Replacement of `start..end` in the original text. Inserts have `start == end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Edit {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            text: text.into(),
        }
    }

    pub fn replace(node: Node<'_>, text: impl Into<String>) -> Self {
        Self {
            start: node.start_byte(),
            end: node.end_byte(),
            text: text.into(),
        }
    }
}

/// Apply non-overlapping edits, back to front so earlier offsets stay valid
pub fn apply(source: &str, edits: &[Edit]) -> String {
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));

    let mut out = source.to_string();
    for edit in ordered {
        out.replace_range(edit.start..edit.end, &edit.text);
    }
    out
}

/// Leading whitespace of the line containing `offset`
pub fn line_indent(source: &str, offset: usize) -> &str {
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &source[line_start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

/// Position and character of a `,` or `;` that follows `offset` after whitespace
fn separator_after(source: &str, offset: usize) -> Option<(usize, char)> {
    let rest = &source[offset..];
    let skipped = rest.len() - rest.trim_start().len();
    match rest[skipped..].chars().next() {
        Some(c @ (',' | ';')) => Some((offset + skipped, c)),
        _ => None,
    }
}

fn same_line(source: &str, a: usize, b: usize) -> bool {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    !source[lo..hi].contains('\n')
}

/// End of a comment that trails `node` on its own line, after an optional separator.
///
/// The end excludes a `\r` the comment token may have swallowed.
fn trailing_comment_end(source: &str, node: Node<'_>) -> Option<usize> {
    let mut next = node.next_sibling();
    while let Some(sibling) = next {
        match sibling.kind() {
            "," | ";" => next = sibling.next_sibling(),
            "comment" if same_line(source, node.end_byte(), sibling.start_byte()) => {
                return Some(source[..sibling.end_byte()].trim_end_matches('\r').len());
            }
            _ => return None,
        }
    }
    None
}

/// How an element goes into a container that has no elements yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyLayout {
    /// `[]` becomes a multi-line block with the element on its own line
    Block,
    /// `{}` becomes `{ element }`
    Inline,
}

/// Append an element to a comma separated list such as `[...]` or `{ ... }` of an import.
///
/// `render` receives the indentation the element will sit at. A trailing comma after
/// the current last element is kept after the new one, and a comment trailing the
/// last element stays on its line.
pub fn append_to_comma_list(
    source: &str,
    container: Node<'_>,
    members: &[Node<'_>],
    style: &Style,
    empty: EmptyLayout,
    render: impl Fn(&str) -> String,
) -> Edit {
    let open = container.start_byte();
    let close = container.end_byte() - 1;

    let Some(last) = members.last() else {
        return fill_empty(source, open, close, style, empty, render);
    };

    let nl = style.newline;
    let inline = same_line(source, open, last.start_byte());
    let indent = if inline {
        line_indent(source, open).to_string()
    } else {
        line_indent(source, last.start_byte()).to_string()
    };
    let element = render(&indent);

    if inline {
        return match separator_after(source, last.end_byte()) {
            Some((comma, ',')) => Edit::insert(comma + 1, format!(" {},", element)),
            _ => Edit::insert(last.end_byte(), format!(", {}", element)),
        };
    }

    let comment_end = trailing_comment_end(source, *last);
    match (separator_after(source, last.end_byte()), comment_end) {
        (Some((_, ',')), Some(end)) => Edit::insert(end, format!("{}{}{},", nl, indent, element)),
        (Some((comma, ',')), None) => {
            Edit::insert(comma + 1, format!("{}{}{},", nl, indent, element))
        }
        // `{ ... } // note` without a comma: the comma goes before the comment
        (_, Some(end)) => Edit {
            start: last.end_byte(),
            end,
            text: format!(
                ",{}{}{}{}",
                &source[last.end_byte()..end],
                nl,
                indent,
                element
            ),
        },
        (_, None) => Edit::insert(last.end_byte(), format!(",{}{}{}", nl, indent, element)),
    }
}

/// Append a member to a `{ ... }` body whose members end in `;` or `,` (interface bodies)
pub fn append_to_member_list(
    source: &str,
    container: Node<'_>,
    members: &[Node<'_>],
    style: &Style,
    member: &str,
) -> Edit {
    let open = container.start_byte();
    let close = container.end_byte() - 1;

    let Some(last) = members.last() else {
        return fill_empty(source, open, close, style, EmptyLayout::Block, |_| {
            format!("{};", member)
        });
    };

    let nl = style.newline;
    let inline = same_line(source, open, last.start_byte());
    let last_text = &source[last.byte_range()];

    let (at, separator) = match separator_after(source, last.end_byte()) {
        Some((pos, c)) => (pos + 1, c),
        None if last_text.ends_with([';', ',']) => {
            (last.end_byte(), last_text.chars().last().unwrap_or(';'))
        }
        // no separator after the last member; give it one so the new member parses apart
        None => {
            let indent = line_indent(source, last.start_byte());
            return match (inline, trailing_comment_end(source, *last)) {
                (true, _) => Edit::insert(last.end_byte(), format!("; {};", member)),
                (false, Some(end)) => Edit {
                    start: last.end_byte(),
                    end,
                    text: format!(
                        ";{}{}{}{};",
                        &source[last.end_byte()..end],
                        nl,
                        indent,
                        member
                    ),
                },
                (false, None) => {
                    Edit::insert(last.end_byte(), format!(";{}{}{};", nl, indent, member))
                }
            };
        }
    };

    if inline {
        Edit::insert(at, format!(" {}{}", member, separator))
    } else {
        let at = trailing_comment_end(source, *last).unwrap_or(at);
        let indent = line_indent(source, last.start_byte());
        Edit::insert(at, format!("{}{}{}{}", nl, indent, member, separator))
    }
}

fn fill_empty(
    source: &str,
    open: usize,
    close: usize,
    style: &Style,
    layout: EmptyLayout,
    render: impl Fn(&str) -> String,
) -> Edit {
    let nl = style.newline;
    let base = line_indent(source, open);
    let inner = &source[open + 1..close];
    // a line comment inside would swallow an inline element
    let layout = if inner.contains('\n') {
        EmptyLayout::Block
    } else {
        layout
    };
    let text = match layout {
        EmptyLayout::Block => {
            let indent = format!("{}{}", base, style.indent_unit);
            format!("{}{}{}{}{}", nl, indent, render(&indent), nl, base)
        }
        EmptyLayout::Inline => format!(" {} ", render(base)),
    };

    let kept = inner.trim_end();
    if kept.trim_start().is_empty() {
        Edit {
            start: open + 1,
            end: close,
            text,
        }
    } else {
        // only comments inside; keep them and replace the whitespace before the bracket
        Edit {
            start: open + 1 + kept.len(),
            end: close,
            text,
        }
    }
}
