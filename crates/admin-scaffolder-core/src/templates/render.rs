//! Placeholder rendering for freshly created files
//!
//! Templates use `<%= key %>` tags. Every key must be supplied.

use anyhow::Result;

const OPEN: &str = "<%=";
const CLOSE: &str = "%>";

/// Replace every `<%= key %>` tag in `template` with its value from `vars`
pub fn render(template: &str, vars: &[(&str, &str)]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            let consumed = template.len() - rest.len() + start;
            let line = template[..consumed].matches('\n').count() + 1;
            anyhow::bail!("Unterminated placeholder tag on line {}", line);
        };

        let key = after_open[..end].trim();
        let value = vars
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| *value)
            .ok_or_else(|| anyhow::anyhow!("Unknown placeholder '{}' in template", key))?;
        out.push_str(value);

        rest = &after_open[end + CLOSE.len()..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_tags() {
        let rendered = render(
            "<template><div class=\"<%= name %>\"><%=fileName%></div></template>",
            &[("name", "orderList"), ("fileName", "OrderList")],
        )
        .unwrap();
        assert_eq!(
            rendered,
            "<template><div class=\"orderList\">OrderList</div></template>"
        );
    }

    #[test]
    fn test_render_without_tags_is_identity() {
        assert_eq!(render("plain <% text", &[]).unwrap(), "plain <% text");
    }

    #[test]
    fn test_unknown_key_is_error() {
        let err = render("<%= missing %>", &[("name", "x")]).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_unterminated_tag_is_error() {
        let err = render("line\n<%= name", &[("name", "x")]).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
