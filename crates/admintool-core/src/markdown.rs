//! Markdown rendering and `{{NAME}}` substitution for page descriptions.

use pulldown_cmark::{Options, Parser, html};

/// Render markdown to an HTML string (tables and strikethrough enabled).
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Replace `{{NAME}}` tokens using `lookup`.
///
/// Unknown names expand to an empty string. Names are trimmed and must consist
/// of ASCII letters, digits and `_`; anything else between braces is left
/// untouched.
pub fn expand_with<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = after[..end].trim();
        if is_var_name(name) {
            out.push_str(&lookup(name).unwrap_or_default());
        } else {
            out.push_str(&rest[start..start + 2 + end + 2]);
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn is_var_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "MERRITT_ENV" => Some("stage".to_string()),
            "HOST" => Some("uc3-admin".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_expand_known_and_unknown() {
        assert_eq!(
            expand_with("Env {{MERRITT_ENV}} on {{ HOST }}", lookup),
            "Env stage on uc3-admin"
        );
        assert_eq!(expand_with("[{{MISSING}}]", lookup), "[]");
    }

    #[test]
    fn test_expand_leaves_non_variables() {
        assert_eq!(expand_with("{{a b}} {{", lookup), "{{a b}} {{");
        assert_eq!(expand_with("no tokens", lookup), "no tokens");
        assert_eq!(expand_with("{{}}x", lookup), "{{}}x");
    }

    #[test]
    fn test_markdown_to_html() {
        let html = to_html("# Title\n\n- [Objects](/objects)\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains(r#"<a href="/objects">Objects</a>"#));
    }
}
