/// Appends `value` to `out` with markup-significant characters replaced by entities.
pub fn escape_into(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '`' => out.push_str("&#x60;"),
            '=' => out.push_str("&#x3D;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escape_html(value: &str) -> String {
        let mut out = String::new();
        escape_into(&mut out, value);
        out
    }

    #[test]
    fn test_escapes_script_tag() {
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_escapes_attribute_breakers() {
        assert_eq!(escape_html(r#"" onload=`x`"#), "&quot; onload&#x3D;&#x60;x&#x60;");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_html("Jane Doe, Go & Rust"), "Jane Doe, Go &amp; Rust");
        assert_eq!(escape_html("Zürich"), "Zürich");
    }
}
