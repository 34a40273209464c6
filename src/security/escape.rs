//! Escaping for text placed into generated HTML.
//!
//! Record fields are user-supplied and end up in exported documents; they
//! must not be able to open tags or break out of an inline script.

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Make serialized JSON safe to embed between `<script>` tags.
///
/// `<` only occurs inside JSON strings, where `\u003c` decodes to the same
/// character, so the data is unchanged while `</script>` can no longer
/// appear. U+2028/U+2029 are escaped for pre-ES2019 engines.
pub fn escape_json_for_script(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x")</script> & 'y'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#39;y&#39;"
        );
        assert_eq!(escape_html("Aula 101"), "Aula 101");
    }

    #[test]
    fn test_escape_json_for_script() {
        let json = serde_json::to_string(&vec!["</script><b>"]).unwrap();
        let escaped = escape_json_for_script(&json);
        assert!(!escaped.contains("</script>"));
        let back: Vec<String> = serde_json::from_str(&escaped).unwrap();
        assert_eq!(back, vec!["</script><b>"]);
    }
}
