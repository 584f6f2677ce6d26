//! HTML markup helpers shared by engines and the document driver.

/// HTML output format for highlighted chunks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MarkupFormat {
    /// Class-based spans named after the grammar scopes (default).
    ///
    /// # Example
    /// ```html
    /// <span class="source js"><span class="storage type js">var</span> x</span>
    /// ```
    #[default]
    ClassNames,

    /// Class-based spans with every class prefixed.
    ///
    /// # Example
    /// ```html
    /// <!-- With prefix "hl-" -->
    /// <span class="hl-source hl-js"><span class="hl-storage hl-type hl-js">var</span> x</span>
    /// ```
    ClassNamesWithPrefix(String),

    /// Inline `style` attributes resolved from the named theme.
    InlineStyles(String),
}

/// Escape text for inclusion in HTML.
pub fn html_escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

/// Build the `class` attribute value for a dotted scope name such as
/// `comment.block.js`, one class per atom.
pub fn scope_classes(scope: &str, prefix: Option<&str>) -> String {
    let mut classes = String::with_capacity(scope.len() + 8);
    for (i, atom) in scope.split('.').filter(|atom| !atom.is_empty()).enumerate() {
        if i > 0 {
            classes.push(' ');
        }
        if let Some(prefix) = prefix {
            classes.push_str(prefix);
        }
        classes.push_str(atom);
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn test_scope_classes() {
        assert_eq!(scope_classes("comment.block.js", None), "comment block js");
        assert_eq!(scope_classes("source.css", Some("hl-")), "hl-source hl-css");
        assert_eq!(scope_classes("text", None), "text");
    }

    #[test]
    fn test_default_format() {
        assert_eq!(MarkupFormat::default(), MarkupFormat::ClassNames);
    }
}
