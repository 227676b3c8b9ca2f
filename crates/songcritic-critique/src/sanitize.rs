//! HTML sanitization boundary.
//!
//! Every piece of text that originates from the remote service passes
//! through here before it reaches a display surface.

/// Tags and attributes allowed on top of the sanitizer's defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowList {
    pub tags: &'static [&'static str],
    pub attributes: &'static [&'static str],
}

impl AllowList {
    pub const NONE: AllowList = AllowList {
        tags: &[],
        attributes: &[],
    };

    /// Extras needed by the critique document markup
    pub const DOCUMENT: AllowList = AllowList {
        tags: &["section"],
        attributes: &["class"],
    };
}

/// Sanitize an HTML fragment, keeping the default safe tag set plus `extra`
pub fn clean(html: &str, extra: &AllowList) -> String {
    let tags = extra.tags;
    let attributes = extra.attributes;

    let mut builder = ammonia::Builder::default();
    builder.add_tags(tags.iter()).add_generic_attributes(attributes.iter());
    builder.clean(html).to_string()
}

/// Sanitize a single value that will be interpolated into markup.
/// No tags survive; text is entity-escaped.
pub fn clean_field(text: &str) -> String {
    ammonia::Builder::empty().clean(text).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_scripts_and_handlers() {
        let out = clean(
            r#"<p onclick="steal()">verse<script>alert(1)</script></p>"#,
            &AllowList::NONE,
        );
        assert_eq!(out, "<p>verse</p>");
    }

    #[test]
    fn test_document_allow_list_keeps_sections_and_classes() {
        let html = r#"<section class="lyrical-analysis"><h2>Lyrical Analysis</h2></section>"#;
        assert_eq!(clean(html, &AllowList::DOCUMENT), html);

        let stripped = clean(html, &AllowList::NONE);
        assert!(!stripped.contains("class="));
        assert!(stripped.contains("<h2>Lyrical Analysis</h2>"));
    }

    #[test]
    fn test_clean_field_removes_all_tags() {
        assert_eq!(clean_field("Theme and Concept"), "Theme and Concept");
        assert_eq!(clean_field("<b>R&B</b> Hooks"), "R&amp;B Hooks");
        assert_eq!(clean_field("<img src=x onerror=alert(1)>Voice"), "Voice");
    }
}
