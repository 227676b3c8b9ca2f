use pulldown_cmark::{html, Event, Options, Parser};

/// Convert Markdown produced by the remote service into HTML.
///
/// Raw HTML blocks and inline HTML are emitted as escaped text, so the only
/// markup in the output is what the Markdown itself describes.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
