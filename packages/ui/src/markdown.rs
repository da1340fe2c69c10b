//! Markdown rendering for plant and event descriptions.

use dioxus::prelude::*;
use pulldown_cmark::{html, Event, Options, Parser};

/// Render `source` to HTML. Raw HTML in the input is shown as text.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[component]
pub fn Markdown(source: String, #[props(default = "markdown".to_string())] class: String) -> Element {
    let rendered = render_markdown(&source);
    rsx! {
        div { class: "{class}", dangerous_inner_html: "{rendered}" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_emphasis() {
        assert_eq!(render_markdown("*water* weekly"), "<p><em>water</em> weekly</p>\n");
    }

    #[test]
    fn raw_html_is_escaped() {
        let out = render_markdown("<script>alert(1)</script>");
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
    }
}
