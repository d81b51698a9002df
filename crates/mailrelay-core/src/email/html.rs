/// Plain text to HTML conversion for the rich alternative body
use crate::constants::HTML_PARAGRAPH_STYLE;
use regex::Regex;
use std::sync::LazyLock;

static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Splits on blank lines into `<p>` blocks; single newlines become `<br>`
pub fn text_to_html(text: &str) -> String {
    let escaped = escape_html(text);
    PARAGRAPH_BREAK
        .split(&escaped)
        .map(|paragraph| {
            format!(
                "<p style=\"{}\">{}</p>",
                HTML_PARAGRAPH_STYLE,
                paragraph.replace('\n', "<br>")
            )
        })
        .collect()
}
