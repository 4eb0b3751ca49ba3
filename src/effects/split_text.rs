use web_sys::Document;

use crate::dom;

const CHAR_DELAY_S: f64 = 0.05;

/// Each character with its animation delay in seconds. Spaces become
/// non-breaking so the spans keep their width.
pub fn split_chars(text: &str, step_s: f64) -> Vec<(String, f64)> {
    text.chars()
        .enumerate()
        .map(|(i, c)| {
            let shown = if c == ' ' { '\u{00A0}' } else { c };
            (shown.to_string(), i as f64 * step_s)
        })
        .collect()
}

/// Replaces the text of every `.split-text-animate` element with one span per character.
pub fn apply(document: &Document) {
    for el in dom::query_all(document, ".split-text-animate") {
        let text = el.text_content().unwrap_or_default();
        el.set_inner_html("");
        for (ch, delay) in split_chars(&text, CHAR_DELAY_S) {
            let Ok(span) = document.create_element("span") else {
                continue;
            };
            span.set_class_name("char");
            span.set_text_content(Some(&ch));
            dom::set_style(&span, "animation-delay", &format!("{}s", delay));
            let _ = el.append_child(&span);
        }
    }
}
