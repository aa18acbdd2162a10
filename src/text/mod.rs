use scraper::Html;

/// Extract plain text from HTML content, preserving word boundaries
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_fragment(html);
    let mut text = String::new();

    for node in document.root_element().descendants() {
        if let Some(text_node) = node.value().as_text() {
            text.push_str(text_node);
        }
        // Add space after block elements to preserve word boundaries
        if let Some(element) = node.value().as_element() {
            match element.name() {
                "p" | "br" | "div" | "li" => text.push(' '),
                _ => {}
            }
        }
    }

    // Collapse whitespace and trim
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate text so the result is at most `max_chars` characters,
/// breaking at a word boundary where possible
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();

    // Try to break at a word boundary
    match cut.rfind(' ') {
        Some(pos) if pos > 0 => format!("{}...", &cut[..pos]),
        _ => format!("{}...", cut),
    }
}
