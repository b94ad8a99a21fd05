//! Response body classification helpers.

/// Whether a (lowercased) `Content-Type` value announces HTML or XML.
pub(super) fn is_markup_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim();
    essence.contains("html") || essence.contains("xml")
}

/// Whether a body that failed JSON parsing is a markup document.
pub(super) fn looks_like_markup(body: &str) -> bool {
    body.trim_start_matches('\u{feff}').trim_start().starts_with('<')
}

/// The first `max_chars` characters of `body`, never splitting a code point.
pub(super) fn preview(body: &str, max_chars: usize) -> &str {
    body.char_indices()
        .nth(max_chars)
        .map_or(body, |(idx, _)| &body[..idx])
}
