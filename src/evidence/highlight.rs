//! Inline HTML highlighting of evidence spans
//!
//! Walks the text one character at a time and inserts an opening tag at every
//! start offset and a closing tag at every end offset. Starts and ends are
//! membership sets, not pairs: overlapping spans can nest badly, and an end
//! offset equal to the text length never gets its closing tag.

use std::collections::HashSet;

/// Closing tag inserted at every end offset
pub const CLOSE_TAG: &str = "</span> ";

/// Opening tag inserted at every start offset
pub fn open_tag(color: &str) -> String {
    format!(
        " <span style='color:white;background-color:{}; border-radius:.25rem;padding:.2em'>",
        color
    )
}

/// Highlight `text` between the given offsets, emitting characters verbatim
///
/// With no starts and no ends the text comes back unchanged.
pub fn render(starts: &[usize], ends: &[usize], text: &str, color: &str) -> String {
    render_with(starts, ends, text, color, |c, out| out.push(c))
}

/// Highlight `text` between the given offsets, HTML-escaping every character
///
/// Escaping happens per character, so offsets keep their meaning.
pub fn render_escaped(starts: &[usize], ends: &[usize], text: &str, color: &str) -> String {
    render_with(starts, ends, text, color, push_escaped)
}

/// Escape text for use in HTML content or a quoted attribute
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        push_escaped(c, &mut out);
    }
    out
}

fn push_escaped(c: char, out: &mut String) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

fn render_with<F>(starts: &[usize], ends: &[usize], text: &str, color: &str, emit: F) -> String
where
    F: Fn(char, &mut String),
{
    let starts: HashSet<usize> = starts.iter().copied().collect();
    let ends: HashSet<usize> = ends.iter().copied().collect();
    let open = open_tag(color);

    let mut out = String::with_capacity(text.len() + (starts.len() + ends.len()) * open.len());
    for (i, c) in text.chars().enumerate() {
        if starts.contains(&i) {
            out.push_str(&open);
        }
        if ends.contains(&i) {
            out.push_str(CLOSE_TAG);
        }
        emit(c, &mut out);
    }
    out
}
