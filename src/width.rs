//! Terminal display width helpers.
//!
//! ANSI-aware width calculation so panels can align, wrap and truncate text
//! by the cells it occupies rather than by bytes or chars.

use unicode_width::UnicodeWidthChar;

/// Compute the display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    unicode_width::UnicodeWidthStr::width(&*clean_str)
}

fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Cut `text` so it fits in `max_width` cells.
pub fn truncate(text: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0usize;
    for ch in text.chars() {
        let w = char_width(ch);
        if width + w > max_width {
            break;
        }
        width += w;
        result.push(ch);
    }
    result
}

/// Truncate with a trailing marker when the text overflows.
pub fn truncate_with(text: &str, max_width: usize, marker: &str) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    let marker_width = display_width(marker);
    if marker_width >= max_width {
        return truncate(marker, max_width);
    }
    let mut cut = truncate(text, max_width - marker_width);
    cut.push_str(marker);
    cut
}

/// Right-pad `text` with spaces to exactly `width` cells, truncating overflow.
pub fn fit(text: &str, width: usize) -> String {
    let mut line = truncate(text, width);
    let mut display = display_width(&line);
    while display < width {
        line.push(' ');
        display += 1;
    }
    line
}

/// Greedy word wrap to `width` cells. Words longer than the width are split.
/// Explicit newlines always start a new line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0usize;
        for word in raw.split_whitespace() {
            let word_width = display_width(word);
            let gap = usize::from(!current.is_empty());
            if current_width + gap + word_width <= width {
                if gap == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += gap + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            let mut rest = word.to_string();
            while display_width(&rest) > width {
                let head = truncate(&rest, width);
                if head.is_empty() {
                    // Character wider than the line, drop it.
                    rest = rest.chars().skip(1).collect();
                    continue;
                }
                rest = rest[head.len()..].to_string();
                lines.push(head);
            }
            current_width = display_width(&rest);
            current = rest;
        }
        lines.push(current);
    }
    lines
}
