use crossterm::style::Color;

use crate::width::{display_width, truncate};

/// Colors and attributes applied to a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub reverse: bool,
}

impl Style {
    pub const fn plain() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
            reverse: false,
        }
    }

    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Layer `other` on top of `self`; set fields in `other` win.
    pub fn patch(self, other: Style) -> Self {
        Self {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            bold: self.bold || other.bold,
            reverse: self.reverse || other.reverse,
        }
    }
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::plain())
    }
}

/// One rendered row of a panel's content area.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledLine {
    pub spans: Vec<Span>,
}

impl StyledLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            spans: vec![Span::plain(text)],
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            spans: vec![Span::new(text, style)],
        }
    }

    /// Blank line `width` cells wide.
    pub fn blank(width: u16, style: Style) -> Self {
        Self::styled(" ".repeat(width as usize), style)
    }

    pub fn push(&mut self, span: Span) {
        self.spans.push(span);
    }

    pub fn with(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }

    pub fn width(&self) -> usize {
        self.spans.iter().map(|span| display_width(&span.text)).sum()
    }

    /// Unstyled text of the line, mostly useful in assertions.
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Place `text` at column `offset` within a line of `width` cells, padding
    /// with spaces in `base` style on both sides.
    pub fn aligned(text: &str, offset: usize, width: u16, base: Style, style: Style) -> Self {
        let width = width as usize;
        let offset = offset.min(width);
        let body = truncate(text, width - offset);
        let used = offset + display_width(&body);
        let mut line = StyledLine::new();
        if offset > 0 {
            line.push(Span::new(" ".repeat(offset), base));
        }
        if !body.is_empty() {
            line.push(Span::new(body, base.patch(style)));
        }
        if used < width {
            line.push(Span::new(" ".repeat(width - used), base));
        }
        line
    }

    /// Pad with `base` spaces or cut so the line is exactly `width` cells.
    pub fn fit_to(mut self, width: u16, base: Style) -> Self {
        let width = width as usize;
        let mut used = 0usize;
        let mut spans = Vec::with_capacity(self.spans.len() + 1);
        for span in self.spans.drain(..) {
            if used >= width {
                break;
            }
            let text = truncate(&span.text, width - used);
            used += display_width(&text);
            if !text.is_empty() {
                spans.push(Span::new(text, span.style));
            }
        }
        if used < width {
            spans.push(Span::new(" ".repeat(width - used), base));
        }
        self.spans = spans;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_pads_both_sides() {
        let line = StyledLine::aligned("hi", 3, 8, Style::plain(), Style::plain().bold());
        assert_eq!(line.text(), "   hi   ");
        assert_eq!(line.width(), 8);
        assert!(line.spans[1].style.bold);
    }

    #[test]
    fn fit_to_cuts_across_spans() {
        let line = StyledLine::plain("abc")
            .with(Span::plain("def"))
            .fit_to(4, Style::plain());
        assert_eq!(line.text(), "abcd");

        let short = StyledLine::plain("ab").fit_to(4, Style::plain());
        assert_eq!(short.text(), "ab  ");
    }
}
