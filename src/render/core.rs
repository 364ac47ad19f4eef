use crate::error::{ConfigError, Result};
use crate::geometry::{Rect, Size};
use crate::layout::{Align, Layers};
use crate::terminal::Terminal;
use crate::width::{display_width, truncate_with};

use super::style::{Span, Style, StyledLine};

/// Marker appended to titles and footers that do not fit the border.
pub const OVERFLOW_MARKER: &str = "[▸]";

/// Border drawing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameKind {
    #[default]
    Light,
    Heavy,
    Double,
    Ascii,
}

/// Characters used to draw one frame kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGlyphs {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl FrameKind {
    pub fn glyphs(self) -> FrameGlyphs {
        let (tl, tr, bl, br, h, v) = match self {
            FrameKind::Light => ('┌', '┐', '└', '┘', '─', '│'),
            FrameKind::Heavy => ('┏', '┓', '┗', '┛', '━', '┃'),
            FrameKind::Double => ('╔', '╗', '╚', '╝', '═', '║'),
            FrameKind::Ascii => ('+', '+', '+', '+', '-', '|'),
        };
        FrameGlyphs {
            top_left: tl,
            top_right: tr,
            bottom_left: bl,
            bottom_right: br,
            horizontal: h,
            vertical: v,
        }
    }
}

/// Visual decoration drawn around and behind a panel's content.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decor {
    pub frame: Option<FrameKind>,
    pub title: Option<String>,
    pub footer: Option<String>,
    pub title_align: Align,
    pub footer_align: Align,
    /// Base style for the whole Absolute area.
    pub style: Style,
    pub frame_style: Style,
}

impl Decor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn framed(kind: FrameKind) -> Self {
        Self {
            frame: Some(kind),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>, align: Align) -> Self {
        self.title = Some(title.into());
        self.title_align = align;
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>, align: Align) -> Self {
        self.footer = Some(footer.into());
        self.footer_align = align;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_frame_style(mut self, style: Style) -> Self {
        self.frame_style = style;
        self
    }

    /// Titles and footers live on the border, so they need one.
    pub fn validate(&self) -> Result<()> {
        if self.frame.is_none() {
            if self.title.is_some() {
                return Err(ConfigError::TitleWithoutFrame("title").into());
            }
            if self.footer.is_some() {
                return Err(ConfigError::TitleWithoutFrame("footer").into());
            }
        }
        Ok(())
    }
}

/// One positioned run of styled text.
#[derive(Debug, Clone, PartialEq)]
struct Paint {
    row: u16,
    col: u16,
    span: Span,
}

/// Paints the active panel onto a [`Terminal`].
///
/// Each frame is fingerprinted with blake3; a frame identical to the last
/// one painted is skipped entirely.
#[derive(Debug, Default)]
pub struct PanelRenderer {
    last_frame: Option<blake3::Hash>,
    frames: u64,
}

impl PanelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the last frame so the next draw repaints unconditionally.
    pub fn invalidate(&mut self) {
        self.last_frame = None;
    }

    /// Number of frames actually written to the terminal.
    pub fn frames_painted(&self) -> u64 {
        self.frames
    }

    /// Paint a blank screen.
    pub fn draw_blank(&mut self, terminal: &mut dyn Terminal, screen: Size) -> Result<bool> {
        self.paint(terminal, screen, Vec::new())
    }

    /// Paint one panel's decoration and content lines. Returns whether the
    /// terminal was written to.
    pub fn draw(
        &mut self,
        terminal: &mut dyn Terminal,
        screen: Size,
        layers: &Layers,
        decor: &Decor,
        lines: &[StyledLine],
    ) -> Result<bool> {
        let mut paints = Vec::new();
        background(&mut paints, layers.absolute, decor.style);
        if let Some(kind) = decor.frame {
            border(&mut paints, layers.absolute, kind, decor);
        }
        content(&mut paints, layers.content, decor.style, lines);
        self.paint(terminal, screen, paints)
    }

    fn paint(&mut self, terminal: &mut dyn Terminal, screen: Size, paints: Vec<Paint>) -> Result<bool> {
        let hash = fingerprint(screen, &paints);
        if self.last_frame == Some(hash) {
            return Ok(false);
        }

        terminal.clear()?;
        for paint in &paints {
            terminal.move_cursor(paint.row, paint.col)?;
            terminal.write_styled(&paint.span.text, &paint.span.style)?;
        }
        terminal.flush()?;

        self.last_frame = Some(hash);
        self.frames += 1;
        Ok(true)
    }
}

fn fingerprint(screen: Size, paints: &[Paint]) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&screen.width.to_le_bytes());
    hasher.update(&screen.height.to_le_bytes());
    for paint in paints {
        hasher.update(&paint.row.to_le_bytes());
        hasher.update(&paint.col.to_le_bytes());
        hasher.update(format!("{:?}", paint.span.style).as_bytes());
        hasher.update(paint.span.text.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

fn background(paints: &mut Vec<Paint>, area: Rect, style: Style) {
    if area.is_empty() || style == Style::plain() {
        return;
    }
    let blank = " ".repeat(area.width as usize);
    for row in area.y..area.bottom() {
        paints.push(Paint {
            row,
            col: area.x,
            span: Span::new(blank.clone(), style),
        });
    }
}

fn border(paints: &mut Vec<Paint>, area: Rect, kind: FrameKind, decor: &Decor) {
    if area.width < 2 || area.height < 2 {
        return;
    }
    let glyphs = kind.glyphs();
    let style = decor.style.patch(decor.frame_style);
    let span = (area.width - 2) as usize;
    let horizontal = glyphs.horizontal.to_string().repeat(span);

    let top = format!("{}{}{}", glyphs.top_left, horizontal, glyphs.top_right);
    let bottom = format!("{}{}{}", glyphs.bottom_left, horizontal, glyphs.bottom_right);
    paints.push(Paint {
        row: area.y,
        col: area.x,
        span: Span::new(top, style),
    });
    for row in area.y + 1..area.bottom() - 1 {
        for col in [area.x, area.right() - 1] {
            paints.push(Paint {
                row,
                col,
                span: Span::new(glyphs.vertical.to_string(), style),
            });
        }
    }
    let bottom_row = area.bottom() - 1;
    paints.push(Paint {
        row: bottom_row,
        col: area.x,
        span: Span::new(bottom, style),
    });

    if let Some(title) = &decor.title {
        label(paints, area, area.y, title, decor.title_align, style);
    }
    if let Some(footer) = &decor.footer {
        label(paints, area, bottom_row, footer, decor.footer_align, style);
    }
}

fn label(paints: &mut Vec<Paint>, area: Rect, row: u16, text: &str, align: Align, style: Style) {
    let available = area.width.saturating_sub(2);
    if available == 0 {
        return;
    }
    let text = truncate_with(text, available as usize, OVERFLOW_MARKER);
    let used = display_width(&text) as u16;
    paints.push(Paint {
        row,
        col: area.x + 1 + align.offset(used, available),
        span: Span::new(text, style),
    });
}

fn content(paints: &mut Vec<Paint>, area: Rect, base: Style, lines: &[StyledLine]) {
    if area.is_empty() {
        return;
    }
    for (offset, line) in lines.iter().take(area.height as usize).enumerate() {
        let line = line.clone().fit_to(area.width, base);
        let mut col = area.x;
        for span in line.spans {
            let advance = display_width(&span.text) as u16;
            paints.push(Paint {
                row: area.y + offset as u16,
                col,
                span: Span::new(span.text, base.patch(span.style)),
            });
            col += advance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PanelLayout;
    use crate::terminal::ScriptedTerminal;

    fn framed_layers(width: u16, height: u16) -> Layers {
        Layers::solve(&PanelLayout::new().with_frame(true), Rect::new(0, 0, width, height))
    }

    #[test]
    fn draws_border_title_and_content() {
        let (mut term, handle) = ScriptedTerminal::new(Size::new(12, 4));
        let decor = Decor::framed(FrameKind::Light).with_title("Menu", Align::Start);
        let lines = vec![StyledLine::plain("one"), StyledLine::plain("two")];
        let mut renderer = PanelRenderer::new();
        let painted = renderer
            .draw(&mut term, Size::new(12, 4), &framed_layers(12, 4), &decor, &lines)
            .unwrap();

        assert!(painted);
        assert_eq!(handle.row(0), "┌Menu──────┐");
        assert_eq!(handle.row(1), "│one       │");
        assert_eq!(handle.row(2), "│two       │");
        assert_eq!(handle.row(3), "└──────────┘");
    }

    #[test]
    fn long_titles_get_overflow_marker() {
        let (mut term, handle) = ScriptedTerminal::new(Size::new(10, 3));
        let decor = Decor::framed(FrameKind::Ascii).with_title("A very long title", Align::End);
        PanelRenderer::new()
            .draw(&mut term, Size::new(10, 3), &framed_layers(10, 3), &decor, &[])
            .unwrap();
        assert_eq!(handle.row(0), "+A ver[▸]+");
    }

    #[test]
    fn identical_frames_are_skipped() {
        let (mut term, handle) = ScriptedTerminal::new(Size::new(8, 3));
        let layers = framed_layers(8, 3);
        let decor = Decor::framed(FrameKind::Double);
        let lines = vec![StyledLine::plain("hi")];
        let mut renderer = PanelRenderer::new();

        assert!(renderer.draw(&mut term, Size::new(8, 3), &layers, &decor, &lines).unwrap());
        assert!(!renderer.draw(&mut term, Size::new(8, 3), &layers, &decor, &lines).unwrap());
        assert_eq!(handle.flushes(), 1);

        renderer.invalidate();
        assert!(renderer.draw(&mut term, Size::new(8, 3), &layers, &decor, &lines).unwrap());
        assert_eq!(renderer.frames_painted(), 2);
    }

    #[test]
    fn zero_size_content_draws_nothing_inside() {
        let (mut term, handle) = ScriptedTerminal::new(Size::new(2, 2));
        let decor = Decor::framed(FrameKind::Light);
        let lines = vec![StyledLine::plain("hidden")];
        PanelRenderer::new()
            .draw(&mut term, Size::new(2, 2), &framed_layers(2, 2), &decor, &lines)
            .unwrap();
        assert!(!handle.contains("hidden"));
        assert_eq!(handle.row(0), "┌┐");
    }

    #[test]
    fn titles_need_a_frame() {
        let decor = Decor::new().with_title("Oops", Align::Center);
        assert!(decor.validate().is_err());
    }
}
