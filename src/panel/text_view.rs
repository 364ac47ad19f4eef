use crate::error::{PanelError, Result};
use crate::geometry::Rect;
use crate::layout::PanelLayout;
use crate::messages::Payload;
use crate::render::{Decor, StyledLine};
use crate::terminal::Key;
use crate::width::wrap;

use super::{KeyBindings, KeyOutcome, Panel, PanelCore, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollAction {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    Home,
    End,
}

/// Read-only text, wrapped to the Content width and scrolled with the
/// arrow, page, Home and End keys.
#[derive(Debug, Clone)]
pub struct TextView {
    core: PanelCore,
    text: String,
    viewport: Viewport,
    bindings: KeyBindings<ScrollAction>,
}

impl TextView {
    pub fn new(text: impl Into<String>) -> Self {
        let mut bindings = KeyBindings::new();
        bindings.set(Key::Up, ScrollAction::LineUp);
        bindings.set(Key::Down, ScrollAction::LineDown);
        bindings.set(Key::PageUp, ScrollAction::PageUp);
        bindings.set(Key::PageDown, ScrollAction::PageDown);
        bindings.set(Key::Home, ScrollAction::Home);
        bindings.set(Key::End, ScrollAction::End);
        Self {
            core: PanelCore::new(),
            text: text.into(),
            viewport: Viewport::new(),
            bindings,
        }
    }

    pub fn with_layout(mut self, layout: PanelLayout) -> Result<Self> {
        self.core.set_layout(layout)?;
        Ok(self)
    }

    pub fn with_decor(mut self, decor: Decor) -> Result<Self> {
        self.core.set_decor(decor)?;
        Ok(self)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn wrapped(&self, width: u16) -> Vec<String> {
        wrap(&self.text, width as usize)
    }
}

impl Panel for TextView {
    fn kind(&self) -> &'static str {
        "text_view"
    }

    fn core(&self) -> &PanelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PanelCore {
        &mut self.core
    }

    fn draw(&self, area: Rect) -> Vec<StyledLine> {
        let base = self.core.decor().style;
        let rows: Vec<StyledLine> = self
            .wrapped(area.width)
            .into_iter()
            .map(|line| StyledLine::styled(line, base))
            .collect();
        self.viewport.lines(&rows, area.height as usize, area.width, base)
    }

    fn handle_key(&mut self, key: Key) -> Result<KeyOutcome> {
        let Some(action) = self.bindings.action(key) else {
            return Ok(KeyOutcome::Ignored);
        };
        let content = self.core.layers().content;
        let total = self.wrapped(content.width).len();
        let height = content.height as usize;
        let page = self.viewport.page(total, height) as isize;
        match action {
            ScrollAction::LineUp => self.viewport.scroll_by(-1, total, height),
            ScrollAction::LineDown => self.viewport.scroll_by(1, total, height),
            ScrollAction::PageUp => self.viewport.scroll_by(-page, total, height),
            ScrollAction::PageDown => self.viewport.scroll_by(page, total, height),
            ScrollAction::Home => self.viewport.home(),
            ScrollAction::End => self.viewport.end(total, height),
        }
        self.core.mark_dirty();
        Ok(KeyOutcome::Handled)
    }

    fn apply_update(&mut self, payload: Payload) -> Result<()> {
        match payload {
            Payload::Text(text) => {
                self.text = text;
                self.viewport.home();
                self.core.mark_dirty();
                Ok(())
            }
            other => Err(PanelError::invalid_update(
                self.kind(),
                format!("expected text, got `{}`", other.name()),
            )),
        }
    }

    fn clear_contents(&mut self) {
        self.text.clear();
        self.viewport.home();
        self.core.mark_dirty();
    }

    fn active_keys(&self) -> Vec<Key> {
        self.bindings.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(view: &mut TextView) -> Vec<String> {
        view.render().iter().map(|line| line.text().trim_end().to_string()).collect()
    }

    fn numbered(count: usize) -> String {
        (0..count).map(|i| format!("line{i}")).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn scrolls_with_markers() {
        let mut view = TextView::new(numbered(8));
        view.resize(Rect::new(0, 0, 7, 4));
        assert_eq!(rows(&mut view), vec!["line0", "line1", "line2", "  [▼]"]);

        view.handle_key(Key::Down).unwrap();
        assert_eq!(rows(&mut view), vec!["  [▲]", "line1", "line2", "  [▼]"]);

        view.handle_key(Key::End).unwrap();
        assert_eq!(rows(&mut view), vec!["  [▲]", "line5", "line6", "line7"]);

        view.handle_key(Key::Home).unwrap();
        assert_eq!(rows(&mut view)[0], "line0");
    }

    #[test]
    fn text_update_resets_scroll() {
        let mut view = TextView::new(numbered(8));
        view.resize(Rect::new(0, 0, 7, 4));
        view.handle_key(Key::PageDown).unwrap();
        view.apply_update(Payload::Text("short".into())).unwrap();
        assert_eq!(rows(&mut view), vec!["short", "", "", ""]);
        assert!(view.apply_update(Payload::Tick).is_err());
    }

    #[test]
    fn text_carries_the_base_style() {
        use crate::render::Style;
        use crossterm::style::Color;

        let base = Style::plain().bg(Color::Blue);
        let mut view = TextView::new("some text")
            .with_decor(Decor::new().with_style(base))
            .unwrap();
        view.resize(Rect::new(0, 0, 12, 2));
        let lines = view.render();
        assert_eq!(lines[0].text().trim_end(), "some text");
        assert!(lines.iter().flat_map(|line| &line.spans).all(|span| span.style == base));
    }
}
