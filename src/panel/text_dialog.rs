use crate::error::{PanelError, Result};
use crate::geometry::Rect;
use crate::layout::{Align, Alignment, PanelLayout};
use crate::messages::Payload;
use crate::render::{Decor, Span, Style, StyledLine};
use crate::terminal::Key;
use crate::width::wrap;

use super::{KeyBindings, KeyOutcome, Panel, PanelCore, aligned_block};

const PROMPT: &str = "> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditAction {
    Left,
    Right,
    Home,
    End,
    Backspace,
    Delete,
    Submit,
}

/// Prompt with a one-line text editor on the bottom row.
///
/// Printable characters insert at the cursor. Enter is only bound while the
/// value is non-empty and emits the value.
#[derive(Debug, Clone)]
pub struct TextDialog {
    core: PanelCore,
    prompt: String,
    value: Vec<char>,
    cursor: usize,
    bindings: KeyBindings<EditAction>,
}

impl TextDialog {
    pub fn new(prompt: impl Into<String>) -> Self {
        let mut bindings = KeyBindings::new();
        bindings.set(Key::Left, EditAction::Left);
        bindings.set(Key::Right, EditAction::Right);
        bindings.set(Key::Home, EditAction::Home);
        bindings.set(Key::End, EditAction::End);
        bindings.set(Key::Backspace, EditAction::Backspace);
        bindings.set(Key::Delete, EditAction::Delete);
        Self {
            core: PanelCore::new(),
            prompt: prompt.into(),
            value: Vec::new(),
            cursor: 0,
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

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.chars().collect();
        self.cursor = self.value.len();
        self.sync_submit();
    }

    fn sync_submit(&mut self) {
        if self.value.is_empty() {
            self.bindings.unbind(Key::Enter);
        } else {
            self.bindings.set(Key::Enter, EditAction::Submit);
        }
    }

    fn editor(&self, width: u16, base: Style) -> StyledLine {
        let field = (width as usize).saturating_sub(PROMPT.len());
        let mut line = StyledLine::new().with(Span::new(PROMPT, base));
        if field == 0 {
            return line;
        }
        let start = self.cursor.saturating_sub(field - 1);
        let cursor_style = base.patch(Style::plain().reversed());
        let before: String = self.value[start..self.cursor].iter().collect();
        let under = self.value.get(self.cursor).copied().unwrap_or(' ');
        let after: String = self
            .value
            .iter()
            .skip(self.cursor + 1)
            .take(field.saturating_sub(self.cursor - start + 1))
            .collect();
        line.push(Span::new(before, base));
        line.push(Span::new(under.to_string(), cursor_style));
        line.push(Span::new(after, base));
        line
    }
}

impl Panel for TextDialog {
    fn kind(&self) -> &'static str {
        "text_dialog"
    }

    fn core(&self) -> &PanelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PanelCore {
        &mut self.core
    }

    fn draw(&self, area: Rect) -> Vec<StyledLine> {
        if area.is_empty() {
            return Vec::new();
        }
        let base = self.core.decor().style;
        let prompt_area = Rect::new(area.x, area.y, area.width, area.height - 1);
        let wrapped = wrap(&self.prompt, area.width as usize);
        let mut lines = aligned_block(
            &wrapped,
            prompt_area,
            Alignment::new(Align::Start, Align::Center),
            base,
        );
        while lines.len() < prompt_area.height as usize {
            lines.push(StyledLine::blank(area.width, base));
        }
        lines.push(self.editor(area.width, base));
        lines
    }

    fn handle_key(&mut self, key: Key) -> Result<KeyOutcome> {
        let action = match (self.bindings.action(key), key) {
            (Some(action), _) => action,
            (None, Key::Char(ch)) if !ch.is_control() => {
                self.value.insert(self.cursor, ch);
                self.cursor += 1;
                self.sync_submit();
                self.core.mark_dirty();
                return Ok(KeyOutcome::Handled);
            }
            _ => return Ok(KeyOutcome::Ignored),
        };

        match action {
            EditAction::Submit => return Ok(KeyOutcome::Emit(self.value())),
            EditAction::Left => self.cursor = self.cursor.saturating_sub(1),
            EditAction::Right => self.cursor = (self.cursor + 1).min(self.value.len()),
            EditAction::Home => self.cursor = 0,
            EditAction::End => self.cursor = self.value.len(),
            EditAction::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.value.remove(self.cursor);
                }
            }
            EditAction::Delete => {
                if self.cursor < self.value.len() {
                    self.value.remove(self.cursor);
                }
            }
        }
        self.sync_submit();
        self.core.mark_dirty();
        Ok(KeyOutcome::Handled)
    }

    /// `Text` replaces the value being edited.
    fn apply_update(&mut self, payload: Payload) -> Result<()> {
        match payload {
            Payload::Text(value) => {
                self.set_value(&value);
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
        self.set_value("");
        self.core.mark_dirty();
    }

    fn active_keys(&self) -> Vec<Key> {
        self.bindings.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(dialog: &mut TextDialog, text: &str) {
        for ch in text.chars() {
            assert_eq!(dialog.handle_key(Key::Char(ch)).unwrap(), KeyOutcome::Handled);
        }
    }

    #[test]
    fn enter_only_bound_with_a_value() {
        let mut dialog = TextDialog::new("Name?");
        assert!(!dialog.active_keys().contains(&Key::Enter));
        assert_eq!(dialog.handle_key(Key::Enter).unwrap(), KeyOutcome::Ignored);

        type_text(&mut dialog, "bob");
        assert!(dialog.active_keys().contains(&Key::Enter));
        assert_eq!(dialog.handle_key(Key::Enter).unwrap(), KeyOutcome::Emit("bob".into()));
    }

    #[test]
    fn editing_keys_move_and_delete() {
        let mut dialog = TextDialog::new("Word?");
        type_text(&mut dialog, "cart");
        dialog.handle_key(Key::Left).unwrap();
        dialog.handle_key(Key::Backspace).unwrap();
        assert_eq!(dialog.value(), "cat");
        dialog.handle_key(Key::Home).unwrap();
        dialog.handle_key(Key::Delete).unwrap();
        assert_eq!(dialog.value(), "at");
        type_text(&mut dialog, "b");
        assert_eq!(dialog.value(), "bat");
        assert_eq!(dialog.cursor(), 1);

        for _ in 0..3 {
            dialog.handle_key(Key::Backspace).unwrap();
        }
        assert_eq!(dialog.value(), "at");
        assert!(dialog.active_keys().contains(&Key::Enter));
    }

    #[test]
    fn editor_row_shows_cursor() {
        let mut dialog = TextDialog::new("Name?").with_value("ab");
        dialog.resize(Rect::new(0, 0, 8, 3));
        let lines = dialog.render();
        assert_eq!(lines[0].text(), "Name?   ");
        assert_eq!(lines[2].text(), "> ab    ");
        let cursor = lines[2].spans.iter().find(|span| span.style.reverse).unwrap();
        assert_eq!(cursor.text, " ");
    }

    #[test]
    fn long_values_scroll_to_cursor() {
        let mut dialog = TextDialog::new("").with_value("abcdefgh");
        dialog.resize(Rect::new(0, 0, 6, 2));
        assert_eq!(dialog.render()[1].text(), "> fgh ");
    }
}
