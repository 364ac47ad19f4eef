use crate::error::{ConfigError, Result};
use crate::geometry::Rect;
use crate::layout::{Align, Alignment, PanelLayout};
use crate::render::{Decor, Span, Style, StyledLine};
use crate::terminal::Key;
use crate::width::{display_width, wrap};

use super::{KeyBindings, KeyOutcome, MenuOption, Panel, PanelCore, aligned_block};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogAction {
    Left,
    Right,
    Select,
    Choose(usize),
}

/// Message with a row of buttons along the bottom edge.
///
/// The last option starts selected. Enter emits the selection; a hotkey
/// emits its option immediately.
#[derive(Debug, Clone)]
pub struct Dialog {
    core: PanelCore,
    message: String,
    options: Vec<MenuOption>,
    selected: usize,
    bindings: KeyBindings<DialogAction>,
}

fn yes_no() -> Vec<MenuOption> {
    vec![
        MenuOption::with_hotkey("Yes", 'y'),
        MenuOption::with_hotkey("No", 'n'),
    ]
}

impl Dialog {
    /// Yes/No dialog.
    pub fn new(message: impl Into<String>) -> Self {
        Self::assemble(message.into(), yes_no())
    }

    /// Dialog with custom buttons. Hotkeys must be unique.
    pub fn with_options(message: impl Into<String>, options: Vec<MenuOption>) -> Result<Self> {
        if options.is_empty() {
            return Err(ConfigError::EmptyOptions("dialog").into());
        }
        let mut hotkeys = KeyBindings::new();
        for (index, option) in options.iter().enumerate() {
            if let Some(hotkey) = option.hotkey {
                hotkeys.bind(Key::Char(hotkey), index)?;
            }
        }
        Ok(Self::assemble(message.into(), options))
    }

    /// Options must be non-empty with unique hotkeys.
    fn assemble(message: String, options: Vec<MenuOption>) -> Self {
        let mut bindings = KeyBindings::new();
        bindings.set(Key::Left, DialogAction::Left);
        bindings.set(Key::Right, DialogAction::Right);
        bindings.set(Key::Enter, DialogAction::Select);
        for (index, option) in options.iter().enumerate() {
            if let Some(hotkey) = option.hotkey {
                bindings.set(Key::Char(hotkey), DialogAction::Choose(index));
            }
        }
        Self {
            core: PanelCore::new(),
            message,
            selected: options.len().saturating_sub(1),
            options,
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

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn selected(&self) -> &MenuOption {
        &self.options[self.selected]
    }

    fn buttons(&self, width: u16, base: Style) -> StyledLine {
        let labels: Vec<String> = self
            .options
            .iter()
            .map(|option| format!("[{}]", option.name))
            .collect();
        let total = labels.iter().map(|label| display_width(label)).sum::<usize>() + labels.len() - 1;

        let mut line = StyledLine::new();
        let pad = (width as usize).saturating_sub(total);
        if pad > 0 {
            line.push(Span::new(" ".repeat(pad), base));
        }
        for (index, label) in labels.into_iter().enumerate() {
            if index > 0 {
                line.push(Span::new(" ", base));
            }
            let style = if index == self.selected {
                base.patch(Style::plain().reversed())
            } else {
                base
            };
            line.push(Span::new(label, style));
        }
        line
    }
}

impl Panel for Dialog {
    fn kind(&self) -> &'static str {
        "dialog"
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
        let message_area = Rect::new(area.x, area.y, area.width, area.height - 1);
        let wrapped = wrap(&self.message, area.width as usize);
        let mut lines = aligned_block(
            &wrapped,
            message_area,
            Alignment::new(Align::Start, Align::Center),
            base,
        );
        while lines.len() < message_area.height as usize {
            lines.push(StyledLine::blank(area.width, base));
        }
        lines.push(self.buttons(area.width, base));
        lines
    }

    fn handle_key(&mut self, key: Key) -> Result<KeyOutcome> {
        let Some(action) = self.bindings.action(key) else {
            return Ok(KeyOutcome::Ignored);
        };
        match action {
            DialogAction::Left => self.selected = self.selected.saturating_sub(1),
            DialogAction::Right => self.selected = (self.selected + 1).min(self.options.len() - 1),
            DialogAction::Select => return Ok(KeyOutcome::Emit(self.selected().name.clone())),
            DialogAction::Choose(index) => {
                self.selected = index;
                self.core.mark_dirty();
                return Ok(KeyOutcome::Emit(self.selected().name.clone()));
            }
        }
        self.core.mark_dirty();
        Ok(KeyOutcome::Handled)
    }

    fn clear_contents(&mut self) {
        self.message.clear();
        self.selected = self.options.len() - 1;
        self.core.mark_dirty();
    }

    fn active_keys(&self) -> Vec<Key> {
        self.bindings.keys()
    }
}
