use crate::error::{ConfigError, Result};
use crate::geometry::Rect;
use crate::layout::PanelLayout;
use crate::render::{Decor, Style, StyledLine};
use crate::terminal::Key;
use crate::width::fit;

use super::{KeyBindings, KeyOutcome, Panel, PanelCore, Viewport};

/// A named choice, optionally reachable with a single key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub name: String,
    pub hotkey: Option<char>,
}

impl MenuOption {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hotkey: None,
        }
    }

    pub fn with_hotkey(name: impl Into<String>, hotkey: char) -> Self {
        Self {
            name: name.into(),
            hotkey: Some(hotkey),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Select,
    Hotkey(usize),
}

/// Scrollable list of options. Enter emits the selected option's name.
#[derive(Debug, Clone)]
pub struct Menu {
    core: PanelCore,
    options: Vec<MenuOption>,
    selected: usize,
    viewport: Viewport,
    bindings: KeyBindings<MenuAction>,
    select_style: Style,
}

impl Menu {
    pub fn new(options: Vec<MenuOption>) -> Result<Self> {
        if options.is_empty() {
            return Err(ConfigError::EmptyOptions("menu").into());
        }

        let mut bindings = KeyBindings::new();
        bindings.bind_all([
            (Key::Up, MenuAction::Up),
            (Key::Down, MenuAction::Down),
            (Key::PageUp, MenuAction::PageUp),
            (Key::PageDown, MenuAction::PageDown),
            (Key::Home, MenuAction::Home),
            (Key::End, MenuAction::End),
            (Key::Enter, MenuAction::Select),
        ])?;
        for (index, option) in options.iter().enumerate() {
            if let Some(hotkey) = option.hotkey {
                bindings.bind(Key::Char(hotkey), MenuAction::Hotkey(index))?;
            }
        }

        Ok(Self {
            core: PanelCore::new(),
            options,
            selected: 0,
            viewport: Viewport::new(),
            bindings,
            select_style: Style::plain().reversed(),
        })
    }

    pub fn with_layout(mut self, layout: PanelLayout) -> Result<Self> {
        self.core.set_layout(layout)?;
        Ok(self)
    }

    pub fn with_decor(mut self, decor: Decor) -> Result<Self> {
        self.core.set_decor(decor)?;
        Ok(self)
    }

    pub fn with_select_style(mut self, style: Style) -> Self {
        self.select_style = style;
        self
    }

    pub fn options(&self) -> &[MenuOption] {
        &self.options
    }

    pub fn selected(&self) -> &MenuOption {
        &self.options[self.selected]
    }

    fn select(&mut self, index: usize) {
        let total = self.options.len();
        self.selected = index.min(total - 1);
        self.viewport
            .reveal(self.selected, total, self.core.content_height());
    }
}

impl Panel for Menu {
    fn kind(&self) -> &'static str {
        "menu"
    }

    fn core(&self) -> &PanelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PanelCore {
        &mut self.core
    }

    fn draw(&self, area: Rect) -> Vec<StyledLine> {
        let base = self.core.decor().style;
        let width = area.width as usize;
        let rows: Vec<StyledLine> = self
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let style = if index == self.selected {
                    base.patch(self.select_style)
                } else {
                    base
                };
                StyledLine::styled(fit(&option.name, width), style)
            })
            .collect();

        let mut viewport = self.viewport;
        viewport.reveal(self.selected, rows.len(), area.height as usize);
        viewport.lines(&rows, area.height as usize, area.width, base)
    }

    fn handle_key(&mut self, key: Key) -> Result<KeyOutcome> {
        let Some(action) = self.bindings.action(key) else {
            return Ok(KeyOutcome::Ignored);
        };

        let total = self.options.len();
        let height = self.core.content_height();
        match action {
            MenuAction::Select => return Ok(KeyOutcome::Emit(self.selected().name.clone())),
            MenuAction::Up => self.select(self.selected.saturating_sub(1)),
            MenuAction::Down => self.select(self.selected + 1),
            MenuAction::PageUp => {
                let page = self.viewport.page(total, height);
                self.select(self.selected.saturating_sub(page));
            }
            MenuAction::PageDown => {
                let page = self.viewport.page(total, height);
                self.select(self.selected + page);
            }
            MenuAction::Home => {
                self.viewport.home();
                self.select(0);
            }
            MenuAction::End => {
                self.viewport.end(total, height);
                self.select(total - 1);
            }
            MenuAction::Hotkey(index) => self.select(index),
        }
        self.core.mark_dirty();
        Ok(KeyOutcome::Handled)
    }

    fn clear_contents(&mut self) {
        self.selected = 0;
        self.viewport.home();
        self.core.mark_dirty();
    }

    fn active_keys(&self) -> Vec<Key> {
        self.bindings.keys()
    }
}
