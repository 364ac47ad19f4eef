use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event as CrosstermEvent};
use crossterm::style::{
    Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

use crate::error::{PanelError, Result};
use crate::geometry::Size;
use crate::render::Style;

use super::{InputEvent, Key, Terminal};

/// [`Terminal`] over the process's stdout using crossterm.
///
/// Raw mode also switches to the alternate screen and hides the cursor so
/// the user's scrollback is untouched when the manager ends.
pub struct CrosstermTerminal {
    out: Stdout,
    raw: bool,
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            raw: false,
        }
    }
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

fn capability(err: io::Error) -> PanelError {
    PanelError::Capability(err.to_string())
}

impl Terminal for CrosstermTerminal {
    fn size(&mut self) -> Result<Size> {
        let (width, height) = terminal::size().map_err(capability)?;
        Ok(Size::new(width, height))
    }

    fn move_cursor(&mut self, row: u16, col: u16) -> Result<()> {
        queue!(self.out, MoveTo(col, row))?;
        Ok(())
    }

    fn write_styled(&mut self, text: &str, style: &Style) -> Result<()> {
        if let Some(fg) = style.fg {
            queue!(self.out, SetForegroundColor(fg))?;
        }
        if let Some(bg) = style.bg {
            queue!(self.out, SetBackgroundColor(bg))?;
        }
        if style.bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        if style.reverse {
            queue!(self.out, SetAttribute(Attribute::Reverse))?;
        }
        queue!(self.out, Print(text))?;
        if *style != Style::plain() {
            queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        queue!(self.out, Clear(ClearType::All))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn read_event(&mut self, timeout: Duration) -> Result<Option<InputEvent>> {
        if !event::poll(timeout).map_err(capability)? {
            return Ok(None);
        }
        match event::read().map_err(capability)? {
            CrosstermEvent::Key(key) => Ok(Key::from_event(&key).map(InputEvent::Key)),
            CrosstermEvent::Resize(width, height) => {
                Ok(Some(InputEvent::Resize(Size::new(width, height))))
            }
            _ => Ok(None),
        }
    }

    fn enter_raw_mode(&mut self) -> Result<()> {
        if self.raw {
            return Ok(());
        }
        terminal::enable_raw_mode().map_err(capability)?;
        self.raw = true;
        execute!(self.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        if !self.raw {
            return Ok(());
        }
        self.raw = false;
        execute!(self.out, Show, LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().map_err(capability)
    }
}
