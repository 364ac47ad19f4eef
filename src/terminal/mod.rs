//! Terminal capability layer.
//!
//! The manager only talks to the screen through [`Terminal`], which keeps the
//! runtime testable: [`CrosstermTerminal`] drives a real TTY while
//! [`ScriptedTerminal`] records output into an in-memory grid and replays
//! scripted input.

use std::time::Duration;

use crate::error::Result;
use crate::geometry::Size;
use crate::render::Style;

mod backend;
mod keys;
mod scripted;
mod session;

pub use backend::CrosstermTerminal;
pub use keys::{InputEvent, Key};
pub use scripted::{ScriptedTerminal, ScriptedTerminalHandle};
pub use session::TerminalSession;

/// Operations the manager needs from a character terminal.
///
/// Rows and columns are zero-based. Implementations report device problems
/// as [`PanelError::Capability`](crate::PanelError::Capability) or
/// [`PanelError::Io`](crate::PanelError::Io); both end the manager.
pub trait Terminal: Send {
    fn size(&mut self) -> Result<Size>;
    fn move_cursor(&mut self, row: u16, col: u16) -> Result<()>;
    fn write_styled(&mut self, text: &str, style: &Style) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    /// Wait at most `timeout` for the next input event.
    fn read_event(&mut self, timeout: Duration) -> Result<Option<InputEvent>>;
    fn enter_raw_mode(&mut self) -> Result<()>;
    fn exit_raw_mode(&mut self) -> Result<()>;
}

impl<T: Terminal + ?Sized> Terminal for Box<T> {
    fn size(&mut self) -> Result<Size> {
        (**self).size()
    }

    fn move_cursor(&mut self, row: u16, col: u16) -> Result<()> {
        (**self).move_cursor(row, col)
    }

    fn write_styled(&mut self, text: &str, style: &Style) -> Result<()> {
        (**self).write_styled(text, style)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn read_event(&mut self, timeout: Duration) -> Result<Option<InputEvent>> {
        (**self).read_event(timeout)
    }

    fn enter_raw_mode(&mut self) -> Result<()> {
        (**self).enter_raw_mode()
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        (**self).exit_raw_mode()
    }
}
