use crate::error::Result;

use super::Terminal;

/// Owns a terminal for the lifetime of a manager and keeps it in raw mode.
///
/// Raw mode is released exactly once: by [`TerminalSession::close`] or, on
/// any other exit path including panic unwinding, by `Drop`.
pub struct TerminalSession {
    terminal: Box<dyn Terminal>,
    open: bool,
}

impl TerminalSession {
    pub fn open(mut terminal: Box<dyn Terminal>) -> Result<Self> {
        terminal.enter_raw_mode()?;
        Ok(Self {
            terminal,
            open: true,
        })
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn terminal(&mut self) -> &mut dyn Terminal {
        self.terminal.as_mut()
    }

    /// Leave raw mode. Later calls are no-ops.
    pub fn close(&mut self) -> Result<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.terminal.flush().ok();
        self.terminal.exit_raw_mode()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.close().ok();
    }
}
