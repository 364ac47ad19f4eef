use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::error::{PanelError, Result};
use crate::geometry::Size;
use crate::render::Style;

use super::{InputEvent, Key, Terminal};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    style: Style,
}

const BLANK: Cell = Cell {
    ch: ' ',
    style: Style::plain(),
};

#[derive(Debug)]
struct ScriptState {
    size: Size,
    grid: Vec<Vec<Cell>>,
    cursor: (u16, u16),
    input: VecDeque<InputEvent>,
    read_failure: Option<String>,
    write_failure: Option<String>,
    raw: bool,
    raw_entries: usize,
    raw_exits: usize,
    flushes: usize,
}

impl ScriptState {
    fn new(size: Size) -> Self {
        Self {
            size,
            grid: blank_grid(size),
            cursor: (0, 0),
            input: VecDeque::new(),
            read_failure: None,
            write_failure: None,
            raw: false,
            raw_entries: 0,
            raw_exits: 0,
            flushes: 0,
        }
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
        self.grid = blank_grid(size);
        self.cursor = (0, 0);
    }

    fn check_write(&self) -> Result<()> {
        match &self.write_failure {
            Some(reason) => Err(PanelError::Capability(reason.clone())),
            None => Ok(()),
        }
    }
}

fn blank_grid(size: Size) -> Vec<Vec<Cell>> {
    vec![vec![BLANK; size.width as usize]; size.height as usize]
}

/// In-memory [`Terminal`] with scripted input and an inspectable screen.
///
/// The terminal itself moves into the manager; keep a
/// [`ScriptedTerminalHandle`] to feed input and read the screen back.
pub struct ScriptedTerminal {
    state: Arc<Mutex<ScriptState>>,
}

/// Shared view of a [`ScriptedTerminal`] used by tests and benches.
#[derive(Clone)]
pub struct ScriptedTerminalHandle {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedTerminal {
    pub fn new(size: Size) -> (Self, ScriptedTerminalHandle) {
        let state = Arc::new(Mutex::new(ScriptState::new(size)));
        (
            Self {
                state: Arc::clone(&state),
            },
            ScriptedTerminalHandle { state },
        )
    }

    fn state(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Terminal for ScriptedTerminal {
    fn size(&mut self) -> Result<Size> {
        Ok(self.state().size)
    }

    fn move_cursor(&mut self, row: u16, col: u16) -> Result<()> {
        let mut state = self.state();
        state.check_write()?;
        state.cursor = (row, col);
        Ok(())
    }

    fn write_styled(&mut self, text: &str, style: &Style) -> Result<()> {
        let mut state = self.state();
        state.check_write()?;
        let (row, mut col) = state.cursor;
        let width = state.size.width;
        for ch in text.chars() {
            if let Some(line) = state.grid.get_mut(row as usize) {
                if col < width {
                    line[col as usize] = Cell { ch, style: *style };
                }
            }
            col = col.saturating_add(1);
        }
        state.cursor = (row, col);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let mut state = self.state();
        state.check_write()?;
        let size = state.size;
        state.grid = blank_grid(size);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let mut state = self.state();
        state.check_write()?;
        state.flushes += 1;
        Ok(())
    }

    fn read_event(&mut self, timeout: Duration) -> Result<Option<InputEvent>> {
        let next = {
            let mut state = self.state();
            if let Some(reason) = state.read_failure.take() {
                return Err(PanelError::Capability(reason));
            }
            let next = state.input.pop_front();
            if let Some(InputEvent::Resize(size)) = next {
                state.resize(size);
            }
            next
        };
        if next.is_none() && !timeout.is_zero() {
            thread::sleep(timeout);
        }
        Ok(next)
    }

    fn enter_raw_mode(&mut self) -> Result<()> {
        let mut state = self.state();
        state.raw = true;
        state.raw_entries += 1;
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        let mut state = self.state();
        state.raw = false;
        state.raw_exits += 1;
        Ok(())
    }
}

impl ScriptedTerminalHandle {
    fn state(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push_key(&self, key: Key) {
        self.state().input.push_back(InputEvent::Key(key));
    }

    pub fn push_keys(&self, keys: impl IntoIterator<Item = Key>) {
        let mut state = self.state();
        state.input.extend(keys.into_iter().map(InputEvent::Key));
    }

    /// Queue a resize; the grid takes the new size when the event is read.
    pub fn push_resize(&self, size: Size) {
        self.state().input.push_back(InputEvent::Resize(size));
    }

    /// Make the next read report a device failure.
    pub fn fail_next_read(&self, reason: impl Into<String>) {
        self.state().read_failure = Some(reason.into());
    }

    /// Make every write fail until cleared with `None`.
    pub fn fail_writes(&self, reason: Option<String>) {
        self.state().write_failure = reason;
    }

    pub fn pending_input(&self) -> usize {
        self.state().input.len()
    }

    pub fn size(&self) -> Size {
        self.state().size
    }

    pub fn is_raw(&self) -> bool {
        self.state().raw
    }

    /// `(entries, exits)` into and out of raw mode so far.
    pub fn raw_transitions(&self) -> (usize, usize) {
        let state = self.state();
        (state.raw_entries, state.raw_exits)
    }

    pub fn flushes(&self) -> usize {
        self.state().flushes
    }

    /// Text of one screen row.
    pub fn row(&self, row: u16) -> String {
        self.state()
            .grid
            .get(row as usize)
            .map(|line| line.iter().map(|cell| cell.ch).collect())
            .unwrap_or_default()
    }

    /// Every screen row, top to bottom.
    pub fn screen(&self) -> Vec<String> {
        self.state()
            .grid
            .iter()
            .map(|line| line.iter().map(|cell| cell.ch).collect())
            .collect()
    }

    pub fn style_at(&self, row: u16, col: u16) -> Option<Style> {
        self.state()
            .grid
            .get(row as usize)
            .and_then(|line| line.get(col as usize))
            .map(|cell| cell.style)
    }

    /// True when `needle` appears anywhere on screen.
    pub fn contains(&self, needle: &str) -> bool {
        self.screen().iter().any(|line| line.contains(needle))
    }
}
