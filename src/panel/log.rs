use std::collections::VecDeque;

use crate::error::{PanelError, Result};
use crate::geometry::Rect;
use crate::layout::PanelLayout;
use crate::messages::Payload;
use crate::render::{Decor, StyledLine};
use crate::width::wrap;

use super::{Panel, PanelCore};

pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// Rolling list of messages, newest first.
///
/// Entries past `max_entries` fall off the end. Each entry wraps to the
/// Content width; whatever does not fit below the fold is not shown.
#[derive(Debug, Clone)]
pub struct Log {
    core: PanelCore,
    entries: VecDeque<String>,
    max_entries: usize,
}

impl Log {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            core: PanelCore::new(),
            entries: VecDeque::with_capacity(max_entries),
            max_entries: max_entries.max(1),
        }
    }

    /// Seed the log. The first item is the most recent.
    pub fn with_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for entry in entries {
            if self.entries.len() == self.max_entries {
                break;
            }
            self.entries.push_back(entry.into());
        }
        self
    }

    pub fn with_layout(mut self, layout: PanelLayout) -> Result<Self> {
        self.core.set_layout(layout)?;
        Ok(self)
    }

    pub fn with_decor(mut self, decor: Decor) -> Result<Self> {
        self.core.set_decor(decor)?;
        Ok(self)
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.entries.len() == self.max_entries {
            self.entries.pop_back();
        }
        self.entries.push_front(line.into());
        self.core.mark_dirty();
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Log {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for Log {
    fn kind(&self) -> &'static str {
        "log"
    }

    fn core(&self) -> &PanelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PanelCore {
        &mut self.core
    }

    fn draw(&self, area: Rect) -> Vec<StyledLine> {
        let height = area.height as usize;
        let base = self.core.decor().style;
        self.entries
            .iter()
            .flat_map(|entry| wrap(entry, area.width as usize))
            .take(height)
            .map(|line| StyledLine::styled(line, base))
            .collect()
    }

    fn apply_update(&mut self, payload: Payload) -> Result<()> {
        match payload {
            Payload::Line(line) | Payload::Text(line) => {
                self.push(line);
                Ok(())
            }
            other => Err(PanelError::invalid_update(
                self.kind(),
                format!("expected a line, got `{}`", other.name()),
            )),
        }
    }

    fn clear_contents(&mut self) {
        self.entries.clear();
        self.core.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(log: &mut Log) -> Vec<String> {
        log.render().iter().map(|line| line.text().trim_end().to_string()).collect()
    }

    #[test]
    fn newest_entry_is_on_top() {
        let mut log = Log::new();
        log.resize(Rect::new(0, 0, 10, 3));
        log.apply_update(Payload::Line("first".into())).unwrap();
        log.apply_update(Payload::Line("second".into())).unwrap();
        assert_eq!(rows(&mut log), vec!["second", "first", ""]);
    }

    #[test]
    fn oldest_entries_fall_off() {
        let mut log = Log::with_capacity(2).with_entries(["b", "a"]);
        log.push("c");
        assert_eq!(log.entries().collect::<Vec<_>>(), vec!["c", "b"]);
    }

    #[test]
    fn long_entries_wrap_and_clip() {
        let mut log = Log::new().with_entries(["one two three", "older"]);
        log.resize(Rect::new(0, 0, 7, 2));
        assert_eq!(rows(&mut log), vec!["one two", "three"]);
    }

    #[test]
    fn entries_carry_the_base_style() {
        use crate::render::Style;
        use crossterm::style::Color;

        let base = Style::plain().bg(Color::Blue);
        let mut log = Log::new()
            .with_entries(["hello"])
            .with_decor(Decor::new().with_style(base))
            .unwrap();
        log.resize(Rect::new(0, 0, 8, 2));
        let lines = log.render();
        assert!(lines.iter().flat_map(|line| &line.spans).all(|span| span.style == base));
    }
}
