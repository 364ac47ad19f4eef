use crate::error::{ConfigError, PanelError, Result};
use crate::geometry::Rect;
use crate::layout::{Align, PanelLayout};
use crate::messages::Payload;
use crate::render::{Decor, Style, StyledLine};

use super::{Panel, PanelCore};

const NOTCHES_PER_CELL: u64 = 8;

/// Block glyph covering `eighths` of a cell, 1 to 8.
fn block(eighths: u64) -> char {
    match eighths {
        1 => '▏',
        2 => '▎',
        3 => '▍',
        4 => '▌',
        5 => '▋',
        6 => '▊',
        7 => '▉',
        _ => '█',
    }
}

/// Horizontal bar showing how far along `steps` the work is.
#[derive(Debug, Clone)]
pub struct Progress {
    core: PanelCore,
    steps: u64,
    progress: u64,
    message: Option<String>,
}

impl Progress {
    pub fn new(steps: u64) -> Result<Self> {
        if steps == 0 {
            return Err(ConfigError::ZeroSteps.into());
        }
        Ok(Self {
            core: PanelCore::new(),
            steps,
            progress: 0,
            message: None,
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

    pub fn with_progress(mut self, progress: u64) -> Self {
        self.progress = progress.min(self.steps);
        self
    }

    /// Line shown under the bar.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn progress(&self) -> u64 {
        self.progress
    }

    /// Bar text for `width` cells, truncated to whole eighths.
    fn bar(&self, width: u16) -> String {
        let notches = u128::from(width) * u128::from(NOTCHES_PER_CELL) * u128::from(self.progress)
            / u128::from(self.steps);
        let notches = notches as u64;
        let full = notches / NOTCHES_PER_CELL;
        let part = notches % NOTCHES_PER_CELL;
        let mut bar: String = std::iter::repeat_n(block(8), full as usize).collect();
        if part > 0 {
            bar.push(block(part));
        }
        bar
    }
}

impl Panel for Progress {
    fn kind(&self) -> &'static str {
        "progress"
    }

    fn core(&self) -> &PanelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PanelCore {
        &mut self.core
    }

    fn draw(&self, area: Rect) -> Vec<StyledLine> {
        let base = self.core.decor().style;
        let rows = 1 + u16::from(self.message.is_some());
        let top = Align::Center.offset(rows, area.height);

        let mut lines: Vec<StyledLine> = (0..top).map(|_| StyledLine::blank(area.width, base)).collect();
        lines.push(StyledLine::aligned(&self.bar(area.width), 0, area.width, base, Style::plain()));
        if let Some(message) = &self.message {
            lines.push(StyledLine::aligned(message, 0, area.width, base, Style::plain()));
        }
        lines
    }

    fn apply_update(&mut self, payload: Payload) -> Result<()> {
        match payload {
            Payload::Tick => self.progress = (self.progress + 1).min(self.steps),
            Payload::Set(value) => self.progress = value.min(self.steps),
            Payload::Text(message) => self.message = Some(message),
            other => {
                return Err(PanelError::invalid_update(
                    self.kind(),
                    format!("expected tick, set or text, got `{}`", other.name()),
                ));
            }
        }
        self.core.mark_dirty();
        Ok(())
    }

    fn clear_contents(&mut self) {
        self.progress = 0;
        self.message = None;
        self.core.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_steps_rejected() {
        assert!(matches!(
            Progress::new(0).unwrap_err(),
            PanelError::Configuration(ConfigError::ZeroSteps)
        ));
    }

    #[test]
    fn bar_uses_eighth_blocks() {
        let progress = Progress::new(3).unwrap().with_progress(1);
        // 10 cells * 8 notches / 3 = 26 notches: 3 full cells and 2 eighths
        assert_eq!(progress.bar(10), "███▎");
        assert_eq!(progress.clone().with_progress(3).bar(4), "████");
        assert_eq!(progress.with_progress(0).bar(4), "");
    }

    #[test]
    fn bar_handles_huge_step_counts() {
        let progress = Progress::new(100_000_000_000_000_000)
            .unwrap()
            .with_progress(50_000_000_000_000_000);
        assert_eq!(progress.bar(80), "█".repeat(40));

        let done = Progress::new(u64::MAX).unwrap().with_progress(u64::MAX);
        assert_eq!(done.bar(80), "█".repeat(80));
    }

    #[test]
    fn ticks_saturate_at_steps() {
        let mut progress = Progress::new(2).unwrap();
        for _ in 0..5 {
            progress.apply_update(Payload::Tick).unwrap();
        }
        assert_eq!(progress.progress(), 2);
        progress.apply_update(Payload::Set(1)).unwrap();
        assert_eq!(progress.progress(), 1);
        assert!(progress.apply_update(Payload::Line("x".into())).is_err());
        assert_eq!(progress.progress(), 1);
    }

    #[test]
    fn bar_is_vertically_centered() {
        let mut progress = Progress::new(4).unwrap().with_progress(2).with_message("half");
        progress.resize(Rect::new(0, 0, 4, 4));
        let text: Vec<String> = progress.render().iter().map(StyledLine::text).collect();
        assert_eq!(text, vec!["    ", "██  ", "half", "    "]);
    }
}
