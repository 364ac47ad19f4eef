use crate::error::{PanelError, Result};
use crate::geometry::Rect;
use crate::layout::{Alignment, PanelLayout};
use crate::messages::Payload;
use crate::render::{Decor, StyledLine};

use super::{Panel, PanelCore, aligned_block};

/// Static text, aligned inside the Content area.
#[derive(Debug, Clone)]
pub struct Splash {
    core: PanelCore,
    text: String,
    align: Alignment,
}

impl Splash {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            core: PanelCore::new(),
            text: text.into(),
            align: Alignment::default(),
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

    /// Alignment of the text block within Content.
    pub fn with_text_align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Panel for Splash {
    fn kind(&self) -> &'static str {
        "splash"
    }

    fn core(&self) -> &PanelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PanelCore {
        &mut self.core
    }

    fn draw(&self, area: Rect) -> Vec<StyledLine> {
        let lines: Vec<String> = self.text.split('\n').map(str::to_string).collect();
        aligned_block(&lines, area, self.align, self.core.decor().style)
    }

    fn apply_update(&mut self, payload: Payload) -> Result<()> {
        match payload {
            Payload::Text(text) => {
                self.text = text;
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
        self.core.mark_dirty();
    }
}
