//! Panels: self-contained, stateful screen regions.
//!
//! A panel owns its geometry declaration, its decoration and whatever
//! content state its kind needs. It never talks to the manager; the manager
//! drives it through the [`Panel`] trait and turns [`KeyOutcome::Emit`]
//! values into responses.

mod core;
mod dialog;
mod log;
mod menu;
mod progress;
mod splash;
mod text_dialog;
mod text_view;

pub use self::core::{KeyBindings, PanelCore, Viewport, Window, aligned_block};
pub use dialog::Dialog;
pub use log::Log;
pub use menu::{Menu, MenuOption};
pub use progress::Progress;
pub use splash::Splash;
pub use text_dialog::TextDialog;
pub use text_view::TextView;

use crate::error::{PanelError, Result};
use crate::geometry::Rect;
use crate::layout::Layers;
use crate::messages::Payload;
use crate::render::{Decor, StyledLine};
use crate::terminal::Key;

/// What a panel did with a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key is not bound.
    Ignored,
    /// State changed; the panel will redraw.
    Handled,
    /// A result for the controller.
    Emit(String),
}

/// Contract between the manager and every panel kind.
///
/// Implementors supply [`PanelCore`] access and [`Panel::draw`]; geometry,
/// caching and decoration come from the provided methods.
pub trait Panel: Send {
    /// Short lowercase name of the panel kind, used in logs and errors.
    fn kind(&self) -> &'static str;

    fn core(&self) -> &PanelCore;

    fn core_mut(&mut self) -> &mut PanelCore;

    /// Produce the content lines for a Content area of `area` size. The
    /// result is normalized by [`Panel::render`], so short or ragged output
    /// is fine.
    fn draw(&self, area: Rect) -> Vec<StyledLine>;

    fn handle_key(&mut self, _key: Key) -> Result<KeyOutcome> {
        Ok(KeyOutcome::Ignored)
    }

    fn apply_update(&mut self, payload: Payload) -> Result<()> {
        Err(PanelError::invalid_update(
            self.kind(),
            format!("does not accept `{}` updates", payload.name()),
        ))
    }

    /// Reset displayable state. Geometry and bindings stay.
    fn clear_contents(&mut self);

    fn active_keys(&self) -> Vec<Key> {
        Vec::new()
    }

    fn resize(&mut self, parent: Rect) {
        self.core_mut().resize(parent);
    }

    fn layers(&self) -> Layers {
        self.core().layers()
    }

    fn decor(&self) -> &Decor {
        self.core().decor()
    }

    fn is_dirty(&self) -> bool {
        self.core().is_dirty()
    }

    /// Exactly `content.height` lines of exactly `content.width` cells,
    /// recomputed only after a state or geometry change.
    fn render(&mut self) -> Vec<StyledLine> {
        if let Some(lines) = self.core().cached_lines() {
            return lines.to_vec();
        }
        let content = self.core().layers().content;
        let base = self.core().decor().style;
        let mut lines: Vec<StyledLine> = self
            .draw(content)
            .into_iter()
            .take(content.height as usize)
            .map(|line| line.fit_to(content.width, base))
            .collect();
        while lines.len() < content.height as usize {
            lines.push(StyledLine::blank(content.width, base));
        }
        self.core_mut().store_lines(lines.clone());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_normalizes_to_content_size() {
        let mut splash = Splash::new("a much longer line than fits\nb");
        splash.resize(Rect::new(0, 0, 6, 4));
        let lines = splash.render();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|line| line.width() == 6));
        assert!(!splash.is_dirty());
    }

    #[test]
    fn default_update_is_rejected() {
        let mut menu = Menu::new(vec![MenuOption::new("one")]).unwrap();
        let err = menu.apply_update(Payload::Tick).unwrap_err();
        assert!(matches!(err, PanelError::InvalidUpdate { kind: "menu", .. }));
    }
}
