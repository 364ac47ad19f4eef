//! Rendering for panels.
//!
//! Panels produce [`StyledLine`]s sized to their Content layer; the
//! [`PanelRenderer`] adds the background, the border with its title and
//! footer, and writes the frame through the terminal capability layer.

mod core;
mod style;

pub use self::core::{Decor, FrameGlyphs, FrameKind, OVERFLOW_MARKER, PanelRenderer};
pub use style::{Span, Style, StyledLine};
