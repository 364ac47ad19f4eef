//! Geometry engine.
//!
//! Declared sizing lives in [`PanelLayout`]; the four transform functions
//! turn it into nested rectangles (Absolute → Frame → Inner → Content) and
//! [`Layers::solve`] composes them top-down. Everything here is pure.

mod core;

pub use self::core::{
    Align, Alignment, Extent, Layers, Pad, Padding, PanelLayout, RelativeSize, compute_absolute,
    compute_content, compute_frame, compute_inner, scaled,
};
