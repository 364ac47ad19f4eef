use crate::error::{ConfigError, Result};
use crate::geometry::Rect;

/// Guards truncation against binary float error, so `100 * 0.29` yields 29.
const TRUNCATION_EPSILON: f64 = 1e-9;

/// Declared absolute span of a panel along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extent {
    /// Everything the parent offers past the origin.
    #[default]
    Fill,
    /// An explicit cell count, clamped to the parent.
    Cells(u16),
}

/// Padding on one side of the Frame layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pad {
    Cells(u16),
    /// Fraction in [0, 1] of the matching Frame dimension.
    Fraction(f64),
}

impl Default for Pad {
    fn default() -> Self {
        Pad::Cells(0)
    }
}

impl Pad {
    fn resolve(self, dimension: u16) -> u16 {
        match self {
            Pad::Cells(cells) => cells,
            Pad::Fraction(fraction) => scaled(dimension, fraction),
        }
    }

    fn fraction(self) -> f64 {
        match self {
            Pad::Cells(_) => 0.0,
            Pad::Fraction(fraction) => fraction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: Pad,
    pub right: Pad,
    pub bottom: Pad,
    pub left: Pad,
}

impl Padding {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn uniform(pad: Pad) -> Self {
        Self {
            top: pad,
            right: pad,
            bottom: pad,
            left: pad,
        }
    }

    pub fn symmetric(vertical: Pad, horizontal: Pad) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    fn validate(&self) -> Result<()> {
        for (side, pad) in [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ] {
            if let Pad::Fraction(value) = pad {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ConfigError::PaddingOutOfRange { side, value }.into());
                }
            }
        }

        for (axis, total) in [
            ("vertical", self.top.fraction() + self.bottom.fraction()),
            ("horizontal", self.left.fraction() + self.right.fraction()),
        ] {
            if total > 1.0 + TRUNCATION_EPSILON {
                return Err(ConfigError::PaddingExceedsAxis { axis, total }.into());
            }
        }
        Ok(())
    }
}

/// Placement of the Content layer inside Inner along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Start,
    #[default]
    Center,
    End,
}

impl Align {
    /// Offset of a span of `length` cells inside `available` cells.
    pub fn offset(self, length: u16, available: u16) -> u16 {
        let free = available.saturating_sub(length);
        match self {
            Align::Start => 0,
            Align::Center => free / 2,
            Align::End => free,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Alignment {
    pub horizontal: Align,
    pub vertical: Align,
}

impl Alignment {
    pub fn new(horizontal: Align, vertical: Align) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// Content size as fractions of the Inner layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeSize {
    width: f64,
    height: f64,
}

impl Default for RelativeSize {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
        }
    }
}

impl RelativeSize {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        Ok(Self {
            width: checked_fraction("width", width)?,
            height: checked_fraction("height", height)?,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

fn checked_fraction(axis: &'static str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::RelativeSizeOutOfRange { axis, value }.into())
    }
}

/// Truncate `dimension * fraction` to whole cells, never exceeding `dimension`.
pub fn scaled(dimension: u16, fraction: f64) -> u16 {
    let cells = (f64::from(dimension) * fraction + TRUNCATION_EPSILON).floor();
    if cells <= 0.0 {
        0
    } else {
        (cells as u16).min(dimension)
    }
}

/// Declared sizing inputs of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelLayout {
    pub origin_row: u16,
    pub origin_col: u16,
    pub height: Extent,
    pub width: Extent,
    pub framed: bool,
    padding: Padding,
    relative: RelativeSize,
    pub align: Alignment,
}

impl PanelLayout {
    /// Full-screen, unframed, unpadded, content centered at full size.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_origin(mut self, row: u16, col: u16) -> Self {
        self.origin_row = row;
        self.origin_col = col;
        self
    }

    pub fn with_height(mut self, height: u16) -> Self {
        self.height = Extent::Cells(height);
        self
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Extent::Cells(width);
        self
    }

    pub fn with_frame(mut self, framed: bool) -> Self {
        self.framed = framed;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Result<Self> {
        padding.validate()?;
        self.padding = padding;
        Ok(self)
    }

    pub fn with_relative_width(mut self, width: f64) -> Result<Self> {
        self.relative.width = checked_fraction("width", width)?;
        Ok(self)
    }

    pub fn with_relative_height(mut self, height: f64) -> Result<Self> {
        self.relative.height = checked_fraction("height", height)?;
        Ok(self)
    }

    pub fn with_relative_size(mut self, relative: RelativeSize) -> Self {
        self.relative = relative;
        self
    }

    pub fn with_align(mut self, horizontal: Align, vertical: Align) -> Self {
        self.align = Alignment::new(horizontal, vertical);
        self
    }

    pub fn padding(&self) -> &Padding {
        &self.padding
    }

    pub fn relative(&self) -> RelativeSize {
        self.relative
    }
}

/// The four solved rectangles of a panel, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Layers {
    pub absolute: Rect,
    pub frame: Rect,
    pub inner: Rect,
    pub content: Rect,
}

impl Layers {
    /// Solve all layers of `layout` inside `parent`.
    pub fn solve(layout: &PanelLayout, parent: Rect) -> Self {
        let absolute = compute_absolute(layout, parent);
        let frame = compute_frame(absolute, layout.framed);
        let inner = compute_inner(frame, &layout.padding);
        let content = compute_content(inner, layout.relative, layout.align);
        Self {
            absolute,
            frame,
            inner,
            content,
        }
    }

    pub fn is_nested(&self) -> bool {
        self.absolute.contains(&self.frame)
            && self.frame.contains(&self.inner)
            && self.inner.contains(&self.content)
    }
}

fn extent(extent: Extent, available: u16) -> u16 {
    match extent {
        Extent::Fill => available,
        Extent::Cells(cells) => cells.min(available),
    }
}

/// Declared footprint inside `parent`, clamped so it never leaves the parent.
pub fn compute_absolute(layout: &PanelLayout, parent: Rect) -> Rect {
    let row_offset = layout.origin_row.min(parent.height);
    let col_offset = layout.origin_col.min(parent.width);
    let height = extent(layout.height, parent.height - row_offset);
    let width = extent(layout.width, parent.width - col_offset);
    Rect::new(parent.x + col_offset, parent.y + row_offset, width, height)
}

/// Area inside the border; the border itself sits on `absolute`'s edge.
pub fn compute_frame(absolute: Rect, framed: bool) -> Rect {
    if framed {
        absolute.inset(1, 1, 1, 1)
    } else {
        absolute
    }
}

/// Frame inset by padding. Fractions resolve against the Frame dimension.
pub fn compute_inner(frame: Rect, padding: &Padding) -> Rect {
    frame.inset(
        padding.top.resolve(frame.height),
        padding.right.resolve(frame.width),
        padding.bottom.resolve(frame.height),
        padding.left.resolve(frame.width),
    )
}

/// Inner narrowed to the relative size and aligned. An empty Inner yields a
/// zero-size Content at Inner's origin.
pub fn compute_content(inner: Rect, relative: RelativeSize, align: Alignment) -> Rect {
    if inner.is_empty() {
        return inner.collapsed();
    }
    let width = scaled(inner.width, relative.width);
    let height = scaled(inner.height, relative.height);
    Rect::new(
        inner.x + align.horizontal.offset(width, inner.width),
        inner.y + align.vertical.offset(height, inner.height),
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PanelError;

    fn screen(width: u16, height: u16) -> Rect {
        Rect::new(0, 0, width, height)
    }

    #[test]
    fn full_screen_defaults() {
        let layers = Layers::solve(&PanelLayout::new(), screen(80, 24));
        assert_eq!(layers.absolute, screen(80, 24));
        assert_eq!(layers.frame, screen(80, 24));
        assert_eq!(layers.inner, screen(80, 24));
        assert_eq!(layers.content, screen(80, 24));
    }

    #[test]
    fn frame_insets_one_cell_per_side() {
        let layout = PanelLayout::new().with_frame(true);
        let layers = Layers::solve(&layout, screen(80, 24));
        assert_eq!(layers.frame, Rect::new(1, 1, 78, 22));
        assert!(layers.is_nested());
    }

    #[test]
    fn fractional_padding_truncates() {
        let padding = Padding::symmetric(Pad::Fraction(0.1), Pad::Fraction(0.25));
        let layout = PanelLayout::new().with_padding(padding).unwrap();
        let layers = Layers::solve(&layout, screen(41, 15));
        // 15 * 0.1 = 1.5 -> 1, 41 * 0.25 = 10.25 -> 10
        assert_eq!(layers.inner, Rect::new(10, 1, 21, 13));
    }

    #[test]
    fn truncation_survives_float_noise() {
        assert_eq!(scaled(100, 0.29), 29);
        assert_eq!(scaled(10, 0.7), 7);
        assert_eq!(scaled(41, 0.5), 20);
        assert_eq!(scaled(0, 0.5), 0);
    }

    #[test]
    fn relative_width_resizes_by_truncation() {
        let layout = PanelLayout::new().with_relative_width(0.5).unwrap();
        let wide = Layers::solve(&layout, screen(80, 24));
        let narrow = Layers::solve(&layout, screen(41, 24));
        let narrow_again = Layers::solve(&layout, screen(41, 24));
        assert_eq!(wide.content.width, 40);
        assert_eq!(narrow.content.width, 20);
        assert_eq!(narrow, narrow_again);
    }

    #[test]
    fn alignment_positions_content() {
        let base = PanelLayout::new()
            .with_relative_width(0.25)
            .unwrap()
            .with_relative_height(0.5)
            .unwrap();
        let end = Layers::solve(&base.with_align(Align::End, Align::End), screen(80, 24));
        assert_eq!(end.content, Rect::new(60, 12, 20, 12));

        let start = Layers::solve(&base.with_align(Align::Start, Align::Start), screen(80, 24));
        assert_eq!(start.content, Rect::new(0, 0, 20, 12));

        let center = Layers::solve(&base, screen(81, 25));
        // free space 61 and 13 split with floor division
        assert_eq!(center.content, Rect::new(30, 6, 20, 12));
    }

    #[test]
    fn explicit_extent_and_origin_clamp_to_parent() {
        let layout = PanelLayout::new()
            .with_origin(20, 70)
            .with_height(10)
            .with_width(30);
        let layers = Layers::solve(&layout, Rect::new(2, 3, 80, 24));
        assert_eq!(layers.absolute, Rect::new(72, 23, 10, 4));
        assert!(Rect::new(2, 3, 80, 24).contains(&layers.absolute));
    }

    #[test]
    fn degenerate_inner_collapses_content() {
        let layout = PanelLayout::new()
            .with_frame(true)
            .with_padding(Padding::uniform(Pad::Cells(3)))
            .unwrap();
        let layers = Layers::solve(&layout, screen(6, 4));
        assert!(layers.inner.is_empty());
        assert_eq!(layers.content.width, 0);
        assert_eq!(layers.content.height, 0);
        assert!(layers.is_nested());
    }

    #[test]
    fn rejects_out_of_range_fractions() {
        let err = PanelLayout::new().with_relative_width(1.5).unwrap_err();
        assert!(matches!(
            err,
            PanelError::Configuration(ConfigError::RelativeSizeOutOfRange { axis: "width", .. })
        ));

        assert!(PanelLayout::new().with_relative_height(f64::NAN).is_err());
        assert!(RelativeSize::new(0.5, -0.1).is_err());

        let err = PanelLayout::new()
            .with_padding(Padding::symmetric(Pad::Fraction(0.6), Pad::Cells(0)))
            .unwrap_err();
        assert!(matches!(
            err,
            PanelError::Configuration(ConfigError::PaddingExceedsAxis { axis: "vertical", .. })
        ));
    }

    #[test]
    fn solve_is_independent_of_call_order() {
        let a = PanelLayout::new().with_relative_width(0.5).unwrap();
        let b = PanelLayout::new()
            .with_frame(true)
            .with_padding(Padding::uniform(Pad::Fraction(0.1)))
            .unwrap();
        let first = Layers::solve(&a, screen(41, 10));
        let _ = Layers::solve(&b, screen(200, 60));
        let second = Layers::solve(&a, screen(41, 10));
        assert_eq!(first, second);
    }
}
