/// Integer size measured in terminal character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// The full-screen rectangle for a terminal of this size.
    pub const fn to_rect(self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

/// Rectangle anchored within the terminal grid. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when `other` lies entirely inside `self`. A zero-size rectangle
    /// sitting on the edge still counts as contained.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Shrink the rectangle by the given amount per side.
    ///
    /// Insets larger than the available span are clamped: the origin never
    /// moves past the far edge and the size bottoms out at zero.
    pub fn inset(&self, top: u16, right: u16, bottom: u16, left: u16) -> Rect {
        let left = left.min(self.width);
        let top = top.min(self.height);
        let width = self.width.saturating_sub(left).saturating_sub(right);
        let height = self.height.saturating_sub(top).saturating_sub(bottom);
        Rect::new(self.x + left, self.y + top, width, height)
    }

    /// Zero-size rectangle at this rectangle's origin.
    pub fn collapsed(&self) -> Rect {
        Rect::new(self.x, self.y, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inset_clamps_to_zero() {
        let rect = Rect::new(4, 2, 3, 1);
        let inner = rect.inset(1, 1, 1, 1);
        assert_eq!(inner, Rect::new(5, 3, 1, 0));
        assert!(rect.contains(&inner));

        let tiny = Rect::new(0, 0, 1, 1).inset(1, 1, 1, 1);
        assert_eq!(tiny, Rect::new(1, 1, 0, 0));
        assert!(Rect::new(0, 0, 1, 1).contains(&tiny));
    }

    #[test]
    fn contains_rejects_overhang() {
        let outer = Rect::new(0, 0, 10, 5);
        assert!(outer.contains(&Rect::new(2, 1, 8, 4)));
        assert!(!outer.contains(&Rect::new(2, 1, 9, 4)));
        assert!(!outer.contains(&Rect::new(0, 0, 10, 6)));
    }
}
