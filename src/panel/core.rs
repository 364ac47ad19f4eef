use crate::error::{ConfigError, Result};
use crate::geometry::Rect;
use crate::layout::{Alignment, Layers, PanelLayout};
use crate::render::{Decor, FrameKind, Style, StyledLine};
use crate::terminal::Key;
use crate::width::{display_width, truncate};

/// State every panel kind shares: geometry, decoration and the render cache.
#[derive(Debug, Clone)]
pub struct PanelCore {
    layout: PanelLayout,
    decor: Decor,
    parent: Option<Rect>,
    layers: Layers,
    lines: Option<Vec<StyledLine>>,
}

impl PanelCore {
    /// Full-screen, unframed core.
    pub fn new() -> Self {
        Self {
            layout: PanelLayout::new(),
            decor: Decor::new(),
            parent: None,
            layers: Layers::default(),
            lines: None,
        }
    }

    /// A layout that asks for a frame without naming one gets a light frame;
    /// a decor with a frame turns the layout's frame on.
    pub fn with_parts(layout: PanelLayout, mut decor: Decor) -> Result<Self> {
        let framed = layout.framed || decor.frame.is_some();
        if framed && decor.frame.is_none() {
            decor.frame = Some(FrameKind::Light);
        }
        decor.validate()?;
        Ok(Self {
            layout: layout.with_frame(framed),
            decor,
            parent: None,
            layers: Layers::default(),
            lines: None,
        })
    }

    pub fn set_layout(&mut self, layout: PanelLayout) -> Result<()> {
        *self = Self::with_parts(layout, self.decor.clone())?.resized_from(self.parent);
        Ok(())
    }

    pub fn set_decor(&mut self, decor: Decor) -> Result<()> {
        let layout = self.layout.with_frame(decor.frame.is_some());
        *self = Self::with_parts(layout, decor)?.resized_from(self.parent);
        Ok(())
    }

    fn resized_from(mut self, parent: Option<Rect>) -> Self {
        if let Some(parent) = parent {
            self.resize(parent);
        }
        self
    }

    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    pub fn decor(&self) -> &Decor {
        &self.decor
    }

    pub fn layers(&self) -> Layers {
        self.layers
    }

    /// Height of the Content layer, in rows.
    pub fn content_height(&self) -> usize {
        self.layers.content.height as usize
    }

    /// Recompute the layers for a new parent. A parent equal to the current
    /// one keeps the cache.
    pub fn resize(&mut self, parent: Rect) {
        if self.parent == Some(parent) {
            return;
        }
        self.parent = Some(parent);
        self.layers = Layers::solve(&self.layout, parent);
        self.lines = None;
    }

    pub fn mark_dirty(&mut self) {
        self.lines = None;
    }

    pub fn is_dirty(&self) -> bool {
        self.lines.is_none()
    }

    pub fn cached_lines(&self) -> Option<&[StyledLine]> {
        self.lines.as_deref()
    }

    pub fn store_lines(&mut self, lines: Vec<StyledLine>) {
        self.lines = Some(lines);
    }
}

impl Default for PanelCore {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered map from key symbols to panel actions.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings<A> {
    entries: Vec<(Key, A)>,
}

impl<A> Default for KeyBindings<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<A: Copy> KeyBindings<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, key: Key, action: A) -> Result<()> {
        if self.contains(key) {
            return Err(ConfigError::DuplicateBinding(key).into());
        }
        self.entries.push((key, action));
        Ok(())
    }

    /// Bind every pair, stopping at the first duplicate.
    pub fn bind_all(&mut self, pairs: impl IntoIterator<Item = (Key, A)>) -> Result<()> {
        for (key, action) in pairs {
            self.bind(key, action)?;
        }
        Ok(())
    }

    /// Bind `key`, replacing any action it already had.
    pub fn set(&mut self, key: Key, action: A) {
        match self.entries.iter_mut().find(|(bound, _)| *bound == key) {
            Some(entry) => entry.1 = action,
            None => self.entries.push((key, action)),
        }
    }

    pub fn unbind(&mut self, key: Key) -> Option<A> {
        let index = self.entries.iter().position(|(bound, _)| *bound == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn action(&self, key: Key) -> Option<A> {
        self.entries
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, action)| *action)
    }

    pub fn contains(&self, key: Key) -> bool {
        self.entries.iter().any(|(bound, _)| *bound == key)
    }

    /// Bound keys in binding order.
    pub fn keys(&self) -> Vec<Key> {
        self.entries.iter().map(|(key, _)| *key).collect()
    }
}

pub(crate) const SCROLL_UP_MARKER: &str = "[▲]";
pub(crate) const SCROLL_DOWN_MARKER: &str = "[▼]";

/// Visible slice of a scrolled list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
    pub more_above: bool,
    pub more_below: bool,
}

/// Scroll position over `total` rows shown in `height` rows.
///
/// When the rows overflow, a `[▲]` or `[▼]` marker row replaces the first or
/// last visible row. Areas under three rows tall scroll without markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    offset: usize,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn window(&self, total: usize, height: usize) -> Window {
        window_at(self.offset.min(max_offset(total, height)), total, height)
    }

    pub fn home(&mut self) {
        self.offset = 0;
    }

    pub fn end(&mut self, total: usize, height: usize) {
        self.offset = max_offset(total, height);
    }

    pub fn scroll_by(&mut self, delta: isize, total: usize, height: usize) {
        let target = self.offset.saturating_add_signed(delta);
        self.offset = target.min(max_offset(total, height));
    }

    /// Rows visible at the current offset.
    pub fn page(&self, total: usize, height: usize) -> usize {
        let window = self.window(total, height);
        (window.end - window.start).max(1)
    }

    /// Scroll the minimum needed for row `index` to be visible.
    pub fn reveal(&mut self, index: usize, total: usize, height: usize) {
        if height == 0 || total == 0 {
            return;
        }
        let index = index.min(total - 1);
        let limit = max_offset(total, height);
        self.offset = self.offset.min(limit);
        if index < self.offset {
            self.offset = index;
        }
        while self.offset < limit && index >= window_at(self.offset, total, height).end {
            self.offset += 1;
        }
    }

    /// Lay the visible rows out with overflow markers, one line per row.
    pub fn lines(
        &self,
        rows: &[StyledLine],
        height: usize,
        width: u16,
        base: Style,
    ) -> Vec<StyledLine> {
        let window = self.window(rows.len(), height);
        let mut out = Vec::with_capacity(height);
        if window.more_above {
            out.push(marker_line(SCROLL_UP_MARKER, width, base));
        }
        out.extend(rows[window.start..window.end].iter().cloned());
        if window.more_below {
            out.push(marker_line(SCROLL_DOWN_MARKER, width, base));
        }
        out
    }
}

fn markers_fit(height: usize) -> bool {
    height >= 3
}

fn window_at(offset: usize, total: usize, height: usize) -> Window {
    if total <= height {
        return Window {
            start: 0,
            end: total,
            more_above: false,
            more_below: false,
        };
    }
    if !markers_fit(height) {
        let start = offset.min(total - height);
        return Window {
            start,
            end: start + height,
            more_above: start > 0,
            more_below: start + height < total,
        };
    }
    let more_above = offset > 0;
    let mut rows = height - usize::from(more_above);
    let more_below = offset + rows < total;
    if more_below {
        rows -= 1;
    }
    Window {
        start: offset,
        end: (offset + rows).min(total),
        more_above,
        more_below,
    }
}

fn max_offset(total: usize, height: usize) -> usize {
    if total <= height {
        return 0;
    }
    if !markers_fit(height) {
        return total - height;
    }
    // With a top marker and no bottom marker, height - 1 rows fit.
    total - (height - 1)
}

fn marker_line(marker: &str, width: u16, base: Style) -> StyledLine {
    let used = display_width(marker) as u16;
    let offset = width.saturating_sub(used) / 2;
    StyledLine::aligned(marker, offset as usize, width, base, Style::plain())
}

/// Place `lines` inside an `area`-sized block according to `align`, one
/// output line per row of the block.
pub fn aligned_block(lines: &[String], area: Rect, align: Alignment, base: Style) -> Vec<StyledLine> {
    let height = area.height as usize;
    let shown = lines.len().min(height);
    let top = align.vertical.offset(shown as u16, area.height) as usize;

    let mut out = Vec::with_capacity(height);
    for _ in 0..top {
        out.push(StyledLine::blank(area.width, base));
    }
    for line in lines.iter().take(shown) {
        let text = truncate(line, area.width as usize);
        let offset = align
            .horizontal
            .offset(display_width(&text) as u16, area.width);
        out.push(StyledLine::aligned(&text, offset as usize, area.width, base, Style::plain()));
    }
    out
}
