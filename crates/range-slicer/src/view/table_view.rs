//! Windowed grid view.
//!
//! [`TableView`] lays a list of items out on a grid and renders only the
//! cells that intersect the viewport. Each render diffs the visible window
//! against the previously rendered cells by key and reports the result to a
//! [`RowSurface`] as enter/update/exit calls, so the cost of a render is
//! proportional to the number of visible rows, not to the length of the list.
//!
//! # Grid Flow
//!
//! - `columns > 0`: items fill rows left to right, the grid scrolls vertically.
//! - `columns == 0 && rows > 0`: items fill columns top to bottom, the grid
//!   scrolls horizontally.
//! - both 0: a single column.
//!
//! # Example
//!
//! ```
//! use range_slicer::view::{CellSlot, RowSurface, TableView, Viewport};
//!
//! struct Counter(usize);
//!
//! impl RowSurface<u32> for Counter {
//!     fn enter(&mut self, _slot: &CellSlot, _item: &u32) { self.0 += 1; }
//!     fn update(&mut self, _slot: &CellSlot, _item: &u32) {}
//!     fn exit(&mut self, _slot: &CellSlot) {}
//! }
//!
//! let mut view = TableView::<u32>::new().with_columns(1).with_row_height(20.0);
//! view.viewport(Viewport::new(100.0, 200.0));
//! view.data(Some((0..1000).collect()), |index, _| index, true);
//!
//! let mut surface = Counter(0);
//! view.render(&mut surface);
//! assert_eq!(surface.0, 10);
//! ```

use std::collections::BTreeMap;
use std::ops::Range;

use range_slicer_core::PerfSpan;
use range_slicer_core::logging::{span_names, targets};

use crate::model::DataPoint;

use super::layout::Viewport;
use super::surface::{CellSlot, RowSurface};

/// Direction items are laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Rows of items, scrolling vertically.
    #[default]
    Vertical,
    /// Columns of items, scrolling horizontally.
    Horizontal,
}

/// Counts of the surface calls made by one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

impl RenderStats {
    /// Number of rows materialized by the render.
    pub fn rendered(&self) -> usize {
        self.entered + self.updated
    }
}

/// A scrollable, windowed grid over a list of items.
pub struct TableView<T> {
    rows: u32,
    columns: u32,
    row_height: f64,
    column_width: f64,
    viewport: Viewport,

    items: Vec<T>,
    keys: Vec<usize>,

    scroll_x: f64,
    scroll_y: f64,

    /// Item indices intersecting the viewport.
    window: Range<usize>,
    /// Cells drawn by the last render, by key.
    rendered: BTreeMap<usize, CellSlot>,
    render_count: u64,
}

/// The slicer's item list.
pub type DataPointTable = TableView<DataPoint>;

impl<T> Default for TableView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TableView<T> {
    /// Creates an empty single-column view.
    pub fn new() -> Self {
        Self {
            rows: 0,
            columns: 1,
            row_height: 0.0,
            column_width: 0.0,
            viewport: Viewport::default(),
            items: Vec::new(),
            keys: Vec::new(),
            scroll_x: 0.0,
            scroll_y: 0.0,
            window: 0..0,
            rendered: BTreeMap::new(),
            render_count: 0,
        }
    }

    /// Sets the row count using builder pattern.
    pub fn with_rows(mut self, rows: u32) -> Self {
        self.rows = rows;
        self
    }

    /// Sets the column count using builder pattern.
    pub fn with_columns(mut self, columns: u32) -> Self {
        self.columns = columns;
        self
    }

    /// Sets the row height using builder pattern.
    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = row_height;
        self
    }

    /// Sets the column width using builder pattern.
    pub fn with_column_width(mut self, column_width: f64) -> Self {
        self.column_width = column_width;
        self
    }

    // =========================================================================
    // Grid Configuration
    // =========================================================================

    /// Sets the configured row count. 0 means unlimited.
    pub fn rows(&mut self, rows: u32) -> &mut Self {
        self.rows = rows;
        self
    }

    /// Sets the configured column count. 0 with rows > 0 flows horizontally.
    pub fn columns(&mut self, columns: u32) -> &mut Self {
        self.columns = columns;
        self
    }

    /// Sets the row height in pixels.
    pub fn row_height(&mut self, row_height: f64) -> &mut Self {
        self.row_height = row_height;
        self
    }

    /// Sets the column width in pixels. 0 divides the viewport evenly.
    pub fn column_width(&mut self, column_width: f64) -> &mut Self {
        self.column_width = column_width;
        self
    }

    /// Direction items are laid out in.
    pub fn flow(&self) -> Flow {
        if self.columns == 0 && self.rows > 0 {
            Flow::Horizontal
        } else {
            Flow::Vertical
        }
    }

    /// Number of grid columns for the bound items.
    pub fn computed_columns(&self) -> usize {
        match self.flow() {
            Flow::Vertical => (self.columns as usize).max(1),
            Flow::Horizontal => self.items.len().div_ceil(self.rows as usize).max(1),
        }
    }

    /// Number of grid rows for the bound items.
    pub fn computed_rows(&self) -> usize {
        match self.flow() {
            Flow::Vertical => self.items.len().div_ceil(self.computed_columns()),
            Flow::Horizontal => (self.rows as usize).min(self.items.len()),
        }
    }

    /// Effective cell width in pixels.
    pub fn cell_width(&self) -> f64 {
        if self.column_width > 0.0 {
            self.column_width
        } else {
            self.viewport.width / self.computed_columns() as f64
        }
    }

    /// Effective cell height in pixels.
    pub fn cell_height(&self) -> f64 {
        self.row_height.max(1.0)
    }

    // =========================================================================
    // Data and Viewport
    // =========================================================================

    /// Binds a new ordered list of items.
    ///
    /// `key_fn` gives each item the stable key used to decide which rendered
    /// cells are reused. `reset_scroll` moves the window back to the origin;
    /// otherwise the scroll offset is kept, clamped to the new content. `None`
    /// is treated as an empty list.
    pub fn data<F>(&mut self, items: Option<Vec<T>>, key_fn: F, reset_scroll: bool) -> &mut Self
    where
        F: Fn(usize, &T) -> usize,
    {
        self.items = items.unwrap_or_default();
        self.keys = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| key_fn(index, item))
            .collect();

        if reset_scroll {
            self.scroll_x = 0.0;
            self.scroll_y = 0.0;
        }
        self.clamp_scroll();
        self.recompute_window();

        tracing::debug!(
            target: targets::TABLE_VIEW,
            items = self.items.len(),
            reset_scroll,
            window = ?self.window,
            "data bound"
        );
        self
    }

    /// Sets the pixel box available for rendering and recomputes the window.
    pub fn viewport(&mut self, viewport: Viewport) -> &mut Self {
        self.viewport = viewport;
        self.clamp_scroll();
        self.recompute_window();
        self
    }

    /// The current viewport.
    pub fn current_viewport(&self) -> Viewport {
        self.viewport
    }

    /// The bound items.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of bound items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no items are bound.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// Horizontal scroll offset.
    pub fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    /// Vertical scroll offset.
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Sets the scroll offset, clamped to the content.
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.scroll_x = x;
        self.scroll_y = y;
        self.clamp_scroll();
        self.recompute_window();
    }

    /// Indices of the items intersecting the viewport.
    pub fn visible_range(&self) -> Range<usize> {
        self.window.clone()
    }

    fn max_scroll_x(&self) -> f64 {
        match self.flow() {
            Flow::Vertical => 0.0,
            Flow::Horizontal => {
                (self.computed_columns() as f64 * self.cell_width() - self.viewport.width).max(0.0)
            }
        }
    }

    fn max_scroll_y(&self) -> f64 {
        (self.computed_rows() as f64 * self.cell_height() - self.viewport.height).max(0.0)
    }

    fn clamp_scroll(&mut self) {
        self.scroll_x = sanitize(self.scroll_x).clamp(0.0, self.max_scroll_x());
        self.scroll_y = sanitize(self.scroll_y).clamp(0.0, self.max_scroll_y());
    }

    fn recompute_window(&mut self) {
        let len = self.items.len();
        if len == 0 {
            self.window = 0..0;
            return;
        }

        // A "line" is a grid row in vertical flow and a grid column otherwise
        let (offset, extent, line_size, per_line) = match self.flow() {
            Flow::Vertical => (
                self.scroll_y,
                self.viewport.height,
                self.cell_height(),
                self.computed_columns(),
            ),
            Flow::Horizontal => (
                self.scroll_x,
                self.viewport.width,
                self.cell_width().max(1.0),
                self.rows as usize,
            ),
        };

        // Float to usize casts saturate; an unbounded extent shows every line
        let first_line = (offset / line_size).floor() as usize;
        let end_line = if extent.is_finite() {
            ((offset + extent) / line_size).ceil() as usize
        } else {
            usize::MAX
        };
        let start = first_line.saturating_mul(per_line).min(len);
        let end = end_line.saturating_mul(per_line).min(len);
        self.window = start..end;
    }

    fn slot_for(&self, index: usize) -> CellSlot {
        let (row, column) = match self.flow() {
            Flow::Vertical => {
                let columns = self.computed_columns();
                (index / columns, index % columns)
            }
            Flow::Horizontal => {
                let rows = self.rows as usize;
                (index % rows, index / rows)
            }
        };
        let width = self.cell_width();
        let height = self.cell_height();

        CellSlot {
            key: self.keys[index],
            index,
            row,
            column,
            x: column as f64 * width - self.scroll_x,
            y: row as f64 * height - self.scroll_y,
            width,
            height,
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Renders the visible window.
    ///
    /// Rows whose key was rendered last time get `update`, new keys get
    /// `enter` and keys that left the window get `exit`.
    pub fn render<S>(&mut self, surface: &mut S) -> RenderStats
    where
        S: RowSurface<T> + ?Sized,
    {
        let _perf = PerfSpan::new(span_names::RENDER);

        let mut stats = RenderStats::default();
        let mut previous = std::mem::take(&mut self.rendered);
        let mut next = BTreeMap::new();

        for index in self.window.clone() {
            let slot = self.slot_for(index);
            let item = &self.items[index];
            if previous.remove(&slot.key).is_some() {
                surface.update(&slot, item);
                stats.updated += 1;
            } else {
                surface.enter(&slot, item);
                stats.entered += 1;
            }
            next.insert(slot.key, slot);
        }

        for slot in previous.values() {
            surface.exit(slot);
            stats.exited += 1;
        }

        self.rendered = next;
        self.render_count += 1;

        tracing::trace!(
            target: targets::TABLE_VIEW,
            entered = stats.entered,
            updated = stats.updated,
            exited = stats.exited,
            "rendered window"
        );
        stats
    }

    /// Removes every rendered row and unbinds all items.
    pub fn empty<S>(&mut self, surface: &mut S)
    where
        S: RowSurface<T> + ?Sized,
    {
        for slot in std::mem::take(&mut self.rendered).values() {
            surface.exit(slot);
        }
        self.items.clear();
        self.keys.clear();
        self.scroll_x = 0.0;
        self.scroll_y = 0.0;
        self.window = 0..0;
        tracing::debug!(target: targets::TABLE_VIEW, "view emptied");
    }

    /// Cells drawn by the last render, in key order.
    pub fn rendered(&self) -> impl Iterator<Item = &CellSlot> {
        self.rendered.values()
    }

    /// Number of cells drawn by the last render.
    pub fn rendered_count(&self) -> usize {
        self.rendered.len()
    }

    /// Number of completed renders.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }
}

fn sanitize(offset: f64) -> f64 {
    if offset.is_finite() { offset } else { 0.0 }
}
