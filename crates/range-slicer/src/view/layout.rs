//! Pixel layout of the slicer body.

use serde::{Deserialize, Serialize};

use crate::settings::{SlicerSettings, SlicerTextSettings};

/// Width reserved for the vertical scrollbar of the list.
pub const SCROLLBAR_WIDTH: f64 = 17.0;

/// Height taken by the header, slider and bound inputs above the list.
pub const HEADER_HEIGHT: f64 = 120.0;

/// Horizontal padding inside one item chiclet.
pub const CHICLET_PADDING: f64 = 14.0;

/// Left and right border of one cell.
pub const CELL_BORDERS: f64 = 2.0;

/// Line height relative to the font size.
const LINE_HEIGHT_FACTOR: f64 = 1.25;

/// Pixel box available for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Creates a viewport.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The part of this viewport left for the item list.
    pub fn slicer_body(&self) -> Viewport {
        Viewport {
            width: (self.width - SCROLLBAR_WIDTH).max(0.0),
            height: (self.height - HEADER_HEIGHT).max(0.0),
        }
    }
}

/// Converts a size in points to pixels.
pub fn points_to_pixels(points: f64) -> f64 {
    points * 96.0 / 72.0
}

/// Estimated height of one line of text at `text_size` points.
pub fn estimate_text_height(text_size: f64) -> f64 {
    (points_to_pixels(text_size) * LINE_HEIGHT_FACTOR).ceil()
}

/// Row height for the configured text, derived from the text size when the
/// configured height is 0.
pub fn row_height(text: &SlicerTextSettings) -> f64 {
    if text.height > 0.0 {
        text.height
    } else {
        estimate_text_height(text.text_size)
    }
}

/// Widest label that fits in a cell of `cell_width` pixels.
pub fn label_max_width(cell_width: f64) -> f64 {
    (cell_width - CHICLET_PADDING - CELL_BORDERS).max(0.0)
}

/// Spacing and text sizing of the header and the item cells.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemStyle {
    pub header_margin_left: f64,
    pub header_margin_top: f64,
    /// Left margin of every item container.
    pub item_margin_left: f64,
    /// Padding inside every item row.
    pub padding: f64,
    /// Label font size in pixels.
    pub font_size: f64,
    /// Labels wider than this are truncated by the surface.
    pub label_max_width: f64,
}

impl ItemStyle {
    /// Derives the style from settings for cells `cell_width` pixels wide.
    pub fn new(settings: &SlicerSettings, cell_width: f64) -> Self {
        Self {
            header_margin_left: settings.header_text.margin_left,
            header_margin_top: settings.header_text.margin_top,
            item_margin_left: settings.slicer_item_container.margin_left,
            padding: settings.slicer_text.padding,
            font_size: points_to_pixels(settings.slicer_text.text_size),
            label_max_width: label_max_width(cell_width),
        }
    }
}
