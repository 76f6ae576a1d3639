//! Rendering surface contract.
//!
//! The slicer never builds nodes itself. It describes what is visible and asks
//! a host-provided surface to create, update and remove nodes for it. Any
//! retained-mode toolkit can implement these traits.

use crate::model::{DataPoint, ScaledValue};

use super::input::Bound;
use super::layout::ItemStyle;

/// Placement of one rendered cell, relative to the viewport origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSlot {
    /// Stable key of the item rendered in this cell.
    pub key: usize,
    /// Index of the item in the bound list.
    pub index: usize,
    /// Grid row.
    pub row: usize,
    /// Grid column.
    pub column: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Visual selection state of one rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowStyle {
    /// The item is selected.
    pub selected: bool,
    /// Another item is selected and this one is not.
    pub dimmed: bool,
}

/// Receives enter/update/exit calls for the rows of a windowed list.
///
/// `enter` is called for rows that become visible, `update` for rows that stay
/// visible across a render and `exit` for rows that leave the window. Rows
/// outside the window are never materialized.
pub trait RowSurface<T> {
    /// Creates the node for a newly visible row.
    fn enter(&mut self, slot: &CellSlot, item: &T);

    /// Refreshes the node of a row that stayed visible.
    fn update(&mut self, slot: &CellSlot, item: &T);

    /// Removes the node of a row that left the window.
    fn exit(&mut self, slot: &CellSlot);

    /// Applies selection styling to a rendered row.
    fn apply_style(&mut self, _slot: &CellSlot, _style: RowStyle) {}
}

/// The full slicer surface: list rows plus the header, slider and inputs.
pub trait SlicerSurface: RowSurface<DataPoint> {
    /// Sets the header text.
    fn set_header(&mut self, _text: &str) {}

    /// Applies spacing and label sizing to the header and every item.
    fn set_item_style(&mut self, _style: &ItemStyle) {}

    /// Moves the slider thumbs.
    fn set_slider(&mut self, _value: ScaledValue) {}

    /// Replaces the text shown in a bound input.
    fn set_input_text(&mut self, _bound: Bound, _text: &str) {}
}
