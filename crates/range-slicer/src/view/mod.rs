//! View layer of the slicer.
//!
//! - [`TableView`]: windowed grid that renders only visible rows
//! - [`RowSurface`] / [`SlicerSurface`]: what a host implements to draw
//! - [`RangeSlider`]: dual-handle slider drag state
//! - [`RangeInput`]: bound text field editing state

mod input;
pub mod layout;
mod slider;
mod surface;
mod table_view;

pub use input::{Bound, CommitOutcome, InputState, RangeInput};
pub use layout::{ItemStyle, Viewport};
pub use slider::{DragState, Handle, RangeSlider};
pub use surface::{CellSlot, RowStyle, RowSurface, SlicerSurface};
pub use table_view::{DataPointTable, Flow, RenderStats, TableView};
