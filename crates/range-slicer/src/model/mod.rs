//! State models of the slicer.
//!
//! - [`ScalableRange`]: the committed numeric range and its slider projection
//! - [`SelectionModel`]: which list items are selected
//! - [`DataPoint`]: one row of the slicer list

mod data_point;
mod range;
mod selection;

pub use data_point::{DataPoint, SelectionId, apply_search, matches_search};
pub use range::{RangeValue, SCALE_MAX, SCALE_MIN, ScalableRange, ScaledValue, format_bound};
pub use selection::{SelectionFlags, SelectionModel};
