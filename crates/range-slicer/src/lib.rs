//! Range Slicer - an interactive numeric range slicer control.
//!
//! The slicer shows a dual-handle slider and two bound inputs over a numeric
//! category column, next to a windowed list of the category values. It keeps
//! the slider, the inputs and the list in sync with one committed range,
//! issues a range filter to the host whenever that range changes, and
//! persists both the range and the item selection through host callbacks.
//!
//! # Modules
//!
//! - [`model`]: range, selection and data point state
//! - [`converter`]: host snapshot to slicer data
//! - [`behavior`]: selection behavior and range filter requests
//! - [`view`]: windowed list, slider and input state machines
//! - [`controller`]: the update cycle tying everything together
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use range_slicer::controller::{SlicerHost, SliderSyncController, UpdateOptions};
//! use range_slicer::filter::AdvancedFilter;
//! use range_slicer::model::DataPoint;
//! use range_slicer::settings::PersistPatch;
//! use range_slicer::snapshot::{CategoryValue, ColumnMetadata, DataSnapshot};
//! use range_slicer::view::{CellSlot, RowSurface, SlicerSurface, Viewport};
//!
//! struct Host;
//!
//! impl SlicerHost for Host {
//!     fn apply_advanced_filter(&self, filter: &AdvancedFilter) {
//!         println!("filter: {} conditions", filter.conditions.len());
//!     }
//!     fn persist_properties(&self, _patch: &PersistPatch) {}
//! }
//!
//! #[derive(Default)]
//! struct Rows(usize);
//!
//! impl RowSurface<DataPoint> for Rows {
//!     fn enter(&mut self, _slot: &CellSlot, _item: &DataPoint) { self.0 += 1; }
//!     fn update(&mut self, _slot: &CellSlot, _item: &DataPoint) {}
//!     fn exit(&mut self, _slot: &CellSlot) { self.0 -= 1; }
//! }
//!
//! impl SlicerSurface for Rows {}
//!
//! let snapshot = DataSnapshot::new(
//!     ColumnMetadata::new("Amount", "Sales.Amount"),
//!     (0..100).map(|i| CategoryValue::new(format!("k{i}"), i as f64)).collect(),
//! );
//!
//! let mut slicer = SliderSyncController::new(Rows::default(), Arc::new(Host));
//! slicer.update(UpdateOptions::new(Viewport::new(300.0, 400.0)).with_snapshot(snapshot));
//! assert!(slicer.surface().0 < 100);
//! ```

pub mod behavior;
pub mod controller;
pub mod converter;
pub mod error;
pub mod filter;
pub mod model;
pub mod settings;
pub mod snapshot;
pub mod view;

pub use behavior::{Modifiers, RowKey, SelectionBehavior};
pub use controller::{SlicerHost, SliderSyncController, UpdateOptions};
pub use converter::{CategoryConverter, SlicerConverter, SlicerData};
pub use error::{DomainError, ParseError};
pub use model::{DataPoint, RangeValue, ScalableRange, ScaledValue, SelectionId};

pub use range_slicer_core::{ConnectionId, PerfSpan, Signal};
