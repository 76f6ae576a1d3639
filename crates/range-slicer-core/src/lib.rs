//! Core systems for the range slicer.
//!
//! This crate provides the foundational components shared by the slicer
//! control:
//!
//! - **Signal/Slot System**: Type-safe notifications from components to the
//!   host (filter requests and persistence patches)
//! - **Logging**: `tracing` targets and performance spans
//!
//! # Signal/Slot Example
//!
//! ```
//! use range_slicer_core::Signal;
//!
//! // Create a signal that notifies when a bound is committed
//! let committed = Signal::<f64>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = committed.connect(|value| {
//!     println!("Committed bound: {}", value);
//! });
//!
//! // Emit the signal
//! committed.emit(12.5);
//!
//! // Disconnect when done
//! committed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
