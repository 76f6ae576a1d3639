//! Logging and debugging facilities for the range slicer.
//!
//! This module provides:
//! - Integration with the `tracing` crate for structured logging
//! - Target constants for filtering logs by subsystem
//! - Performance tracing hooks for profiling render and update cycles
//!
//! # Tracing Integration
//!
//! The slicer uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in the host application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("range_slicer=debug")
//!         .init();
//! }
//! ```

/// Span names used throughout the slicer for tracing.
///
/// These constants can be used to filter traces for specific subsystems.
pub mod span_names {
    /// One full refresh cycle driven by the host.
    pub const UPDATE: &str = "range_slicer::update";
    /// One render pass of the windowed list.
    pub const RENDER: &str = "range_slicer::render";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "range_slicer_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "range_slicer_core::signal";
    /// Range model target.
    pub const RANGE: &str = "range_slicer::range";
    /// Item selection target.
    pub const SELECTION: &str = "range_slicer::selection";
    /// Settings bag target.
    pub const SETTINGS: &str = "range_slicer::settings";
    /// Windowed list view target.
    pub const TABLE_VIEW: &str = "range_slicer::table_view";
    /// Slider and text input target.
    pub const INPUT: &str = "range_slicer::input";
    /// Orchestration target.
    pub const CONTROLLER: &str = "range_slicer::controller";
}

/// A guard that keeps a tracing span entered until it is dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "range_slicer::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
