//! Dual-handle range slider.
//!
//! [`RangeSlider`] tracks the two thumbs of the slider on the `[0, 100]`
//! scale. Dragging follows `Idle -> Dragging -> Committed -> Idle`: pointer
//! moves only ever move the visual thumb, and the position is handed to the
//! range model once, on release.

use range_slicer_core::logging::targets;

use crate::model::{SCALE_MAX, SCALE_MIN, ScaledValue};

/// One of the two slider thumbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Lower,
    Upper,
}

/// Pointer interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { handle: Handle },
}

/// Thumb positions and drag state of a two-handle slider.
pub struct RangeSlider {
    /// Positions currently drawn.
    value: ScaledValue,
    /// Positions last synced from the range model.
    committed: ScaledValue,
    state: DragState,
}

impl Default for RangeSlider {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeSlider {
    /// Creates a slider with both thumbs at the ends of the track.
    pub fn new() -> Self {
        Self {
            value: ScaledValue::FULL,
            committed: ScaledValue::FULL,
            state: DragState::Idle,
        }
    }

    /// Positions currently drawn.
    pub fn value(&self) -> ScaledValue {
        self.value
    }

    /// Current interaction state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Returns true while a thumb is held.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Syncs the thumbs from the range model.
    ///
    /// A drag in progress keeps its visual position; the synced value becomes
    /// the one restored by [`cancel`](Self::cancel).
    pub fn set_value(&mut self, value: ScaledValue) {
        self.committed = value;
        if !self.is_dragging() {
            self.value = value;
        }
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Grabs a thumb. Ignored while another drag is in progress.
    pub fn press(&mut self, handle: Handle) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.state = DragState::Dragging { handle };
        tracing::trace!(target: targets::INPUT, ?handle, "slider pressed");
        true
    }

    /// Grabs the thumb nearest to `position` and moves it there.
    pub fn press_at(&mut self, position: f64) -> Option<Handle> {
        let position = sanitize(position);
        let ScaledValue { min, max } = self.value;
        let handle = if min == max {
            // Coincident thumbs split by side
            if position > max { Handle::Upper } else { Handle::Lower }
        } else if (position - min).abs() <= (position - max).abs() {
            Handle::Lower
        } else {
            Handle::Upper
        };
        if !self.press(handle) {
            return None;
        }
        self.move_to(position);
        Some(handle)
    }

    /// Moves the held thumb. Returns the new visual positions.
    ///
    /// The thumb is clamped to the track and cannot pass the other thumb.
    pub fn move_to(&mut self, position: f64) -> Option<ScaledValue> {
        let DragState::Dragging { handle } = self.state else {
            return None;
        };
        let position = sanitize(position);
        match handle {
            Handle::Lower => self.value.min = position.min(self.value.max),
            Handle::Upper => self.value.max = position.max(self.value.min),
        }
        Some(self.value)
    }

    /// Releases the held thumb. Returns the positions to commit.
    pub fn release(&mut self) -> Option<ScaledValue> {
        if !self.is_dragging() {
            return None;
        }
        self.state = DragState::Idle;
        tracing::debug!(
            target: targets::INPUT,
            min = self.value.min,
            max = self.value.max,
            "slider released"
        );
        Some(self.value)
    }

    /// Aborts a drag and restores the last synced positions.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
        self.value = self.committed;
    }
}

fn sanitize(position: f64) -> f64 {
    if position.is_finite() {
        position.clamp(SCALE_MIN, SCALE_MAX)
    } else {
        SCALE_MIN
    }
}

static_assertions::assert_impl_all!(RangeSlider: Send, Sync);
