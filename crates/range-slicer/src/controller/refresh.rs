//! Per-update refresh decisions.

use range_slicer_core::logging::targets;

use crate::settings::SlicerSettings;
use crate::snapshot::DataSnapshot;
use crate::view::Viewport;

/// Inputs of one update cycle.
///
/// Built once per update from the previous and incoming state and discarded
/// when the cycle ends.
#[derive(Debug, Clone, Copy)]
pub struct RefreshContext<'a> {
    pub previous_snapshot: Option<&'a DataSnapshot>,
    pub next_snapshot: &'a DataSnapshot,
    pub previous_settings: Option<&'a SlicerSettings>,
    pub previous_viewport: Option<Viewport>,
    pub viewport: Viewport,
}

/// What an update cycle has to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPlan {
    /// The category set changed; the list scrolls back to the origin.
    pub reset_scrollbar_position: bool,
    /// The viewport size differs from the previous cycle.
    pub viewport_changed: bool,
}

impl RefreshPlan {
    /// A cycle that keeps the scroll position and the viewport.
    pub const UNCHANGED: Self = Self {
        reset_scrollbar_position: false,
        viewport_changed: false,
    };
}

impl<'a> RefreshContext<'a> {
    /// Creates a context for a cycle with no history.
    pub fn new(next_snapshot: &'a DataSnapshot, viewport: Viewport) -> Self {
        Self {
            previous_snapshot: None,
            next_snapshot,
            previous_settings: None,
            previous_viewport: None,
            viewport,
        }
    }

    /// Sets the snapshot of the previous cycle.
    pub fn with_previous_snapshot(mut self, snapshot: Option<&'a DataSnapshot>) -> Self {
        self.previous_snapshot = snapshot;
        self
    }

    /// Sets the settings of the previous cycle.
    pub fn with_previous_settings(mut self, settings: Option<&'a SlicerSettings>) -> Self {
        self.previous_settings = settings;
        self
    }

    /// Sets the viewport of the previous cycle.
    pub fn with_previous_viewport(mut self, viewport: Option<Viewport>) -> Self {
        self.previous_viewport = viewport;
        self
    }

    /// Decides the cycle.
    ///
    /// The scroll position resets on the first cycle and whenever the category
    /// identities changed. A viewport change alone never resets it.
    pub fn resolve(&self) -> RefreshPlan {
        let reset_scrollbar_position = self
            .previous_snapshot
            .is_none_or(|previous| !previous.has_same_category_identity(self.next_snapshot));
        let viewport_changed = self.previous_viewport != Some(self.viewport);

        tracing::debug!(
            target: targets::CONTROLLER,
            reset_scrollbar_position,
            viewport_changed,
            "refresh resolved"
        );
        RefreshPlan {
            reset_scrollbar_position,
            viewport_changed,
        }
    }

    /// Whether the in-memory selection still matches the incoming settings.
    ///
    /// See [`is_selection_loaded`].
    pub fn is_selection_loaded(&self, next_settings: &SlicerSettings, selection_saved: bool) -> bool {
        is_selection_loaded(self.previous_settings, next_settings, selection_saved)
    }
}

/// Whether the in-memory selection still matches the incoming settings.
///
/// Right after the control saved a selection it is loaded unconditionally.
/// Otherwise it is loaded only when the persisted selection string is
/// unchanged. With no previous settings nothing has been loaded yet.
pub fn is_selection_loaded(
    previous: Option<&SlicerSettings>,
    next: &SlicerSettings,
    selection_saved: bool,
) -> bool {
    match previous {
        None => false,
        Some(_) if selection_saved => true,
        Some(previous) => previous.general.selection == next.general.selection,
    }
}
