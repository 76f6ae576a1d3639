//! Selection model for slicer items.
//!
//! This module provides [`SelectionModel`], which tracks which items of the
//! slicer list are selected. Items are addressed by [`SelectionId`] rather than
//! by row, so that selection survives re-renders and refreshes that keep the
//! same category identities.
//!
//! # Example
//!
//! ```
//! use range_slicer::model::{SelectionFlags, SelectionId, SelectionModel};
//!
//! let mut selection = SelectionModel::new();
//! selection.select(SelectionId::new("a"), SelectionFlags::CLEAR_AND_SELECT);
//! selection.select(SelectionId::new("b"), SelectionFlags::TOGGLE);
//! assert_eq!(selection.selected_count(), 2);
//! ```

use std::collections::HashSet;

use range_slicer_core::logging::targets;

use super::data_point::SelectionId;

/// Flags controlling selection operations.
///
/// These flags can be combined to perform complex selection operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionFlags {
    /// Clear existing selection before applying operation.
    pub clear: bool,
    /// Select the specified items.
    pub select: bool,
    /// Toggle selection state of specified items.
    pub toggle: bool,
    /// Update anchor point for range selection.
    pub anchor: bool,
}

impl SelectionFlags {
    /// No operation.
    pub const NONE: Self = Self::empty();

    /// Clear existing selection.
    pub const CLEAR: Self = Self {
        clear: true,
        ..Self::empty()
    };

    /// Select the item.
    pub const SELECT: Self = Self {
        select: true,
        ..Self::empty()
    };

    /// Toggle selection of the item.
    pub const TOGGLE: Self = Self {
        toggle: true,
        ..Self::empty()
    };

    /// Clear existing selection and select the item.
    pub const CLEAR_AND_SELECT: Self = Self {
        clear: true,
        select: true,
        ..Self::empty()
    };

    const fn empty() -> Self {
        Self {
            clear: false,
            select: false,
            toggle: false,
            anchor: false,
        }
    }

    /// Creates flags with anchor set.
    pub fn with_anchor(mut self) -> Self {
        self.anchor = true;
        self
    }
}

/// Manages selection state for the slicer list.
///
/// Tracks which items are selected, in selection order, and the anchor item
/// that Shift+click extends from.
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    /// Anchor item for range selection.
    anchor: Option<SelectionId>,

    /// Set of selected ids for O(1) lookup.
    selected_ids: HashSet<SelectionId>,

    /// Selected ids in selection order.
    selected_order: Vec<SelectionId>,
}

impl SelectionModel {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the anchor item for range selection.
    pub fn anchor(&self) -> Option<&SelectionId> {
        self.anchor.as_ref()
    }

    // =========================================================================
    // Selection Queries
    // =========================================================================

    /// Checks if an item is selected.
    pub fn is_selected(&self, id: &SelectionId) -> bool {
        self.selected_ids.contains(id)
    }

    /// Returns true if any items are selected.
    pub fn has_selection(&self) -> bool {
        !self.selected_order.is_empty()
    }

    /// Returns the number of selected items.
    pub fn selected_count(&self) -> usize {
        self.selected_order.len()
    }

    /// Returns the selected ids in selection order.
    pub fn selected_ids(&self) -> &[SelectionId] {
        &self.selected_order
    }

    // =========================================================================
    // Selection Operations
    // =========================================================================

    /// Performs a selection operation on an item.
    ///
    /// The behavior depends on the flags:
    /// - `clear`: Deselects all items first
    /// - `select`: Adds the item to selection
    /// - `toggle`: Toggles the selection state
    /// - `anchor`: Makes the item the anchor for later range selection
    pub fn select(&mut self, id: SelectionId, flags: SelectionFlags) {
        if flags.clear {
            self.clear_ids();
        }

        let was_selected = self.selected_ids.contains(&id);
        if flags.toggle {
            if was_selected {
                self.remove_from_selection(&id);
            } else {
                self.add_to_selection(id.clone());
            }
        } else if flags.select && !was_selected {
            self.add_to_selection(id.clone());
        }

        if flags.anchor {
            self.anchor = Some(id);
        }
        self.trace_change();
    }

    /// Selects every id in `ids` (used for Shift+click across an ordered span).
    ///
    /// The anchor is left where it was.
    pub fn select_range(&mut self, ids: &[SelectionId], flags: SelectionFlags) {
        if flags.clear {
            self.clear_ids();
        }
        for id in ids {
            if !self.selected_ids.contains(id) {
                self.add_to_selection(id.clone());
            }
        }
        self.trace_change();
    }

    /// Selects all of `ids`, replacing the previous selection.
    pub fn select_all(&mut self, ids: &[SelectionId]) {
        self.select_range(ids, SelectionFlags::CLEAR);
    }

    /// Clears all selection and the anchor.
    pub fn clear_selection(&mut self) {
        self.clear_ids();
        self.anchor = None;
    }

    /// Replaces the selection with ids read from persisted state.
    pub fn restore(&mut self, ids: impl IntoIterator<Item = SelectionId>) {
        self.clear_ids();
        for id in ids {
            if self.selected_ids.insert(id.clone()) {
                self.selected_order.push(id);
            }
        }
        tracing::debug!(
            target: targets::SELECTION,
            count = self.selected_order.len(),
            "selection restored"
        );
    }

    /// Drops selected ids for which `keep` returns false.
    ///
    /// Returns the number of ids removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&SelectionId) -> bool) -> usize {
        let before = self.selected_order.len();
        self.selected_order.retain(|id| keep(id));
        self.selected_ids = self.selected_order.iter().cloned().collect();
        if self.anchor.as_ref().is_some_and(|id| !self.selected_ids.contains(id)) {
            self.anchor = None;
        }
        before - self.selected_order.len()
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    fn add_to_selection(&mut self, id: SelectionId) {
        self.selected_ids.insert(id.clone());
        self.selected_order.push(id);
    }

    fn remove_from_selection(&mut self, id: &SelectionId) {
        self.selected_ids.remove(id);
        self.selected_order.retain(|selected| selected != id);
    }

    fn clear_ids(&mut self) {
        self.selected_ids.clear();
        self.selected_order.clear();
    }

    fn trace_change(&self) {
        tracing::trace!(
            target: targets::SELECTION,
            count = self.selected_order.len(),
            anchor = ?self.anchor,
            "selection changed"
        );
    }
}

static_assertions::assert_impl_all!(SelectionModel: Send, Sync);
