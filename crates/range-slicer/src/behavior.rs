//! Selection behavior.
//!
//! [`SelectionBehavior`] owns the committed range and the set of selected
//! items. It turns user interaction into state changes and into outbound
//! requests: every committed range change produces an [`AdvancedFilter`] and a
//! [`PersistPatch`], and every committed item selection change produces a
//! [`PersistPatch`] of the selected identities.
//!
//! # Signals
//!
//! - `filter_requested(AdvancedFilter)`: Emitted when the range predicate changes
//! - `persist_requested(PersistPatch)`: Emitted when state must be stored by the host

use std::collections::HashSet;

use range_slicer_core::Signal;
use range_slicer_core::logging::targets;

use crate::filter::{AdvancedFilter, FilterColumnTarget};
use crate::model::{DataPoint, ScalableRange, SelectionFlags, SelectionId, SelectionModel};
use crate::settings::{GENERAL, PersistPatch, SlicerSettings, bound_to_string};
use crate::view::{CellSlot, RowStyle, RowSurface};

/// Keyboard modifiers held during a pointer or key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    /// No modifier held.
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
    };

    /// Ctrl (or Cmd) held.
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
    };

    /// Shift held.
    pub const SHIFT: Self = Self {
        ctrl: false,
        shift: true,
    };
}

/// Keys handled on a focused row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKey {
    Space,
    Enter,
    /// The `A` key, which selects everything when combined with Ctrl.
    A,
}

/// Mediates between user interaction, the range model and the host.
pub struct SelectionBehavior {
    range: ScalableRange,
    selection: SelectionModel,
    column_target: FilterColumnTarget,
    /// A selection change was persisted since the last refresh.
    selection_saved: bool,

    /// Emitted with the filter to apply whenever the committed range changes.
    pub filter_requested: Signal<AdvancedFilter>,
    /// Emitted with every settings patch the host should store.
    pub persist_requested: Signal<PersistPatch>,
}

impl Default for SelectionBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionBehavior {
    /// Creates a behavior with an unbounded range and no selection.
    pub fn new() -> Self {
        Self {
            range: ScalableRange::default(),
            selection: SelectionModel::new(),
            column_target: FilterColumnTarget::default(),
            selection_saved: false,
            filter_requested: Signal::new(),
            persist_requested: Signal::new(),
        }
    }

    /// The committed range.
    pub fn range(&self) -> &ScalableRange {
        &self.range
    }

    /// Mutable access to the committed range.
    pub fn range_mut(&mut self) -> &mut ScalableRange {
        &mut self.range
    }

    /// The item selection.
    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    /// Returns true if any item is selected.
    pub fn has_selection(&self) -> bool {
        self.selection.has_selection()
    }

    /// Sets the column range filters are applied to.
    pub fn set_column_target(&mut self, target: FilterColumnTarget) {
        self.column_target = target;
    }

    /// The column range filters are applied to.
    pub fn column_target(&self) -> &FilterColumnTarget {
        &self.column_target
    }

    /// Clears and returns whether a selection change was persisted.
    pub fn take_selection_saved(&mut self) -> bool {
        std::mem::take(&mut self.selection_saved)
    }

    // =========================================================================
    // Range
    // =========================================================================

    /// Processes a committed range change.
    ///
    /// Marks the points inside the range, issues the range filter and persists
    /// the bounds together with the serialized filter. Returns the filter.
    pub fn on_range_selection_change(&mut self, points: &mut [DataPoint]) -> AdvancedFilter {
        mark_range_points(&self.range, points);

        let value = self.range.value();
        let filter = AdvancedFilter::for_range(self.column_target.clone(), value);
        let filter_json = filter.to_json().unwrap_or_else(|err| {
            tracing::warn!(target: targets::SELECTION, %err, "filter not serializable, persisting empty");
            String::new()
        });

        tracing::debug!(
            target: targets::SELECTION,
            min = ?value.min,
            max = ?value.max,
            conditions = filter.conditions.len(),
            "range filter issued"
        );
        self.filter_requested.emit(filter.clone());
        self.persist_requested.emit(
            PersistPatch::new(GENERAL)
                .with_property("rangeSelectionStart", bound_to_string(value.min))
                .with_property("rangeSelectionEnd", bound_to_string(value.max))
                .with_property("filter", filter_json),
        );
        filter
    }

    /// Restores persisted bounds into the range.
    ///
    /// Returns true if bounds were restored. Malformed bounds are logged and
    /// leave the range untouched.
    pub fn restore_persisted_range(&mut self, settings: &SlicerSettings) -> bool {
        match settings.persisted_range() {
            Ok(Some(value)) => {
                self.range.set_value(value);
                tracing::debug!(target: targets::SELECTION, ?value, "restored persisted range");
                true
            }
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(target: targets::SELECTION, %err, "ignoring persisted range");
                false
            }
        }
    }

    // =========================================================================
    // Item Selection
    // =========================================================================

    /// Applies selection state to a freshly converted list.
    ///
    /// When the persisted selection is not already loaded it is read from
    /// `settings`; unreadable state degrades to no selection. Selected ids that
    /// no longer exist in `points` are dropped.
    pub fn bind(&mut self, points: &mut [DataPoint], settings: &SlicerSettings, is_selection_loaded: bool) {
        if !is_selection_loaded {
            let persisted = settings.persisted_selection().unwrap_or_else(|err| {
                tracing::warn!(target: targets::SELECTION, %err, "discarding persisted selection");
                Vec::new()
            });
            self.selection.restore(persisted);
        }

        let present: HashSet<&SelectionId> = points.iter().map(|point| &point.id).collect();
        let dropped = self.selection.retain(|id| present.contains(id));
        if dropped > 0 {
            tracing::debug!(target: targets::SELECTION, dropped, "pruned stale selection");
        }

        self.apply_selection(points);
    }

    /// Handles a click on the row showing `points[index]`.
    ///
    /// A plain click selects the item exclusively (clicking the only selected
    /// item clears it), Ctrl toggles it and Shift extends from the anchor over
    /// the visible items. Returns true if the selection was committed.
    pub fn handle_click(&mut self, points: &mut [DataPoint], index: usize, modifiers: Modifiers) -> bool {
        let Some(point) = points.get(index).filter(|point| point.is_visible()) else {
            tracing::debug!(target: targets::SELECTION, index, "click outside visible items");
            return false;
        };
        let id = point.id.clone();

        let anchor_position = self
            .selection
            .anchor()
            .and_then(|anchor| points.iter().position(|point| &point.id == anchor));

        match anchor_position {
            Some(anchor) if modifiers.shift => {
                let (first, last) = if anchor <= index { (anchor, index) } else { (index, anchor) };
                let span: Vec<SelectionId> = points[first..=last]
                    .iter()
                    .filter(|point| point.is_visible())
                    .map(|point| point.id.clone())
                    .collect();
                let flags = if modifiers.ctrl {
                    SelectionFlags::NONE
                } else {
                    SelectionFlags::CLEAR
                };
                self.selection.select_range(&span, flags);
            }
            _ if modifiers.ctrl => {
                self.selection
                    .select(id, SelectionFlags::TOGGLE.with_anchor());
            }
            _ => {
                let only_this = self.selection.selected_count() == 1 && self.selection.is_selected(&id);
                if only_this {
                    self.selection.clear_selection();
                } else {
                    self.selection
                        .select(id, SelectionFlags::CLEAR_AND_SELECT.with_anchor());
                }
            }
        }

        self.commit_selection(points);
        true
    }

    /// Handles a key pressed on the row showing `points[index]`.
    ///
    /// Space and Enter act like a click; Ctrl+A selects every visible item.
    pub fn handle_key(
        &mut self,
        points: &mut [DataPoint],
        index: usize,
        key: RowKey,
        modifiers: Modifiers,
    ) -> bool {
        match key {
            RowKey::Space | RowKey::Enter => self.handle_click(points, index, modifiers),
            RowKey::A if modifiers.ctrl => self.select_all_visible(points),
            RowKey::A => false,
        }
    }

    /// Selects every visible item.
    pub fn select_all_visible(&mut self, points: &mut [DataPoint]) -> bool {
        let visible: Vec<SelectionId> = points
            .iter()
            .filter(|point| point.is_visible())
            .map(|point| point.id.clone())
            .collect();
        if visible.is_empty() {
            return false;
        }
        self.selection.select_all(&visible);
        self.commit_selection(points);
        true
    }

    /// Clears the item selection.
    pub fn clear_selection(&mut self, points: &mut [DataPoint]) {
        self.selection.clear_selection();
        self.commit_selection(points);
    }

    fn apply_selection(&self, points: &mut [DataPoint]) {
        for point in points.iter_mut() {
            point.selected = self.selection.is_selected(&point.id);
        }
    }

    fn commit_selection(&mut self, points: &mut [DataPoint]) {
        self.apply_selection(points);

        let selection = match serde_json::to_string(self.selection.selected_ids()) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(target: targets::SELECTION, %err, "selection not serializable");
                return;
            }
        };
        self.selection_saved = true;
        tracing::debug!(
            target: targets::SELECTION,
            count = self.selection.selected_count(),
            "selection committed"
        );
        self.persist_requested
            .emit(PersistPatch::new(GENERAL).with_property("selection", selection));
    }

    // =========================================================================
    // Styling
    // =========================================================================

    /// Styles rendered rows: selected rows are highlighted and, while any
    /// selection exists, unselected rows are dimmed.
    pub fn style_slicer_inputs<'a, S, I>(&self, surface: &mut S, rows: I, has_selection: bool)
    where
        S: RowSurface<DataPoint> + ?Sized,
        I: IntoIterator<Item = (&'a CellSlot, &'a DataPoint)>,
    {
        for (slot, point) in rows {
            surface.apply_style(
                slot,
                RowStyle {
                    selected: point.selected,
                    dimmed: has_selection && !point.selected,
                },
            );
        }
    }
}

/// Marks the points whose value lies inside the committed range.
pub fn mark_range_points(range: &ScalableRange, points: &mut [DataPoint]) {
    for point in points.iter_mut() {
        point.is_selected_range_point = point.value.is_some_and(|v| range.contains(v));
    }
}

static_assertions::assert_impl_all!(SelectionBehavior: Send, Sync);
