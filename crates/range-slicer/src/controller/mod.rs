//! Slicer orchestration.
//!
//! [`SliderSyncController`] drives update cycles and routes user interaction.
//! Every input source funnels through the range model in
//! [`SelectionBehavior`]; the slider thumbs, the bound inputs and the row
//! styling are re-derived from that model after each change.
//!
//! # Update cycle
//!
//! 1. Resolve a [`RefreshContext`]: the scroll position resets only when the
//!    category identities changed.
//! 2. Convert the snapshot, feeding the observed domain into the range.
//! 3. Decide whether the persisted selection is already loaded and bind it.
//! 4. Bind the visible points to the [`DataPointTable`] and render the window.
//! 5. Sync the slider thumbs and bound inputs from the range.
//!
//! # Interaction
//!
//! Slider moves only move the drawn thumbs. A release commits the position,
//! issues one filter and runs one update cycle. Text commits follow the same
//! path; text that does not parse is reverted and nothing is issued. Until
//! data is bound, releases and text commits are discarded.

mod refresh;

pub use refresh::{RefreshContext, RefreshPlan, is_selection_loaded};

use std::sync::Arc;

use range_slicer_core::PerfSpan;
use range_slicer_core::logging::{span_names, targets};

use crate::behavior::{Modifiers, RowKey, SelectionBehavior, mark_range_points};
use crate::converter::{CategoryConverter, SlicerConverter, SlicerData};
use crate::filter::{AdvancedFilter, FilterColumnTarget};
use crate::settings::{PersistPatch, SlicerSettings};
use crate::snapshot::DataSnapshot;
use crate::view::layout;
use crate::view::{
    Bound, CommitOutcome, DataPointTable, Handle, ItemStyle, RangeInput, RangeSlider, SlicerSurface,
    Viewport,
};

/// Callbacks into the hosting environment.
///
/// Both calls are fire-and-forget; the controller never waits for an
/// acknowledgement.
pub trait SlicerHost: Send + Sync {
    /// Applies (or, when it has no conditions, clears) a range filter.
    fn apply_advanced_filter(&self, filter: &AdvancedFilter);

    /// Durably stores a settings patch.
    fn persist_properties(&self, patch: &PersistPatch);
}

/// Input of one host update.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// New data, or `None` when only the viewport changed.
    pub snapshot: Option<DataSnapshot>,
    pub viewport: Viewport,
}

impl UpdateOptions {
    /// Creates options for a viewport-only update.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            snapshot: None,
            viewport,
        }
    }

    /// Sets the snapshot using builder pattern.
    pub fn with_snapshot(mut self, snapshot: DataSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}

/// Orchestrates the range model, the item list and the range controls.
pub struct SliderSyncController<S: SlicerSurface> {
    surface: S,
    converter: Box<dyn SlicerConverter>,
    behavior: SelectionBehavior,
    table_view: DataPointTable,
    slider: RangeSlider,
    start_input: RangeInput,
    end_input: RangeInput,

    snapshot: Option<DataSnapshot>,
    data: Option<SlicerData>,
    /// Settings of the last converted snapshot.
    settings: Option<SlicerSettings>,
    viewport: Option<Viewport>,
    search_text: String,
    /// Persisted bounds were applied, or the user committed a range.
    range_restored: bool,
    last_refresh: Option<RefreshPlan>,
}

impl<S: SlicerSurface> SliderSyncController<S> {
    /// Creates a controller drawing into `surface` and reporting to `host`.
    pub fn new(surface: S, host: Arc<dyn SlicerHost>) -> Self {
        let behavior = SelectionBehavior::new();

        let filter_host = Arc::clone(&host);
        behavior
            .filter_requested
            .connect(move |filter| filter_host.apply_advanced_filter(filter));
        behavior
            .persist_requested
            .connect(move |patch| host.persist_properties(patch));

        Self {
            surface,
            converter: Box::new(CategoryConverter),
            behavior,
            table_view: DataPointTable::new(),
            slider: RangeSlider::new(),
            start_input: RangeInput::new(Bound::Start),
            end_input: RangeInput::new(Bound::End),
            snapshot: None,
            data: None,
            settings: None,
            viewport: None,
            search_text: String::new(),
            range_restored: false,
            last_refresh: None,
        }
    }

    /// Replaces the snapshot converter using builder pattern.
    pub fn with_converter(mut self, converter: impl SlicerConverter + 'static) -> Self {
        self.converter = Box::new(converter);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn behavior(&self) -> &SelectionBehavior {
        &self.behavior
    }

    pub fn table_view(&self) -> &DataPointTable {
        &self.table_view
    }

    pub fn slider(&self) -> &RangeSlider {
        &self.slider
    }

    /// The text input for one side of the range.
    pub fn input(&self, bound: Bound) -> &RangeInput {
        match bound {
            Bound::Start => &self.start_input,
            Bound::End => &self.end_input,
        }
    }

    /// Data of the last successful conversion.
    pub fn data(&self) -> Option<&SlicerData> {
        self.data.as_ref()
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Decisions of the last update that carried a snapshot.
    pub fn last_refresh(&self) -> Option<RefreshPlan> {
        self.last_refresh
    }

    // =========================================================================
    // Update Cycle
    // =========================================================================

    /// Runs one host update.
    ///
    /// Without a snapshot only the viewport is applied and the current window
    /// re-rendered.
    #[tracing::instrument(skip_all, target = "range_slicer::controller", level = "debug")]
    pub fn update(&mut self, options: UpdateOptions) {
        let _perf = PerfSpan::new(span_names::UPDATE);

        let Some(snapshot) = options.snapshot else {
            self.resize(options.viewport);
            return;
        };

        let plan = RefreshContext::new(&snapshot, options.viewport)
            .with_previous_snapshot(self.snapshot.as_ref())
            .with_previous_settings(self.settings.as_ref())
            .with_previous_viewport(self.viewport)
            .resolve();

        // Latest snapshot wins
        self.last_refresh = Some(plan);
        self.snapshot = Some(snapshot);
        self.viewport = Some(options.viewport);
        self.update_internal(plan);
    }

    fn resize(&mut self, viewport: Viewport) {
        if self.viewport == Some(viewport) {
            return;
        }
        self.viewport = Some(viewport);
        self.table_view.viewport(viewport.slicer_body());
        self.table_view.render(&mut self.surface);
        self.style_rows();
        self.apply_item_style();
        tracing::debug!(target: targets::CONTROLLER, ?viewport, "viewport updated");
    }

    fn update_internal(&mut self, plan: RefreshPlan) {
        let reset_scrollbar_position = plan.reset_scrollbar_position;
        if plan.viewport_changed {
            self.table_view
                .viewport(self.viewport.unwrap_or_default().slicer_body());
        }

        let Some(snapshot) = self.snapshot.as_ref() else {
            return;
        };
        let Some(mut data) = self
            .converter
            .convert(snapshot, &self.search_text, self.behavior.range_mut())
        else {
            self.clear_data();
            return;
        };

        let selection_saved = self.behavior.take_selection_saved();
        let selection_loaded = is_selection_loaded(self.settings.as_ref(), &data.settings, selection_saved);
        tracing::debug!(
            target: targets::CONTROLLER,
            reset_scrollbar_position,
            selection_saved,
            selection_loaded,
            "updating"
        );

        self.behavior.set_column_target(data.column_target.clone());
        if !self.range_restored && self.behavior.restore_persisted_range(&data.settings) {
            self.range_restored = true;
            mark_range_points(self.behavior.range(), &mut data.data_points);
        }
        self.behavior
            .bind(&mut data.data_points, &data.settings, selection_loaded);

        let settings = &data.settings;
        self.table_view
            .row_height(layout::row_height(&settings.slicer_text))
            .column_width(settings.slicer_text.width)
            .rows(settings.general.rows)
            .columns(settings.general.columns);
        self.surface.set_header(&data.category_source_name);

        self.settings = Some(data.settings.clone());
        self.data = Some(data);

        self.bind_rows(reset_scrollbar_position);
        self.table_view.render(&mut self.surface);
        self.style_rows();
        self.apply_item_style();
        self.sync_range_controls();
    }

    /// Drops everything derived from the last snapshot that carried data.
    fn clear_data(&mut self) {
        self.table_view.empty(&mut self.surface);
        self.data = None;
        self.behavior.range_mut().clear_domain();
        self.behavior.set_column_target(FilterColumnTarget::default());
        self.sync_range_controls();
        tracing::debug!(target: targets::CONTROLLER, "no data bound");
    }

    /// Binds the visible points, keyed by their index in the full list.
    fn bind_rows(&mut self, reset_scroll: bool) {
        let Some(data) = self.data.as_ref() else {
            return;
        };
        let keys = data.visible_indices();
        let visible = keys.iter().map(|&index| data.data_points[index].clone()).collect();
        self.table_view
            .data(Some(visible), |index, _| keys[index], reset_scroll);
    }

    fn style_rows(&mut self) {
        let Some(data) = self.data.as_ref() else {
            return;
        };
        let has_selection = self.behavior.has_selection();
        let rows = self
            .table_view
            .rendered()
            .filter_map(|slot| data.data_points.get(slot.key).map(|point| (slot, point)));
        self.behavior
            .style_slicer_inputs(&mut self.surface, rows, has_selection);
    }

    fn apply_item_style(&mut self) {
        if let Some(settings) = self.settings.as_ref() {
            let style = ItemStyle::new(settings, self.table_view.cell_width());
            self.surface.set_item_style(&style);
        }
    }

    /// Re-derives the slider thumbs and bound inputs from the range.
    ///
    /// Skipped when the range has not changed since the last sync.
    fn sync_range_controls(&mut self) {
        let range = self.behavior.range_mut();
        if !range.take_dirty() {
            return;
        }
        let value = range.value();
        let precision = range.precision();
        let scaled = range.scaled_value();
        tracing::trace!(target: targets::CONTROLLER, ?value, "syncing range controls");

        self.slider.set_value(scaled);
        self.surface.set_slider(self.slider.value());

        self.start_input.sync(value.min, precision);
        self.end_input.sync(value.max, precision);
        self.show_input_text(Bound::Start);
        self.show_input_text(Bound::End);
    }

    fn show_input_text(&mut self, bound: Bound) {
        let input = match bound {
            Bound::Start => &self.start_input,
            Bound::End => &self.end_input,
        };
        self.surface.set_input_text(bound, input.text());
    }

    /// Issues the filter for the committed range and re-runs the cycle.
    ///
    /// Returns false without issuing anything when no data is bound.
    fn commit_range(&mut self) -> bool {
        let Some(data) = self.data.as_mut() else {
            return false;
        };
        self.range_restored = true;
        self.behavior.on_range_selection_change(&mut data.data_points);
        self.update_internal(RefreshPlan::UNCHANGED);
        true
    }

    // =========================================================================
    // Search and Scrolling
    // =========================================================================

    /// Sets the free-text query and re-runs the cycle, keeping the scroll
    /// position.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        tracing::debug!(target: targets::CONTROLLER, query = %self.search_text, "search changed");
        self.update_internal(RefreshPlan::UNCHANGED);
    }

    /// Scrolls the item list and renders the new window.
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.table_view.scroll_to(x, y);
        self.table_view.render(&mut self.surface);
        self.style_rows();
    }

    // =========================================================================
    // Slider
    // =========================================================================

    /// Grabs a slider thumb.
    pub fn slider_pressed(&mut self, handle: Handle) -> bool {
        self.slider.press(handle)
    }

    /// Grabs the thumb nearest to `position` and moves it there.
    pub fn slider_pressed_at(&mut self, position: f64) -> Option<Handle> {
        let handle = self.slider.press_at(position)?;
        self.surface.set_slider(self.slider.value());
        Some(handle)
    }

    /// Moves the held thumb. Only the drawn thumb moves.
    pub fn slider_moved(&mut self, position: f64) {
        if let Some(value) = self.slider.move_to(position) {
            self.surface.set_slider(value);
        }
    }

    /// Releases the held thumb and commits its position.
    ///
    /// Returns false when no thumb was held. Without bound data the drag is
    /// cancelled instead and nothing is committed.
    pub fn slider_released(&mut self) -> bool {
        if self.data.is_none() {
            if self.slider.is_dragging() {
                tracing::debug!(target: targets::CONTROLLER, "no data bound, cancelling drag");
            }
            self.slider_cancelled();
            return false;
        }
        let Some(scaled) = self.slider.release() else {
            return false;
        };
        self.behavior.range_mut().set_scaled_value(scaled);
        self.commit_range()
    }

    /// Aborts a drag and puts the thumbs back.
    pub fn slider_cancelled(&mut self) {
        self.slider.cancel();
        self.surface.set_slider(self.slider.value());
    }

    // =========================================================================
    // Bound Inputs
    // =========================================================================

    fn input_mut(&mut self, bound: Bound) -> &mut RangeInput {
        match bound {
            Bound::Start => &mut self.start_input,
            Bound::End => &mut self.end_input,
        }
    }

    /// Focuses a bound input, showing the formatted model value.
    pub fn text_focused(&mut self, bound: Bound) -> String {
        let text = self.input_mut(bound).focus().to_string();
        self.surface.set_input_text(bound, &text);
        text
    }

    /// Replaces the text typed into a bound input.
    pub fn text_edited(&mut self, bound: Bound, text: impl Into<String>) {
        self.input_mut(bound).edit(text);
    }

    /// Commits a bound input (Enter or blur).
    ///
    /// Without bound data the edit is abandoned and [`CommitOutcome::Discarded`]
    /// returned.
    pub fn text_committed(&mut self, bound: Bound) -> CommitOutcome {
        if self.data.is_none() {
            tracing::debug!(target: targets::CONTROLLER, ?bound, "no data bound, discarding edit");
            self.text_cancelled(bound);
            return CommitOutcome::Discarded;
        }

        let outcome = self.input_mut(bound).commit();
        match &outcome {
            CommitOutcome::Committed(bound_value) => {
                let mut value = self.behavior.range().value();
                match bound {
                    Bound::Start => value.min = *bound_value,
                    Bound::End => value.max = *bound_value,
                }
                self.behavior.range_mut().set_value(value);
                self.commit_range();
            }
            CommitOutcome::Unchanged | CommitOutcome::Reverted(_) | CommitOutcome::Discarded => {
                self.show_input_text(bound)
            }
        }
        outcome
    }

    /// Abandons an edit.
    pub fn text_cancelled(&mut self, bound: Bound) {
        self.input_mut(bound).cancel();
        self.show_input_text(bound);
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Handles a click on the row with `key`.
    pub fn row_clicked(&mut self, key: usize, modifiers: Modifiers) -> bool {
        let Some(data) = self.data.as_mut() else {
            return false;
        };
        if !self.behavior.handle_click(&mut data.data_points, key, modifiers) {
            return false;
        }
        self.restyle_after_selection();
        true
    }

    /// Handles a key pressed on the row with `key`.
    pub fn row_key_pressed(&mut self, key: usize, row_key: RowKey, modifiers: Modifiers) -> bool {
        let Some(data) = self.data.as_mut() else {
            return false;
        };
        if !self
            .behavior
            .handle_key(&mut data.data_points, key, row_key, modifiers)
        {
            return false;
        }
        self.restyle_after_selection();
        true
    }

    /// Clears the item selection.
    pub fn clear_selection(&mut self) {
        let Some(data) = self.data.as_mut() else {
            return;
        };
        self.behavior.clear_selection(&mut data.data_points);
        self.restyle_after_selection();
    }

    fn restyle_after_selection(&mut self) {
        self.bind_rows(false);
        self.style_rows();
    }
}
