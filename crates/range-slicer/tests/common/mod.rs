//! Shared fixtures for the slicer integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;
use range_slicer::controller::{SlicerHost, SliderSyncController, UpdateOptions};
use range_slicer::filter::AdvancedFilter;
use range_slicer::model::{DataPoint, ScaledValue};
use range_slicer::settings::{PersistPatch, SettingsBag, SettingsValue};
use range_slicer::snapshot::{CategoryValue, ColumnMetadata, DataSnapshot, RawValue};
use range_slicer::view::{Bound, CellSlot, ItemStyle, RowStyle, RowSurface, SlicerSurface, Viewport};

/// Installs a test subscriber once; `RUST_LOG` controls the output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Host that records every callback.
#[derive(Default)]
pub struct RecordingHost {
    pub filters: Mutex<Vec<AdvancedFilter>>,
    pub patches: Mutex<Vec<PersistPatch>>,
}

impl RecordingHost {
    pub fn filter_count(&self) -> usize {
        self.filters.lock().len()
    }

    pub fn last_filter(&self) -> Option<AdvancedFilter> {
        self.filters.lock().last().cloned()
    }

    /// Most recent persisted value of `general.<property>`.
    pub fn persisted(&self, property: &str) -> Option<String> {
        self.patches
            .lock()
            .iter()
            .rev()
            .find_map(|patch| patch.property(property).and_then(SettingsValue::as_str).map(str::to_string))
    }

    /// Settings bag holding everything persisted so far.
    pub fn persisted_bag(&self) -> SettingsBag {
        let mut bag = SettingsBag::new();
        for patch in self.patches.lock().iter() {
            bag.merge(patch);
        }
        bag
    }
}

impl SlicerHost for RecordingHost {
    fn apply_advanced_filter(&self, filter: &AdvancedFilter) {
        self.filters.lock().push(filter.clone());
    }

    fn persist_properties(&self, patch: &PersistPatch) {
        self.patches.lock().push(patch.clone());
    }
}

/// Surface that keeps the live rows and counts every call.
#[derive(Default)]
pub struct RecordingSurface {
    pub rows: BTreeMap<usize, DataPoint>,
    pub styles: HashMap<usize, RowStyle>,
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
    pub header: String,
    pub item_style: Option<ItemStyle>,
    pub slider: ScaledValue,
    pub slider_updates: usize,
    pub inputs: HashMap<Bound, String>,
}

impl RecordingSurface {
    /// Categories of the live rows, in key order.
    pub fn categories(&self) -> Vec<String> {
        self.rows.values().map(|point| point.category.clone()).collect()
    }

    pub fn input(&self, bound: Bound) -> &str {
        self.inputs.get(&bound).map_or("", String::as_str)
    }

    pub fn reset_counts(&mut self) {
        self.entered = 0;
        self.updated = 0;
        self.exited = 0;
    }
}

impl RowSurface<DataPoint> for RecordingSurface {
    fn enter(&mut self, slot: &CellSlot, item: &DataPoint) {
        self.entered += 1;
        self.rows.insert(slot.key, item.clone());
    }

    fn update(&mut self, slot: &CellSlot, item: &DataPoint) {
        self.updated += 1;
        self.rows.insert(slot.key, item.clone());
    }

    fn exit(&mut self, slot: &CellSlot) {
        self.exited += 1;
        self.rows.remove(&slot.key);
        self.styles.remove(&slot.key);
    }

    fn apply_style(&mut self, slot: &CellSlot, style: RowStyle) {
        self.styles.insert(slot.key, style);
    }
}

impl SlicerSurface for RecordingSurface {
    fn set_header(&mut self, text: &str) {
        self.header = text.to_string();
    }

    fn set_item_style(&mut self, style: &ItemStyle) {
        self.item_style = Some(*style);
    }

    fn set_slider(&mut self, value: ScaledValue) {
        self.slider = value;
        self.slider_updates += 1;
    }

    fn set_input_text(&mut self, bound: Bound, text: &str) {
        self.inputs.insert(bound, text.to_string());
    }
}

pub type Slicer = SliderSyncController<RecordingSurface>;

/// A slicer wired to a recording host.
pub fn slicer() -> (Slicer, Arc<RecordingHost>) {
    init_tracing();
    let host = Arc::new(RecordingHost::default());
    let slicer = SliderSyncController::new(RecordingSurface::default(), host.clone());
    (slicer, host)
}

/// Snapshot of an `Amount` column with the given identity keys and raw values.
pub fn snapshot<V>(rows: &[(&str, V)], bag: SettingsBag) -> DataSnapshot
where
    V: Into<RawValue> + Clone,
{
    DataSnapshot::new(
        ColumnMetadata::new("Amount", "Sales.Amount").with_format_string("#"),
        rows.iter()
            .map(|(key, value)| CategoryValue::new(*key, value.clone()))
            .collect(),
    )
    .with_metadata_objects(bag)
}

/// Snapshot with `count` rows keyed `k0..` holding the values `0..count`.
pub fn numeric_snapshot(count: usize, bag: SettingsBag) -> DataSnapshot {
    DataSnapshot::new(
        ColumnMetadata::new("Amount", "Sales.Amount").with_format_string("#"),
        (0..count)
            .map(|i| CategoryValue::new(format!("k{i}"), i as f64))
            .collect(),
    )
    .with_metadata_objects(bag)
}

/// Settings bag with a fixed row height so windows are easy to reason about.
pub fn fixed_rows_bag(row_height: f64) -> SettingsBag {
    let mut bag = SettingsBag::new();
    bag.set("slicerText.height", row_height);
    bag
}

pub fn update(slicer: &mut Slicer, snapshot: DataSnapshot, viewport: Viewport) {
    slicer.update(UpdateOptions::new(viewport).with_snapshot(snapshot));
}
