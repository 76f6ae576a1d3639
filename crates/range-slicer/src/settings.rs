//! Slicer settings and persisted state.
//!
//! The host hands the slicer a [`SettingsBag`] of persisted objects with every
//! data snapshot. The bag is organized hierarchically using dotted keys of the
//! form `object.property`:
//!
//! ```
//! use range_slicer::settings::{SettingsBag, SlicerSettings};
//!
//! let mut bag = SettingsBag::new();
//! bag.set("general.columns", 2);
//! bag.set("slicerText.textSize", 14.0);
//!
//! let settings = SlicerSettings::from_bag(&bag);
//! assert_eq!(settings.general.columns, 2);
//! assert_eq!(settings.general.rows, 0);
//! ```
//!
//! Typed access goes through [`SlicerSettings`], which falls back to defaults
//! for any key that is missing or holds a value of the wrong type. Unknown keys
//! are ignored.
//!
//! Writes flow the other way as a [`PersistPatch`], a fire-and-forget request
//! to the host to store a set of properties on one object.

use std::collections::HashMap;

use range_slicer_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::model::{RangeValue, SelectionId};

/// Object name of the general settings group.
pub const GENERAL: &str = "general";

/// Recognized settings keys.
pub mod keys {
    /// Serialized selection identity list.
    pub const SELECTION: &str = "general.selection";
    /// Persisted lower range bound.
    pub const RANGE_SELECTION_START: &str = "general.rangeSelectionStart";
    /// Persisted upper range bound.
    pub const RANGE_SELECTION_END: &str = "general.rangeSelectionEnd";
    /// Persisted advanced filter.
    pub const FILTER: &str = "general.filter";
    /// Row count of the list grid.
    pub const ROWS: &str = "general.rows";
    /// Column count of the list grid.
    pub const COLUMNS: &str = "general.columns";
    /// Item text size in points.
    pub const TEXT_SIZE: &str = "slicerText.textSize";
    /// Row height in pixels, 0 for auto.
    pub const TEXT_HEIGHT: &str = "slicerText.height";
    /// Column width in pixels, 0 for auto.
    pub const TEXT_WIDTH: &str = "slicerText.width";
    /// Item padding in pixels.
    pub const TEXT_PADDING: &str = "slicerText.padding";
    /// Header left margin in pixels.
    pub const HEADER_MARGIN_LEFT: &str = "headerText.marginLeft";
    /// Header top margin in pixels.
    pub const HEADER_MARGIN_TOP: &str = "headerText.marginTop";
    /// Item container left margin in pixels.
    pub const ITEM_MARGIN_LEFT: &str = "slicerItemContainer.marginLeft";
}

// ============================================================================
// Settings Values
// ============================================================================

/// A value that can be stored in the settings bag.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingsValue {
    /// A null/empty value.
    #[default]
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Integer(i64),
    /// A 64-bit floating point number.
    Float(f64),
    /// A string value.
    String(String),
    /// An array of values.
    Array(Vec<SettingsValue>),
    /// A nested object.
    Object(HashMap<String, SettingsValue>),
}

impl SettingsValue {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, SettingsValue::Null)
    }

    /// Returns this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingsValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns this value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SettingsValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns this value as a float, if it is one.
    /// Also converts integers to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            SettingsValue::Float(v) => Some(*v),
            SettingsValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Returns this value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingsValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns this value as an object, if it is one.
    pub fn as_object(&self) -> Option<&HashMap<String, SettingsValue>> {
        match self {
            SettingsValue::Object(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for SettingsValue {
    fn from(v: bool) -> Self {
        SettingsValue::Bool(v)
    }
}

impl From<i32> for SettingsValue {
    fn from(v: i32) -> Self {
        SettingsValue::Integer(v as i64)
    }
}

impl From<i64> for SettingsValue {
    fn from(v: i64) -> Self {
        SettingsValue::Integer(v)
    }
}

impl From<u32> for SettingsValue {
    fn from(v: u32) -> Self {
        SettingsValue::Integer(v as i64)
    }
}

impl From<f64> for SettingsValue {
    fn from(v: f64) -> Self {
        SettingsValue::Float(v)
    }
}

impl From<String> for SettingsValue {
    fn from(v: String) -> Self {
        SettingsValue::String(v)
    }
}

impl From<&str> for SettingsValue {
    fn from(v: &str) -> Self {
        SettingsValue::String(v.to_string())
    }
}

/// Trait for types that can be extracted from a [`SettingsValue`].
pub trait FromSettingsValue: Sized {
    /// Attempts to convert a SettingsValue to this type.
    fn from_settings_value(value: &SettingsValue) -> Option<Self>;
}

impl FromSettingsValue for bool {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromSettingsValue for u32 {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_integer().and_then(|v| u32::try_from(v).ok())
    }
}

impl FromSettingsValue for f64 {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_float().filter(|v| v.is_finite())
    }
}

impl FromSettingsValue for String {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromSettingsValue for SettingsValue {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        Some(value.clone())
    }
}

// ============================================================================
// Settings Bag
// ============================================================================

/// Hierarchical key-value store of persisted objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsBag {
    data: HashMap<String, SettingsValue>,
}

impl SettingsBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value at the specified path.
    ///
    /// Intermediate objects are created automatically. A non-object value in
    /// the way is replaced.
    pub fn set<V: Into<SettingsValue>>(&mut self, path: &str, value: V) {
        let parts = parse_path(path);
        if parts.is_empty() {
            return;
        }
        set_nested(&mut self.data, &parts, value.into());
    }

    /// Gets a value at the specified path.
    ///
    /// Returns `None` if the path doesn't exist or the value cannot be
    /// converted to the requested type.
    pub fn get<T: FromSettingsValue>(&self, path: &str) -> Option<T> {
        self.get_raw(path).and_then(T::from_settings_value)
    }

    /// Gets a value at the specified path, or returns the default.
    pub fn get_or<T: FromSettingsValue>(&self, path: &str, default: T) -> T {
        match self.get_raw(path) {
            None => default,
            Some(value) => T::from_settings_value(value).unwrap_or_else(|| {
                tracing::debug!(target: targets::SETTINGS, path, ?value, "mistyped setting, using default");
                default
            }),
        }
    }

    /// Gets the raw value at the specified path.
    pub fn get_raw(&self, path: &str) -> Option<&SettingsValue> {
        let parts = parse_path(path);
        let (first, rest) = parts.split_first()?;
        let mut current = self.data.get(*first)?;
        for part in rest {
            current = current.as_object()?.get(*part)?;
        }
        Some(current)
    }

    /// Checks if a path exists.
    pub fn contains(&self, path: &str) -> bool {
        self.get_raw(path).is_some()
    }

    /// Returns the top-level object names.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.data.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Returns true if the bag holds no objects.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Applies a persistence patch, as the host would after storing it.
    pub fn merge(&mut self, patch: &PersistPatch) {
        for (property, value) in &patch.properties {
            self.set(&format!("{}.{}", patch.object_name, property), value.clone());
        }
    }
}

fn parse_path(path: &str) -> Vec<&str> {
    path.split('.').filter(|part| !part.is_empty()).collect()
}

fn set_nested(data: &mut HashMap<String, SettingsValue>, parts: &[&str], value: SettingsValue) {
    let Some((first, rest)) = parts.split_first() else {
        return;
    };
    if rest.is_empty() {
        data.insert((*first).to_string(), value);
        return;
    }

    let entry = data
        .entry((*first).to_string())
        .or_insert_with(|| SettingsValue::Object(HashMap::new()));
    if !matches!(entry, SettingsValue::Object(_)) {
        *entry = SettingsValue::Object(HashMap::new());
    }
    if let SettingsValue::Object(child) = entry {
        set_nested(child, rest, value);
    }
}

// ============================================================================
// Persistence Patch
// ============================================================================

/// A request to the host to durably store properties on one settings object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistPatch {
    /// Settings object the properties belong to, e.g. `general`.
    pub object_name: String,
    /// Property name to value.
    pub properties: HashMap<String, SettingsValue>,
}

impl PersistPatch {
    /// Creates an empty patch for `object_name`.
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            properties: HashMap::new(),
        }
    }

    /// Adds a property using builder pattern.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<SettingsValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Gets a property value.
    pub fn property(&self, name: &str) -> Option<&SettingsValue> {
        self.properties.get(name)
    }
}

// ============================================================================
// Typed Settings
// ============================================================================

/// Typed view of every recognized setting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlicerSettings {
    /// Persisted state and grid shape.
    pub general: GeneralSettings,
    /// Item text and sizing.
    pub slicer_text: SlicerTextSettings,
    /// Header placement.
    pub header_text: HeaderTextSettings,
    /// Item container placement.
    pub slicer_item_container: ItemContainerSettings,
}

/// The `general` settings object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    /// JSON array of selected identity keys.
    pub selection: String,
    /// Lower range bound as text, empty when unbounded.
    pub range_selection_start: String,
    /// Upper range bound as text, empty when unbounded.
    pub range_selection_end: String,
    /// Serialized advanced filter.
    pub filter: String,
    /// Rows of the grid, 0 for unlimited.
    pub rows: u32,
    /// Columns of the grid, 0 to flow horizontally.
    pub columns: u32,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            selection: String::new(),
            range_selection_start: String::new(),
            range_selection_end: String::new(),
            filter: String::new(),
            rows: 0,
            columns: 1,
        }
    }
}

/// The `slicerText` settings object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlicerTextSettings {
    /// Text size in points.
    pub text_size: f64,
    /// Row height in pixels, 0 to derive from the text size.
    pub height: f64,
    /// Column width in pixels, 0 to divide the viewport evenly.
    pub width: f64,
    /// Item padding in pixels.
    pub padding: f64,
}

impl Default for SlicerTextSettings {
    fn default() -> Self {
        Self {
            text_size: 11.0,
            height: 0.0,
            width: 0.0,
            padding: 3.0,
        }
    }
}

/// The `headerText` settings object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderTextSettings {
    pub margin_left: f64,
    pub margin_top: f64,
}

impl Default for HeaderTextSettings {
    fn default() -> Self {
        Self {
            margin_left: 8.0,
            margin_top: 8.0,
        }
    }
}

/// The `slicerItemContainer` settings object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemContainerSettings {
    pub margin_left: f64,
}

impl Default for ItemContainerSettings {
    fn default() -> Self {
        Self { margin_left: 5.0 }
    }
}

impl SlicerSettings {
    /// Reads every recognized key from `bag`, falling back to defaults.
    pub fn from_bag(bag: &SettingsBag) -> Self {
        let defaults = Self::default();
        Self {
            general: GeneralSettings {
                selection: bag.get_or(keys::SELECTION, defaults.general.selection),
                range_selection_start: bag
                    .get_or(keys::RANGE_SELECTION_START, defaults.general.range_selection_start),
                range_selection_end: bag
                    .get_or(keys::RANGE_SELECTION_END, defaults.general.range_selection_end),
                filter: bag.get_or(keys::FILTER, defaults.general.filter),
                rows: bag.get_or(keys::ROWS, defaults.general.rows),
                columns: bag.get_or(keys::COLUMNS, defaults.general.columns),
            },
            slicer_text: SlicerTextSettings {
                text_size: bag.get_or(keys::TEXT_SIZE, defaults.slicer_text.text_size),
                height: bag.get_or(keys::TEXT_HEIGHT, defaults.slicer_text.height),
                width: bag.get_or(keys::TEXT_WIDTH, defaults.slicer_text.width),
                padding: bag.get_or(keys::TEXT_PADDING, defaults.slicer_text.padding),
            },
            header_text: HeaderTextSettings {
                margin_left: bag.get_or(keys::HEADER_MARGIN_LEFT, defaults.header_text.margin_left),
                margin_top: bag.get_or(keys::HEADER_MARGIN_TOP, defaults.header_text.margin_top),
            },
            slicer_item_container: ItemContainerSettings {
                margin_left: bag
                    .get_or(keys::ITEM_MARGIN_LEFT, defaults.slicer_item_container.margin_left),
            },
        }
    }

    /// Parses the persisted selection identity list.
    ///
    /// An empty string means no prior selection.
    pub fn persisted_selection(&self) -> Result<Vec<SelectionId>, ParseError> {
        if self.general.selection.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str::<Option<Vec<SelectionId>>>(&self.general.selection)
            .map(Option::unwrap_or_default)
            .map_err(|e| ParseError::persisted_state(keys::SELECTION, e))
    }

    /// Parses the persisted range bounds.
    ///
    /// Returns `Ok(None)` when neither bound was persisted.
    pub fn persisted_range(&self) -> Result<Option<RangeValue>, ParseError> {
        let min = parse_bound(&self.general.range_selection_start)?;
        let max = parse_bound(&self.general.range_selection_end)?;
        if min.is_none() && max.is_none() {
            return Ok(None);
        }
        Ok(Some(RangeValue::new(min, max)))
    }
}

/// Parses a bound typed or persisted as text.
///
/// Empty (or all-whitespace) text is a valid unbounded side; anything else
/// must parse to a finite number.
pub fn parse_bound(text: &str) -> Result<Option<f64>, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(ParseError::invalid_number(trimmed)),
    }
}

/// Formats a bound for persistence, empty when unbounded.
pub fn bound_to_string(bound: Option<f64>) -> String {
    bound.map(|v| v.to_string()).unwrap_or_default()
}
