//! Data snapshots supplied by the host.
//!
//! A [`DataSnapshot`] is one refresh worth of input: the ordered category
//! values of the bound column, the column's metadata, and the bag of persisted
//! settings objects.

use serde::{Deserialize, Serialize};

use crate::settings::SettingsBag;

/// A raw category value as delivered by the host.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// A blank value.
    #[default]
    Null,
    /// A numeric value.
    Number(f64),
    /// A text value.
    Text(String),
}

impl RawValue {
    /// Returns the value as a finite number, if it is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    /// Returns true if this value is blank.
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

/// One category row: its identity key and raw value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryValue {
    /// Identity key, only ever compared for equality.
    pub identity_key: String,
    /// Raw value of the row.
    pub raw_value: RawValue,
}

impl CategoryValue {
    /// Creates a category row.
    pub fn new(identity_key: impl Into<String>, raw_value: impl Into<RawValue>) -> Self {
        Self {
            identity_key: identity_key.into(),
            raw_value: raw_value.into(),
        }
    }
}

/// Metadata of the bound category column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnMetadata {
    /// Human readable column name, shown in the header.
    pub display_name: String,
    /// Fully qualified `Table.Column` name.
    pub query_name: String,
    /// Value format string, e.g. `"#"` or `"0.00"`.
    pub format_string: Option<String>,
}

impl ColumnMetadata {
    /// Creates column metadata.
    pub fn new(display_name: impl Into<String>, query_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            query_name: query_name.into(),
            format_string: None,
        }
    }

    /// Sets the format string using builder pattern.
    pub fn with_format_string(mut self, format_string: impl Into<String>) -> Self {
        self.format_string = Some(format_string.into());
        self
    }
}

/// One refresh worth of host data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSnapshot {
    /// Bound column metadata.
    pub source: ColumnMetadata,
    /// Ordered category rows.
    pub categories: Vec<CategoryValue>,
    /// Persisted settings objects.
    pub metadata_objects: SettingsBag,
}

impl DataSnapshot {
    /// Creates a snapshot with no settings.
    pub fn new(source: ColumnMetadata, categories: Vec<CategoryValue>) -> Self {
        Self {
            source,
            categories,
            metadata_objects: SettingsBag::new(),
        }
    }

    /// Sets the settings bag using builder pattern.
    pub fn with_metadata_objects(mut self, metadata_objects: SettingsBag) -> Self {
        self.metadata_objects = metadata_objects;
        self
    }

    /// Returns true if there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Returns true if both snapshots carry the same category identities.
    ///
    /// The comparison is positional: the same keys in a different order count
    /// as a change.
    pub fn has_same_category_identity(&self, other: &DataSnapshot) -> bool {
        self.categories.len() == other.categories.len()
            && self
                .categories
                .iter()
                .zip(&other.categories)
                .all(|(a, b)| a.identity_key == b.identity_key)
    }
}
