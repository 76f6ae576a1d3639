//! Data points and selection identities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity of a selectable item.
///
/// Identities come from the category identity keys of the data snapshot. They
/// are stable across refreshes as long as the underlying category values do not
/// change, and they are what gets persisted as `general.selection`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionId(String);

impl SelectionId {
    /// Creates an identity from its key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The identity key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SelectionId {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for SelectionId {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One selectable item in the slicer list.
///
/// Created per refresh by the converter. Selection flags are written by the
/// selection behavior and `filtered` by the search filter; everything else is
/// fixed for the lifetime of the refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    /// Selection identity.
    pub id: SelectionId,
    /// Display label.
    pub category: String,
    /// Numeric value of the category, if it has one.
    pub value: Option<f64>,
    /// Whether the value lies inside the committed range.
    pub is_selected_range_point: bool,
    /// Hidden by the free-text search.
    pub filtered: bool,
    /// Selected by the user.
    pub selected: bool,
}

impl DataPoint {
    /// Creates an unselected, unfiltered data point.
    pub fn new(id: impl Into<SelectionId>, category: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            value,
            is_selected_range_point: false,
            filtered: false,
            selected: false,
        }
    }

    /// Sets the selected flag using builder pattern.
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Returns true if the point survives the search filter.
    pub fn is_visible(&self) -> bool {
        !self.filtered
    }
}

/// Returns true if `category` matches the free-text `query`.
///
/// Matching is a case-insensitive prefix match: `"ab"` matches `"ABc"` but
/// not `"xab"`. An empty query matches everything.
pub fn matches_search(category: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    category.to_lowercase().starts_with(&query.to_lowercase())
}

/// Marks every point whose category does not match `query` as filtered.
///
/// Returns the number of points left visible.
pub fn apply_search(points: &mut [DataPoint], query: &str) -> usize {
    let mut visible = 0;
    for point in points.iter_mut() {
        point.filtered = !matches_search(&point.category, query);
        if !point.filtered {
            visible += 1;
        }
    }
    visible
}
