//! Conversion from host snapshots to slicer data.
//!
//! A [`SlicerConverter`] turns one [`DataSnapshot`] plus the current search
//! text into an ordered list of [`DataPoint`]s. Along the way it feeds the
//! observed numeric domain into the [`ScalableRange`], so that the range is
//! clamped before anything is rendered.

use range_slicer_core::logging::targets;

use crate::filter::FilterColumnTarget;
use crate::model::{DataPoint, ScalableRange, apply_search};
use crate::settings::SlicerSettings;
use crate::snapshot::{DataSnapshot, RawValue};

/// Label shown for blank category values.
pub const BLANK_LABEL: &str = "(Blank)";

/// Everything one refresh needs to render.
#[derive(Debug, Clone, PartialEq)]
pub struct SlicerData {
    /// Header text.
    pub category_source_name: String,
    /// Format string of the bound column, if any.
    pub format_string: Option<String>,
    /// All points, including those hidden by the search filter.
    pub data_points: Vec<DataPoint>,
    /// Typed settings read from the snapshot.
    pub settings: SlicerSettings,
    /// Where range filters are applied.
    pub column_target: FilterColumnTarget,
}

impl SlicerData {
    /// Indices (into `data_points`) of the points left visible by the search.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.data_points
            .iter()
            .enumerate()
            .filter(|(_, point)| point.is_visible())
            .map(|(index, _)| index)
            .collect()
    }
}

/// Converts host snapshots into slicer data.
pub trait SlicerConverter: Send + Sync {
    /// Converts `snapshot`.
    ///
    /// Returns `None` when the snapshot has no categories, which the caller
    /// treats as "no data".
    fn convert(
        &self,
        snapshot: &DataSnapshot,
        search_text: &str,
        range: &mut ScalableRange,
    ) -> Option<SlicerData>;
}

/// Converter for a single numeric category column.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryConverter;

impl SlicerConverter for CategoryConverter {
    #[tracing::instrument(skip_all, target = "range_slicer::converter", level = "debug")]
    fn convert(
        &self,
        snapshot: &DataSnapshot,
        search_text: &str,
        range: &mut ScalableRange,
    ) -> Option<SlicerData> {
        if snapshot.is_empty() {
            tracing::debug!(target: targets::CONTROLLER, "snapshot has no categories");
            return None;
        }

        let settings = SlicerSettings::from_bag(&snapshot.metadata_objects);
        let format_string = snapshot.source.format_string.clone();
        range.set_precision(format_string.as_deref().map_or(0, precision_from_format));

        if let Some((data_min, data_max)) = numeric_extent(snapshot) {
            if let Err(err) = range.update_domain(data_min, data_max) {
                tracing::warn!(target: targets::RANGE, %err, "keeping previous domain");
            }
        }

        let mut data_points: Vec<DataPoint> = snapshot
            .categories
            .iter()
            .map(|category| {
                let value = category.raw_value.as_number();
                let label = format_label(&category.raw_value, format_string.as_deref());
                let mut point = DataPoint::new(category.identity_key.as_str(), label, value);
                point.is_selected_range_point = value.is_some_and(|v| range.contains(v));
                point
            })
            .collect();

        let visible = apply_search(&mut data_points, search_text);
        tracing::debug!(
            target: targets::CONTROLLER,
            total = data_points.len(),
            visible,
            "converted snapshot"
        );

        Some(SlicerData {
            category_source_name: snapshot.source.display_name.clone(),
            format_string,
            data_points,
            settings,
            column_target: FilterColumnTarget::from_column(
                &snapshot.source.query_name,
                &snapshot.source.display_name,
            ),
        })
    }
}

fn numeric_extent(snapshot: &DataSnapshot) -> Option<(f64, f64)> {
    snapshot
        .categories
        .iter()
        .filter_map(|category| category.raw_value.as_number())
        .fold(None, |extent, v| match extent {
            None => Some((v, v)),
            Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
        })
}

/// Number of decimal places a format string displays.
///
/// Counts the digit placeholders after the decimal point: `"#"` gives 0,
/// `"0.00"` gives 2, `"#,##0.0"` gives 1.
pub fn precision_from_format(format: &str) -> u32 {
    format
        .split_once('.')
        .map_or(0, |(_, decimals)| {
            decimals
                .chars()
                .take_while(|c| matches!(c, '0' | '#'))
                .count() as u32
        })
}

/// Formats a numeric value with an optional format string.
pub fn format_value(value: f64, format: Option<&str>) -> String {
    match format {
        Some(format) => format!("{:.*}", precision_from_format(format) as usize, value),
        None => value.to_string(),
    }
}

fn format_label(raw: &RawValue, format: Option<&str>) -> String {
    match raw {
        RawValue::Number(v) if v.is_finite() => format_value(*v, format),
        RawValue::Number(v) => v.to_string(),
        RawValue::Text(text) => text.clone(),
        RawValue::Null => BLANK_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RangeValue;
    use crate::settings::SettingsBag;
    use crate::snapshot::{CategoryValue, ColumnMetadata};

    fn snapshot(values: &[(&str, RawValue)]) -> DataSnapshot {
        DataSnapshot::new(
            ColumnMetadata::new("Amount", "Sales.Amount").with_format_string("0.0"),
            values
                .iter()
                .map(|(key, value)| CategoryValue::new(*key, value.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_empty_snapshot_is_no_data() {
        let mut range = ScalableRange::default();
        let data = CategoryConverter.convert(&DataSnapshot::default(), "", &mut range);
        assert!(data.is_none());
        assert!(range.domain().is_none());
    }

    #[test]
    fn test_convert_updates_domain_and_labels() {
        let mut range = ScalableRange::default();
        let snapshot = snapshot(&[
            ("a", RawValue::Number(3.0)),
            ("b", RawValue::Number(-1.5)),
            ("c", RawValue::Null),
        ]);

        let data = CategoryConverter.convert(&snapshot, "", &mut range).unwrap();
        assert_eq!(range.domain(), Some((-1.5, 3.0)));
        assert_eq!(range.precision(), 1);

        let labels: Vec<&str> = data.data_points.iter().map(|p| p.category.as_str()).collect();
        assert_eq!(labels, vec!["3.0", "-1.5", BLANK_LABEL]);
        assert_eq!(data.category_source_name, "Amount");
        assert_eq!(data.column_target, FilterColumnTarget::new("Sales", "Amount"));
    }

    #[test]
    fn test_convert_marks_range_points() {
        let mut range = ScalableRange::new(0.0, 10.0).unwrap();
        range.set_value(RangeValue::new(Some(2.0), Some(5.0)));
        let snapshot = snapshot(&[
            ("a", RawValue::Number(0.0)),
            ("b", RawValue::Number(3.0)),
            ("c", RawValue::Number(10.0)),
        ]);

        let data = CategoryConverter.convert(&snapshot, "", &mut range).unwrap();
        let flags: Vec<bool> = data.data_points.iter().map(|p| p.is_selected_range_point).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn test_convert_applies_prefix_search() {
        let mut range = ScalableRange::default();
        let snapshot = snapshot(&[
            ("a", RawValue::from("abc")),
            ("b", RawValue::from("xab")),
            ("c", RawValue::from("ABd")),
        ]);

        let data = CategoryConverter.convert(&snapshot, "Ab", &mut range).unwrap();
        assert_eq!(data.visible_indices(), vec![0, 2]);
        // Text-only columns leave the domain unset
        assert!(range.domain().is_none());
    }

    #[test]
    fn test_convert_reads_settings() {
        let mut bag = SettingsBag::new();
        bag.set("general.columns", 3);
        let snapshot = snapshot(&[("a", RawValue::Number(1.0))]).with_metadata_objects(bag);

        let data = CategoryConverter.convert(&snapshot, "", &mut ScalableRange::default()).unwrap();
        assert_eq!(data.settings.general.columns, 3);
    }

    #[test]
    fn test_precision_from_format() {
        assert_eq!(precision_from_format("#"), 0);
        assert_eq!(precision_from_format("0.00"), 2);
        assert_eq!(precision_from_format("#,##0.0"), 1);
        assert_eq!(precision_from_format("0.00%"), 2);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(2.0, None), "2");
        assert_eq!(format_value(2.0, Some("0.00")), "2.00");
        assert_eq!(format_value(2.6, Some("#")), "3");
    }
}
