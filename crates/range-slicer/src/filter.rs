//! Advanced range filters issued to the host.
//!
//! The slicer expresses its committed range as an [`AdvancedFilter`]: a column
//! target plus up to two bound conditions joined with `And`. An unbounded side
//! contributes no condition, and a filter without conditions clears any
//! previously applied filter.

use serde::{Deserialize, Serialize};

use crate::model::RangeValue;

/// Schema identifier carried by every advanced filter.
pub const ADVANCED_FILTER_SCHEMA: &str = "http://powerbi.com/product/schema#advanced";

/// The table/column pair a filter applies to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterColumnTarget {
    pub table: String,
    pub column: String,
}

impl FilterColumnTarget {
    /// Creates a target.
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Derives the target from a column's metadata.
    ///
    /// The table is the part of `query_name` before the first `.`, or empty
    /// when there is none. The column is the display name.
    pub fn from_column(query_name: &str, display_name: &str) -> Self {
        let table = query_name.split_once('.').map_or("", |(table, _)| table);
        Self::new(table, display_name)
    }
}

/// Comparison applied by one filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionOperator {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl ConditionOperator {
    fn test(self, value: f64, operand: f64) -> bool {
        match self {
            ConditionOperator::GreaterThan => value > operand,
            ConditionOperator::GreaterThanOrEqual => value >= operand,
            ConditionOperator::LessThan => value < operand,
            ConditionOperator::LessThanOrEqual => value <= operand,
        }
    }
}

/// How conditions combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

/// A single bound condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub operator: ConditionOperator,
    pub value: f64,
}

/// A structured range filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedFilter {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub target: FilterColumnTarget,
    pub logical_operator: LogicalOperator,
    pub conditions: Vec<FilterCondition>,
}

impl AdvancedFilter {
    /// Builds the filter selecting `range` on `target`.
    pub fn for_range(target: FilterColumnTarget, range: RangeValue) -> Self {
        let mut conditions = Vec::with_capacity(2);
        if let Some(min) = range.min {
            conditions.push(FilterCondition {
                operator: ConditionOperator::GreaterThanOrEqual,
                value: min,
            });
        }
        if let Some(max) = range.max {
            conditions.push(FilterCondition {
                operator: ConditionOperator::LessThanOrEqual,
                value: max,
            });
        }

        Self {
            schema: ADVANCED_FILTER_SCHEMA.to_string(),
            target,
            logical_operator: LogicalOperator::And,
            conditions,
        }
    }

    /// Returns true if this filter removes any previously applied filter.
    pub fn is_clear(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluates the filter against a value.
    pub fn matches(&self, value: f64) -> bool {
        let mut results = self.conditions.iter().map(|c| c.operator.test(value, c.value));
        match self.logical_operator {
            LogicalOperator::And => results.all(|r| r),
            LogicalOperator::Or => self.conditions.is_empty() || results.any(|r| r),
        }
    }

    /// Serializes the filter for persistence.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
