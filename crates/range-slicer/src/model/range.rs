//! Scalable range model.
//!
//! This module provides [`ScalableRange`], the single source of truth for the
//! currently selected numeric range. It maps raw domain values to the
//! normalized `[0, 100]` scale that drives the dual-handle slider, and back.
//!
//! # Example
//!
//! ```
//! use range_slicer::model::{RangeValue, ScalableRange, ScaledValue};
//!
//! let mut range = ScalableRange::new(0.0, 200.0).unwrap();
//! range.set_value(RangeValue::new(Some(50.0), Some(150.0)));
//! assert_eq!(range.scaled_value(), ScaledValue::new(25.0, 75.0));
//!
//! // Dragging the slider writes back through the same model
//! range.set_scaled_value(ScaledValue::new(10.0, 90.0));
//! assert_eq!(range.value(), RangeValue::new(Some(20.0), Some(180.0)));
//! ```

use range_slicer_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Lower end of the normalized slider scale.
pub const SCALE_MIN: f64 = 0.0;

/// Upper end of the normalized slider scale.
pub const SCALE_MAX: f64 = 100.0;

/// A range in raw domain units.
///
/// `None` on either side means "unbounded on that side".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeValue {
    /// Lower bound, inclusive.
    pub min: Option<f64>,
    /// Upper bound, inclusive.
    pub max: Option<f64>,
}

impl RangeValue {
    /// A range unbounded on both sides.
    pub const UNBOUNDED: Self = Self {
        min: None,
        max: None,
    };

    /// Creates a range from optional bounds.
    pub const fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Returns true if `value` lies inside the range (bounds inclusive).
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    /// Returns true if neither side is bounded.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Replaces non-finite bounds with `None`.
    fn normalized(self) -> Self {
        Self {
            min: self.min.filter(|v| v.is_finite()),
            max: self.max.filter(|v| v.is_finite()),
        }
    }

    /// Swaps the bounds if both are set and inverted.
    fn ordered(self) -> Self {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > max => Self {
                min: Some(max),
                max: Some(min),
            },
            _ => self,
        }
    }
}

/// A range projected onto the `[0, 100]` slider scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledValue {
    /// Position of the lower handle.
    pub min: f64,
    /// Position of the upper handle.
    pub max: f64,
}

impl ScaledValue {
    /// Both handles at the ends of the track.
    pub const FULL: Self = Self {
        min: SCALE_MIN,
        max: SCALE_MAX,
    };

    /// Degenerate projection used when the domain collapses to one value.
    pub const COLLAPSED: Self = Self {
        min: SCALE_MIN,
        max: SCALE_MIN,
    };

    /// Creates a scaled value.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Default for ScaledValue {
    fn default() -> Self {
        Self::FULL
    }
}

/// Maps a raw numeric domain onto the slider scale and owns the selected range.
///
/// The observed domain `[data_min, data_max]` is fed in once per refresh via
/// [`update_domain`](Self::update_domain). Until then the range is unbounded
/// and the projection is [`ScaledValue::FULL`].
///
/// Every write goes through [`set_value`](Self::set_value) or
/// [`set_scaled_value`](Self::set_scaled_value); both keep `min <= max` and
/// mark the range dirty for re-render.
#[derive(Debug, Clone)]
pub struct ScalableRange {
    data_min: f64,
    data_max: f64,
    has_domain: bool,
    value: RangeValue,
    scaled: ScaledValue,
    /// Decimal places used when converting slider positions to raw values.
    precision: u32,
    /// Bounds were fixed by a collapsed domain rather than by the user.
    pinned: bool,
    dirty: bool,
}

impl Default for ScalableRange {
    fn default() -> Self {
        Self {
            data_min: 0.0,
            data_max: 0.0,
            has_domain: false,
            value: RangeValue::UNBOUNDED,
            scaled: ScaledValue::FULL,
            precision: 0,
            pinned: false,
            dirty: false,
        }
    }
}

impl ScalableRange {
    /// Creates a range over the domain `[data_min, data_max]`.
    ///
    /// Fails with [`DomainError`] when the domain is inverted or not finite.
    pub fn new(data_min: f64, data_max: f64) -> Result<Self, DomainError> {
        let mut range = Self::default();
        range.update_domain(data_min, data_max)?;
        range.dirty = false;
        Ok(range)
    }

    /// Sets the display precision using builder pattern.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    // =========================================================================
    // Domain
    // =========================================================================

    /// The observed domain, if one has been set.
    pub fn domain(&self) -> Option<(f64, f64)> {
        self.has_domain.then_some((self.data_min, self.data_max))
    }

    /// Returns true if the domain collapsed to a single value.
    pub fn is_collapsed(&self) -> bool {
        self.has_domain && self.data_min == self.data_max
    }

    /// Updates the observed domain.
    ///
    /// Bounds outside the new domain are clamped into it. A collapsed domain
    /// pins both bounds to its single value and projects to
    /// [`ScaledValue::COLLAPSED`]; when the domain widens again, pinned bounds
    /// are released back to unbounded.
    ///
    /// On error the previous state is left untouched.
    pub fn update_domain(&mut self, data_min: f64, data_max: f64) -> Result<(), DomainError> {
        validate_domain(data_min, data_max)?;

        let changed = !self.has_domain || self.data_min != data_min || self.data_max != data_max;
        self.data_min = data_min;
        self.data_max = data_max;
        self.has_domain = true;

        if data_min == data_max {
            self.value = RangeValue::new(Some(data_min), Some(data_min));
            self.scaled = ScaledValue::COLLAPSED;
            self.pinned = true;
            self.dirty |= changed;
            tracing::debug!(target: targets::RANGE, value = data_min, "domain collapsed");
            return Ok(());
        }

        let previous = self.value;
        if self.pinned {
            self.value = RangeValue::UNBOUNDED;
            self.pinned = false;
        } else {
            self.value = self.clamped(self.value);
        }
        self.scaled = self.to_scaled(self.value);
        self.dirty |= changed || previous != self.value;

        tracing::debug!(
            target: targets::RANGE,
            data_min,
            data_max,
            min = ?self.value.min,
            max = ?self.value.max,
            "domain updated"
        );
        Ok(())
    }

    /// Forgets the observed domain.
    ///
    /// Committed bounds are kept; bounds pinned by a collapsed domain are
    /// released. The projection falls back to [`ScaledValue::FULL`].
    pub fn clear_domain(&mut self) {
        if !self.has_domain {
            return;
        }
        self.has_domain = false;
        if self.pinned {
            self.value = RangeValue::UNBOUNDED;
            self.pinned = false;
        }
        self.scaled = ScaledValue::FULL;
        self.dirty = true;
        tracing::debug!(target: targets::RANGE, "domain cleared");
    }

    // =========================================================================
    // Raw Value
    // =========================================================================

    /// Current raw bounds.
    pub fn value(&self) -> RangeValue {
        self.value
    }

    /// Sets the raw bounds.
    ///
    /// Non-finite bounds become unbounded, bounds are clamped to the domain and
    /// swapped if inverted. The scaled projection is recomputed.
    pub fn set_value(&mut self, value: RangeValue) {
        let value = self.clamped(value.normalized()).ordered();
        if self.is_collapsed() {
            // Nothing to select inside a single-value domain
            self.value = RangeValue::new(Some(self.data_min), Some(self.data_min));
            self.scaled = ScaledValue::COLLAPSED;
        } else {
            self.value = value;
            self.scaled = self.to_scaled(value);
            self.pinned = false;
        }
        self.dirty = true;
        tracing::trace!(target: targets::RANGE, min = ?self.value.min, max = ?self.value.max, "value set");
    }

    /// Returns true if a raw value lies inside the selected range.
    pub fn contains(&self, value: f64) -> bool {
        self.value.contains(value)
    }

    // =========================================================================
    // Scaled Value
    // =========================================================================

    /// Current bounds projected onto `[0, 100]`.
    pub fn scaled_value(&self) -> ScaledValue {
        self.scaled
    }

    /// Sets the bounds from slider positions.
    ///
    /// Positions are clamped to `[0, 100]`, projected back onto the domain and
    /// rounded to the display precision, so that repeated nudges settle on the
    /// same raw value. Non-finite positions become unbounded. Without a domain
    /// there is nothing to project onto and the call is ignored.
    pub fn set_scaled_value(&mut self, scaled: ScaledValue) {
        if !self.has_domain {
            tracing::warn!(target: targets::RANGE, "scaled value set before any domain, ignoring");
            return;
        }

        let min = finite(scaled.min).map(|s| self.from_scaled(s));
        let max = finite(scaled.max).map(|s| self.from_scaled(s));
        self.set_value(RangeValue::new(min, max));
    }

    // =========================================================================
    // Precision and Formatting
    // =========================================================================

    /// Decimal places used for rounding and display.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Sets the decimal places used for rounding and display.
    pub fn set_precision(&mut self, precision: u32) {
        self.dirty |= self.precision != precision;
        self.precision = precision;
    }

    /// Formats a bound for display; unbounded sides format as an empty string.
    pub fn format_bound(&self, bound: Option<f64>) -> String {
        format_bound(bound, self.precision)
    }

    // =========================================================================
    // Dirty Tracking
    // =========================================================================

    /// Returns true if the range changed since the last [`take_dirty`](Self::take_dirty).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears and returns the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    fn clamped(&self, value: RangeValue) -> RangeValue {
        if !self.has_domain {
            return value;
        }
        let clamp = |v: f64| v.clamp(self.data_min, self.data_max);
        RangeValue::new(value.min.map(clamp), value.max.map(clamp))
    }

    fn to_scaled(&self, value: RangeValue) -> ScaledValue {
        if !self.has_domain {
            return ScaledValue::FULL;
        }
        if self.is_collapsed() {
            return ScaledValue::COLLAPSED;
        }
        let span = self.data_max - self.data_min;
        let project = |v: f64| ((v - self.data_min) / span * SCALE_MAX).clamp(SCALE_MIN, SCALE_MAX);
        ScaledValue::new(
            value.min.map_or(SCALE_MIN, project),
            value.max.map_or(SCALE_MAX, project),
        )
    }

    fn from_scaled(&self, position: f64) -> f64 {
        let position = position.clamp(SCALE_MIN, SCALE_MAX);
        let raw = self.data_min + position / SCALE_MAX * (self.data_max - self.data_min);
        round_to(raw, self.precision)
    }
}

fn validate_domain(data_min: f64, data_max: f64) -> Result<(), DomainError> {
    if !data_min.is_finite() || !data_max.is_finite() {
        return Err(DomainError::NonFinite {
            min: data_min,
            max: data_max,
        });
    }
    if data_min > data_max {
        return Err(DomainError::Inverted {
            min: data_min,
            max: data_max,
        });
    }
    Ok(())
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Formats a bound with `precision` decimals; unbounded formats as "".
pub fn format_bound(bound: Option<f64>, precision: u32) -> String {
    match bound {
        Some(value) => format!("{:.*}", precision as usize, value),
        None => String::new(),
    }
}

/// Rounds to `precision` decimal places.
fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(15) as i32);
    (value * factor).round() / factor
}
