//! Parameter introspection for discoverable filter parameters.
//!
//! This module provides the [`ParameterInfo`] trait and supporting types that let
//! configuration files, the CLI and composite groups discover and set filter
//! parameters at runtime without knowing the concrete filter type.
//!
//! # Design
//!
//! Parameters are accessed by zero-based index. Each parameter is described by a
//! [`ParamDescriptor`] carrying display names, a stable [`ParamId`], a
//! `string_id` used by pipeline files, the valid range and a [`ParamUnit`].
//!
//! Composite groups re-publish selected member parameters under their own
//! indices; see [`GroupBuilder::expose_param()`](crate::graph::GroupBuilder::expose_param).
//!
//! # Example
//!
//! ```rust
//! use lumen_core::{ParamDescriptor, ParamId, ParameterInfo};
//!
//! struct Threshold {
//!     level: f32,
//! }
//!
//! impl ParameterInfo for Threshold {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::threshold("Level", "Level", 0.5)
//!                 .with_id(ParamId(900), "level")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.level,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if index == 0 {
//!             self.level = value.clamp(0.0, 1.0);
//!         }
//!     }
//! }
//! ```

#[cfg(not(feature = "std"))]
use alloc::{format, string::String};

/// Stable parameter identifier that survives reordering.
///
/// Each filter gets a base ID and numbers its parameters sequentially from
/// there (grayscale 100, blur 200, sobel 300, ...). Once assigned, an ID must
/// never change for a given parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Unit of a parameter value, used for formatting and parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamUnit {
    /// Distance in pixels (blur radius, sampling offsets).
    Pixels,
    /// Fraction in `[0, 1]` (thresholds, intensities).
    Ratio,
    /// Scale factor (texel spacing).
    Multiplier,
    /// Unitless value.
    #[default]
    None,
}

impl ParamUnit {
    /// Suffix appended when formatting a value.
    pub const fn suffix(self) -> &'static str {
        match self {
            ParamUnit::Pixels => " px",
            ParamUnit::Ratio | ParamUnit::None => "",
            ParamUnit::Multiplier => "x",
        }
    }
}

/// Metadata for a single filter parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full display name (e.g., "Blur Radius").
    pub name: &'static str,
    /// Short display name, at most 8 characters.
    pub short_name: &'static str,
    /// Unit for formatting.
    pub unit: ParamUnit,
    /// Minimum allowed value.
    pub min: f32,
    /// Maximum allowed value.
    pub max: f32,
    /// Value after construction.
    pub default: f32,
    /// Recommended increment; `1.0` marks an integer-valued parameter.
    pub step: f32,
    /// Stable numeric ID. `ParamId(0)` means unassigned.
    pub id: ParamId,
    /// Stable snake_case name used in pipeline files (e.g., `"blur_radius"`).
    pub string_id: &'static str,
}

impl ParamDescriptor {
    /// Unitless parameter with a custom range.
    pub const fn custom(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min,
            max,
            default,
            step: 0.01,
            id: ParamId(0),
            string_id: "",
        }
    }

    /// Integer pixel distance.
    pub const fn pixels(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            unit: ParamUnit::Pixels,
            step: 1.0,
            ..Self::custom(name, short_name, min, max, default)
        }
    }

    /// Fraction in `[0, 1]`.
    pub const fn threshold(name: &'static str, short_name: &'static str, default: f32) -> Self {
        Self {
            unit: ParamUnit::Ratio,
            ..Self::custom(name, short_name, 0.0, 1.0, default)
        }
    }

    /// Scale factor with a custom range.
    pub const fn multiplier(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            unit: ParamUnit::Multiplier,
            ..Self::custom(name, short_name, min, max, default)
        }
    }

    /// Assigns the stable numeric and string IDs.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Overrides the display names, keeping range and unit.
    pub const fn renamed(
        mut self,
        name: &'static str,
        short_name: &'static str,
        string_id: &'static str,
    ) -> Self {
        self.name = name;
        self.short_name = short_name;
        self.string_id = string_id;
        self
    }

    /// Clamps `value` into `[min, max]`, rounding integer-valued parameters.
    pub fn clamp(&self, value: f32) -> f32 {
        let clamped = value.clamp(self.min, self.max);
        if self.step >= 1.0 {
            round_half_away(clamped)
        } else {
            clamped
        }
    }

    /// Returns true if `value` lies within `[min, max]`.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Maps a plain value to `[0, 1]`.
    pub fn normalize(&self, value: f32) -> f32 {
        if self.max <= self.min {
            return 0.0;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// Maps `[0, 1]` back to a plain value.
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized.clamp(0.0, 1.0) * (self.max - self.min)
    }

    /// Case-insensitive match against the name, short name or string ID.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.short_name.eq_ignore_ascii_case(name)
            || (!self.string_id.is_empty() && self.string_id.eq_ignore_ascii_case(name))
    }

    /// Formats a value with its unit.
    pub fn format_value(&self, value: f32) -> String {
        match self.unit {
            ParamUnit::Pixels => format!("{value:.0}{}", self.unit.suffix()),
            ParamUnit::Ratio => format!("{value:.2}"),
            ParamUnit::Multiplier | ParamUnit::None => {
                format!("{value:.2}{}", self.unit.suffix())
            }
        }
    }

    /// Parses display text back to a plain value, clamped to range.
    ///
    /// Accepts bare numbers and the unit suffix produced by
    /// [`format_value()`](Self::format_value).
    pub fn parse_value(&self, text: &str) -> Option<f32> {
        let text = text.trim();
        let number = text
            .strip_suffix(self.unit.suffix().trim())
            .unwrap_or(text)
            .trim();
        number.parse::<f32>().ok().map(|v| self.clamp(v))
    }
}

fn round_half_away(value: f32) -> f32 {
    // `f32::round` is unavailable without std.
    if value >= 0.0 {
        (value + 0.5) as i64 as f32
    } else {
        (value - 0.5) as i64 as f32
    }
}

/// Trait for filters that expose introspectable parameters.
///
/// Indices must be stable for the lifetime of the filter instance.
pub trait ParameterInfo {
    /// Number of parameters. Valid indices are `0..param_count()`.
    fn param_count(&self) -> usize;

    /// Descriptor for the parameter at `index`, or `None` if out of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of the parameter at `index`. Returns `0.0` when out of range.
    fn get_param(&self, index: usize) -> f32;

    /// Sets the parameter at `index`, clamping to the descriptor's range.
    /// Out-of-range indices are ignored.
    fn set_param(&mut self, index: usize, value: f32);

    /// Finds a parameter index by name, short name or string ID.
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.matches(name)))
    }

    /// Finds a parameter index by its stable [`ParamId`].
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}
