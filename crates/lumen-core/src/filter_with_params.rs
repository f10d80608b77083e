//! Combined `Filter` + `ParameterInfo` trait for boxed filters.
//!
//! [`FilterWithParams`] provides prefixed parameter methods dispatched through
//! the same vtable as [`Filter`]. A blanket impl covers every concrete type that
//! implements both traits, so the graph can store a single
//! `Box<dyn FilterWithParams + Send>` per leaf node and still answer parameter
//! queries for it.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use crate::filter::Filter;
use crate::param_info::{ParamDescriptor, ParameterInfo};

/// Object-safe parameter access for boxed filters.
pub trait FilterWithParams: Filter {
    /// Get the parameter count.
    fn filter_param_count(&self) -> usize;

    /// Get parameter info by index.
    fn filter_param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Get parameter value by index.
    fn filter_get_param(&self, index: usize) -> f32;

    /// Set parameter value by index.
    fn filter_set_param(&mut self, index: usize, value: f32);

    /// Format a parameter value as display text.
    ///
    /// Returns `None` if the index is out of range.
    fn filter_format_value(&self, index: usize, value: f32) -> Option<String>;

    /// Parse display text back to a parameter value.
    ///
    /// Returns `None` if the index is out of range or parsing fails.
    fn filter_parse_value(&self, index: usize, text: &str) -> Option<f32>;
}

impl<T: Filter + ParameterInfo> FilterWithParams for T {
    fn filter_param_count(&self) -> usize {
        self.param_count()
    }

    fn filter_param_info(&self, index: usize) -> Option<ParamDescriptor> {
        self.param_info(index)
    }

    fn filter_get_param(&self, index: usize) -> f32 {
        self.get_param(index)
    }

    fn filter_set_param(&mut self, index: usize, value: f32) {
        self.set_param(index, value);
    }

    fn filter_format_value(&self, index: usize, value: f32) -> Option<String> {
        self.param_info(index).map(|desc| desc.format_value(value))
    }

    fn filter_parse_value(&self, index: usize, text: &str) -> Option<f32> {
        self.param_info(index)
            .and_then(|desc| desc.parse_value(text))
    }
}
