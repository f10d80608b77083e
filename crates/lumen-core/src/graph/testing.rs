//! Filters used by the graph unit tests.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, sync::Arc};
#[cfg(feature = "std")]
use std::sync::Arc;

use core::sync::atomic::{AtomicUsize, Ordering};

use crate::filter::{Filter, FilterError, ProcessContext};
use crate::filter_with_params::FilterWithParams;
use crate::frame::Frame;
use crate::param_info::{ParamDescriptor, ParamId, ParameterInfo};

/// Forwards its input unchanged. One parameter, `level`.
pub struct Relay {
    pub level: f32,
}

impl Relay {
    pub fn boxed() -> Box<dyn FilterWithParams + Send> {
        Box::new(Relay { level: 0.5 })
    }
}

impl Filter for Relay {
    fn name(&self) -> &'static str {
        "relay"
    }

    fn apply(
        &mut self,
        input: &Frame,
        _ctx: &mut ProcessContext<'_>,
    ) -> Result<Option<Frame>, FilterError> {
        Ok(Some(input.acquire()))
    }
}

impl ParameterInfo for Relay {
    fn param_count(&self) -> usize {
        1
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::threshold("Level", "Level", 0.5).with_id(ParamId(1), "level")),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.level,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if index == 0 {
            self.level = value;
        }
    }
}

/// Fails `init`.
pub struct FailingInit;

impl Filter for FailingInit {
    fn name(&self) -> &'static str {
        "failing_init"
    }

    fn init(&mut self) -> Result<(), FilterError> {
        Err(FilterError::ResourceUnavailable("shader".into()))
    }

    fn apply(
        &mut self,
        input: &Frame,
        _ctx: &mut ProcessContext<'_>,
    ) -> Result<Option<Frame>, FilterError> {
        Ok(Some(input.acquire()))
    }
}

impl ParameterInfo for FailingInit {
    fn param_count(&self) -> usize {
        0
    }
    fn param_info(&self, _index: usize) -> Option<ParamDescriptor> {
        None
    }
    fn get_param(&self, _index: usize) -> f32 {
        0.0
    }
    fn set_param(&mut self, _index: usize, _value: f32) {}
}

/// Fails every `apply`.
pub struct FailingApply;

impl Filter for FailingApply {
    fn name(&self) -> &'static str {
        "failing_apply"
    }

    fn apply(
        &mut self,
        _input: &Frame,
        _ctx: &mut ProcessContext<'_>,
    ) -> Result<Option<Frame>, FilterError> {
        Err(FilterError::Failed("boom".into()))
    }
}

impl ParameterInfo for FailingApply {
    fn param_count(&self) -> usize {
        0
    }
    fn param_info(&self, _index: usize) -> Option<ParamDescriptor> {
        None
    }
    fn get_param(&self, _index: usize) -> f32 {
        0.0
    }
    fn set_param(&mut self, _index: usize, _value: f32) {}
}

/// Produces nothing.
pub struct Swallow;

impl Filter for Swallow {
    fn name(&self) -> &'static str {
        "swallow"
    }

    fn apply(
        &mut self,
        _input: &Frame,
        _ctx: &mut ProcessContext<'_>,
    ) -> Result<Option<Frame>, FilterError> {
        Ok(None)
    }
}

impl ParameterInfo for Swallow {
    fn param_count(&self) -> usize {
        0
    }
    fn param_info(&self, _index: usize) -> Option<ParamDescriptor> {
        None
    }
    fn get_param(&self, _index: usize) -> f32 {
        0.0
    }
    fn set_param(&mut self, _index: usize, _value: f32) {}
}

/// Accepts any number of producers.
pub struct Mixer;

impl Filter for Mixer {
    fn name(&self) -> &'static str {
        "mixer"
    }

    fn apply(
        &mut self,
        input: &Frame,
        _ctx: &mut ProcessContext<'_>,
    ) -> Result<Option<Frame>, FilterError> {
        Ok(Some(input.acquire()))
    }

    fn accepts_multiple_inputs(&self) -> bool {
        true
    }
}

impl ParameterInfo for Mixer {
    fn param_count(&self) -> usize {
        0
    }
    fn param_info(&self, _index: usize) -> Option<ParamDescriptor> {
        None
    }
    fn get_param(&self, _index: usize) -> f32 {
        0.0
    }
    fn set_param(&mut self, _index: usize, _value: f32) {}
}

/// Counts teardowns into a shared counter.
pub struct Tracked {
    torn: Arc<AtomicUsize>,
}

impl Tracked {
    pub fn boxed(torn: &Arc<AtomicUsize>) -> Box<dyn FilterWithParams + Send> {
        Box::new(Tracked {
            torn: Arc::clone(torn),
        })
    }
}

impl Filter for Tracked {
    fn name(&self) -> &'static str {
        "tracked"
    }

    fn apply(
        &mut self,
        input: &Frame,
        _ctx: &mut ProcessContext<'_>,
    ) -> Result<Option<Frame>, FilterError> {
        Ok(Some(input.acquire()))
    }

    fn teardown(&mut self) {
        self.torn.fetch_add(1, Ordering::SeqCst);
    }
}

impl ParameterInfo for Tracked {
    fn param_count(&self) -> usize {
        0
    }
    fn param_info(&self, _index: usize) -> Option<ParamDescriptor> {
        None
    }
    fn get_param(&self, _index: usize) -> f32 {
        0.0
    }
    fn set_param(&mut self, _index: usize, _value: f32) {}
}
