//! Frame gate on mean luminance.

use lumen_core::{
    Filter, FilterError, Frame, ParamDescriptor, ParamId, ParameterInfo, ProcessContext,
};

use crate::kernel::{luminance, require_pixels};

const THRESHOLD: ParamDescriptor =
    ParamDescriptor::threshold("Threshold", "Thresh", 0.1).with_id(ParamId(700), "threshold");

/// Forwards a frame only if its mean luminance reaches a threshold.
///
/// Darker frames are dropped: `apply` returns `Ok(None)` and nothing
/// downstream runs for that frame. Accepted frames pass through unchanged.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Threshold | 0.0–1.0 | 0.1 |
#[derive(Debug, Clone)]
pub struct LuminanceGate {
    threshold: f32,
}

impl Default for LuminanceGate {
    fn default() -> Self {
        Self::new()
    }
}

impl LuminanceGate {
    /// Create a gate with threshold 0.1.
    pub fn new() -> Self {
        Self {
            threshold: THRESHOLD.default,
        }
    }

    /// Set the minimum mean luminance, clamped to 0–1.
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = THRESHOLD.clamp(threshold);
    }

    /// Current threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Filter for LuminanceGate {
    fn name(&self) -> &'static str {
        "luminance_gate"
    }

    fn apply(
        &mut self,
        input: &Frame,
        _ctx: &mut ProcessContext<'_>,
    ) -> Result<Option<Frame>, FilterError> {
        require_pixels(self.name(), input)?;
        let (width, height) = (input.width(), input.height());
        let mut total = 0.0f64;
        for y in 0..height {
            for x in 0..width {
                total += f64::from(luminance(input, x, y));
            }
        }
        let mean = (total / (width * height) as f64) as f32;

        if mean < self.threshold {
            Ok(None)
        } else {
            Ok(Some(input.acquire()))
        }
    }
}

impl ParameterInfo for LuminanceGate {
    fn param_count(&self) -> usize {
        1
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(THRESHOLD),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.threshold,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if index == 0 {
            self.set_threshold(value);
        }
    }
}
