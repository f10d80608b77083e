//! Colour inversion.

use lumen_core::{
    Filter, FilterError, Frame, ParamDescriptor, ParameterInfo, PixelFormat, ProcessContext,
};

use crate::kernel::require_pixels;

/// Replaces every colour component `c` with `1 - c`.
///
/// Alpha is left untouched on RGBA frames. Writes go through
/// [`Frame::make_mut()`], so a frame still held by a sibling target is copied
/// rather than modified.
#[derive(Debug, Clone, Default)]
pub struct Invert;

impl Invert {
    /// Create an inverter.
    pub fn new() -> Self {
        Self
    }
}

impl Filter for Invert {
    fn name(&self) -> &'static str {
        "invert"
    }

    fn apply(
        &mut self,
        input: &Frame,
        _ctx: &mut ProcessContext<'_>,
    ) -> Result<Option<Frame>, FilterError> {
        require_pixels(self.name(), input)?;
        let mut output = input.acquire();
        let buffer = output.make_mut();
        match buffer.format() {
            PixelFormat::Luma => {
                for sample in buffer.samples_mut() {
                    *sample = 1.0 - *sample;
                }
            }
            PixelFormat::Rgba => {
                for pixel in buffer.samples_mut().chunks_exact_mut(4) {
                    for sample in &mut pixel[..3] {
                        *sample = 1.0 - *sample;
                    }
                }
            }
        }
        Ok(Some(output))
    }
}

impl ParameterInfo for Invert {
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
