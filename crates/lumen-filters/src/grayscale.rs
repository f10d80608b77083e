//! RGBA to luminance conversion.

use lumen_core::{
    Filter, FilterError, Frame, FrameDescriptor, ParamDescriptor, ParameterInfo, PixelFormat,
    ProcessContext,
};

use crate::kernel::{luminance, require_pixels};

/// Converts colour frames to single-component luminance.
///
/// Uses the weights in [`LUMA_WEIGHTS`](crate::kernel::LUMA_WEIGHTS). Luma
/// frames are forwarded unchanged without copying.
///
/// Has no parameters.
#[derive(Debug, Clone, Default)]
pub struct Grayscale;

impl Grayscale {
    /// Create a grayscale converter.
    pub fn new() -> Self {
        Self
    }
}

impl Filter for Grayscale {
    fn name(&self) -> &'static str {
        "grayscale"
    }

    fn apply(
        &mut self,
        input: &Frame,
        ctx: &mut ProcessContext<'_>,
    ) -> Result<Option<Frame>, FilterError> {
        require_pixels(self.name(), input)?;
        if input.format() == PixelFormat::Luma {
            return Ok(Some(input.acquire()));
        }

        let (width, height) = (input.width(), input.height());
        let mut output = ctx.output_buffer(FrameDescriptor::luma(width as u32, height as u32));
        for y in 0..height {
            for x in 0..width {
                output.set(x, y, 0, luminance(input, x, y));
            }
        }
        Ok(Some(Frame::new(output)))
    }
}

impl ParameterInfo for Grayscale {
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
