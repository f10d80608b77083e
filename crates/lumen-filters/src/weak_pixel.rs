//! Hysteresis step of the Canny detector.

use lumen_core::{
    Filter, FilterError, Frame, FrameDescriptor, ParamDescriptor, ParameterInfo, ProcessContext,
};

use crate::kernel::{require_pixels, step};

/// Neighbourhood sum a pixel needs to survive.
const SUM_THRESHOLD: f32 = 1.5;
/// Minimum centre value counted as "on".
const PIXEL_THRESHOLD: f32 = 0.01;

/// Promotes weak edge pixels that touch strong ones and clears the rest.
///
/// A pixel is written as 1 when it is itself non-zero and the 3×3
/// neighbourhood around it (centre included) sums to at least 1.5; otherwise
/// it is written as 0. Reads channel 0, writes luma.
///
/// Has no parameters.
#[derive(Debug, Clone, Default)]
pub struct WeakPixelInclusion;

impl WeakPixelInclusion {
    /// Create the filter.
    pub fn new() -> Self {
        Self
    }
}

impl Filter for WeakPixelInclusion {
    fn name(&self) -> &'static str {
        "weak_pixel_inclusion"
    }

    fn apply(
        &mut self,
        input: &Frame,
        ctx: &mut ProcessContext<'_>,
    ) -> Result<Option<Frame>, FilterError> {
        require_pixels(self.name(), input)?;
        let (width, height) = (input.width(), input.height());
        let mut output = ctx.output_buffer(FrameDescriptor::luma(width as u32, height as u32));

        for y in 0..height {
            for x in 0..width {
                let (xi, yi) = (x as isize, y as isize);
                let mut sum = 0.0;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        sum += input.sample_clamped(xi + dx, yi + dy, 0);
                    }
                }
                let center = input.get(x, y, 0);
                output.set(x, y, 0, step(SUM_THRESHOLD, sum) * step(PIXEL_THRESHOLD, center));
            }
        }
        Ok(Some(Frame::new(output)))
    }
}

impl ParameterInfo for WeakPixelInclusion {
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
