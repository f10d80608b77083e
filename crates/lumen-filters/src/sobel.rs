//! Sobel gradient with quantized direction.

use lumen_core::{
    Filter, FilterError, Frame, FrameDescriptor, ParamDescriptor, ParamId, ParameterInfo,
    ProcessContext,
};

use crate::kernel::require_pixels;

/// Offset from 1 - sin(pi/8): snaps a unit-vector component to 0 near an
/// axis and to +-1 away from it.
const DIRECTION_SNAP: f32 = 0.617_316;

const TEXEL_SPACING: ParamDescriptor =
    ParamDescriptor::pixels("Texel Spacing", "Spacing", 1.0, 8.0, 1.0)
        .with_id(ParamId(300), "texel_spacing");

/// Sobel edge detector that also records the gradient direction.
///
/// Reads channel 0 and writes an RGBA frame:
///
/// - R: gradient magnitude, clamped to 1
/// - G, B: x and y direction, each snapped to {-1, 0, 1} and remapped to
///   {0, 0.5, 1}
/// - A: 1
///
/// A flat neighbourhood has no direction and is written as (0, 0.5, 0.5, 1).
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Texel Spacing | 1–8 px | 1 |
#[derive(Debug, Clone)]
pub struct DirectionalSobel {
    texel_spacing: usize,
}

impl Default for DirectionalSobel {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectionalSobel {
    /// Create a detector sampling immediate neighbours.
    pub fn new() -> Self {
        Self {
            texel_spacing: TEXEL_SPACING.default as usize,
        }
    }

    /// Distance in pixels to the sampled neighbours (1–8).
    pub fn set_texel_spacing(&mut self, spacing: usize) {
        self.texel_spacing = TEXEL_SPACING.clamp(spacing as f32) as usize;
    }

    /// Current neighbour distance in pixels.
    pub fn texel_spacing(&self) -> usize {
        self.texel_spacing
    }
}

#[inline]
fn snap(component: f32) -> f32 {
    let snapped = libm::floorf(libm::fabsf(component) + DIRECTION_SNAP);
    if component < 0.0 { -snapped } else { snapped }
}

impl Filter for DirectionalSobel {
    fn name(&self) -> &'static str {
        "directional_sobel"
    }

    fn apply(
        &mut self,
        input: &Frame,
        ctx: &mut ProcessContext<'_>,
    ) -> Result<Option<Frame>, FilterError> {
        require_pixels(self.name(), input)?;
        let (width, height) = (input.width(), input.height());
        let d = self.texel_spacing as isize;
        let mut output = ctx.output_buffer(FrameDescriptor::rgba(width as u32, height as u32));

        for y in 0..height {
            for x in 0..width {
                let (xi, yi) = (x as isize, y as isize);
                let at = |dx: isize, dy: isize| input.sample_clamped(xi + dx * d, yi + dy * d, 0);

                let top_left = at(-1, -1);
                let top = at(0, -1);
                let top_right = at(1, -1);
                let left = at(-1, 0);
                let right = at(1, 0);
                let bottom_left = at(-1, 1);
                let bottom = at(0, 1);
                let bottom_right = at(1, 1);

                let gx = -bottom_left - 2.0 * left - top_left
                    + bottom_right
                    + 2.0 * right
                    + top_right;
                let gy = -top_left - 2.0 * top - top_right
                    + bottom_left
                    + 2.0 * bottom
                    + bottom_right;

                let magnitude = libm::sqrtf(gx * gx + gy * gy);
                let (dir_x, dir_y) = if magnitude > 0.0 {
                    (snap(gx / magnitude), snap(gy / magnitude))
                } else {
                    (0.0, 0.0)
                };

                output.set(x, y, 0, magnitude.min(1.0));
                output.set(x, y, 1, (dir_x + 1.0) * 0.5);
                output.set(x, y, 2, (dir_y + 1.0) * 0.5);
                output.set(x, y, 3, 1.0);
            }
        }
        Ok(Some(Frame::new(output)))
    }
}

impl ParameterInfo for DirectionalSobel {
    fn param_count(&self) -> usize {
        1
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(TEXEL_SPACING),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.texel_spacing as f32,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if index == 0 {
            self.texel_spacing = TEXEL_SPACING.clamp(value) as usize;
        }
    }
}
