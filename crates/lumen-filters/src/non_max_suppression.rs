//! Non-maximum suppression along the gradient direction.

use lumen_core::{
    Filter, FilterError, Frame, FrameDescriptor, ParamDescriptor, ParamId, ParameterInfo,
    PixelFormat, ProcessContext,
};

use crate::kernel::{require_format, require_pixels, smoothstep, step};

const UPPER_THRESHOLD: ParamDescriptor = ParamDescriptor::threshold("Upper Threshold", "Upper", 0.4)
    .with_id(ParamId(400), "upper_threshold");
const LOWER_THRESHOLD: ParamDescriptor = ParamDescriptor::threshold("Lower Threshold", "Lower", 0.1)
    .with_id(ParamId(401), "lower_threshold");

/// Thins edges to one pixel by keeping only local gradient maxima.
///
/// Expects the RGBA output of [`DirectionalSobel`](crate::DirectionalSobel).
/// For each pixel the magnitudes one step forward and one step back along
/// the encoded direction are sampled; the pixel survives only if it is at
/// least as strong as both. Survivors are then weighted by
/// `smoothstep(lower, upper, magnitude)`, so gradients below `lower` vanish,
/// those above `upper` are kept at full strength, and those in between become
/// weak edges for [`WeakPixelInclusion`](crate::WeakPixelInclusion).
///
/// Writes a luma frame.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Upper Threshold | 0.0–1.0 | 0.4 |
/// | 1 | Lower Threshold | 0.0–1.0 | 0.1 |
#[derive(Debug, Clone)]
pub struct DirectionalNonMaximumSuppression {
    upper_threshold: f32,
    lower_threshold: f32,
}

impl Default for DirectionalNonMaximumSuppression {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectionalNonMaximumSuppression {
    /// Create with thresholds 0.4 / 0.1.
    pub fn new() -> Self {
        Self {
            upper_threshold: UPPER_THRESHOLD.default,
            lower_threshold: LOWER_THRESHOLD.default,
        }
    }

    /// Set the magnitude at which an edge is kept at full strength.
    pub fn set_upper_threshold(&mut self, value: f32) {
        self.upper_threshold = UPPER_THRESHOLD.clamp(value);
    }

    /// Current upper threshold.
    pub fn upper_threshold(&self) -> f32 {
        self.upper_threshold
    }

    /// Set the magnitude below which an edge is discarded.
    pub fn set_lower_threshold(&mut self, value: f32) {
        self.lower_threshold = LOWER_THRESHOLD.clamp(value);
    }

    /// Current lower threshold.
    pub fn lower_threshold(&self) -> f32 {
        self.lower_threshold
    }
}

/// Decodes a remapped direction component back to a pixel step of -1, 0 or 1.
#[inline]
fn direction_step(encoded: f32) -> isize {
    let component = encoded * 2.0 - 1.0;
    if component > 0.5 {
        1
    } else if component < -0.5 {
        -1
    } else {
        0
    }
}

impl Filter for DirectionalNonMaximumSuppression {
    fn name(&self) -> &'static str {
        "directional_nms"
    }

    fn apply(
        &mut self,
        input: &Frame,
        ctx: &mut ProcessContext<'_>,
    ) -> Result<Option<Frame>, FilterError> {
        require_pixels(self.name(), input)?;
        require_format(self.name(), input, PixelFormat::Rgba)?;
        let (width, height) = (input.width(), input.height());
        let mut output = ctx.output_buffer(FrameDescriptor::luma(width as u32, height as u32));

        for y in 0..height {
            for x in 0..width {
                let magnitude = input.get(x, y, 0);
                let dx = direction_step(input.get(x, y, 1));
                let dy = direction_step(input.get(x, y, 2));
                let (xi, yi) = (x as isize, y as isize);

                let forward = input.sample_clamped(xi + dx, yi + dy, 0);
                let backward = input.sample_clamped(xi - dx, yi - dy, 0);

                let multiplier = step(forward, magnitude)
                    * step(backward, magnitude)
                    * smoothstep(self.lower_threshold, self.upper_threshold, magnitude);
                output.set(x, y, 0, multiplier);
            }
        }
        Ok(Some(Frame::new(output)))
    }
}

impl ParameterInfo for DirectionalNonMaximumSuppression {
    fn param_count(&self) -> usize {
        2
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(UPPER_THRESHOLD),
            1 => Some(LOWER_THRESHOLD),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.upper_threshold,
            1 => self.lower_threshold,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_upper_threshold(value),
            1 => self.set_lower_threshold(value),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{FrameBuffer, FramePool};

    /// Horizontal run of gradient pixels all pointing along +x.
    fn ridge(magnitudes: &[f32]) -> Frame {
        let mut buffer = FrameBuffer::new(FrameDescriptor::rgba(magnitudes.len() as u32, 1));
        for (x, &m) in magnitudes.iter().enumerate() {
            buffer.set(x, 0, 0, m);
            buffer.set(x, 0, 1, 1.0);
            buffer.set(x, 0, 2, 0.5);
            buffer.set(x, 0, 3, 1.0);
        }
        Frame::new(buffer)
    }

    fn run(input: &Frame) -> Frame {
        let mut pool = FramePool::default();
        let mut ctx = ProcessContext::standalone(&mut pool);
        DirectionalNonMaximumSuppression::new()
            .apply(input, &mut ctx)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn keeps_only_the_peak() {
        let output = run(&ridge(&[0.2, 0.6, 0.9, 0.6, 0.2]));
        assert_eq!(output.samples(), &[0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn weak_peak_is_attenuated() {
        let output = run(&ridge(&[0.0, 0.25, 0.0]));
        let v = output.samples()[1];
        assert!(v > 0.0 && v < 1.0, "{v}");
    }

    #[test]
    fn below_lower_threshold_is_removed() {
        let output = run(&ridge(&[0.0, 0.05, 0.0]));
        assert_eq!(output.samples()[1], 0.0);
    }

    #[test]
    fn thresholds_are_clamped() {
        let mut nms = DirectionalNonMaximumSuppression::new();
        nms.set_param(0, 2.0);
        nms.set_param(1, -1.0);
        assert_eq!(nms.upper_threshold(), 1.0);
        assert_eq!(nms.lower_threshold(), 0.0);
    }

    #[test]
    fn luma_input_is_rejected() {
        let mut pool = FramePool::default();
        let mut ctx = ProcessContext::standalone(&mut pool);
        let input = Frame::new(FrameBuffer::new(FrameDescriptor::luma(2, 2)));
        let result = DirectionalNonMaximumSuppression::new().apply(&input, &mut ctx);
        assert!(matches!(
            result,
            Err(FilterError::UnsupportedFormat { found: PixelFormat::Luma, .. })
        ));
    }
}
