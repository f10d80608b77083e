//! Separable single-component Gaussian blur.
//!
//! Blurs channel 0 only and writes a luma frame, which is all the edge
//! detection stages after it read. Two one-dimensional passes (horizontal then
//! vertical) with clamp-to-edge sampling.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use lumen_core::{
    Filter, FilterError, Frame, FrameDescriptor, ParamDescriptor, ParamId, ParameterInfo,
    ProcessContext,
};

use crate::kernel::{gaussian_weights, require_pixels};

/// Blur radius in pixels.
const RADIUS: ParamDescriptor =
    ParamDescriptor::pixels("Radius", "Radius", 0.0, 32.0, 4.0).with_id(ParamId(200), "radius");
/// Gaussian standard deviation in pixels.
const SIGMA: ParamDescriptor =
    ParamDescriptor::multiplier("Sigma", "Sigma", 0.1, 16.0, 2.0).with_id(ParamId(201), "sigma");

/// Gaussian blur over a single component.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Radius | 0–32 px | 4 |
/// | 1 | Sigma | 0.1–16.0 | 2.0 |
///
/// A radius of 0 copies channel 0 unchanged.
///
/// # Example
///
/// ```rust
/// use lumen_filters::GaussianBlur;
///
/// let mut blur = GaussianBlur::new();
/// blur.set_radius(2);
/// blur.set_sigma(1.0);
/// assert_eq!(blur.radius(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct GaussianBlur {
    radius: usize,
    sigma: f32,
    weights: Vec<f32>,
    /// Horizontal pass output, reused between frames.
    scratch: Vec<f32>,
}

impl Default for GaussianBlur {
    fn default() -> Self {
        Self::new()
    }
}

impl GaussianBlur {
    /// Create a blur with the default radius (4 px) and sigma (2.0).
    pub fn new() -> Self {
        let radius = RADIUS.default as usize;
        let sigma = SIGMA.default;
        Self {
            radius,
            sigma,
            weights: gaussian_weights(radius, sigma),
            scratch: Vec::new(),
        }
    }

    /// Set the radius in pixels (0–32).
    pub fn set_radius(&mut self, radius: usize) {
        self.radius = RADIUS.clamp(radius as f32) as usize;
        self.weights = gaussian_weights(self.radius, self.sigma);
    }

    /// Current radius in pixels.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Set sigma (0.1–16.0).
    pub fn set_sigma(&mut self, sigma: f32) {
        self.sigma = SIGMA.clamp(sigma);
        self.weights = gaussian_weights(self.radius, self.sigma);
    }

    /// Current sigma.
    pub fn sigma(&self) -> f32 {
        self.sigma
    }
}

impl Filter for GaussianBlur {
    fn name(&self) -> &'static str {
        "gaussian_blur"
    }

    fn apply(
        &mut self,
        input: &Frame,
        ctx: &mut ProcessContext<'_>,
    ) -> Result<Option<Frame>, FilterError> {
        require_pixels(self.name(), input)?;
        let (width, height) = (input.width(), input.height());
        let r = self.radius as isize;

        self.scratch.clear();
        self.scratch.resize(width * height, 0.0);
        for y in 0..height {
            for x in 0..width {
                let mut sum = 0.0;
                for (k, &w) in self.weights.iter().enumerate() {
                    let sx = x as isize + k as isize - r;
                    sum += w * input.sample_clamped(sx, y as isize, 0);
                }
                self.scratch[y * width + x] = sum;
            }
        }

        let mut output = ctx.output_buffer(FrameDescriptor::luma(width as u32, height as u32));
        let last_row = height as isize - 1;
        for y in 0..height {
            for x in 0..width {
                let mut sum = 0.0;
                for (k, &w) in self.weights.iter().enumerate() {
                    let sy = (y as isize + k as isize - r).clamp(0, last_row) as usize;
                    sum += w * self.scratch[sy * width + x];
                }
                output.set(x, y, 0, sum);
            }
        }
        Ok(Some(Frame::new(output)))
    }

    fn teardown(&mut self) {
        self.scratch = vec![];
    }
}

impl ParameterInfo for GaussianBlur {
    fn param_count(&self) -> usize {
        2
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(RADIUS),
            1 => Some(SIGMA),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.radius as f32,
            1 => self.sigma,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_radius(RADIUS.clamp(value) as usize),
            1 => self.set_sigma(value),
            _ => {}
        }
    }
}
