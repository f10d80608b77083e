//! Shared helpers for the per-pixel and per-neighbourhood kernels.
//!
//! These mirror the GLSL built-ins the kernels are specified in terms of
//! (`step`, `smoothstep`, clamp-to-edge texture reads), so each filter reads
//! like its shader.

#[cfg(not(feature = "std"))]
use alloc::{format, vec::Vec};

use lumen_core::{FilterError, FrameBuffer, PixelFormat};

/// Rec. 709 luma weights applied to linear RGB.
pub const LUMA_WEIGHTS: [f32; 3] = [0.2125, 0.7154, 0.0721];

/// GLSL `step`: `0.0` if `x < edge`, else `1.0`.
#[inline]
pub fn step(edge: f32, x: f32) -> f32 {
    if x < edge { 0.0 } else { 1.0 }
}

/// GLSL `smoothstep`: Hermite interpolation of `x` between the two edges.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return step(edge0, x);
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Luminance of pixel `(x, y)`: channel 0 for luma, weighted RGB for RGBA.
#[inline]
pub fn luminance(buffer: &FrameBuffer, x: usize, y: usize) -> f32 {
    match buffer.format() {
        PixelFormat::Luma => buffer.get(x, y, 0),
        PixelFormat::Rgba => {
            LUMA_WEIGHTS[0] * buffer.get(x, y, 0)
                + LUMA_WEIGHTS[1] * buffer.get(x, y, 1)
                + LUMA_WEIGHTS[2] * buffer.get(x, y, 2)
        }
    }
}

/// Rejects frames without pixels.
pub fn require_pixels(filter: &'static str, buffer: &FrameBuffer) -> Result<(), FilterError> {
    if buffer.descriptor().pixel_count() == 0 {
        Err(FilterError::InvalidInput(format!("{filter}: empty frame")))
    } else {
        Ok(())
    }
}

/// Rejects frames of any format other than `format`.
pub fn require_format(
    filter: &'static str,
    buffer: &FrameBuffer,
    format: PixelFormat,
) -> Result<(), FilterError> {
    if buffer.format() == format {
        Ok(())
    } else {
        Err(FilterError::UnsupportedFormat {
            filter,
            found: buffer.format(),
        })
    }
}

/// Normalized one-dimensional Gaussian weights for offsets `-radius..=radius`.
pub fn gaussian_weights(radius: usize, sigma: f32) -> Vec<f32> {
    let sigma = sigma.max(f32::EPSILON);
    let denom = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (0..=2 * radius)
        .map(|i| {
            let offset = i as f32 - radius as f32;
            libm::expf(-(offset * offset) / denom)
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}
