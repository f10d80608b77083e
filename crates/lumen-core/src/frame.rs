//! Reference-counted frame handles.
//!
//! A [`Frame`] is the unit of data that flows through a
//! [`FilterGraph`](crate::graph::FilterGraph). It wraps a [`FrameBuffer`] in an
//! `Arc`, so forwarding one produced frame to several targets never copies pixel
//! data: each target receives another reference via [`Frame::acquire()`].
//!
//! The graph engine only relies on three things from a frame: acquire/release
//! semantics, a readiness query, and its [`FrameDescriptor`]. Pixel layout is a
//! contract between leaf filters.
//!
//! # In-place transforms
//!
//! [`Frame::make_mut()`] is copy-on-write. A filter that transforms its input in
//! place gets exclusive access when it holds the only reference, and a private
//! copy otherwise, so a sibling target that still holds the original buffer never
//! observes the mutation.

#[cfg(not(feature = "std"))]
use alloc::{sync::Arc, vec, vec::Vec};
#[cfg(feature = "std")]
use std::sync::Arc;

/// Pixel layout of a frame buffer.
///
/// Samples are stored as interleaved `f32` values in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Single-component luminance.
    Luma,
    /// Four-component red, green, blue, alpha.
    Rgba,
}

impl PixelFormat {
    /// Number of interleaved samples per pixel.
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            PixelFormat::Luma => 1,
            PixelFormat::Rgba => 4,
        }
    }

    /// Lowercase name used in logs and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            PixelFormat::Luma => "luma",
            PixelFormat::Rgba => "rgba",
        }
    }
}

impl core::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Size and format of a frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameDescriptor {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel layout.
    pub format: PixelFormat,
}

impl FrameDescriptor {
    /// Creates a descriptor.
    pub const fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
        }
    }

    /// Single-component descriptor of the given size.
    pub const fn luma(width: u32, height: u32) -> Self {
        Self::new(width, height, PixelFormat::Luma)
    }

    /// RGBA descriptor of the given size.
    pub const fn rgba(width: u32, height: u32) -> Self {
        Self::new(width, height, PixelFormat::Rgba)
    }

    /// Same size, different pixel layout.
    pub const fn with_format(self, format: PixelFormat) -> Self {
        Self::new(self.width, self.height, format)
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of `f32` samples (pixels × channels).
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.pixel_count() * self.format.channels()
    }
}

/// Owned pixel storage with a readiness flag.
///
/// A buffer created with [`pending()`](Self::pending) models an image whose
/// producer (for example an accelerator upload) has not signalled completion
/// yet. The graph refuses to deliver a frame that is not ready.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    descriptor: FrameDescriptor,
    samples: Vec<f32>,
    ready: bool,
}

impl FrameBuffer {
    /// Creates a zeroed, ready buffer.
    pub fn new(descriptor: FrameDescriptor) -> Self {
        Self {
            descriptor,
            samples: vec![0.0; descriptor.sample_count()],
            ready: true,
        }
    }

    /// Creates a zeroed buffer that is not ready until [`mark_ready()`](Self::mark_ready).
    pub fn pending(descriptor: FrameDescriptor) -> Self {
        Self {
            ready: false,
            ..Self::new(descriptor)
        }
    }

    /// Wraps existing interleaved samples.
    ///
    /// Returns `None` if `samples.len()` does not match the descriptor.
    pub fn from_samples(descriptor: FrameDescriptor, samples: Vec<f32>) -> Option<Self> {
        (samples.len() == descriptor.sample_count()).then_some(Self {
            descriptor,
            samples,
            ready: true,
        })
    }

    /// Returns the size and format.
    #[inline]
    pub fn descriptor(&self) -> FrameDescriptor {
        self.descriptor
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.descriptor.width as usize
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.descriptor.height as usize
    }

    /// Pixel layout.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.descriptor.format
    }

    /// Interleaved samples.
    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Mutable interleaved samples.
    #[inline]
    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Returns true once the producer has finished writing.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Signals that the contents are complete.
    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    /// Sets every sample to `value`.
    pub fn fill(&mut self, value: f32) {
        self.samples.fill(value);
    }

    /// Sample index of `(x, y, channel)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize, channel: usize) -> usize {
        (y * self.width() + x) * self.descriptor.format.channels() + channel
    }

    /// Reads one sample.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the buffer.
    #[inline]
    pub fn get(&self, x: usize, y: usize, channel: usize) -> f32 {
        self.samples[self.index(x, y, channel)]
    }

    /// Writes one sample.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the buffer.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, channel: usize, value: f32) {
        let idx = self.index(x, y, channel);
        self.samples[idx] = value;
    }

    /// Reads one sample, clamping coordinates to the nearest edge pixel.
    ///
    /// Matches clamp-to-edge texture sampling. Returns `0.0` for an empty buffer.
    #[inline]
    pub fn sample_clamped(&self, x: isize, y: isize, channel: usize) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let cx = x.clamp(0, self.width() as isize - 1) as usize;
        let cy = y.clamp(0, self.height() as isize - 1) as usize;
        self.get(cx, cy, channel)
    }
}

/// Shared handle to a [`FrameBuffer`].
///
/// Cloning (or [`acquire()`](Self::acquire)) adds a reference; dropping (or
/// [`release()`](Self::release)) removes one. The buffer is freed, or returned
/// to a [`FramePool`](crate::graph::FramePool), once the last reference goes.
#[derive(Debug, Clone)]
pub struct Frame {
    buffer: Arc<FrameBuffer>,
}

impl Frame {
    /// Wraps a buffer in a new handle with a reference count of one.
    pub fn new(buffer: FrameBuffer) -> Self {
        Self {
            buffer: Arc::new(buffer),
        }
    }

    /// Takes another reference to the same buffer.
    #[inline]
    pub fn acquire(&self) -> Frame {
        self.clone()
    }

    /// Gives up this reference.
    #[inline]
    pub fn release(self) {}

    /// Number of live handles to the buffer.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.buffer)
    }

    /// Returns true if this is the only handle to the buffer.
    #[inline]
    pub fn is_unique(&self) -> bool {
        self.ref_count() == 1
    }

    /// Readiness of the underlying buffer.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.buffer.is_ready()
    }

    /// Returns the buffer's size and format.
    #[inline]
    pub fn descriptor(&self) -> FrameDescriptor {
        self.buffer.descriptor()
    }

    /// Borrows the underlying buffer.
    #[inline]
    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Mutable access, copying the buffer first if it is shared.
    pub fn make_mut(&mut self) -> &mut FrameBuffer {
        Arc::make_mut(&mut self.buffer)
    }

    /// Unwraps the buffer if this is the only handle.
    pub fn try_into_buffer(self) -> Result<FrameBuffer, Frame> {
        Arc::try_unwrap(self.buffer).map_err(|buffer| Frame { buffer })
    }

    /// Returns true if both handles point at the same buffer.
    #[inline]
    pub fn ptr_eq(&self, other: &Frame) -> bool {
        Arc::ptr_eq(&self.buffer, &other.buffer)
    }
}

impl From<FrameBuffer> for Frame {
    fn from(buffer: FrameBuffer) -> Self {
        Frame::new(buffer)
    }
}

impl core::ops::Deref for Frame {
    type Target = FrameBuffer;

    fn deref(&self) -> &FrameBuffer {
        &self.buffer
    }
}
