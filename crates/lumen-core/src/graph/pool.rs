//! Frame buffer pool for the filter graph.
//!
//! Filters request output buffers through
//! [`ProcessContext::output_buffer()`](crate::ProcessContext::output_buffer).
//! After a node's downstream subtree has finished with a frame, the engine hands
//! the frame back to the pool; the buffer is kept only if nobody else still holds
//! a reference to it, so recycling never steals a frame a sink has retained.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::frame::{Frame, FrameBuffer, FrameDescriptor};

/// Default number of idle buffers kept by a [`FramePool`].
pub const DEFAULT_POOL_CAPACITY: usize = 16;

/// Pool of reusable frame buffers, matched by exact [`FrameDescriptor`].
pub struct FramePool {
    idle: Vec<FrameBuffer>,
    capacity: usize,
    reused: u64,
    allocated: u64,
}

impl Default for FramePool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

impl FramePool {
    /// Creates a pool that keeps at most `capacity` idle buffers.
    pub fn new(capacity: usize) -> Self {
        Self {
            idle: Vec::with_capacity(capacity),
            capacity,
            reused: 0,
            allocated: 0,
        }
    }

    /// Returns a zeroed, ready buffer of the given descriptor.
    pub fn acquire(&mut self, descriptor: FrameDescriptor) -> FrameBuffer {
        if let Some(pos) = self.idle.iter().position(|b| b.descriptor() == descriptor) {
            let mut buffer = self.idle.swap_remove(pos);
            buffer.fill(0.0);
            buffer.mark_ready();
            self.reused += 1;
            buffer
        } else {
            self.allocated += 1;
            FrameBuffer::new(descriptor)
        }
    }

    /// Takes back a frame. The buffer is kept only if `frame` was its last handle
    /// and the pool has room. Returns whether the buffer was kept.
    pub fn recycle(&mut self, frame: Frame) -> bool {
        if self.idle.len() >= self.capacity {
            return false;
        }
        match frame.try_into_buffer() {
            Ok(buffer) => {
                self.idle.push(buffer);
                true
            }
            Err(_) => false,
        }
    }

    /// Number of idle buffers.
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    /// Maximum number of idle buffers.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the capacity, dropping surplus idle buffers.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.idle.truncate(capacity);
    }

    /// Number of [`acquire()`](Self::acquire) calls served from idle buffers.
    pub fn reused_count(&self) -> u64 {
        self.reused
    }

    /// Number of [`acquire()`](Self::acquire) calls that allocated.
    pub fn allocated_count(&self) -> u64 {
        self.allocated
    }

    /// Drops every idle buffer.
    pub fn clear(&mut self) {
        self.idle.clear();
    }
}
