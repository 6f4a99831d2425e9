//! Ping-pong pair of field targets.

use crate::geometry::PixelSize;
use crate::gpu::{CombinePass, RenderBackend, TargetDesc, TargetId, TextureFilter};

/// Two same-sized targets: `back` holds the field accumulated so far,
/// `front` receives the next accumulate pass. Every accumulate must be
/// followed by a [`swap`](Self::swap) before the next one.
#[derive(Debug)]
pub struct DoubleBuffer {
    targets: [TargetId; 2],
    back: usize,
    size: PixelSize,
    awaiting_swap: bool,
}

fn create_pair(backend: &mut dyn RenderBackend, size: PixelSize) -> [TargetId; 2] {
    let desc = TargetDesc::new("field_buffer", size, TextureFilter::Nearest);
    [backend.create_target(&desc), backend.create_target(&desc)]
}

impl DoubleBuffer {
    pub fn new(backend: &mut dyn RenderBackend, size: PixelSize) -> Self {
        Self {
            targets: create_pair(backend, size),
            back: 0,
            size,
            awaiting_swap: false,
        }
    }

    pub fn back(&self) -> TargetId {
        self.targets[self.back]
    }

    pub fn front(&self) -> TargetId {
        self.targets[self.back ^ 1]
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Clear both targets with the backend's current clear color.
    pub fn clear(&self, backend: &mut dyn RenderBackend) {
        for &t in &self.targets {
            backend.clear(t);
        }
    }

    /// Merge `incoming` with the back buffer into the front buffer.
    ///
    /// # Panics
    ///
    /// When called twice without a swap in between.
    pub fn accumulate(&mut self, backend: &mut dyn RenderBackend, incoming: TargetId) {
        assert!(
            !self.awaiting_swap,
            "double buffer accumulated twice without a swap"
        );
        let pass = CombinePass::Accumulate {
            previous: self.back(),
            incoming,
        };
        backend.combine(&pass, self.front());
        self.awaiting_swap = true;
    }

    /// Promote the front buffer to back.
    pub fn swap(&mut self) {
        self.back ^= 1;
        self.awaiting_swap = false;
    }

    /// Reallocate both targets at `size`. Returns `false` if nothing changed.
    pub fn resize(&mut self, backend: &mut dyn RenderBackend, size: PixelSize) -> bool {
        if size == self.size {
            return false;
        }
        for &t in &self.targets {
            backend.release_target(t);
        }
        self.targets = create_pair(backend, size);
        self.back = 0;
        self.size = size;
        self.awaiting_swap = false;
        true
    }

    pub fn release(self, backend: &mut dyn RenderBackend) {
        for t in self.targets {
            backend.release_target(t);
        }
    }
}
