// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! The display-surface boundary.
//!
//! The engine-side collaborator owns pixel memory with its own row pitch
//! and pixel stride; the decoder only ever writes through this trait.

/// A lockable output surface. `pitch` is the row stride in bytes and may
/// exceed `width · bytes_per_pixel`.
pub trait Surface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn pitch(&self) -> usize;
    fn bytes_per_pixel(&self) -> usize;
    /// Grants access to the pixel memory until [`Surface::unlock`].
    fn lock(&mut self) -> &mut [u8];
    fn unlock(&mut self) {}
}

/// A heap-backed surface for tests and standalone use.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    width: usize,
    height: usize,
    pitch: usize,
    bytes_per_pixel: usize,
    data: Vec<u8>,
}

impl MemorySurface {
    /// A tightly-packed RGB surface.
    pub fn new(width: usize, height: usize) -> MemorySurface {
        MemorySurface::with_layout(width, height, width * 3, 3)
    }

    /// A surface with an explicit pitch and pixel stride.
    pub fn with_layout(
        width: usize,
        height: usize,
        pitch: usize,
        bytes_per_pixel: usize,
    ) -> MemorySurface {
        MemorySurface {
            width,
            height,
            pitch,
            bytes_per_pixel,
            data: vec![0u8; pitch * height],
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Surface for MemorySurface {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pitch(&self) -> usize {
        self.pitch
    }

    fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    fn lock(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
