// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Nearest-neighbour upsampling of subsampled component planes.

use crate::frame::{Component, Frame};
use crate::BLOCK_DIM;

/// A full-resolution sample plane (sized to the MCU grid, which may
/// exceed the visible image dimensions).
#[derive(Debug, Clone)]
pub struct Plane {
    pub width: usize,
    pub height: usize,
    pub samples: Vec<u8>,
}

impl Plane {
    pub fn row(&self, y: usize) -> &[u8] {
        &self.samples[y * self.width..][..self.width]
    }
}

/// Stretches a component's decoded samples to the frame's full MCU-grid
/// resolution by sample replication. A component already at the maximum
/// sampling frequency is copied through unchanged. Replication (rather
/// than interpolation) reproduces the legacy renderer exactly.
pub fn upsample(component: &Component, frame: &Frame) -> Plane {
    let width = frame.mcus_wide * usize::from(frame.max_h) * BLOCK_DIM;
    let height = frame.mcus_tall * usize::from(frame.max_v) * BLOCK_DIM;

    if component.h_samp == frame.max_h && component.v_samp == frame.max_v {
        return Plane {
            width,
            height,
            samples: component.plane().to_vec(),
        };
    }

    let src = component.plane();
    let src_width = component.plane_width();
    let h = usize::from(component.h_samp);
    let v = usize::from(component.v_samp);
    let max_h = usize::from(frame.max_h);
    let max_v = usize::from(frame.max_v);

    let mut samples = vec![0u8; width * height];
    for y in 0..height {
        let src_row = &src[(y * v / max_v) * src_width..];
        let dst_row = &mut samples[y * width..][..width];
        for (x, dst) in dst_row.iter_mut().enumerate() {
            *dst = src_row[x * h / max_h];
        }
    }

    Plane {
        width,
        height,
        samples,
    }
}
