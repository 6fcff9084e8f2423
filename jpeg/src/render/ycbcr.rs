// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Fixed-point YCbCr to RGB conversion.
//!
//! Full-range BT.601 as defined by JFIF Clause 7, with the coefficients
//! at 12 fractional bits and rounded, matching the legacy renderer. Runs
//! once per image, after every component has been upsampled.

use crate::idct::sample_range;
use crate::render::Plane;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

const SCALE_BITS: u32 = 12;
const ONE_HALF: i32 = 1 << (SCALE_BITS - 1);
const FIX_1_40200: i32 = 5743; // Cr -> R
const FIX_0_34414: i32 = 1410; // Cb -> G
const FIX_0_71414: i32 = 2925; // Cr -> G
const FIX_1_77200: i32 = 7258; // Cb -> B

fn convert_row(y: &[u8], cb: &[u8], cr: &[u8], dst: &mut [u8]) {
    for (x, rgb) in dst.chunks_exact_mut(3).enumerate() {
        let yv = i32::from(y[x]);
        let cbv = i32::from(cb[x]) - 128;
        let crv = i32::from(cr[x]) - 128;
        rgb[0] = sample_range(yv + ((FIX_1_40200 * crv + ONE_HALF) >> SCALE_BITS));
        rgb[1] = sample_range(yv - ((FIX_0_34414 * cbv + FIX_0_71414 * crv + ONE_HALF) >> SCALE_BITS));
        rgb[2] = sample_range(yv + ((FIX_1_77200 * cbv + ONE_HALF) >> SCALE_BITS));
    }
}

/// Interleaves three full-resolution planes into packed RGB, cropping to
/// `width`×`height`.
pub fn ycbcr_to_rgb(y: &Plane, cb: &Plane, cr: &Plane, width: usize, height: usize) -> Vec<u8> {
    let mut rgb = vec![0u8; width * height * 3];
    #[cfg(feature = "parallel")]
    rgb.par_chunks_exact_mut(width * 3)
        .enumerate()
        .for_each(|(row, dst)| {
            convert_row(&y.row(row)[..width], &cb.row(row)[..width], &cr.row(row)[..width], dst)
        });
    #[cfg(not(feature = "parallel"))]
    rgb.chunks_exact_mut(width * 3)
        .enumerate()
        .for_each(|(row, dst)| {
            convert_row(&y.row(row)[..width], &cb.row(row)[..width], &cr.row(row)[..width], dst)
        });
    rgb
}

/// Expands a single luminance plane into packed RGB.
pub fn gray_to_rgb(y: &Plane, width: usize, height: usize) -> Vec<u8> {
    let mut rgb = vec![0u8; width * height * 3];
    for (row, dst) in rgb.chunks_exact_mut(width * 3).enumerate() {
        for (x, pixel) in dst.chunks_exact_mut(3).enumerate() {
            pixel.fill(y.row(row)[x]);
        }
    }
    rgb
}
