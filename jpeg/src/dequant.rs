// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Quantization tables and their pre-scaled IDCT variants.
//!
//! A DQT segment stores coefficients in zigzag order; the table keeps
//! them in natural order and derives two scaled copies that fold both
//! dequantization and the AAN basis normalization into the IDCT's input
//! stage, so no separate elementwise dequantization pass exists.

use std::f64::consts::{PI, SQRT_2};

use crate::zigzag::ZIGZAG_TO_NATURAL;
use crate::{BLOCK_DIM, BLOCK_SIZE};

/// Number of quantization table slots a stream may define.
pub const NUM_QUANT_TABLES: usize = 4;

/// Fractional bits of the fixed-point scaled table.
pub const FIXED_POINT_BITS: u32 = 12;

/// One quantization table slot, with derived per-strategy scalings.
#[derive(Debug, Clone)]
pub struct QuantTable {
    values: [u16; BLOCK_SIZE],
    float_scale: [f32; BLOCK_SIZE],
    int_scale: [i32; BLOCK_SIZE],
}

/// The AAN row/column scale factor folded into each table entry:
/// `1` for the DC term, `√2·cos(kπ/16)` otherwise.
fn aan_basis(k: usize) -> f64 {
    if k == 0 {
        1.0
    } else {
        (k as f64 * PI / 16.0).cos() * SQRT_2
    }
}

impl QuantTable {
    /// Builds a table from the 64 zigzag-ordered 8-bit coefficients of a
    /// DQT segment. The scaled variants are computed once, here.
    pub fn from_zigzag(raw: &[u8; BLOCK_SIZE]) -> QuantTable {
        let mut values = [0u16; BLOCK_SIZE];
        for (i, &v) in raw.iter().enumerate() {
            values[ZIGZAG_TO_NATURAL[i]] = u16::from(v);
        }

        let mut float_scale = [0f32; BLOCK_SIZE];
        let mut int_scale = [0i32; BLOCK_SIZE];
        for row in 0..BLOCK_DIM {
            for col in 0..BLOCK_DIM {
                let idx = row * BLOCK_DIM + col;
                let scaled = f64::from(values[idx]) * aan_basis(row) * aan_basis(col);
                float_scale[idx] = scaled as f32;
                int_scale[idx] = (scaled * f64::from(1 << FIXED_POINT_BITS) + 0.5) as i32;
            }
        }

        QuantTable {
            values,
            float_scale,
            int_scale,
        }
    }

    /// The dequantization coefficients in natural order.
    pub fn values(&self) -> &[u16; BLOCK_SIZE] {
        &self.values
    }

    pub(crate) fn float_scale(&self) -> &[f32; BLOCK_SIZE] {
        &self.float_scale
    }

    pub(crate) fn int_scale(&self) -> &[i32; BLOCK_SIZE] {
        &self.int_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test::assert_almost_eq;
    use test_log::test;

    #[test]
    fn coefficients_are_dezigzagged() {
        let mut raw = [0u8; BLOCK_SIZE];
        raw[0] = 16;
        raw[2] = 7; // third zigzag position is natural (1,0)
        let table = QuantTable::from_zigzag(&raw);
        assert_eq!(table.values()[0], 16);
        assert_eq!(table.values()[BLOCK_DIM], 7);
    }

    #[test]
    fn dc_entry_is_unscaled() {
        let raw = [1u8; BLOCK_SIZE];
        let table = QuantTable::from_zigzag(&raw);
        assert_eq!(table.float_scale()[0], 1.0);
        assert_eq!(table.int_scale()[0], 1 << FIXED_POINT_BITS);
    }

    #[test]
    fn scales_match_the_aan_factorization() {
        let raw = [1u8; BLOCK_SIZE];
        let table = QuantTable::from_zigzag(&raw);
        // Entry (0, 4) carries cos(π/4)·√2 = 1 exactly.
        assert_almost_eq!(table.float_scale()[4], 1.0f32, 1e-6f32);
        // Entry (1, 0) carries the largest factor, √2·cos(π/16).
        assert_almost_eq!(table.float_scale()[BLOCK_DIM], 1.3870398f32, 1e-6f32);
        // The fixed-point copy is the rounded Q12 image of the float one.
        for i in 0..BLOCK_SIZE {
            let expected = (f64::from(table.float_scale()[i]) * 4096.0).round() as i32;
            assert_almost_eq!(table.int_scale()[i], expected, 1);
        }
    }
}
