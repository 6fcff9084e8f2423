// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! The inverse DCT turning a dequantized 8×8 coefficient block into
//! spatial samples.
//!
//! Two interchangeable strategies implement the same AAN even/odd
//! factorization: a floating-point reference and a Q12 fixed-point fast
//! path. Dequantization is folded into both via the pre-scaled tables of
//! [`crate::dequant::QuantTable`]. The strategies agree within ±1 on any
//! sample; see the conformance tests below.

mod float;
mod int;

use crate::BLOCK_SIZE;
use crate::dequant::QuantTable;

/// IDCT strategy, selected once per decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Idct {
    /// Floating-point AAN butterfly; the reference.
    Float,
    /// Q12 fixed-point AAN butterfly with a pure-DC row short-cut.
    #[default]
    Fixed,
}

impl Idct {
    /// Transforms a natural-order coefficient block into level-shifted,
    /// clamped 8-bit samples, dequantizing through `quant`'s pre-scaled
    /// tables.
    pub fn transform(
        self,
        coeffs: &[i32; BLOCK_SIZE],
        quant: &QuantTable,
        out: &mut [u8; BLOCK_SIZE],
    ) {
        match self {
            Idct::Float => float::transform(coeffs, quant, out),
            Idct::Fixed => int::transform(coeffs, quant, out),
        }
    }
}

/// Clamps a level-shifted sample to the representable range.
pub fn sample_range(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BLOCK_DIM;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::{FRAC_1_SQRT_2, PI};
    use test_log::test;

    fn ones_table() -> QuantTable {
        QuantTable::from_zigzag(&[1u8; BLOCK_SIZE])
    }

    /// Direct ITU-T T.81 A.3.3 IDCT, f64, no factorization.
    fn reference_idct(coeffs: &[i32; BLOCK_SIZE], quant: &QuantTable) -> [f64; BLOCK_SIZE] {
        let mut out = [0f64; BLOCK_SIZE];
        for y in 0..BLOCK_DIM {
            for x in 0..BLOCK_DIM {
                let mut sum = 0.0;
                for v in 0..BLOCK_DIM {
                    for u in 0..BLOCK_DIM {
                        let cu = if u == 0 { FRAC_1_SQRT_2 } else { 1.0 };
                        let cv = if v == 0 { FRAC_1_SQRT_2 } else { 1.0 };
                        let deq = f64::from(coeffs[v * BLOCK_DIM + u])
                            * f64::from(quant.values()[v * BLOCK_DIM + u]);
                        sum += cu
                            * cv
                            * deq
                            * (((2 * x + 1) * u) as f64 * PI / 16.0).cos()
                            * (((2 * y + 1) * v) as f64 * PI / 16.0).cos();
                    }
                }
                out[y * BLOCK_DIM + x] = sum / 4.0 + 128.0;
            }
        }
        out
    }

    #[test]
    fn sample_range_law() {
        assert_eq!(sample_range(-1), 0);
        assert_eq!(sample_range(0), 0);
        assert_eq!(sample_range(255), 255);
        assert_eq!(sample_range(256), 255);
        assert_eq!(sample_range(i32::MIN), 0);
        assert_eq!(sample_range(i32::MAX), 255);
        for v in [1, 17, 128, 200, 254] {
            assert_eq!(sample_range(v), v as u8);
        }
    }

    #[test]
    fn all_zero_block_is_flat_midpoint() {
        let quant = ones_table();
        let coeffs = [0i32; BLOCK_SIZE];
        for strategy in [Idct::Float, Idct::Fixed] {
            let mut out = [0u8; BLOCK_SIZE];
            strategy.transform(&coeffs, &quant, &mut out);
            assert!(out.iter().all(|&s| s == 128), "{strategy:?}");
        }
    }

    #[test]
    fn dc_only_block_follows_the_scaling_law() {
        let quant = ones_table();
        for k in [-4096i32, -1024, -512, -8, 0, 8, 64, 512, 1016, 4096] {
            let mut coeffs = [0i32; BLOCK_SIZE];
            coeffs[0] = k;
            let expected = sample_range(k / 8 + 128);
            for strategy in [Idct::Float, Idct::Fixed] {
                let mut out = [0u8; BLOCK_SIZE];
                strategy.transform(&coeffs, &quant, &mut out);
                assert!(
                    out.iter().all(|&s| s == expected),
                    "{strategy:?} k={k}: got {} want {expected}",
                    out[0]
                );
            }
        }
    }

    #[test]
    fn strategies_agree_within_one_level() {
        let quant = ones_table();
        let mut rng = rand_xorshift::XorShiftRng::seed_from_u64(0);
        for _ in 0..1000 {
            let mut coeffs = [0i32; BLOCK_SIZE];
            for c in coeffs.iter_mut() {
                *c = rng.random_range(-1024..1024);
            }
            let mut float_out = [0u8; BLOCK_SIZE];
            let mut fixed_out = [0u8; BLOCK_SIZE];
            Idct::Float.transform(&coeffs, &quant, &mut float_out);
            Idct::Fixed.transform(&coeffs, &quant, &mut fixed_out);
            for i in 0..BLOCK_SIZE {
                let delta = (i32::from(float_out[i]) - i32::from(fixed_out[i])).abs();
                assert!(
                    delta <= 1,
                    "sample {i}: float {} vs fixed {}",
                    float_out[i],
                    fixed_out[i]
                );
            }
        }
    }

    #[test]
    fn float_matches_the_direct_transform() {
        let quant = ones_table();
        let mut rng = rand_xorshift::XorShiftRng::seed_from_u64(1);
        for _ in 0..100 {
            let mut coeffs = [0i32; BLOCK_SIZE];
            for c in coeffs.iter_mut() {
                *c = rng.random_range(-256..256);
            }
            let reference = reference_idct(&coeffs, &quant);
            let mut out = [0u8; BLOCK_SIZE];
            Idct::Float.transform(&coeffs, &quant, &mut out);
            for i in 0..BLOCK_SIZE {
                let want = sample_range(reference[i].round() as i32);
                let delta = (i32::from(out[i]) - i32::from(want)).abs();
                assert!(delta <= 1, "sample {i}: {} vs reference {want}", out[i]);
            }
        }
    }

    #[test]
    fn sparse_blocks_agree_with_a_real_table() {
        // Sparse spectra (the realistic case) through a non-trivial table.
        let mut zigzag = [0u8; BLOCK_SIZE];
        for (i, v) in zigzag.iter_mut().enumerate() {
            *v = 1 + (i as u8 % 32);
        }
        let quant = QuantTable::from_zigzag(&zigzag);
        let mut rng = rand_xorshift::XorShiftRng::seed_from_u64(2);
        for _ in 0..500 {
            let mut coeffs = [0i32; BLOCK_SIZE];
            for _ in 0..rng.random_range(1..10) {
                coeffs[rng.random_range(0..BLOCK_SIZE)] = rng.random_range(-300..300);
            }
            let mut float_out = [0u8; BLOCK_SIZE];
            let mut fixed_out = [0u8; BLOCK_SIZE];
            Idct::Float.transform(&coeffs, &quant, &mut float_out);
            Idct::Fixed.transform(&coeffs, &quant, &mut fixed_out);
            for i in 0..BLOCK_SIZE {
                let delta = (i32::from(float_out[i]) - i32::from(fixed_out[i])).abs();
                assert!(delta <= 1, "sample {i}");
            }
        }
    }
}
