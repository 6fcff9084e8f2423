// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Q12 fixed-point AAN inverse DCT.
//!
//! Same butterfly as the float strategy, with the basis constants at 12
//! fractional bits and the pre-scaled integer quantization table on the
//! input. The first pass keeps two fractional bits for the second; a row
//! whose AC inputs are all zero short-circuits to its replicated DC term.

use super::sample_range;
use crate::dequant::{FIXED_POINT_BITS, QuantTable};
use crate::{BLOCK_DIM, BLOCK_SIZE};

const FIX_1_414213562: i64 = 5793;
const FIX_1_847759065: i64 = 7568;
const FIX_1_082392200: i64 = 4433;
const FIX_2_613125930: i64 = 10703;

// First-pass descale: Q12 down to Q2.
const PASS1_SHIFT: u32 = 10;
const PASS1_ROUND: i64 = 1 << (PASS1_SHIFT - 1);
// Second-pass descale: Q2 and the uniform ÷8 in one shift.
const PASS2_SHIFT: u32 = 5;
const PASS2_ROUND: i64 = 1 << (PASS2_SHIFT - 1);
const LEVEL_SHIFT: i64 = 128 << PASS2_SHIFT;

fn fix_mul(a: i64, c: i64) -> i64 {
    (a * c) >> FIXED_POINT_BITS
}

pub(super) fn transform(
    coeffs: &[i32; BLOCK_SIZE],
    quant: &QuantTable,
    out: &mut [u8; BLOCK_SIZE],
) {
    let scale = quant.int_scale();
    let mut ws = [0i64; BLOCK_SIZE];

    for row in 0..BLOCK_DIM {
        let base = row * BLOCK_DIM;
        let mut d = [0i64; BLOCK_DIM];
        let mut any_ac = false;
        for u in 0..BLOCK_DIM {
            d[u] = i64::from(coeffs[base + u]) * i64::from(scale[base + u]);
            any_ac |= u != 0 && d[u] != 0;
        }
        if !any_ac {
            // Pure-DC row: one descaled value replicated across the row.
            let dc = (d[0] + PASS1_ROUND) >> PASS1_SHIFT;
            ws[base..base + BLOCK_DIM].fill(dc);
            continue;
        }
        let r = idct1d(&d);
        for u in 0..BLOCK_DIM {
            ws[base + u] = (r[u] + PASS1_ROUND) >> PASS1_SHIFT;
        }
    }

    for col in 0..BLOCK_DIM {
        let mut d = [0i64; BLOCK_DIM];
        for v in 0..BLOCK_DIM {
            d[v] = ws[v * BLOCK_DIM + col];
        }
        let r = idct1d(&d);
        for v in 0..BLOCK_DIM {
            let descaled = (r[v] + PASS2_ROUND + LEVEL_SHIFT) >> PASS2_SHIFT;
            out[v * BLOCK_DIM + col] = sample_range(descaled.clamp(-1, 256) as i32);
        }
    }
}

fn idct1d(d: &[i64; BLOCK_DIM]) -> [i64; BLOCK_DIM] {
    // Even part.
    let tmp10 = d[0] + d[4];
    let tmp11 = d[0] - d[4];
    let tmp13 = d[2] + d[6];
    let tmp12 = fix_mul(d[2] - d[6], FIX_1_414213562) - tmp13;

    let tmp0 = tmp10 + tmp13;
    let tmp3 = tmp10 - tmp13;
    let tmp1 = tmp11 + tmp12;
    let tmp2 = tmp11 - tmp12;

    // Odd part.
    let z13 = d[5] + d[3];
    let z10 = d[5] - d[3];
    let z11 = d[1] + d[7];
    let z12 = d[1] - d[7];

    let tmp7 = z11 + z13;
    let tmp11 = fix_mul(z11 - z13, FIX_1_414213562);
    let z5 = fix_mul(z10 + z12, FIX_1_847759065);
    let tmp10 = fix_mul(z12, FIX_1_082392200) - z5;
    let tmp12 = z5 - fix_mul(z10, FIX_2_613125930);

    let tmp6 = tmp12 - tmp7;
    let tmp5 = tmp11 - tmp6;
    let tmp4 = tmp10 + tmp5;

    [
        tmp0 + tmp7,
        tmp1 + tmp6,
        tmp2 + tmp5,
        tmp3 - tmp4,
        tmp3 + tmp4,
        tmp2 - tmp5,
        tmp1 - tmp6,
        tmp0 - tmp7,
    ]
}
