// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Floating-point AAN inverse DCT.
//!
//! Row pass then column pass over the even/odd butterfly; the input is
//! dequantized and basis-normalized by the pre-scaled float table, so the
//! only scaling left at the end is the uniform ÷8.

use super::sample_range;
use crate::dequant::QuantTable;
use crate::{BLOCK_DIM, BLOCK_SIZE};

const SQRT_2_TIMES_2_COS_4: f32 = 1.414213562; // 2·cos(4π/16)
const TWO_COS_2: f32 = 1.847759065; // 2·cos(2π/16)
const TWO_COS_2_MINUS_6: f32 = 1.082392200; // 2·(cos(2π/16) − cos(6π/16))
const TWO_COS_2_PLUS_6: f32 = 2.613125930; // 2·(cos(2π/16) + cos(6π/16))

pub(super) fn transform(
    coeffs: &[i32; BLOCK_SIZE],
    quant: &QuantTable,
    out: &mut [u8; BLOCK_SIZE],
) {
    let scale = quant.float_scale();
    let mut ws = [0f32; BLOCK_SIZE];

    for row in 0..BLOCK_DIM {
        let base = row * BLOCK_DIM;
        let mut d = [0f32; BLOCK_DIM];
        for u in 0..BLOCK_DIM {
            d[u] = coeffs[base + u] as f32 * scale[base + u];
        }
        ws[base..base + BLOCK_DIM].copy_from_slice(&idct1d(&d));
    }

    for col in 0..BLOCK_DIM {
        let mut d = [0f32; BLOCK_DIM];
        for v in 0..BLOCK_DIM {
            d[v] = ws[v * BLOCK_DIM + col];
        }
        let r = idct1d(&d);
        for v in 0..BLOCK_DIM {
            // ÷8 undoes the two √8 passes; round half up, then level-shift.
            let descaled = (r[v] / 8.0 + 0.5).floor() as i32;
            out[v * BLOCK_DIM + col] = sample_range(descaled + 128);
        }
    }
}

fn idct1d(d: &[f32; BLOCK_DIM]) -> [f32; BLOCK_DIM] {
    // Even part.
    let tmp10 = d[0] + d[4];
    let tmp11 = d[0] - d[4];
    let tmp13 = d[2] + d[6];
    let tmp12 = (d[2] - d[6]) * SQRT_2_TIMES_2_COS_4 - tmp13;

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
    let tmp11 = (z11 - z13) * SQRT_2_TIMES_2_COS_4;
    let z5 = (z10 + z12) * TWO_COS_2;
    let tmp10 = TWO_COS_2_MINUS_6 * z12 - z5;
    let tmp12 = z5 - TWO_COS_2_PLUS_6 * z10;

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
