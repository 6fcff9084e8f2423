// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Post-scan rendering: chroma upsampling and color conversion.

mod upsample;
mod ycbcr;

pub use upsample::{Plane, upsample};
pub use ycbcr::{gray_to_rgb, ycbcr_to_rgb};
