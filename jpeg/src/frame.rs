// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Per-image frame state: component descriptors and MCU geometry.

use crate::bit_reader::BitReader;
use crate::error::{Error, Result};
use crate::{BLOCK_DIM, BLOCK_SIZE};

/// A frame may carry at most this many components.
pub const MAX_COMPONENTS: usize = 4;

/// Upper bound on decoded samples per component, to stop corrupt headers
/// from requesting absurd allocations.
const MAX_PLANE_SAMPLES: usize = 1 << 26;

/// One color component of a frame.
#[derive(Debug, Clone)]
pub struct Component {
    /// Component identifier from the SOF segment.
    pub id: u8,
    /// Horizontal sampling frequency, 1–4.
    pub h_samp: u8,
    /// Vertical sampling frequency, 1–4.
    pub v_samp: u8,
    /// Quantization table slot this component dequantizes through.
    pub quant_idx: u8,
    /// DC Huffman table slot, bound by the current scan.
    pub dc_tbl_idx: u8,
    /// AC Huffman table slot, bound by the current scan.
    pub ac_tbl_idx: u8,
    /// Running DC predictor; reset at scan start and restart markers.
    pub dc_pred: i32,
    samples_wide: usize,
    samples_tall: usize,
    blocks_wide: usize,
    blocks_tall: usize,
    samples: Vec<u8>,
}

impl Component {
    /// Data units per row of the MCU-grid-padded plane.
    pub fn blocks_wide(&self) -> usize {
        self.blocks_wide
    }

    /// Data unit rows of the MCU-grid-padded plane.
    pub fn blocks_tall(&self) -> usize {
        self.blocks_tall
    }

    /// Exact component resolution, `ceil(image_dim · samp / max_samp)`.
    pub fn samples_wide(&self) -> usize {
        self.samples_wide
    }

    pub fn samples_tall(&self) -> usize {
        self.samples_tall
    }

    /// Data units per row covering only the exact component resolution;
    /// the grid of a non-interleaved scan.
    pub fn scan_blocks_wide(&self) -> usize {
        self.samples_wide.div_ceil(BLOCK_DIM)
    }

    pub fn scan_blocks_tall(&self) -> usize {
        self.samples_tall.div_ceil(BLOCK_DIM)
    }

    /// Width in samples of the decoded plane (padded to whole MCUs).
    pub fn plane_width(&self) -> usize {
        self.blocks_wide * BLOCK_DIM
    }

    pub fn plane_height(&self) -> usize {
        self.blocks_tall * BLOCK_DIM
    }

    /// The decoded samples, row-major at [`Component::plane_width`].
    pub fn plane(&self) -> &[u8] {
        &self.samples
    }

    /// Allocates (or reuses) the sample plane; called when a scan starts.
    pub(crate) fn alloc_plane(&mut self) {
        self.samples.resize(self.plane_width() * self.plane_height(), 0);
    }

    /// Stores one decoded 8×8 data unit at the given block coordinates.
    pub(crate) fn set_block(&mut self, block_row: usize, block_col: usize, block: &[u8; BLOCK_SIZE]) {
        debug_assert!(block_row < self.blocks_tall && block_col < self.blocks_wide);
        let width = self.plane_width();
        for r in 0..BLOCK_DIM {
            let dst = (block_row * BLOCK_DIM + r) * width + block_col * BLOCK_DIM;
            self.samples[dst..dst + BLOCK_DIM].copy_from_slice(&block[r * BLOCK_DIM..][..BLOCK_DIM]);
        }
    }
}

/// Frame-wide metadata from a SOF segment.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub max_h: u8,
    pub max_v: u8,
    pub mcus_wide: usize,
    pub mcus_tall: usize,
    pub components: Vec<Component>,
}

impl Frame {
    /// Parses a baseline SOF segment, cursor positioned at its length
    /// field.
    pub fn parse(reader: &mut BitReader) -> Result<Frame> {
        let len = reader.read_u16()?;
        let precision = reader.read_u8()?;
        if precision != 8 {
            return Err(Error::MalformedSegment("only 8-bit sample precision"));
        }
        let height = reader.read_u16()?;
        let width = reader.read_u16()?;
        if width == 0 || height == 0 {
            return Err(Error::InvalidImageSize(width, height));
        }
        let num_components = reader.read_u8()?;
        // Grayscale or YCbCr; two- and four-component streams have no
        // color model here.
        if num_components != 1 && num_components != 3 {
            return Err(Error::InvalidComponentCount(num_components));
        }
        if usize::from(len) != 8 + 3 * usize::from(num_components) {
            return Err(Error::MalformedSegment("SOF length mismatch"));
        }

        let mut components = Vec::with_capacity(usize::from(num_components));
        let mut max_h = 1u8;
        let mut max_v = 1u8;
        for _ in 0..num_components {
            let id = reader.read_u8()?;
            let sampling = reader.read_u8()?;
            let h_samp = sampling >> 4;
            let v_samp = sampling & 0x0f;
            if !(1..=4).contains(&h_samp) || !(1..=4).contains(&v_samp) {
                return Err(Error::InvalidSamplingFactor(sampling));
            }
            let quant_idx = reader.read_u8()?;
            if quant_idx > 3 {
                return Err(Error::InvalidTableIndex(quant_idx));
            }
            max_h = max_h.max(h_samp);
            max_v = max_v.max(v_samp);
            components.push(Component {
                id,
                h_samp,
                v_samp,
                quant_idx,
                dc_tbl_idx: 0,
                ac_tbl_idx: 0,
                dc_pred: 0,
                samples_wide: 0,
                samples_tall: 0,
                blocks_wide: 0,
                blocks_tall: 0,
                samples: Vec::new(),
            });
        }

        let width = usize::from(width);
        let height = usize::from(height);
        let mcus_wide = width.div_ceil(BLOCK_DIM * usize::from(max_h));
        let mcus_tall = height.div_ceil(BLOCK_DIM * usize::from(max_v));

        for component in components.iter_mut() {
            component.samples_wide = (width * usize::from(component.h_samp)).div_ceil(usize::from(max_h));
            component.samples_tall = (height * usize::from(component.v_samp)).div_ceil(usize::from(max_v));
            component.blocks_wide = mcus_wide * usize::from(component.h_samp);
            component.blocks_tall = mcus_tall * usize::from(component.v_samp);
            let plane_samples = component.blocks_wide * component.blocks_tall * BLOCK_SIZE;
            if plane_samples > MAX_PLANE_SAMPLES {
                return Err(Error::ImageSizeTooLarge(width, height));
            }
        }

        Ok(Frame {
            width,
            height,
            max_h,
            max_v,
            mcus_wide,
            mcus_tall,
            components,
        })
    }

    /// Looks up a component by its SOF identifier.
    pub fn component_index(&self, id: u8) -> Option<usize> {
        self.components.iter().position(|c| c.id == id)
    }
}
