// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Canonical Huffman decoding for the entropy-coded scan data.
//!
//! Tables are built once per DHT segment from the 16 per-length code
//! counts and the symbol list, then decoded against one bit at a time
//! using the `mincode`/`maxcode`/`valptr` range scheme of ITU-T T.81
//! Annex F.

use crate::bit_reader::BitReader;
use crate::error::{Error, Result};

/// Longest codeword a JPEG Huffman table can contain.
pub const MAX_CODE_LENGTH: usize = 16;

/// Number of table slots per class (DC, AC) a stream may define.
pub const NUM_HUFFMAN_TABLES: usize = 4;

/// One canonical Huffman decode table (a DC or AC slot of a DHT segment).
///
/// Codes of a given length occupy the contiguous value range
/// `[mincode[l], maxcode[l]]`; `valptr[l]` is the index of the first
/// symbol of that length. Empty lengths carry `maxcode = -1` so the
/// range test fails for them unconditionally.
#[derive(Debug)]
pub struct HuffmanTable {
    mincode: [i32; MAX_CODE_LENGTH],
    maxcode: [i32; MAX_CODE_LENGTH],
    valptr: [usize; MAX_CODE_LENGTH],
    values: Vec<u8>,
}

impl HuffmanTable {
    /// Builds the decode table from a DHT segment's per-length counts and
    /// concatenated symbol values.
    pub fn build(counts: &[u8; MAX_CODE_LENGTH], values: Vec<u8>) -> Result<HuffmanTable> {
        let total: usize = counts.iter().map(|&c| c as usize).sum();
        if total != values.len() || total > 256 {
            return Err(Error::MalformedSegment("Huffman symbol count mismatch"));
        }
        let mut mincode = [-1i32; MAX_CODE_LENGTH];
        let mut maxcode = [-1i32; MAX_CODE_LENGTH];
        let mut valptr = [0usize; MAX_CODE_LENGTH];

        let mut code = 0i32;
        let mut k = 0usize;
        for len in 0..MAX_CODE_LENGTH {
            let count = counts[len] as i32;
            if count > 0 {
                // Codes of length len+1 must fit in len+1 bits.
                if code + count > 1 << (len + 1) {
                    return Err(Error::MalformedSegment("Huffman code length overflow"));
                }
                valptr[len] = k;
                mincode[len] = code;
                code += count;
                k += count as usize;
                maxcode[len] = code - 1;
            }
            code <<= 1;
        }

        Ok(HuffmanTable {
            mincode,
            maxcode,
            valptr,
            values,
        })
    }

    /// Decodes one symbol, reading at most [`MAX_CODE_LENGTH`] bits.
    pub fn decode(&self, reader: &mut BitReader) -> Result<u8> {
        let mut code = 0i32;
        for len in 0..MAX_CODE_LENGTH {
            code = (code << 1) | reader.read_bit()? as i32;
            if self.mincode[len] <= code && code <= self.maxcode[len] {
                let idx = self.valptr[len] + (code - self.mincode[len]) as usize;
                return self.values.get(idx).copied().ok_or(Error::InvalidHuffmanCode);
            }
        }
        Err(Error::InvalidHuffmanCode)
    }
}

/// Sign extension of a `t`-bit magnitude value, ITU-T T.81 F.2.2.1: raw
/// values below `1 << (t-1)` encode negatives.
pub fn extend(value: u32, t: u8) -> i32 {
    if t == 0 {
        return 0;
    }
    let v = value as i32;
    if v < 1 << (t - 1) { v - (1 << t) + 1 } else { v }
}
