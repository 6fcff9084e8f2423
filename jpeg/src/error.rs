// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Read past the end of the stream")]
    StreamExhausted,
    #[error("Invalid signature {0:02x}{1:02x}, expected ffd8")]
    InvalidSignature(u8, u8),
    #[error("Unsupported frame type (SOF marker {0:02x})")]
    UnsupportedFrameType(u8),
    #[error("No Huffman code matched within 16 bits")]
    InvalidHuffmanCode,
    #[error("Malformed marker segment: {0}")]
    MalformedSegment(&'static str),
    #[error("Table index {0} out of range or table not defined")]
    InvalidTableIndex(u8),
    #[error("Invalid component count: {0}")]
    InvalidComponentCount(u8),
    #[error("Invalid sampling factor: {0}")]
    InvalidSamplingFactor(u8),
    #[error("Invalid image size: {0}x{1}")]
    InvalidImageSize(u16, u16),
    #[error("Image size too large: {0}x{1}")]
    ImageSizeTooLarge(usize, usize),
    #[error("Unexpected marker {0:02x} in entropy-coded data")]
    InvalidMarker(u8),
    #[error("Scan refers to component id {0} not present in the frame")]
    UnknownComponentId(u8),
    #[error("Scan data encountered before a frame header")]
    MissingFrame,
    #[error("End of image reached without a complete scan")]
    MissingScanData,
    #[error("Surface pitch {0} too small for {1} pixels of {2} bytes")]
    SurfacePitchTooSmall(usize, usize, usize),
}

pub type Result<T> = std::result::Result<T, Error>;
