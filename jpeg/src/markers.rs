// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! JPEG marker bytes (the byte following a `0xff` sentinel).

use num_derive::FromPrimitive;

/// Markers this decoder recognizes by name. Anything else is skipped via
/// its declared segment length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum Marker {
    /// Temporary private use, standalone.
    Tem = 0x01,
    /// Baseline sequential DCT.
    Sof0 = 0xC0,
    /// Extended sequential DCT, Huffman coding.
    Sof1 = 0xC1,
    /// Progressive DCT.
    Sof2 = 0xC2,
    /// Lossless sequential.
    Sof3 = 0xC3,
    /// Define Huffman tables.
    Dht = 0xC4,
    Sof5 = 0xC5,
    Sof6 = 0xC6,
    Sof7 = 0xC7,
    /// Define arithmetic coding conditioning.
    Dac = 0xCC,
    /// Sequential DCT, arithmetic coding.
    Sof9 = 0xC9,
    Sof10 = 0xCA,
    Sof11 = 0xCB,
    Sof13 = 0xCD,
    Sof14 = 0xCE,
    Sof15 = 0xCF,
    Rst0 = 0xD0,
    Rst1 = 0xD1,
    Rst2 = 0xD2,
    Rst3 = 0xD3,
    Rst4 = 0xD4,
    Rst5 = 0xD5,
    Rst6 = 0xD6,
    Rst7 = 0xD7,
    /// Start of image.
    Soi = 0xD8,
    /// End of image.
    Eoi = 0xD9,
    /// Start of scan.
    Sos = 0xDA,
    /// Define quantization tables.
    Dqt = 0xDB,
    /// Define number of lines.
    Dnl = 0xDC,
    /// Define restart interval.
    Dri = 0xDD,
    App0 = 0xE0,
    App1 = 0xE1,
    App2 = 0xE2,
    App3 = 0xE3,
    App4 = 0xE4,
    App5 = 0xE5,
    App6 = 0xE6,
    App7 = 0xE7,
    App8 = 0xE8,
    App9 = 0xE9,
    App10 = 0xEA,
    App11 = 0xEB,
    App12 = 0xEC,
    App13 = 0xED,
    App14 = 0xEE,
    App15 = 0xEF,
    /// Comment.
    Com = 0xFE,
}

impl Marker {
    pub fn from_byte(b: u8) -> Option<Marker> {
        num_traits::FromPrimitive::from_u8(b)
    }

    /// SOF variants this baseline decoder must reject: progressive,
    /// lossless, differential and all arithmetic-coded families.
    pub fn is_unsupported_sof(self) -> bool {
        matches!(
            self,
            Marker::Sof2
                | Marker::Sof3
                | Marker::Sof5
                | Marker::Sof6
                | Marker::Sof7
                | Marker::Sof9
                | Marker::Sof10
                | Marker::Sof11
                | Marker::Sof13
                | Marker::Sof14
                | Marker::Sof15
        )
    }

    pub fn is_restart(self) -> bool {
        matches!(
            self,
            Marker::Rst0
                | Marker::Rst1
                | Marker::Rst2
                | Marker::Rst3
                | Marker::Rst4
                | Marker::Rst5
                | Marker::Rst6
                | Marker::Rst7
        )
    }

    /// Standalone markers carry no length field.
    pub fn is_standalone(self) -> bool {
        matches!(self, Marker::Tem | Marker::Soi | Marker::Eoi) || self.is_restart()
    }
}

/// True for raw marker bytes without a payload, whether or not they are
/// in the [`Marker`] enum.
pub fn byte_is_standalone(b: u8) -> bool {
    b == 0x01 || (0xD0..=0xD9).contains(&b)
}
