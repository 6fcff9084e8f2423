// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! The decoder driver: marker scanning and the public decode API.

use array_init::array_init;

use crate::bit_reader::BitReader;
use crate::dequant::{NUM_QUANT_TABLES, QuantTable};
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::huffman::{HuffmanTable, NUM_HUFFMAN_TABLES};
use crate::idct::Idct;
use crate::markers::{Marker, byte_is_standalone};
use crate::render::{Plane, gray_to_rgb, upsample, ycbcr_to_rgb};
use crate::scan::decode_scan;
use crate::surface::Surface;
use crate::util::tracing_wrappers::*;
use crate::BLOCK_SIZE;

/// Knobs for a single decode.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// IDCT strategy; the fixed-point fast path by default.
    pub idct: Idct,
}

impl DecodeOptions {
    pub fn new() -> DecodeOptions {
        DecodeOptions::default()
    }
}

/// A fully decoded image: tightly packed 24-bit RGB.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: usize,
    pub height: usize,
    pub rgb: Vec<u8>,
}

impl DecodedImage {
    /// Writes the pixels into a locked surface, honoring its pitch and
    /// pixel stride and clipping to the smaller of the two extents.
    pub fn blit(&self, surface: &mut dyn Surface) -> Result<()> {
        let bpp = surface.bytes_per_pixel();
        let pitch = surface.pitch();
        let cols = self.width.min(surface.width());
        if pitch < cols * bpp || bpp < 3 {
            return Err(Error::SurfacePitchTooSmall(pitch, cols, bpp));
        }
        let rows = self.height.min(surface.height());
        let dst = surface.lock();
        let rows = rows.min(if pitch == 0 { 0 } else { dst.len() / pitch });
        for y in 0..rows {
            let src = &self.rgb[y * self.width * 3..][..cols * 3];
            let dst_row = &mut dst[y * pitch..][..cols * bpp];
            if bpp == 3 {
                dst_row.copy_from_slice(src);
            } else {
                for (pixel, rgb) in dst_row.chunks_exact_mut(bpp).zip(src.chunks_exact(3)) {
                    pixel[..3].copy_from_slice(rgb);
                }
            }
        }
        surface.unlock();
        Ok(())
    }
}

/// Decodes a baseline JPEG stream with default options.
pub fn decode_image(data: &[u8]) -> Result<DecodedImage> {
    decode_with_options(data, &DecodeOptions::new())
}

/// Decodes a baseline JPEG stream.
pub fn decode_with_options(data: &[u8], options: &DecodeOptions) -> Result<DecodedImage> {
    Decoder::new(data, options).decode()
}

/// All mutable state for one image. A decoder value decodes exactly one
/// stream; independent decoders share nothing.
struct Decoder<'a> {
    reader: BitReader<'a>,
    quant_tables: [Option<QuantTable>; NUM_QUANT_TABLES],
    dc_tables: [Option<HuffmanTable>; NUM_HUFFMAN_TABLES],
    ac_tables: [Option<HuffmanTable>; NUM_HUFFMAN_TABLES],
    frame: Option<Frame>,
    scanned: Vec<bool>,
    restart_interval: u16,
    idct: Idct,
}

impl<'a> Decoder<'a> {
    fn new(data: &'a [u8], options: &DecodeOptions) -> Decoder<'a> {
        Decoder {
            reader: BitReader::new(data),
            quant_tables: array_init(|_| None),
            dc_tables: array_init(|_| None),
            ac_tables: array_init(|_| None),
            frame: None,
            scanned: Vec::new(),
            restart_interval: 0,
            idct: options.idct,
        }
    }

    fn decode(mut self) -> Result<DecodedImage> {
        let b0 = self.reader.read_u8()?;
        let b1 = self.reader.read_u8()?;
        if b0 != 0xff || b1 != Marker::Soi as u8 {
            return Err(Error::InvalidSignature(b0, b1));
        }

        loop {
            let marker_byte = self.next_marker()?;
            match Marker::from_byte(marker_byte) {
                Some(Marker::Soi) => self.reset_frame_state(),
                Some(Marker::Eoi) => return self.finalize(),
                Some(Marker::Dqt) => self.parse_dqt()?,
                Some(Marker::Dht) => self.parse_dht()?,
                Some(Marker::Dri) => self.parse_dri()?,
                Some(Marker::Sof0) | Some(Marker::Sof1) => self.parse_sof()?,
                Some(marker) if marker.is_unsupported_sof() => {
                    return Err(Error::UnsupportedFrameType(marker_byte));
                }
                Some(Marker::Sos) => self.parse_sos()?,
                Some(marker) if marker.is_standalone() => {}
                _ => self.skip_segment(marker_byte)?,
            }
        }
    }

    /// Scans forward to the next marker: a `0xff` sentinel followed by a
    /// non-zero type byte. Non-sentinel bytes and fill `0xff` runs are
    /// skipped.
    fn next_marker(&mut self) -> Result<u8> {
        loop {
            if self.reader.read_u8()? != 0xff {
                continue;
            }
            let mut marker = self.reader.read_u8()?;
            while marker == 0xff {
                marker = self.reader.read_u8()?;
            }
            if marker == 0x00 {
                continue;
            }
            return Ok(marker);
        }
    }

    fn reset_frame_state(&mut self) {
        debug!("SOI: resetting frame state");
        self.frame = None;
        self.scanned.clear();
        self.restart_interval = 0;
    }

    fn segment_payload_len(&mut self, what: &'static str) -> Result<usize> {
        let len = self.reader.read_u16()?;
        let payload = usize::from(len)
            .checked_sub(2)
            .ok_or(Error::MalformedSegment(what))?;
        if payload > self.reader.remaining() {
            return Err(Error::MalformedSegment(what));
        }
        Ok(payload)
    }

    fn skip_segment(&mut self, marker_byte: u8) -> Result<()> {
        if byte_is_standalone(marker_byte) {
            return Ok(());
        }
        trace!("skipping marker {marker_byte:02x}");
        let payload = self.segment_payload_len("segment length inconsistent")?;
        self.reader.skip(payload)
    }

    fn parse_dqt(&mut self) -> Result<()> {
        let mut remaining = self.segment_payload_len("DQT length inconsistent")?;
        while remaining > 0 {
            if remaining < 1 + BLOCK_SIZE {
                return Err(Error::MalformedSegment("DQT length inconsistent"));
            }
            let pq_tq = self.reader.read_u8()?;
            let precision = pq_tq >> 4;
            let slot = pq_tq & 0x0f;
            if precision != 0 {
                return Err(Error::MalformedSegment("16-bit quantization tables unsupported"));
            }
            if slot > 3 {
                return Err(Error::InvalidTableIndex(slot));
            }
            let mut raw = [0u8; BLOCK_SIZE];
            for value in raw.iter_mut() {
                *value = self.reader.read_u8()?;
            }
            debug!("DQT slot {slot}");
            self.quant_tables[usize::from(slot)] = Some(QuantTable::from_zigzag(&raw));
            remaining -= 1 + BLOCK_SIZE;
        }
        Ok(())
    }

    fn parse_dht(&mut self) -> Result<()> {
        let mut remaining = self.segment_payload_len("DHT length inconsistent")?;
        while remaining > 0 {
            if remaining < 17 {
                return Err(Error::MalformedSegment("DHT length inconsistent"));
            }
            let tc_th = self.reader.read_u8()?;
            let class = tc_th >> 4;
            let slot = tc_th & 0x0f;
            if class > 1 {
                return Err(Error::MalformedSegment("DHT table class"));
            }
            if slot > 3 {
                return Err(Error::InvalidTableIndex(slot));
            }
            let mut counts = [0u8; 16];
            for count in counts.iter_mut() {
                *count = self.reader.read_u8()?;
            }
            let total: usize = counts.iter().map(|&c| usize::from(c)).sum();
            if remaining < 17 + total {
                return Err(Error::MalformedSegment("DHT length inconsistent"));
            }
            let mut values = vec![0u8; total];
            for value in values.iter_mut() {
                *value = self.reader.read_u8()?;
            }
            let table = HuffmanTable::build(&counts, values)?;
            debug!("DHT class {class} slot {slot}, {total} symbols");
            let bank = if class == 0 {
                &mut self.dc_tables
            } else {
                &mut self.ac_tables
            };
            bank[usize::from(slot)] = Some(table);
            remaining -= 17 + total;
        }
        Ok(())
    }

    fn parse_dri(&mut self) -> Result<()> {
        if self.segment_payload_len("DRI length inconsistent")? != 2 {
            return Err(Error::MalformedSegment("DRI length inconsistent"));
        }
        self.restart_interval = self.reader.read_u16()?;
        debug!("restart interval {}", self.restart_interval);
        Ok(())
    }

    fn parse_sof(&mut self) -> Result<()> {
        if self.frame.is_some() {
            return Err(Error::MalformedSegment("multiple SOF segments"));
        }
        let frame = Frame::parse(&mut self.reader)?;
        info!(
            "frame {}x{}, {} component(s)",
            frame.width,
            frame.height,
            frame.components.len()
        );
        self.scanned = vec![false; frame.components.len()];
        self.frame = Some(frame);
        Ok(())
    }

    fn parse_sos(&mut self) -> Result<()> {
        let frame = self.frame.as_mut().ok_or(Error::MissingFrame)?;
        let covered = decode_scan(
            &mut self.reader,
            frame,
            &self.dc_tables,
            &self.ac_tables,
            &self.quant_tables,
            self.restart_interval,
            self.idct,
        )?;
        for comp_idx in covered {
            self.scanned[comp_idx] = true;
        }
        Ok(())
    }

    fn finalize(self) -> Result<DecodedImage> {
        let frame = self.frame.ok_or(Error::MissingFrame)?;
        if self.scanned.is_empty() || !self.scanned.iter().all(|&done| done) {
            return Err(Error::MissingScanData);
        }

        let planes: Vec<Plane> = frame
            .components
            .iter()
            .map(|component| upsample(component, &frame))
            .collect();
        let rgb = match planes.as_slice() {
            [y] => gray_to_rgb(y, frame.width, frame.height),
            [y, cb, cr] => ycbcr_to_rgb(y, cb, cr, frame.width, frame.height),
            _ => return Err(Error::InvalidComponentCount(planes.len() as u8)),
        };

        Ok(DecodedImage {
            width: frame.width,
            height: frame.height,
            rgb,
        })
    }
}
