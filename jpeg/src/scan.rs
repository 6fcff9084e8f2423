// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Entropy-coded scan decoding.
//!
//! Parses an SOS header, then walks every data unit of the scan in MCU
//! raster order: one DC difference and up to 63 run-length-coded AC
//! coefficients per unit, handed to the IDCT and stored into the owning
//! component's plane. A single-component scan is non-interleaved and
//! walks that component's own block grid.

use crate::bit_reader::BitReader;
use crate::dequant::{NUM_QUANT_TABLES, QuantTable};
use crate::error::{Error, Result};
use crate::frame::{Frame, MAX_COMPONENTS};
use crate::huffman::{HuffmanTable, NUM_HUFFMAN_TABLES, extend};
use crate::idct::Idct;
use crate::markers::Marker;
use crate::util::tracing_wrappers::*;
use crate::zigzag::ZIGZAG_TO_NATURAL;
use crate::BLOCK_SIZE;

/// Per-scan view of one component: geometry plus the tables the SOS
/// header bound to it.
struct ScanComponent<'a> {
    comp_idx: usize,
    h_samp: usize,
    v_samp: usize,
    dc_table: &'a HuffmanTable,
    ac_table: &'a HuffmanTable,
    quant: &'a QuantTable,
}

/// Decodes one scan, cursor positioned at the SOS length field. Returns
/// the indices of the components the scan covered.
pub(crate) fn decode_scan(
    reader: &mut BitReader,
    frame: &mut Frame,
    dc_tables: &[Option<HuffmanTable>; NUM_HUFFMAN_TABLES],
    ac_tables: &[Option<HuffmanTable>; NUM_HUFFMAN_TABLES],
    quant_tables: &[Option<QuantTable>; NUM_QUANT_TABLES],
    restart_interval: u16,
    idct: Idct,
) -> Result<Vec<usize>> {
    let len = reader.read_u16()?;
    let num_scan_components = reader.read_u8()?;
    if num_scan_components == 0
        || usize::from(num_scan_components) > MAX_COMPONENTS
        || usize::from(num_scan_components) > frame.components.len()
    {
        return Err(Error::InvalidComponentCount(num_scan_components));
    }
    if usize::from(len) != 6 + 2 * usize::from(num_scan_components) {
        return Err(Error::MalformedSegment("SOS length mismatch"));
    }

    let mut scan_components = Vec::with_capacity(usize::from(num_scan_components));
    for _ in 0..num_scan_components {
        let id = reader.read_u8()?;
        let comp_idx = frame
            .component_index(id)
            .ok_or(Error::UnknownComponentId(id))?;
        let tables = reader.read_u8()?;
        let dc_idx = tables >> 4;
        let ac_idx = tables & 0x0f;
        if dc_idx > 3 || ac_idx > 3 {
            return Err(Error::InvalidTableIndex(tables));
        }
        let dc_table = dc_tables[usize::from(dc_idx)]
            .as_ref()
            .ok_or(Error::InvalidTableIndex(dc_idx))?;
        let ac_table = ac_tables[usize::from(ac_idx)]
            .as_ref()
            .ok_or(Error::InvalidTableIndex(ac_idx))?;
        let component = &mut frame.components[comp_idx];
        component.dc_tbl_idx = dc_idx;
        component.ac_tbl_idx = ac_idx;
        let quant = quant_tables[usize::from(component.quant_idx)]
            .as_ref()
            .ok_or(Error::InvalidTableIndex(component.quant_idx))?;
        scan_components.push(ScanComponent {
            comp_idx,
            h_samp: usize::from(component.h_samp),
            v_samp: usize::from(component.v_samp),
            dc_table,
            ac_table,
            quant,
        });
    }

    // Baseline scans always cover the full spectral range in one pass.
    let ss = reader.read_u8()?;
    let se = reader.read_u8()?;
    let ahal = reader.read_u8()?;
    if ss != 0 || se != 63 || ahal != 0 {
        return Err(Error::MalformedSegment("not a baseline scan"));
    }

    for sc in &scan_components {
        let component = &mut frame.components[sc.comp_idx];
        component.alloc_plane();
        component.dc_pred = 0;
    }

    debug!(
        "scan over {} component(s), restart interval {}",
        scan_components.len(),
        restart_interval
    );

    if scan_components.len() == 1 {
        decode_non_interleaved(reader, frame, &scan_components[0], restart_interval, idct)?;
    } else {
        decode_interleaved(reader, frame, &scan_components, restart_interval, idct)?;
    }

    Ok(scan_components.iter().map(|sc| sc.comp_idx).collect())
}

fn decode_interleaved(
    reader: &mut BitReader,
    frame: &mut Frame,
    scan_components: &[ScanComponent],
    restart_interval: u16,
    idct: Idct,
) -> Result<()> {
    let mut mcus_done = 0usize;
    for mcu_row in 0..frame.mcus_tall {
        for mcu_col in 0..frame.mcus_wide {
            maybe_restart(reader, frame, scan_components, restart_interval, &mut mcus_done)?;
            for sc in scan_components {
                for v in 0..sc.v_samp {
                    for h in 0..sc.h_samp {
                        let block = {
                            let component = &mut frame.components[sc.comp_idx];
                            decode_data_unit(reader, sc, idct, &mut component.dc_pred)?
                        };
                        frame.components[sc.comp_idx].set_block(
                            mcu_row * sc.v_samp + v,
                            mcu_col * sc.h_samp + h,
                            &block,
                        );
                    }
                }
            }
            mcus_done += 1;
        }
    }
    Ok(())
}

fn decode_non_interleaved(
    reader: &mut BitReader,
    frame: &mut Frame,
    sc: &ScanComponent,
    restart_interval: u16,
    idct: Idct,
) -> Result<()> {
    let blocks_wide = frame.components[sc.comp_idx].scan_blocks_wide();
    let blocks_tall = frame.components[sc.comp_idx].scan_blocks_tall();
    let mut units_done = 0usize;
    for block_row in 0..blocks_tall {
        for block_col in 0..blocks_wide {
            maybe_restart(
                reader,
                frame,
                std::slice::from_ref(sc),
                restart_interval,
                &mut units_done,
            )?;
            let block = {
                let component = &mut frame.components[sc.comp_idx];
                decode_data_unit(reader, sc, idct, &mut component.dc_pred)?
            };
            frame.components[sc.comp_idx].set_block(block_row, block_col, &block);
            units_done += 1;
        }
    }
    Ok(())
}

/// Consumes a restart marker at an interval boundary and resets the DC
/// predictors of every component in the scan.
fn maybe_restart(
    reader: &mut BitReader,
    frame: &mut Frame,
    scan_components: &[ScanComponent],
    restart_interval: u16,
    units_done: &mut usize,
) -> Result<()> {
    if restart_interval == 0 || *units_done == 0 || *units_done % usize::from(restart_interval) != 0
    {
        return Ok(());
    }
    reader.align_to_byte();
    let mut sentinel = reader.read_u8()?;
    if sentinel != 0xff {
        return Err(Error::InvalidMarker(sentinel));
    }
    // Fill bytes may pad the stream ahead of the marker.
    while sentinel == 0xff {
        sentinel = reader.read_u8()?;
    }
    let marker = Marker::from_byte(sentinel);
    if !marker.is_some_and(Marker::is_restart) {
        return Err(Error::InvalidMarker(sentinel));
    }
    trace!("restart marker {sentinel:02x}");
    for sc in scan_components {
        frame.components[sc.comp_idx].dc_pred = 0;
    }
    Ok(())
}

/// Decodes one 8×8 data unit and runs it through the IDCT.
fn decode_data_unit(
    reader: &mut BitReader,
    sc: &ScanComponent,
    idct: Idct,
    dc_pred: &mut i32,
) -> Result<[u8; BLOCK_SIZE]> {
    let mut coeffs = [0i32; BLOCK_SIZE];

    // DC: the symbol is the bit length of the signed difference.
    let t = sc.dc_table.decode(reader)?;
    if t > 16 {
        return Err(Error::InvalidHuffmanCode);
    }
    let diff = if t > 0 {
        extend(reader.read_bits(t)?, t)
    } else {
        0
    };
    *dc_pred = dc_pred.saturating_add(diff);
    coeffs[0] = *dc_pred;

    // AC: run/size pairs over the remaining 63 zigzag positions.
    let mut k = 1usize;
    while k < BLOCK_SIZE {
        let rs = sc.ac_table.decode(reader)?;
        let run = usize::from(rs >> 4);
        let size = rs & 0x0f;
        if size == 0 {
            if run == 15 {
                k += 16;
                continue;
            }
            break; // end of block
        }
        k += run;
        if k >= BLOCK_SIZE {
            return Err(Error::InvalidHuffmanCode);
        }
        coeffs[ZIGZAG_TO_NATURAL[k]] = extend(reader.read_bits(size)?, size);
        k += 1;
    }

    let mut out = [0u8; BLOCK_SIZE];
    idct.transform(&coeffs, sc.quant, &mut out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dequant::QuantTable;
    use array_init::array_init;
    use test_log::test;

    fn tables() -> (
        [Option<HuffmanTable>; NUM_HUFFMAN_TABLES],
        [Option<HuffmanTable>; NUM_HUFFMAN_TABLES],
        [Option<QuantTable>; NUM_QUANT_TABLES],
    ) {
        // DC: single 1-bit code '0' for symbol 2 (a 2-bit difference).
        let mut dc_counts = [0u8; 16];
        dc_counts[0] = 1;
        let dc = HuffmanTable::build(&dc_counts, vec![2]).unwrap();
        // AC: single 1-bit code '0' for end-of-block.
        let mut ac_counts = [0u8; 16];
        ac_counts[0] = 1;
        let ac = HuffmanTable::build(&ac_counts, vec![0]).unwrap();

        let mut dc_tables: [Option<HuffmanTable>; NUM_HUFFMAN_TABLES] = array_init(|_| None);
        let mut ac_tables: [Option<HuffmanTable>; NUM_HUFFMAN_TABLES] = array_init(|_| None);
        let mut quant_tables: [Option<QuantTable>; NUM_QUANT_TABLES] = array_init(|_| None);
        dc_tables[0] = Some(dc);
        ac_tables[0] = Some(ac);
        quant_tables[0] = Some(QuantTable::from_zigzag(&[1u8; BLOCK_SIZE]));
        (dc_tables, ac_tables, quant_tables)
    }

    fn two_block_frame() -> Frame {
        let sof = [
            0x00, 0x0b, 8, 0x00, 0x08, 0x00, 0x10, 1, 1, 0x11, 0,
        ];
        Frame::parse(&mut BitReader::new(&sof)).unwrap()
    }

    #[test]
    fn dc_differences_accumulate_across_data_units() {
        let (dc_tables, ac_tables, quant_tables) = tables();
        let mut frame = two_block_frame();
        // SOS header, then two data units: '0 11 0' (diff +3) and
        // '0 00 0' (diff -3), padded with 1-bits.
        let scan = [
            0x00, 0x08, 1, 1, 0x00, 0, 63, 0, // header
            0b0110_0000, // entropy-coded data
        ];
        let mut reader = BitReader::new(&scan);
        let covered = decode_scan(
            &mut reader,
            &mut frame,
            &dc_tables,
            &ac_tables,
            &quant_tables,
            0,
            Idct::Fixed,
        )
        .unwrap();
        assert_eq!(covered, vec![0]);
        // +3 then -3: the predictor returns to zero.
        assert_eq!(frame.components[0].dc_pred, 0);
        // Both data units land at the midpoint (3/8 and 0/8 round to 0).
        assert!(frame.components[0].plane().iter().all(|&s| s == 128));
    }

    #[test]
    fn corrupt_code_is_reported() {
        let (dc_tables, ac_tables, quant_tables) = tables();
        let mut frame = two_block_frame();
        // '1' matches no DC code; stuffed 0xff bytes keep feeding ones.
        let scan = [
            0x00, 0x08, 1, 1, 0x00, 0, 63, 0, //
            0xff, 0x00, 0xff, 0x00, 0xff, 0x00,
        ];
        let mut reader = BitReader::new(&scan);
        let result = decode_scan(
            &mut reader,
            &mut frame,
            &dc_tables,
            &ac_tables,
            &quant_tables,
            0,
            Idct::Fixed,
        );
        assert_eq!(result.unwrap_err(), Error::InvalidHuffmanCode);
    }

    #[test]
    fn missing_table_is_reported() {
        let (dc_tables, _, quant_tables) = tables();
        let ac_tables: [Option<HuffmanTable>; NUM_HUFFMAN_TABLES] = array_init(|_| None);
        let mut frame = two_block_frame();
        let scan = [0x00, 0x08, 1, 1, 0x00, 0, 63, 0];
        let mut reader = BitReader::new(&scan);
        let result = decode_scan(
            &mut reader,
            &mut frame,
            &dc_tables,
            &ac_tables,
            &quant_tables,
            0,
            Idct::Fixed,
        );
        assert_eq!(result.unwrap_err(), Error::InvalidTableIndex(0));
    }
}
