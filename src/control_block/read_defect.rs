// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! READ DEFECT DATA (10): CDB filler (10-byte CDB written into a 16-byte
//! buffer).
//!
//! CDB layout (SBC-3):
//!   [0]  = 0x37 (READ DEFECT DATA (10))
//!   [1]  = reserved
//!   [2]  = REQ_PLIST (bit 4) | REQ_GLIST (bit 3) | DEFECT LIST FORMAT (2..0)
//!   [3..6] = reserved
//!   [7..8] = ALLOCATION LENGTH (big-endian u16)
//!   [9]  = CONTROL
//!
//! Asking for only the 4-byte header is enough to learn the list length.

use crate::models::defect_list::DefectListFormat;

pub const READ_DEFECT_DATA_10: u8 = 0x37;
/// Allocation length that returns just the parameter header.
pub const DEFECT_HEADER_LEN: u16 = 4;

/// Fill a READ DEFECT DATA (10) CDB into `cdb[0..10]` and return its length.
#[inline]
pub fn build_read_defect10(
    cdb: &mut [u8; 16],
    req_plist: bool,
    req_glist: bool,
    format: DefectListFormat,
    allocation_len: u16,
    control: u8,
) -> usize {
    cdb.fill(0);
    cdb[0] = READ_DEFECT_DATA_10;
    cdb[2] = ((req_plist as u8) << 4) | ((req_glist as u8) << 3) | (format.code() & 0x07);
    let [msb, lsb] = allocation_len.to_be_bytes();
    cdb[7] = msb;
    cdb[8] = lsb;
    cdb[9] = control;
    10
}

/// Convenience: grown list only, header-sized allocation, control=0.
#[inline]
pub fn build_read_grown_defect_header(cdb: &mut [u8; 16], format: DefectListFormat) -> usize {
    build_read_defect10(cdb, false, true, format, DEFECT_HEADER_LEN, 0x00)
}
