// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! REASSIGN BLOCKS: 6-byte CDB filler written into a provided 16-byte buffer.
//!
//! CDB layout (SBC-3):
//!   [0] = 0x07 (REASSIGN BLOCKS)
//!   [1] = LONGLBA (bit 1) | LONGLIST (bit 0)
//!   [2]..[4] = reserved (0)
//!   [5] = CONTROL
//!
//! The parameter list travels as data-out, see
//! [`crate::models::reassign::ReassignParameterBlock`].

pub const REASSIGN_BLOCKS: u8 = 0x07;

/// Fill a REASSIGN BLOCKS CDB into `cdb[0..6]` and return its length.
#[inline]
pub fn build_reassign_blocks(
    cdb: &mut [u8; 16],
    long_lba: bool,
    long_list: bool,
    control: u8,
) -> usize {
    cdb.fill(0);
    cdb[0] = REASSIGN_BLOCKS;
    cdb[1] = ((long_lba as u8) << 1) | (long_list as u8);
    cdb[5] = control;
    6
}
