// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use zerocopy::{
    FromBytes, Immutable, KnownLayout,
    byteorder::{BigEndian, U32, U64},
};

use crate::models::{
    capacity::{CapacityResult, CapacityVariant, Protection},
    error::MaintError,
};

pub const READ_CAPACITY_10: u8 = 0x25;
pub const SERVICE_ACTION_IN_16: u8 = 0x9E;
pub const SA_READ_CAPACITY_16: u8 = 0x10;

/// Parameter data length of READ CAPACITY(10).
pub const RCAP10_REPLY_LEN: usize = 8;
/// Allocation length we ask for with READ CAPACITY(16).
pub const RCAP16_REPLY_LEN: usize = 32;

/// Fill a **READ CAPACITY(10)** CDB (opcode 0x25) and return its length.
///
/// - `lba` : 32-bit LBA, only meaningful when `pmi` is set
/// - `pmi` : Partial Medium Indicator (byte 8, bit 0)
///
/// With `pmi = false` the device returns the last LBA and the block length.
/// A last LBA of `0xFFFF_FFFF` means the medium is too large for this CDB
/// and READ CAPACITY(16) must be used instead.
#[inline]
pub fn build_read_capacity10(cdb: &mut [u8; 16], lba: u32, pmi: bool, control: u8) -> usize {
    cdb.fill(0);
    cdb[0] = READ_CAPACITY_10;
    cdb[2..6].copy_from_slice(&lba.to_be_bytes());
    cdb[8] = pmi as u8;
    cdb[9] = control;
    10
}

/// Fill a **READ CAPACITY(16)** CDB via SERVICE ACTION IN(16) (opcode 0x9E,
/// SA=0x10) and return its length.
///
/// - `lba`       : 64-bit LBA, only meaningful when `pmi` is set
/// - `alloc_len` : use [`RCAP16_REPLY_LEN`] to get the full parameter data
#[inline]
pub fn build_read_capacity16(
    cdb: &mut [u8; 16],
    lba: u64,
    pmi: bool,
    alloc_len: u32,
    control: u8,
) -> usize {
    cdb.fill(0);
    cdb[0] = SERVICE_ACTION_IN_16;
    cdb[1] = SA_READ_CAPACITY_16;
    cdb[2..10].copy_from_slice(&lba.to_be_bytes());
    cdb[10..14].copy_from_slice(&alloc_len.to_be_bytes());
    cdb[14] = pmi as u8;
    cdb[15] = control;
    16
}

/// Raw 8-byte parameter data returned by READ CAPACITY(10).
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Debug)]
pub struct Rc10Raw {
    /// Last logical block address (bytes 0-3)
    pub max_lba: U32<BigEndian>,
    /// Block length in bytes (bytes 4-7)
    pub block_len: U32<BigEndian>,
}

/// Leading 13 bytes of READ CAPACITY(16) parameter data; the rest of the 32
/// bytes (logical blocks per physical block, LBPME, ...) is not used here.
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Debug)]
pub struct Rc16Raw {
    /// Last logical block address (bytes 0-7)
    pub max_lba: U64<BigEndian>,
    /// Block length in bytes (bytes 8-11)
    pub block_len: U32<BigEndian>,
    /// bit 0 = PROT_EN, bits 1..3 = P_TYPE
    pub protection: u8,
}

impl Rc10Raw {
    /// If true, the device needs READ CAPACITY(16).
    #[inline]
    pub fn indicates_overflow(&self) -> bool {
        self.max_lba == u32::MAX
    }
}

/// Parse READ CAPACITY(10) parameter data (needs ≥ 8 bytes).
#[inline]
pub fn parse_read_capacity10_zerocopy(buf: &[u8]) -> Result<&Rc10Raw, MaintError> {
    let (raw, _rest) =
        Rc10Raw::ref_from_prefix(buf).map_err(|_| MaintError::ShortResponse {
            command: CapacityVariant::Ten.command_name(),
            need: RCAP10_REPLY_LEN,
            got: buf.len(),
        })?;
    Ok(raw)
}

/// Parse the head of READ CAPACITY(16) parameter data (needs ≥ 13 bytes).
#[inline]
pub fn parse_read_capacity16_zerocopy(buf: &[u8]) -> Result<&Rc16Raw, MaintError> {
    let (raw, _rest) =
        Rc16Raw::ref_from_prefix(buf).map_err(|_| MaintError::ShortResponse {
            command: CapacityVariant::Sixteen.command_name(),
            need: size_of::<Rc16Raw>(),
            got: buf.len(),
        })?;
    Ok(raw)
}

impl CapacityResult {
    pub fn from_rc10(raw: &Rc10Raw, pmi: bool, lba: u64) -> Self {
        Self {
            variant: CapacityVariant::Ten,
            last_block_address: raw.max_lba.get() as u64,
            block_size: raw.block_len.get(),
            protection: None,
            pmi,
            lba,
        }
    }

    pub fn from_rc16(raw: &Rc16Raw, pmi: bool, lba: u64) -> Self {
        Self {
            variant: CapacityVariant::Sixteen,
            last_block_address: raw.max_lba.get(),
            block_size: raw.block_len.get(),
            protection: Some(Protection::from_byte(raw.protection)),
            pmi,
            lba,
        }
    }
}
