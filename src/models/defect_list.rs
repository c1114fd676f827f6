// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fmt;

use zerocopy::{
    FromBytes, Immutable, KnownLayout,
    byteorder::{BigEndian, U16},
};

use crate::models::error::MaintError;

bitflags::bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    /// Byte 1 of the READ DEFECT DATA (10) parameter header.
    pub struct DefectListFlags: u8 {
        /// Primary (manufacturer) list returned.
        const PLISTV      = 0b0001_0000;
        /// Grown list returned.
        const GLISTV      = 0b0000_1000;
        /// lowest 3 bits carry the defect list format
        const FORMAT_MASK = 0b0000_0111;
    }
}

/// Defect descriptor formats (SBC-3 table "Defect list format").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefectListFormat {
    ShortBlock,
    LongBlock,
    BytesFromIndex,
    PhysicalSector,
    Unknown(u8),
}

impl DefectListFormat {
    /// Format requested when none is given.
    pub const DEFAULT: DefectListFormat = DefectListFormat::BytesFromIndex;

    /// Bytes per defect descriptor; 0 when the format is not understood.
    pub fn entry_size(self) -> usize {
        match self {
            DefectListFormat::ShortBlock => 4,
            DefectListFormat::LongBlock
            | DefectListFormat::BytesFromIndex
            | DefectListFormat::PhysicalSector => 8,
            DefectListFormat::Unknown(_) => 0,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            DefectListFormat::ShortBlock => 0,
            DefectListFormat::LongBlock => 3,
            DefectListFormat::BytesFromIndex => 4,
            DefectListFormat::PhysicalSector => 5,
            DefectListFormat::Unknown(code) => code,
        }
    }
}

impl From<u8> for DefectListFormat {
    fn from(code: u8) -> Self {
        match code & DefectListFlags::FORMAT_MASK.bits() {
            0 => DefectListFormat::ShortBlock,
            3 => DefectListFormat::LongBlock,
            4 => DefectListFormat::BytesFromIndex,
            5 => DefectListFormat::PhysicalSector,
            other => DefectListFormat::Unknown(other),
        }
    }
}

/// First 4 bytes of READ DEFECT DATA (10) parameter data.
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Debug)]
pub struct ReadDefect10Header {
    pub reserved: u8,
    pub flags: u8,
    /// Defect list length in bytes (bytes 2-3)
    pub list_len: U16<BigEndian>,
}

/// Decoded grown defect list header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrownDefectSummary {
    pub format: DefectListFormat,
    /// Length of the defect list in bytes.
    pub list_len: usize,
}

impl GrownDefectSummary {
    /// Number of descriptors, or `None` when the format's entry size is
    /// unknown and only the byte length can be reported.
    pub fn element_count(&self) -> Option<usize> {
        if self.list_len == 0 {
            return Some(0);
        }
        match self.format.entry_size() {
            0 => None,
            size => Some(self.list_len / size),
        }
    }
}

impl fmt::Display for GrownDefectSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.element_count() {
            Some(n) => write!(f, "Elements in grown defect list: {n}"),
            None => write!(
                f,
                "Grown defect list length={} bytes [unknown number of elements]",
                self.list_len
            ),
        }
    }
}

/// Decode the READ DEFECT DATA (10) header, insisting that the device
/// flagged the grown list as present.
pub fn decode_defect_header(buf: &[u8]) -> Result<GrownDefectSummary, MaintError> {
    let (raw, _rest) =
        ReadDefect10Header::ref_from_prefix(buf).map_err(|_| MaintError::ShortResponse {
            command: "READ DEFECT DATA (10)",
            need: 4,
            got: buf.len(),
        })?;

    let flags = DefectListFlags::from_bits_retain(raw.flags);
    if !flags.contains(DefectListFlags::PLISTV | DefectListFlags::GLISTV) {
        return Err(MaintError::WrongListKind);
    }

    Ok(GrownDefectSummary {
        format: DefectListFormat::from(raw.flags),
        list_len: raw.list_len.get() as usize,
    })
}
