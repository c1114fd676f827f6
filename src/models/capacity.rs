// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fmt;

/// Which READ CAPACITY CDB produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityVariant {
    Ten,
    Sixteen,
}

impl CapacityVariant {
    pub fn command_name(self) -> &'static str {
        match self {
            CapacityVariant::Ten => "READ CAPACITY (10)",
            CapacityVariant::Sixteen => "READ CAPACITY (16)",
        }
    }
}

/// Protection information reported by READ CAPACITY(16), byte 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Protection {
    pub enabled: bool,
    /// P_TYPE, bits 1..3
    pub p_type: u8,
}

impl Protection {
    pub fn from_byte(b: u8) -> Self {
        Self {
            enabled: b & 0x01 != 0,
            p_type: (b >> 1) & 0x07,
        }
    }
}

/// Decoded READ CAPACITY parameter data.
///
/// With PMI set `last_block_address` is the last block before a
/// substantial delay after `lba`, not the end of the medium, and no size is
/// derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityResult {
    pub variant: CapacityVariant,
    pub last_block_address: u64,
    pub block_size: u32,
    /// Only READ CAPACITY(16) carries this.
    pub protection: Option<Protection>,
    pub pmi: bool,
    /// Starting LBA the PMI query was issued for.
    pub lba: u64,
}

/// Sizes derived from a full capacity query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceSize {
    pub blocks: u128,
    pub bytes: u128,
}

impl DeviceSize {
    pub fn mebibytes(&self) -> f64 {
        self.bytes as f64 / (1u64 << 20) as f64
    }

    /// Decimal gigabytes (10^9 bytes).
    pub fn gigabytes(&self) -> f64 {
        self.bytes as f64 / 1_000_000_000f64
    }
}

impl CapacityResult {
    pub fn number_of_blocks(&self) -> u128 {
        self.last_block_address as u128 + 1
    }

    /// Total size, or `None` in PMI mode.
    pub fn size(&self) -> Option<DeviceSize> {
        if self.pmi {
            return None;
        }
        let blocks = self.number_of_blocks();
        Some(DeviceSize {
            blocks,
            bytes: blocks * self.block_size as u128,
        })
    }

    /// `0x<blocks> 0x<block size>`, the `-b` output line.
    pub fn brief(&self) -> String {
        format!("{:#x} {:#x}", self.number_of_blocks(), self.block_size)
    }
}

impl fmt::Display for CapacityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Read Capacity results:")?;
        if let Some(p) = self.protection {
            writeln!(
                f,
                "   Protection: prot_en={}, p_type={}",
                p.enabled as u8, p.p_type
            )?;
        }
        if self.pmi {
            writeln!(
                f,
                "   PMI mode: given lba={:#x}, last block before delay={:#x}",
                self.lba, self.last_block_address
            )?;
        } else {
            writeln!(
                f,
                "   Last block address={} ({:#x}), Number of blocks={}",
                self.last_block_address,
                self.last_block_address,
                self.number_of_blocks()
            )?;
        }
        write!(f, "   Block size={} bytes", self.block_size)?;
        if let Some(size) = self.size() {
            writeln!(f)?;
            writeln!(f, "Hence:")?;
            write!(
                f,
                "   Device size: {} bytes, {:.1} MiB, {:.2} GB",
                size.bytes,
                size.mebibytes(),
                size.gigabytes()
            )?;
        }
        Ok(())
    }
}
