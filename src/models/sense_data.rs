// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fmt;

use anyhow::{Result, bail};

/// Fixed-format sense data must be at least this long to carry ASC/ASCQ.
pub const FIXED_MIN_LEN: usize = 14;
/// Descriptor-format sense data header length.
pub const DESCRIPTOR_MIN_LEN: usize = 8;

pub mod sense_key {
    pub const NO_SENSE: u8 = 0x0;
    pub const RECOVERED_ERROR: u8 = 0x1;
    pub const NOT_READY: u8 = 0x2;
    pub const MEDIUM_ERROR: u8 = 0x3;
    pub const HARDWARE_ERROR: u8 = 0x4;
    pub const ILLEGAL_REQUEST: u8 = 0x5;
    pub const UNIT_ATTENTION: u8 = 0x6;
}

/// ASC reported by ILLEGAL REQUEST when the opcode itself is unknown.
pub const ASC_INVALID_COMMAND_OPCODE: u8 = 0x20;

/// The subset of sense data needed to categorise a command outcome.
///
/// Both fixed (0x70/0x71) and descriptor (0x72/0x73) formats are accepted.
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub struct SenseData {
    pub response_code: u8,
    pub sense_key: u8,
    pub asc: u8,
    pub ascq: u8,
}

impl SenseData {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let Some(&first) = buf.first() else {
            bail!("empty sense buffer");
        };
        let response_code = first & 0x7F;

        match response_code {
            0x70 | 0x71 => {
                if buf.len() < FIXED_MIN_LEN {
                    bail!(
                        "fixed sense buffer too small: {} < {FIXED_MIN_LEN}",
                        buf.len()
                    );
                }
                Ok(Self {
                    response_code,
                    sense_key: buf[2] & 0x0F,
                    asc: buf[12],
                    ascq: buf[13],
                })
            },
            0x72 | 0x73 => {
                if buf.len() < DESCRIPTOR_MIN_LEN {
                    bail!(
                        "descriptor sense buffer too small: {} < {DESCRIPTOR_MIN_LEN}",
                        buf.len()
                    );
                }
                Ok(Self {
                    response_code,
                    sense_key: buf[1] & 0x0F,
                    asc: buf[2],
                    ascq: buf[3],
                })
            },
            other => bail!("unknown sense response code {other:#04x}"),
        }
    }

    pub fn is_invalid_opcode(&self) -> bool {
        self.sense_key == sense_key::ILLEGAL_REQUEST
            && self.asc == ASC_INVALID_COMMAND_OPCODE
    }
}

impl fmt::Debug for SenseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenseData")
            .field(
                "response_code",
                &format_args!("{:#04x}", self.response_code),
            )
            .field("sense_key", &format_args!("{:#x}", self.sense_key))
            .field("asc", &format_args!("{:#04x}", self.asc))
            .field("ascq", &format_args!("{:#04x}", self.ascq))
            .field("description", &asc_ascq_to_str(self.asc, self.ascq))
            .finish()
    }
}

impl fmt::Display for SenseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, asc={:#04x} ascq={:#04x} ({})",
            sense_key_to_str(self.sense_key),
            self.asc,
            self.ascq,
            asc_ascq_to_str(self.asc, self.ascq)
        )
    }
}

pub fn sense_key_to_str(key: u8) -> &'static str {
    match key {
        sense_key::NO_SENSE => "No Sense",
        sense_key::RECOVERED_ERROR => "Recovered Error",
        sense_key::NOT_READY => "Not Ready",
        sense_key::MEDIUM_ERROR => "Medium Error",
        sense_key::HARDWARE_ERROR => "Hardware Error",
        sense_key::ILLEGAL_REQUEST => "Illegal Request",
        sense_key::UNIT_ATTENTION => "Unit Attention",
        0x7 => "Data Protect",
        0x8 => "Blank Check",
        0xB => "Aborted Command",
        0xD => "Volume Overflow",
        0xE => "Miscompare",
        _ => "Reserved/vendor sense key",
    }
}

/// Return the SPC-4 description for a given ASC/ASCQ pair.
#[inline]
pub fn asc_ascq_to_str(asc: u8, ascq: u8) -> &'static str {
    hot_table(asc, ascq).unwrap_or("UNSPECIFIED / vendor specific")
}

fn hot_table(asc: u8, ascq: u8) -> Option<&'static str> {
    Some(match (asc, ascq) {
        (0x00, 0x00) => "No additional sense information",
        (0x04, 0x01) => "Logical unit is in process of becoming ready",
        (0x04, 0x02) => "Logical unit not ready, initializing command required",
        (0x04, 0x04) => "Logical unit not ready, format in progress",
        (0x11, 0x00) => "Unrecovered read error",
        (0x1A, 0x00) => "Parameter list length error",
        (0x20, 0x00) => "Invalid command operation code",
        (0x21, 0x00) => "Logical block address out of range",
        (0x24, 0x00) => "Invalid field in CDB",
        (0x25, 0x00) => "Logical unit not supported",
        (0x26, 0x00) => "Invalid field in parameter list",
        (0x32, 0x00) => "No defect spare location available",
        (0x32, 0x01) => "Defect list update failure",
        (0x3A, 0x00) => "Medium not present",
        (0x53, 0x02) => "Medium removal prevented",
        _ => return None,
    })
}
