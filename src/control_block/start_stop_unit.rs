// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! START STOP UNIT: 6-byte CDB filler written into a provided 16-byte buffer.
//!
//! CDB layout (SBC-3 / MMC-5):
//!   [0] = 0x1B (START STOP UNIT)
//!   [1] = IMMED (bit 0)
//!   [2] = reserved
//!   [3] = FORMAT LAYER NUMBER (bits 1..0, MMC)
//!   [4] = POWER CONDITION (7..4) | FL (bit 2, MMC) | LOEJ (bit 1) | START (bit 0)
//!   [5] = CONTROL

pub const START_STOP_UNIT: u8 = 0x1B;

/// Field values for one START STOP UNIT command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StartStopUnitFields {
    pub immediate: bool,
    pub format_layer_number: u8,
    pub power_condition: u8,
    pub format_layer: bool,
    pub load_eject: bool,
    pub start: bool,
}

/// Fill a START STOP UNIT CDB into `cdb[0..6]` and return its length.
#[inline]
pub fn build_start_stop_unit(
    cdb: &mut [u8; 16],
    fields: &StartStopUnitFields,
    control: u8,
) -> usize {
    cdb.fill(0);
    cdb[0] = START_STOP_UNIT;
    cdb[1] = fields.immediate as u8;
    cdb[3] = fields.format_layer_number & 0x03;
    cdb[4] = ((fields.power_condition & 0x0F) << 4)
        | ((fields.format_layer as u8) << 2)
        | ((fields.load_eject as u8) << 1)
        | (fields.start as u8);
    cdb[5] = control;
    6
}
