// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! READ CAPACITY negotiation.
//!
//! READ CAPACITY(10) is tried first unless the caller forces the 16-byte
//! variant. Two outcomes fall through to READ CAPACITY(16):
//! - the 10-byte response reports a last LBA of `0xFFFF_FFFF`;
//! - the device rejects the 10-byte opcode, in which case the handle is
//!   reopened read-write before retrying.
//!
//! Every other failure of the 10-byte command is final.

use tracing::{info, warn};

use crate::{
    control_block::read_capacity::{
        RCAP10_REPLY_LEN, RCAP16_REPLY_LEN, build_read_capacity10, build_read_capacity16,
        parse_read_capacity10_zerocopy, parse_read_capacity16_zerocopy,
    },
    handlers::common::check_status,
    models::{
        capacity::{CapacityResult, CapacityVariant},
        error::MaintError,
        status::StatusCategory,
    },
    transport::{DataDirection, Device, ScsiRequest, ScsiTransport},
};

/// Largest LBA the 10-byte CDB can carry for a PMI query.
pub const MAX_RC10_LBA: u64 = 0xFFFF_FFFE;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapacityRequest {
    pub pmi: bool,
    /// Starting LBA, only meaningful with `pmi`.
    pub lba: u64,
    pub force_16: bool,
}

impl CapacityRequest {
    pub fn validate(&self) -> Result<(), MaintError> {
        if !self.pmi && self.lba > 0 {
            return Err(MaintError::IncompatibleOptions(
                "lba can only be non-zero when pmi is set",
            ));
        }
        Ok(())
    }

    /// True when READ CAPACITY(10) cannot express the request.
    pub fn needs_sixteen(&self) -> bool {
        self.force_16 || self.lba > MAX_RC10_LBA
    }
}

enum Rc10Outcome {
    Done(CapacityResult),
    TooLarge,
    Unsupported,
}

/// Run the READ CAPACITY protocol on an open device.
pub fn read_capacity<T: ScsiTransport>(
    device: &mut Device<'_, T>,
    request: &CapacityRequest,
) -> Result<CapacityResult, MaintError> {
    request.validate()?;

    if !request.needs_sixteen() {
        match read_capacity10(device, request)? {
            Rc10Outcome::Done(result) => return Ok(result),
            Rc10Outcome::TooLarge => {
                warn!(
                    "READ CAPACITY (10) indicates device capacity too large, now trying 16 \
                     byte cdb variant"
                );
            },
            Rc10Outcome::Unsupported => {
                info!(
                    path = device.path(),
                    was_writable = device.is_writable(),
                    "READ CAPACITY (10) not supported, reopening for READ CAPACITY (16)"
                );
                device.reopen(true)?;
            },
        }
    }

    read_capacity16(device, request)
}

fn read_capacity10<T: ScsiTransport>(
    device: &mut Device<'_, T>,
    request: &CapacityRequest,
) -> Result<Rc10Outcome, MaintError> {
    let name = CapacityVariant::Ten.command_name();
    let mut cdb = [0u8; 16];
    // needs_sixteen() was false, so the LBA fits
    let len = build_read_capacity10(&mut cdb, request.lba as u32, request.pmi, 0);

    let timeout = device.timeout();
    let response = device.submit(&ScsiRequest {
        name,
        cdb: &cdb[..len],
        data: DataDirection::FromDevice(RCAP10_REPLY_LEN),
        timeout,
    })?;

    if response.category() == StatusCategory::InvalidOperation {
        return Ok(Rc10Outcome::Unsupported);
    }
    check_status(name, &response)?;

    let raw = parse_read_capacity10_zerocopy(&response.data)?;
    if raw.indicates_overflow() {
        return Ok(Rc10Outcome::TooLarge);
    }
    Ok(Rc10Outcome::Done(CapacityResult::from_rc10(
        raw,
        request.pmi,
        request.lba,
    )))
}

fn read_capacity16<T: ScsiTransport>(
    device: &mut Device<'_, T>,
    request: &CapacityRequest,
) -> Result<CapacityResult, MaintError> {
    let name = CapacityVariant::Sixteen.command_name();
    let mut cdb = [0u8; 16];
    let len = build_read_capacity16(
        &mut cdb,
        request.lba,
        request.pmi,
        RCAP16_REPLY_LEN as u32,
        0,
    );

    let timeout = device.timeout();
    let response = device.submit(&ScsiRequest {
        name,
        cdb: &cdb[..len],
        data: DataDirection::FromDevice(RCAP16_REPLY_LEN),
        timeout,
    })?;
    check_status(name, &response)?;

    let raw = parse_read_capacity16_zerocopy(&response.data)?;
    Ok(CapacityResult::from_rc16(raw, request.pmi, request.lba))
}
