// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fmt;

use tracing::debug;

use crate::models::sense_data::{SenseData, sense_key};

/// The 1-byte SCSI status returned with every completed command.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ScsiStatus {
    Good,
    CheckCondition,
    ConditionMet,
    Busy,
    ReservationConflict,
    TaskSetFull,
    AcaActive,
    TaskAborted,
    Other(u8),
}

impl From<u8> for ScsiStatus {
    fn from(b: u8) -> Self {
        match b {
            0x00 => ScsiStatus::Good,
            0x02 => ScsiStatus::CheckCondition,
            0x04 => ScsiStatus::ConditionMet,
            0x08 => ScsiStatus::Busy,
            0x18 => ScsiStatus::ReservationConflict,
            0x28 => ScsiStatus::TaskSetFull,
            0x30 => ScsiStatus::AcaActive,
            0x40 => ScsiStatus::TaskAborted,
            other => ScsiStatus::Other(other),
        }
    }
}

impl From<ScsiStatus> for u8 {
    fn from(value: ScsiStatus) -> Self {
        match value {
            ScsiStatus::Good => 0x00,
            ScsiStatus::CheckCondition => 0x02,
            ScsiStatus::ConditionMet => 0x04,
            ScsiStatus::Busy => 0x08,
            ScsiStatus::ReservationConflict => 0x18,
            ScsiStatus::TaskSetFull => 0x28,
            ScsiStatus::AcaActive => 0x30,
            ScsiStatus::TaskAborted => 0x40,
            ScsiStatus::Other(v) => v,
        }
    }
}

impl fmt::Debug for ScsiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ScsiStatus::Good => write!(f, "Good"),
            ScsiStatus::CheckCondition => write!(f, "CheckCondition"),
            ScsiStatus::ConditionMet => write!(f, "ConditionMet"),
            ScsiStatus::Busy => write!(f, "Busy"),
            ScsiStatus::ReservationConflict => write!(f, "ReservationConflict"),
            ScsiStatus::TaskSetFull => write!(f, "TaskSetFull"),
            ScsiStatus::AcaActive => write!(f, "AcaActive"),
            ScsiStatus::TaskAborted => write!(f, "TaskAborted"),
            ScsiStatus::Other(v) => write!(f, "Other({v:#04x})"),
        }
    }
}

/// Coarse outcome of a submitted command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Success,
    /// The device does not implement the opcode.
    InvalidOperation,
    /// A CDB or parameter list field was rejected.
    IllegalRequest,
    OtherFailure,
}

/// Categorise a SCSI status plus whatever sense bytes came back with it.
pub fn categorize(status: ScsiStatus, sense: &[u8]) -> StatusCategory {
    match status {
        ScsiStatus::Good | ScsiStatus::ConditionMet => StatusCategory::Success,
        ScsiStatus::CheckCondition => match SenseData::parse(sense) {
            Ok(sense) => categorize_sense(&sense),
            Err(e) => {
                debug!("CHECK CONDITION without usable sense: {e}");
                StatusCategory::OtherFailure
            },
        },
        _ => StatusCategory::OtherFailure,
    }
}

fn categorize_sense(sense: &SenseData) -> StatusCategory {
    match sense.sense_key {
        sense_key::NO_SENSE | sense_key::RECOVERED_ERROR => StatusCategory::Success,
        sense_key::ILLEGAL_REQUEST if sense.is_invalid_opcode() => {
            StatusCategory::InvalidOperation
        },
        sense_key::ILLEGAL_REQUEST => StatusCategory::IllegalRequest,
        _ => StatusCategory::OtherFailure,
    }
}
