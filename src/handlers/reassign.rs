// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tracing::debug;

use crate::{
    control_block::{
        read_defect::{DEFECT_HEADER_LEN, build_read_grown_defect_header},
        reassign_blocks::build_reassign_blocks,
    },
    handlers::common::check_status,
    models::{
        defect_list::{DefectListFormat, GrownDefectSummary, decode_defect_header},
        error::MaintError,
        reassign::ReassignParameterBlock,
    },
    transport::{DataDirection, Device, ScsiRequest, ScsiTransport},
};

pub const REASSIGN_BLOCKS_NAME: &str = "REASSIGN BLOCKS";
pub const READ_DEFECT_10_NAME: &str = "READ DEFECT DATA (10)";

/// Send REASSIGN BLOCKS with an already validated parameter list.
pub fn reassign_blocks<T: ScsiTransport>(
    device: &mut Device<'_, T>,
    block: &ReassignParameterBlock,
) -> Result<(), MaintError> {
    let mut cdb = [0u8; 16];
    let len = build_reassign_blocks(&mut cdb, block.width().is_long(), block.long_list(), 0);

    let timeout = device.timeout();
    let response = device.submit(&ScsiRequest {
        name: REASSIGN_BLOCKS_NAME,
        cdb: &cdb[..len],
        data: DataDirection::ToDevice(block.as_bytes()),
        timeout,
    })?;
    check_status(REASSIGN_BLOCKS_NAME, &response)
}

/// Fetch only the header of the grown defect list and report its size.
pub fn grown_defect_count<T: ScsiTransport>(
    device: &mut Device<'_, T>,
    format: DefectListFormat,
) -> Result<GrownDefectSummary, MaintError> {
    let mut cdb = [0u8; 16];
    let len = build_read_grown_defect_header(&mut cdb, format);

    let timeout = device.timeout();
    let response = device.submit(&ScsiRequest {
        name: READ_DEFECT_10_NAME,
        cdb: &cdb[..len],
        data: DataDirection::FromDevice(DEFECT_HEADER_LEN as usize),
        timeout,
    })?;
    check_status(READ_DEFECT_10_NAME, &response)?;

    let summary = decode_defect_header(&response.data)?;
    debug!(
        "asked for defect list format {}, got {}",
        format.code(),
        summary.format.code()
    );
    Ok(summary)
}
