// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tracing::debug;

use crate::{
    control_block::start_stop_unit::build_start_stop_unit,
    handlers::common::check_status,
    models::{error::MaintError, start_stop::StartStopIntent},
    transport::{DataDirection, Device, ScsiRequest, ScsiTransport},
};

pub const START_STOP_UNIT_NAME: &str = "START STOP UNIT";

/// Issue the single START STOP UNIT command `intent` maps to.
///
/// Returns `false` when the intent carries nothing to send.
pub fn start_stop_unit<T: ScsiTransport>(
    device: &mut Device<'_, T>,
    intent: &StartStopIntent,
) -> Result<bool, MaintError> {
    let Some(fields) = intent.command_fields() else {
        debug!("no action or power condition requested, nothing sent");
        return Ok(false);
    };

    let mut cdb = [0u8; 16];
    let len = build_start_stop_unit(&mut cdb, &fields, 0);

    let timeout = device.timeout();
    let response = device.submit(&ScsiRequest {
        name: START_STOP_UNIT_NAME,
        cdb: &cdb[..len],
        data: DataDirection::None,
        timeout,
    })?;
    check_status(START_STOP_UNIT_NAME, &response)?;
    Ok(true)
}
