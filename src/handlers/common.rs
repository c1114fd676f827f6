// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{
    models::{error::MaintError, sense_data::SenseData, status::StatusCategory},
    transport::ScsiResponse,
};

/// Turn a non-success response into the matching [`MaintError`].
pub fn check_status(command: &'static str, response: &ScsiResponse) -> Result<(), MaintError> {
    match response.category() {
        StatusCategory::Success => Ok(()),
        StatusCategory::InvalidOperation => Err(MaintError::InvalidOperation { command }),
        StatusCategory::IllegalRequest => Err(MaintError::IllegalRequest { command }),
        StatusCategory::OtherFailure => Err(MaintError::OtherFailure {
            command,
            detail: describe_failure(response),
        }),
    }
}

fn describe_failure(response: &ScsiResponse) -> String {
    if let Some(failure) = &response.transport_failure {
        return failure.clone();
    }
    match SenseData::parse(&response.sense) {
        Ok(sense) => format!("status={:?}, {sense}", response.status),
        Err(_) => format!("status={:?}", response.status),
    }
}
