// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fs;

use anyhow::Result;
use hex::FromHex;
use scsi_maint::{
    handlers::common::check_status,
    models::{
        error::MaintError,
        sense_data::{SenseData, sense_key},
        status::{ScsiStatus, StatusCategory, categorize},
    },
    transport::ScsiResponse,
};

fn load_fixture(path: &str) -> Result<Vec<u8>> {
    let s = fs::read_to_string(path)?;
    let cleaned = s.trim().replace(|c: char| c.is_whitespace(), "");
    Ok(Vec::from_hex(&cleaned)?)
}

fn descriptor_sense(key: u8, asc: u8, ascq: u8) -> Vec<u8> {
    vec![0x72, key, asc, ascq, 0, 0, 0, 0]
}

#[test]
fn test_invalid_opcode_fixture() -> Result<()> {
    let sense = load_fixture("tests/unit_tests/fixtures/scsi_commands/sense_invalid_opcode.hex")?;
    let parsed = SenseData::parse(&sense)?;
    assert_eq!(parsed.sense_key, sense_key::ILLEGAL_REQUEST);
    assert!(parsed.is_invalid_opcode());
    assert_eq!(
        categorize(ScsiStatus::CheckCondition, &sense),
        StatusCategory::InvalidOperation
    );
    Ok(())
}

#[test]
fn test_categories() {
    use StatusCategory::*;

    let cases = [
        (ScsiStatus::Good, vec![], Success),
        (ScsiStatus::ConditionMet, vec![], Success),
        (ScsiStatus::CheckCondition, descriptor_sense(0x1, 0x17, 0x01), Success),
        (ScsiStatus::CheckCondition, descriptor_sense(0x0, 0, 0), Success),
        (ScsiStatus::CheckCondition, descriptor_sense(0x5, 0x20, 0), InvalidOperation),
        (ScsiStatus::CheckCondition, descriptor_sense(0x5, 0x24, 0), IllegalRequest),
        (ScsiStatus::CheckCondition, descriptor_sense(0x3, 0x11, 0), OtherFailure),
        (ScsiStatus::CheckCondition, vec![0x70, 0, 5], OtherFailure),
        (ScsiStatus::Busy, vec![], OtherFailure),
        (ScsiStatus::from(0x18), vec![], OtherFailure),
    ];
    for (status, sense, expected) in cases {
        assert_eq!(categorize(status, &sense), expected, "{status:?} {sense:02x?}");
    }
}

#[test]
fn test_status_byte_conversion() {
    assert_eq!(ScsiStatus::from(0x02), ScsiStatus::CheckCondition);
    assert_eq!(u8::from(ScsiStatus::TaskSetFull), 0x28);
    assert_eq!(u8::from(ScsiStatus::from(0x7E)), 0x7E);
}

#[test]
fn test_check_status_errors() {
    let ok = ScsiResponse::good(vec![]);
    assert!(check_status("REASSIGN BLOCKS", &ok).is_ok());

    let unsupported = ScsiResponse::check_condition(descriptor_sense(0x5, 0x20, 0));
    assert!(matches!(
        check_status("REASSIGN BLOCKS", &unsupported),
        Err(MaintError::InvalidOperation {
            command: "REASSIGN BLOCKS"
        })
    ));

    let bad_field = ScsiResponse::check_condition(descriptor_sense(0x5, 0x26, 0));
    assert!(matches!(
        check_status("REASSIGN BLOCKS", &bad_field),
        Err(MaintError::IllegalRequest { .. })
    ));

    let medium = ScsiResponse::check_condition(descriptor_sense(0x3, 0x32, 0));
    match check_status("REASSIGN BLOCKS", &medium) {
        Err(MaintError::OtherFailure { detail, .. }) => {
            assert!(detail.contains("No defect spare location available"), "{detail}")
        },
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_transport_failure_is_other() {
    let mut response = ScsiResponse::good(vec![0; 8]);
    response.transport_failure = Some("host_status=0x01".to_string());
    assert_eq!(response.category(), StatusCategory::OtherFailure);
    match check_status("START STOP UNIT", &response) {
        Err(MaintError::OtherFailure { detail, .. }) => assert_eq!(detail, "host_status=0x01"),
        other => panic!("unexpected: {other:?}"),
    }
}
