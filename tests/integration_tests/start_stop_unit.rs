// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use clap::Parser;
use scsi_maint::{
    cfg::cli::{StartArgs, StartOptions},
    control_block::start_stop_unit::START_STOP_UNIT,
    handlers::start_stop::start_stop_unit,
    models::{error::MaintError, start_stop::StartStopIntent},
    transport::{DEFAULT_TIMEOUT, Device, ScsiResponse},
};

use super::common::{ScriptedTransport, TEST_DEVICE, sense};

fn issue(t: &mut ScriptedTransport, intent: &StartStopIntent) -> Result<bool, MaintError> {
    let mut device = Device::open(t, TEST_DEVICE, true, DEFAULT_TIMEOUT)?;
    let sent = start_stop_unit(&mut device, intent)?;
    device.close()?;
    Ok(sent)
}

fn intent_for(args: &[&str]) -> Result<StartStopIntent> {
    let argv = std::iter::once("sg_start")
        .chain(args.iter().copied())
        .chain([TEST_DEVICE])
        .map(str::to_string);
    let parsed = StartArgs::try_parse_from(StartArgs::normalize_args(argv))?;
    Ok(StartOptions::try_from(parsed)?.intent)
}

#[test]
fn test_command_lines_to_cdbs() -> Result<()> {
    let cases: &[(&[&str], [u8; 6])] = &[
        (&[], [START_STOP_UNIT, 0, 0, 0, 0x01, 0]),
        (&["0"], [START_STOP_UNIT, 0, 0, 0, 0x00, 0]),
        (&["--eject"], [START_STOP_UNIT, 0, 0, 0, 0x02, 0]),
        (&["--load", "--imm=1"], [START_STOP_UNIT, 1, 0, 0, 0x03, 0]),
        (&["--pc=3"], [START_STOP_UNIT, 0, 0, 0, 0x30, 0]),
        (&["--fl=1"], [START_STOP_UNIT, 0, 0, 1, 0x07, 0]),
    ];

    for (args, expected) in cases {
        let intent = intent_for(args)?;
        let mut t = ScriptedTransport::new([ScsiResponse::good(vec![])]);
        assert!(issue(&mut t, &intent)?);
        assert_eq!(t.cdbs(), vec![expected.to_vec()], "{args:?}");
        assert!(t.all_closed());
    }
    Ok(())
}

#[test]
fn test_empty_intent_sends_nothing() -> Result<()> {
    let mut t = ScriptedTransport::default();
    assert!(!issue(&mut t, &StartStopIntent::default())?);
    assert!(t.cdbs().is_empty());
    assert!(t.all_closed());
    Ok(())
}

#[test]
fn test_device_failure_reported() -> Result<()> {
    let intent = intent_for(&["--stop"])?;
    let mut t = ScriptedTransport::new([sense(0x02, 0x3A, 0x00)]);
    let err = issue(&mut t, &intent).expect_err("medium not present");
    match &err {
        MaintError::OtherFailure { command, detail } => {
            assert_eq!(*command, "START STOP UNIT");
            assert!(detail.contains("Medium not present"), "{detail}");
        },
        other => panic!("unexpected: {other:?}"),
    }
    assert!(t.all_closed());
    Ok(())
}
