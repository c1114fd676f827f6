// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::{Context, Result};
use scsi_maint::{
    control_block::start_stop_unit::{
        START_STOP_UNIT, StartStopUnitFields, build_start_stop_unit,
    },
    models::{
        error::MaintError,
        start_stop::{StartStopAction, StartStopFlag, StartStopIntent},
    },
};

use scsi_maint::models::start_stop::StartStopFlag::*;

fn resolve(flags: &[StartStopFlag]) -> Result<StartStopIntent, MaintError> {
    StartStopIntent::resolve(flags.iter().copied())
}

fn encode(intent: &StartStopIntent) -> Result<[u8; 6]> {
    let fields = intent.command_fields().context("nothing to send")?;
    let mut cdb = [0u8; 16];
    let len = build_start_stop_unit(&mut cdb, &fields, 0);
    assert_eq!(len, 6);
    Ok(cdb[..6].try_into()?)
}

#[test]
fn test_eject_is_stop_with_load_eject() -> Result<()> {
    let intent = resolve(&[Eject])?;
    assert_eq!(intent.action, Some(StartStopAction::Stop));
    assert!(intent.load_eject);
    assert_eq!(encode(&intent)?, [START_STOP_UNIT, 0, 0, 0, 0x02, 0]);
    Ok(())
}

#[test]
fn test_load_is_start_with_load_eject() -> Result<()> {
    let intent = resolve(&[Load])?;
    assert_eq!(intent.action, Some(StartStopAction::Start));
    assert_eq!(encode(&intent)?, [START_STOP_UNIT, 0, 0, 0, 0x03, 0]);
    Ok(())
}

#[test]
fn test_conflicting_actions_are_ambiguous() {
    for flags in [
        &[Eject, Start][..],
        &[Start, Eject][..],
        &[Load, Stop][..],
        &[Stop, Start][..],
        &[Load, Eject][..],
    ] {
        let err = resolve(flags).expect_err("ambiguous");
        assert!(matches!(err, MaintError::Ambiguous), "{flags:?}: {err:?}");
    }
}

#[test]
fn test_repeated_action_is_fine() -> Result<()> {
    let intent = resolve(&[Stop, Stop, Eject])?;
    assert_eq!(intent.action, Some(StartStopAction::Stop));
    Ok(())
}

#[test]
fn test_format_layer_conflicts() {
    let err = resolve(&[FormatLayer(2), Stop]).expect_err("fl with stop");
    assert!(matches!(err, MaintError::IncompatibleOptions(_)), "{err:?}");

    // checked after all flags, so order does not matter
    let err = resolve(&[Eject, FormatLayer(1)]).expect_err("fl with eject");
    assert!(matches!(err, MaintError::IncompatibleOptions(_)), "{err:?}");

    let err = resolve(&[FormatLayer(1), PowerCondition(3)]).expect_err("fl with pc");
    assert!(matches!(err, MaintError::IncompatibleOptions(_)), "{err:?}");
}

#[test]
fn test_format_layer_encoding() -> Result<()> {
    let intent = resolve(&[FormatLayer(2), Immediate(true)])?;
    assert_eq!(intent.format_layer, Some(2));
    assert_eq!(encode(&intent)?, [START_STOP_UNIT, 1, 0, 2, 0x07, 0]);

    // only the low two bits reach the CDB
    let intent = resolve(&[FormatLayer(7)])?;
    assert_eq!(encode(&intent)?[3], 3);
    Ok(())
}

#[test]
fn test_empty_flags_default_to_start() -> Result<()> {
    let intent = resolve(&[])?;
    assert_eq!(
        intent,
        StartStopIntent {
            action: Some(StartStopAction::Start),
            ..StartStopIntent::default()
        }
    );
    assert_eq!(encode(&intent)?, [START_STOP_UNIT, 0, 0, 0, 0x01, 0]);
    Ok(())
}

#[test]
fn test_loej_alone_defaults_to_stop() -> Result<()> {
    let intent = resolve(&[LoadEjectBit])?;
    assert_eq!(intent.action, Some(StartStopAction::Stop));
    assert_eq!(encode(&intent)?, [START_STOP_UNIT, 0, 0, 0, 0x02, 0]);

    let intent = resolve(&[LoadEjectBit, Start])?;
    assert_eq!(encode(&intent)?, [START_STOP_UNIT, 0, 0, 0, 0x03, 0]);
    Ok(())
}

#[test]
fn test_power_condition_only() -> Result<()> {
    let intent = resolve(&[PowerCondition(3)])?;
    assert_eq!(intent.action, None);
    assert_eq!(encode(&intent)?, [START_STOP_UNIT, 0, 0, 0, 0x30, 0]);

    // a power condition overrides start/stop in the CDB
    let intent = resolve(&[PowerCondition(5), Start])?;
    assert_eq!(encode(&intent)?, [START_STOP_UNIT, 0, 0, 0, 0x50, 0]);
    Ok(())
}

#[test]
fn test_power_condition_range() {
    let err = resolve(&[PowerCondition(0x10)]).expect_err("pc > 0xf");
    assert!(matches!(err, MaintError::Usage(_)), "{err:?}");
}

#[test]
fn test_immediate_flag() -> Result<()> {
    let intent = resolve(&[Immediate(true), Stop])?;
    assert_eq!(encode(&intent)?, [START_STOP_UNIT, 1, 0, 0, 0x00, 0]);
    Ok(())
}

#[test]
fn test_nothing_to_send() {
    assert!(StartStopIntent::default().command_fields().is_none());
}

#[test]
fn test_cdb_builder_masks_fields() {
    let fields = StartStopUnitFields {
        immediate: true,
        format_layer_number: 0xFF,
        power_condition: 0x1F,
        format_layer: false,
        load_eject: true,
        start: false,
    };
    let mut cdb = [0u8; 16];
    build_start_stop_unit(&mut cdb, &fields, 0);
    assert_eq!(&cdb[..6], &[START_STOP_UNIT, 1, 0, 3, 0xF2, 0]);
}
