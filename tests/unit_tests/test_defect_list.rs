// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use scsi_maint::{
    control_block::read_defect::{READ_DEFECT_DATA_10, build_read_grown_defect_header},
    models::{
        defect_list::{DefectListFormat, decode_defect_header},
        error::MaintError,
    },
};

#[test]
fn test_bytes_from_index_count() -> Result<()> {
    let summary = decode_defect_header(&[0x00, 0x1C, 0x00, 0x10])?;
    assert_eq!(summary.format, DefectListFormat::BytesFromIndex);
    assert_eq!(summary.list_len, 16);
    assert_eq!(summary.element_count(), Some(2));
    assert_eq!(summary.to_string(), "Elements in grown defect list: 2");
    Ok(())
}

#[test]
fn test_short_block_count() -> Result<()> {
    let summary = decode_defect_header(&[0x00, 0x18, 0x00, 0x0C])?;
    assert_eq!(summary.format, DefectListFormat::ShortBlock);
    assert_eq!(summary.element_count(), Some(3));
    Ok(())
}

#[test]
fn test_zero_length_is_zero_elements() -> Result<()> {
    for format in [0u8, 3, 4, 5, 6] {
        let summary = decode_defect_header(&[0x00, 0x18 | format, 0x00, 0x00])?;
        assert_eq!(summary.element_count(), Some(0), "format {format}");
    }
    Ok(())
}

#[test]
fn test_unknown_format_reports_bytes() -> Result<()> {
    let summary = decode_defect_header(&[0x00, 0x1E, 0x00, 0x18])?;
    assert_eq!(summary.format, DefectListFormat::Unknown(6));
    assert_eq!(summary.element_count(), None);
    assert!(summary.to_string().contains("24 bytes"));
    Ok(())
}

#[test]
fn test_grown_list_flag_required() {
    for flags in [0x0C, 0x14, 0x04] {
        let err = decode_defect_header(&[0x00, flags, 0x00, 0x08])
            .expect_err("grown list not flagged");
        assert!(matches!(err, MaintError::WrongListKind), "{flags:#x}: {err:?}");
    }
}

#[test]
fn test_short_header() {
    let err = decode_defect_header(&[0x00, 0x1C]).expect_err("two bytes");
    assert!(
        matches!(err, MaintError::ShortResponse { need: 4, got: 2, .. }),
        "{err:?}"
    );
}

#[test]
fn test_format_codes() {
    assert_eq!(DefectListFormat::from(0), DefectListFormat::ShortBlock);
    assert_eq!(DefectListFormat::from(3), DefectListFormat::LongBlock);
    assert_eq!(DefectListFormat::from(5), DefectListFormat::PhysicalSector);
    assert_eq!(DefectListFormat::from(0x1C), DefectListFormat::BytesFromIndex);
    assert_eq!(DefectListFormat::LongBlock.entry_size(), 8);
    assert_eq!(DefectListFormat::ShortBlock.entry_size(), 4);
    assert_eq!(DefectListFormat::Unknown(1).entry_size(), 0);
}

#[test]
fn test_grown_header_cdb() {
    let mut cdb = [0u8; 16];
    let len = build_read_grown_defect_header(&mut cdb, DefectListFormat::DEFAULT);
    assert_eq!(len, 10);
    assert_eq!(
        &cdb[..len],
        &[READ_DEFECT_DATA_10, 0, 0x0C, 0, 0, 0, 0, 0, 4, 0]
    );
}
