// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use hex_literal::hex;
use scsi_maint::{
    control_block::reassign_blocks::{REASSIGN_BLOCKS, build_reassign_blocks},
    models::{
        error::MaintError,
        lba_list::LbaList,
        reassign::{AddressWidth, HEADER_LEN, ReassignBlockBuilder},
    },
};

#[test]
fn test_short_header_four_byte_addresses() -> Result<()> {
    let list = LbaList::from(vec![0x10, 0x17, 0x20]);
    let block = ReassignBlockBuilder::new().build(&list)?;

    assert_eq!(block.width(), AddressWidth::Four);
    assert!(!block.long_list());
    assert_eq!(block.payload_len(), 12);
    assert_eq!(block.address_count(), 3);
    assert_eq!(
        block.as_bytes(),
        &hex!("0000000c 00000010 00000017 00000020")[..]
    );
    Ok(())
}

#[test]
fn test_long_header_eight_byte_addresses() -> Result<()> {
    let list = LbaList::from(vec![1, 2]);
    let block = ReassignBlockBuilder::new()
        .width(AddressWidth::Eight)
        .long_list(true)
        .build(&list)?;

    assert!(block.long_list());
    assert_eq!(
        block.as_bytes(),
        &hex!("00000010 0000000000000001 0000000000000002")[..]
    );
    Ok(())
}

#[test]
fn test_header_counts_payload_only() -> Result<()> {
    let list = LbaList::from((0..100u64).collect::<Vec<_>>());
    for long_list in [false, true] {
        let block = ReassignBlockBuilder::new().long_list(long_list).build(&list)?;
        let header = u32::from_be_bytes(block.as_bytes()[..HEADER_LEN].try_into()?);
        assert_eq!(header as usize, block.payload_len());
        assert_eq!(block.as_bytes().len(), HEADER_LEN + block.payload_len());
    }
    Ok(())
}

#[test]
fn test_wide_address_forces_eight() -> Result<()> {
    let list = LbaList::from(vec![5, 1u64 << 32]);
    let block = ReassignBlockBuilder::new().build(&list)?;
    assert_eq!(block.width(), AddressWidth::Eight);
    assert_eq!(&block.as_bytes()[12..], &hex!("0000000100000000")[..]);

    // u32::MAX itself still fits in four bytes
    let list = LbaList::from(vec![u32::MAX as u64]);
    let block = ReassignBlockBuilder::new().build(&list)?;
    assert_eq!(block.width(), AddressWidth::Four);
    Ok(())
}

#[test]
fn test_forced_four_with_wide_address() {
    let list = LbaList::from(vec![7, 8, 0x1_0000_0000]);
    let err = ReassignBlockBuilder::new()
        .width(AddressWidth::Four)
        .build(&list)
        .expect_err("third address needs 8 bytes");
    assert!(
        matches!(err, MaintError::WidthMismatch { index: 3 }),
        "{err:?}"
    );
    assert!(err.is_configuration());
}

#[test]
fn test_short_header_overflow() {
    // 16384 * 4 bytes does not fit the two byte length field
    let list = LbaList::from(vec![0u64; 16384]);
    let err = ReassignBlockBuilder::new()
        .build(&list)
        .expect_err("too long for short header");
    assert!(matches!(err, MaintError::CapacityExceeded { .. }), "{err:?}");
    assert!(ReassignBlockBuilder::new().long_list(true).build(&list).is_ok());
}

#[test]
fn test_reassign_cdb_bits() {
    let mut cdb = [0xAAu8; 16];
    let len = build_reassign_blocks(&mut cdb, true, false, 0);
    assert_eq!(len, 6);
    assert_eq!(&cdb[..len], &[REASSIGN_BLOCKS, 0x02, 0, 0, 0, 0]);

    let len = build_reassign_blocks(&mut cdb, false, true, 0);
    assert_eq!(&cdb[..len], &[REASSIGN_BLOCKS, 0x01, 0, 0, 0, 0]);
    assert!(cdb[len..].iter().all(|&b| b == 0));
}
