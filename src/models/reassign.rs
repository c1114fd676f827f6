// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! REASSIGN BLOCKS parameter list.
//!
//! Layout (SBC-3):
//!   [0..4]  = header; bytes 2..3 hold the DEFECT LIST LENGTH, or bytes 0..3
//!             when LONGLIST is set
//!   [4..]   = one LBA per entry, 4 bytes each (8 bytes when LONGLBA is set)
//!
//! The length counts address bytes only, never the header.

use tracing::debug;

use crate::models::{error::MaintError, lba_list::LbaList};

/// Size of the parameter list header regardless of LONGLIST.
pub const HEADER_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressWidth {
    #[default]
    Four,
    Eight,
}

impl AddressWidth {
    pub fn bytes(self) -> usize {
        match self {
            AddressWidth::Four => 4,
            AddressWidth::Eight => 8,
        }
    }

    /// Value of the LONGLBA bit in the REASSIGN BLOCKS CDB.
    pub fn is_long(self) -> bool {
        matches!(self, AddressWidth::Eight)
    }
}

impl From<bool> for AddressWidth {
    fn from(eight: bool) -> Self {
        if eight {
            AddressWidth::Eight
        } else {
            AddressWidth::Four
        }
    }
}

/// Encoded parameter list, ready to be sent as the data-out buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignParameterBlock {
    width: AddressWidth,
    long_list: bool,
    bytes: Vec<u8>,
}

impl ReassignParameterBlock {
    pub fn width(&self) -> AddressWidth {
        self.width
    }

    /// Value of the LONGLIST bit in the REASSIGN BLOCKS CDB.
    pub fn long_list(&self) -> bool {
        self.long_list
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of address bytes following the header.
    pub fn payload_len(&self) -> usize {
        self.bytes.len() - HEADER_LEN
    }

    pub fn address_count(&self) -> usize {
        self.payload_len() / self.width.bytes()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReassignBlockBuilder {
    width: Option<AddressWidth>,
    long_list: bool,
}

impl ReassignBlockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the address width instead of choosing it from the list.
    pub fn width(mut self, width: AddressWidth) -> Self {
        self.width = Some(width);
        self
    }

    /// Use the full 4-byte list length header.
    pub fn long_list(mut self, long_list: bool) -> Self {
        self.long_list = long_list;
        self
    }

    pub fn build(&self, list: &LbaList) -> Result<ReassignParameterBlock, MaintError> {
        let width = self.select_width(list)?;
        let payload_len = list.len() * width.bytes();

        let mut bytes = Vec::with_capacity(HEADER_LEN + payload_len);
        if self.long_list {
            let len = u32::try_from(payload_len).map_err(|_| {
                MaintError::CapacityExceeded {
                    capacity: u32::MAX as usize / width.bytes(),
                }
            })?;
            bytes.extend_from_slice(&len.to_be_bytes());
        } else {
            let len = u16::try_from(payload_len).map_err(|_| {
                MaintError::CapacityExceeded {
                    capacity: u16::MAX as usize / width.bytes(),
                }
            })?;
            bytes.extend_from_slice(&[0, 0]);
            bytes.extend_from_slice(&len.to_be_bytes());
        }

        for &lba in list.iter() {
            match width {
                AddressWidth::Eight => bytes.extend_from_slice(&lba.to_be_bytes()),
                // select_width guarantees every address fits
                AddressWidth::Four => {
                    bytes.extend_from_slice(&(lba as u32).to_be_bytes())
                },
            }
        }

        debug!(
            "REASSIGN BLOCKS parameter list: {} addresses, width={width:?}, longlist={}",
            list.len(),
            self.long_list
        );

        Ok(ReassignParameterBlock {
            width,
            long_list: self.long_list,
            bytes,
        })
    }

    fn select_width(&self, list: &LbaList) -> Result<AddressWidth, MaintError> {
        let wide = list.iter().position(|&lba| u32::try_from(lba).is_err());
        match (wide, self.width) {
            (Some(index), Some(AddressWidth::Four)) => {
                Err(MaintError::WidthMismatch { index: index + 1 })
            },
            (Some(_), _) => Ok(AddressWidth::Eight),
            (None, width) => Ok(width.unwrap_or_default()),
        }
    }
}
