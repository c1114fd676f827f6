// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{collections::VecDeque, io};

use scsi_maint::{
    models::error::MaintError,
    transport::{DataDirection, ScsiRequest, ScsiResponse, ScsiTransport},
};

pub const TEST_DEVICE: &str = "/dev/sg7";

/// What the transport saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open { handle: u32, writable: bool },
    Submit { handle: u32, cdb: Vec<u8>, data_out: Vec<u8> },
    Close { handle: u32 },
}

/// In-memory transport that answers submits from a script.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    pub events: Vec<Event>,
    replies: VecDeque<ScsiResponse>,
    next_handle: u32,
    pub fail_open: bool,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = ScsiResponse>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            ..Self::default()
        }
    }

    /// A transport whose `open` always fails.
    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    pub fn cdbs(&self) -> Vec<Vec<u8>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Submit { cdb, .. } => Some(cdb.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn data_out(&self) -> Vec<Vec<u8>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Submit { data_out, .. } => Some(data_out.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn opens(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Open { .. }))
            .count()
    }

    /// Every opened handle was closed exactly once.
    pub fn all_closed(&self) -> bool {
        let mut open = Vec::new();
        for e in &self.events {
            match e {
                Event::Open { handle, .. } => open.push(*handle),
                Event::Close { handle } => match open.iter().position(|h| h == handle) {
                    Some(i) => {
                        open.remove(i);
                    },
                    None => return false,
                },
                Event::Submit { .. } => {},
            }
        }
        open.is_empty()
    }

    pub fn unanswered(&self) -> usize {
        self.replies.len()
    }
}

impl ScsiTransport for ScriptedTransport {
    type Handle = u32;

    fn open(&mut self, path: &str, writable: bool) -> Result<u32, MaintError> {
        if self.fail_open {
            return Err(MaintError::Open {
                path: path.to_string(),
                source: io::ErrorKind::NotFound.into(),
            });
        }
        self.next_handle += 1;
        self.events.push(Event::Open {
            handle: self.next_handle,
            writable,
        });
        Ok(self.next_handle)
    }

    fn submit(
        &mut self,
        handle: &mut u32,
        request: &ScsiRequest<'_>,
    ) -> Result<ScsiResponse, MaintError> {
        let data_out = match request.data {
            DataDirection::ToDevice(buf) => buf.to_vec(),
            _ => Vec::new(),
        };
        self.events.push(Event::Submit {
            handle: *handle,
            cdb: request.cdb.to_vec(),
            data_out,
        });

        let mut reply = self.replies.pop_front().ok_or_else(|| MaintError::Io {
            context: format!("no scripted reply for {}", request.name),
            source: io::ErrorKind::UnexpectedEof.into(),
        })?;
        if let DataDirection::FromDevice(len) = request.data {
            reply.data.truncate(len);
        }
        Ok(reply)
    }

    fn close(&mut self, handle: u32) -> Result<(), MaintError> {
        self.events.push(Event::Close { handle });
        Ok(())
    }
}

/// Fixed format CHECK CONDITION sense.
pub fn sense(key: u8, asc: u8, ascq: u8) -> ScsiResponse {
    let mut buf = vec![0u8; 18];
    buf[0] = 0x70;
    buf[2] = key;
    buf[7] = 10;
    buf[12] = asc;
    buf[13] = ascq;
    ScsiResponse::check_condition(buf)
}

pub fn invalid_opcode() -> ScsiResponse {
    sense(0x05, 0x20, 0x00)
}

pub fn invalid_field() -> ScsiResponse {
    sense(0x05, 0x24, 0x00)
}

pub fn rc10_reply(last_lba: u32, block_size: u32) -> ScsiResponse {
    let mut data = last_lba.to_be_bytes().to_vec();
    data.extend_from_slice(&block_size.to_be_bytes());
    ScsiResponse::good(data)
}

pub fn rc16_reply(last_lba: u64, block_size: u32, protection: u8) -> ScsiResponse {
    let mut data = vec![0u8; 32];
    data[..8].copy_from_slice(&last_lba.to_be_bytes());
    data[8..12].copy_from_slice(&block_size.to_be_bytes());
    data[12] = protection;
    ScsiResponse::good(data)
}
