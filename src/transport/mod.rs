// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The seam between the command layer and whatever actually moves CDBs to a
//! device.
//!
//! A [`ScsiTransport`] opens handles, submits one command at a time and
//! closes handles. [`Device`] owns exactly one open handle and closes it
//! when dropped, so every exit path releases the device.

#[cfg(target_os = "linux")]
pub mod sg;

use std::time::Duration;

use tracing::{debug, debug_span, warn};

use crate::{
    models::{
        error::MaintError,
        status::{ScsiStatus, StatusCategory, categorize},
    },
    utils::hex_dump,
};

/// Default command timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Direction and size of the data phase.
#[derive(Debug, Clone, Copy)]
pub enum DataDirection<'a> {
    None,
    /// Read up to this many bytes from the device.
    FromDevice(usize),
    /// Send this buffer to the device.
    ToDevice(&'a [u8]),
}

/// One command ready for submission.
#[derive(Debug, Clone, Copy)]
pub struct ScsiRequest<'a> {
    /// Human readable command name used in diagnostics.
    pub name: &'static str,
    pub cdb: &'a [u8],
    pub data: DataDirection<'a>,
    pub timeout: Duration,
}

/// What came back from the device for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScsiResponse {
    pub status: ScsiStatus,
    pub sense: Vec<u8>,
    /// Data-in bytes actually transferred.
    pub data: Vec<u8>,
    /// Set when the host adapter or driver failed the command before the
    /// device reported a status.
    pub transport_failure: Option<String>,
}

impl ScsiResponse {
    pub fn good(data: Vec<u8>) -> Self {
        Self {
            status: ScsiStatus::Good,
            sense: Vec::new(),
            data,
            transport_failure: None,
        }
    }

    pub fn check_condition(sense: Vec<u8>) -> Self {
        Self {
            status: ScsiStatus::CheckCondition,
            sense,
            data: Vec::new(),
            transport_failure: None,
        }
    }

    pub fn category(&self) -> StatusCategory {
        if self.transport_failure.is_some() {
            return StatusCategory::OtherFailure;
        }
        categorize(self.status, &self.sense)
    }
}

/// Backend that moves CDBs to a device.
pub trait ScsiTransport {
    type Handle;

    fn open(&mut self, path: &str, writable: bool) -> Result<Self::Handle, MaintError>;

    fn submit(
        &mut self,
        handle: &mut Self::Handle,
        request: &ScsiRequest<'_>,
    ) -> Result<ScsiResponse, MaintError>;

    fn close(&mut self, handle: Self::Handle) -> Result<(), MaintError>;
}

/// An open device handle, closed on drop.
pub struct Device<'t, T: ScsiTransport> {
    transport: &'t mut T,
    handle: Option<T::Handle>,
    path: String,
    writable: bool,
    timeout: Duration,
}

impl<'t, T: ScsiTransport> Device<'t, T> {
    pub fn open(
        transport: &'t mut T,
        path: &str,
        writable: bool,
        timeout: Duration,
    ) -> Result<Self, MaintError> {
        let handle = transport.open(path, writable)?;
        debug!(path, writable, "device opened");
        Ok(Self {
            transport,
            handle: Some(handle),
            path: path.to_string(),
            writable,
            timeout,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Close the current handle, then open the same path again.
    pub fn reopen(&mut self, writable: bool) -> Result<(), MaintError> {
        if let Some(old) = self.handle.take() {
            self.transport.close(old)?;
        }
        let handle = self.transport.open(&self.path, writable)?;
        self.handle = Some(handle);
        self.writable = writable;
        debug!(path = %self.path, writable, "device reopened");
        Ok(())
    }

    pub fn submit(&mut self, request: &ScsiRequest<'_>) -> Result<ScsiResponse, MaintError> {
        let handle = self.handle.as_mut().ok_or_else(|| {
            MaintError::io(
                format!("{}: device not open", self.path),
                std::io::ErrorKind::NotConnected.into(),
            )
        })?;

        let _span = debug_span!("scsi", command = request.name, path = %self.path).entered();
        debug!(cdb = %hex_dump(request.cdb), "submit");
        if let DataDirection::ToDevice(buf) = request.data {
            debug!(data = %hex_dump(buf), "data-out");
        }

        let response = self.transport.submit(handle, request)?;

        debug!(
            status = ?response.status,
            sense = %hex_dump(&response.sense),
            data = %hex_dump(&response.data),
            "response"
        );
        Ok(response)
    }

    /// Close explicitly so a close failure can be reported.
    pub fn close(mut self) -> Result<(), MaintError> {
        match self.handle.take() {
            Some(handle) => self.transport.close(handle),
            None => Ok(()),
        }
    }
}

impl<T: ScsiTransport> Drop for Device<'_, T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take()
            && let Err(e) = self.transport.close(handle)
        {
            warn!(path = %self.path, "close failed: {e}");
        }
    }
}
