// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Linux SG_IO transport for sg and block devices.

use std::{
    fs::{File, OpenOptions},
    io,
    os::{
        fd::{AsRawFd, IntoRawFd},
        unix::fs::OpenOptionsExt,
    },
    ptr,
};

use tracing::trace;

use crate::{
    models::{error::MaintError, status::ScsiStatus},
    transport::{DataDirection, ScsiRequest, ScsiResponse, ScsiTransport},
};

const SG_IO: libc::c_ulong = 0x2285;
const SG_INTERFACE_ID: libc::c_int = b'S' as libc::c_int;

const SG_DXFER_NONE: libc::c_int = -1;
const SG_DXFER_TO_DEV: libc::c_int = -2;
const SG_DXFER_FROM_DEV: libc::c_int = -3;

const SENSE_BUFF_LEN: usize = 64;
/// DRIVER_SENSE only says sense data is present.
const DRIVER_SENSE: u16 = 0x08;
const DRIVER_STATUS_MASK: u16 = 0x0F;

/// `struct sg_io_hdr` from `<scsi/sg.h>`.
#[repr(C)]
struct SgIoHdr {
    interface_id: libc::c_int,
    dxfer_direction: libc::c_int,
    cmd_len: libc::c_uchar,
    mx_sb_len: libc::c_uchar,
    iovec_count: libc::c_ushort,
    dxfer_len: libc::c_uint,
    dxferp: *mut libc::c_void,
    cmdp: *const libc::c_uchar,
    sbp: *mut libc::c_uchar,
    timeout: libc::c_uint,
    flags: libc::c_uint,
    pack_id: libc::c_int,
    usr_ptr: *mut libc::c_void,
    status: libc::c_uchar,
    masked_status: libc::c_uchar,
    msg_status: libc::c_uchar,
    sb_len_wr: libc::c_uchar,
    host_status: libc::c_ushort,
    driver_status: libc::c_ushort,
    resid: libc::c_int,
    duration: libc::c_uint,
    info: libc::c_uint,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SgTransport;

impl ScsiTransport for SgTransport {
    type Handle = File;

    fn open(&mut self, path: &str, writable: bool) -> Result<File, MaintError> {
        OpenOptions::new()
            .read(true)
            .write(writable)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .map_err(|source| MaintError::Open {
                path: path.to_string(),
                source,
            })
    }

    fn submit(
        &mut self,
        handle: &mut File,
        request: &ScsiRequest<'_>,
    ) -> Result<ScsiResponse, MaintError> {
        let cmd_len = u8::try_from(request.cdb.len())
            .map_err(|_| MaintError::Usage(format!("{}: CDB too long", request.name)))?;

        let mut sense = [0u8; SENSE_BUFF_LEN];
        let mut data_in = Vec::new();
        let (direction, dxferp, dxfer_len): (libc::c_int, *mut libc::c_void, usize) =
            match request.data {
                DataDirection::None => (SG_DXFER_NONE, ptr::null_mut(), 0),
                DataDirection::FromDevice(len) => {
                    data_in.resize(len, 0u8);
                    (SG_DXFER_FROM_DEV, data_in.as_mut_ptr().cast(), len)
                },
                // SG_IO only reads from the buffer for TO_DEV transfers.
                DataDirection::ToDevice(buf) => {
                    (SG_DXFER_TO_DEV, buf.as_ptr().cast_mut().cast(), buf.len())
                },
            };

        let mut hdr = SgIoHdr {
            interface_id: SG_INTERFACE_ID,
            dxfer_direction: direction,
            cmd_len,
            mx_sb_len: SENSE_BUFF_LEN as libc::c_uchar,
            iovec_count: 0,
            dxfer_len: u32::try_from(dxfer_len).map_err(|_| {
                MaintError::Usage(format!("{}: transfer too long", request.name))
            })?,
            dxferp,
            cmdp: request.cdb.as_ptr(),
            sbp: sense.as_mut_ptr(),
            timeout: u32::try_from(request.timeout.as_millis()).unwrap_or(u32::MAX),
            flags: 0,
            pack_id: 0,
            usr_ptr: ptr::null_mut(),
            status: 0,
            masked_status: 0,
            msg_status: 0,
            sb_len_wr: 0,
            host_status: 0,
            driver_status: 0,
            resid: 0,
            duration: 0,
            info: 0,
        };

        // SAFETY: every pointer in `hdr` refers to a live buffer of the
        // advertised length for the duration of the call.
        let rc = unsafe { libc::ioctl(handle.as_raw_fd(), SG_IO as _, &mut hdr as *mut SgIoHdr) };
        if rc < 0 {
            return Err(MaintError::io(
                format!("{}: SG_IO ioctl failed", request.name),
                io::Error::last_os_error(),
            ));
        }
        trace!(
            command = request.name,
            duration_ms = hdr.duration,
            resid = hdr.resid,
            "SG_IO completed"
        );

        if !data_in.is_empty() {
            let resid = usize::try_from(hdr.resid.max(0)).unwrap_or(0);
            data_in.truncate(data_in.len().saturating_sub(resid));
        }

        let driver = hdr.driver_status & DRIVER_STATUS_MASK;
        let transport_failure = if hdr.host_status != 0 {
            Some(format!("host_status={:#06x}", hdr.host_status))
        } else if driver != 0 && driver != DRIVER_SENSE {
            Some(format!("driver_status={:#06x}", hdr.driver_status))
        } else {
            None
        };

        Ok(ScsiResponse {
            status: ScsiStatus::from(hdr.status),
            sense: sense[..(hdr.sb_len_wr as usize).min(SENSE_BUFF_LEN)].to_vec(),
            data: data_in,
            transport_failure,
        })
    }

    fn close(&mut self, handle: File) -> Result<(), MaintError> {
        let fd = handle.into_raw_fd();
        // SAFETY: `fd` was just released from its owning `File`.
        if unsafe { libc::close(fd) } < 0 {
            return Err(MaintError::io("close error", io::Error::last_os_error()));
        }
        Ok(())
    }
}
