//! Domain types shared by the handlers and the command-line tools.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// READ CAPACITY results and their rendering.
pub mod capacity;
/// READ DEFECT DATA header decoding.
pub mod defect_list;
/// Error type for every maintenance operation.
pub mod error;
/// Parsing of LBA address lists from arguments or stdin.
pub mod lba_list;
/// REASSIGN BLOCKS parameter list encoding.
pub mod reassign;
/// Sense data decoding.
pub mod sense_data;
/// START STOP UNIT flag resolution.
pub mod start_stop;
/// SCSI status codes and their categorisation.
pub mod status;
