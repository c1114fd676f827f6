//! SCSI device maintenance: capacity queries, bad block reassignment and
//! start/stop/power-condition control.
// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Handles configuration, command-line parsing, and logging.
pub mod cfg;
/// CDB builders and raw response layouts.
pub mod control_block;
/// Command flows that submit CDBs through a [`transport::Device`].
pub mod handlers;
/// Domain types: capacity results, LBA lists, defect headers, errors.
pub mod models;
/// Transport trait and the Linux SG_IO backend.
pub mod transport;
/// Provides utility functions used throughout the crate.
pub mod utils;
