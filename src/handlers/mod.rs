//! Command flows run against an open device.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Status checking shared by every command.
pub mod common;
/// READ CAPACITY (10)/(16) negotiation.
pub mod read_capacity;
/// REASSIGN BLOCKS and the grown defect list count.
pub mod reassign;
/// START STOP UNIT.
pub mod start_stop;
