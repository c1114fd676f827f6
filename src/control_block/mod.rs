// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

pub mod read_capacity;
pub mod read_defect;
pub mod reassign_blocks;
pub mod start_stop_unit;
