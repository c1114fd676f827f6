// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fmt, io};

use thiserror::Error;

/// Where a malformed LBA token was found.
///
/// Inline (`--address=`) input has no line number, only a 1-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: Option<usize>,
    pub column: usize,
}

impl Position {
    pub fn inline(column: usize) -> Self {
        Self { line: None, column }
    }

    pub fn at_line(line: usize, column: usize) -> Self {
        Self {
            line: Some(line),
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}, pos {}", self.column),
            None => write!(f, "pos {}", self.column),
        }
    }
}

/// Every failure the maintenance core can report.
///
/// Device outcomes (`InvalidOperation`, `IllegalRequest`, `OtherFailure`)
/// come back from a submitted command. Parsing and configuration errors are
/// raised before any command reaches the device.
#[derive(Debug, Error)]
pub enum MaintError {
    #[error("{command} not supported")]
    InvalidOperation { command: &'static str },

    #[error("bad field in {command} cdb")]
    IllegalRequest { command: &'static str },

    #[error("{command} failed: {detail}")]
    OtherFailure {
        command: &'static str,
        detail: String,
    },

    #[error("syntax error at {position}")]
    Syntax { position: Position },

    #[error("address list length exceeded (max {capacity} entries)")]
    CapacityExceeded { capacity: usize },

    #[error("address number {index} exceeds 32 bits so four byte addresses are invalid")]
    WidthMismatch { index: usize },

    #[error("{0}")]
    IncompatibleOptions(&'static str),

    #[error("please, only one of 0, 1, --eject, --load, --start or --stop")]
    Ambiguous,

    #[error("asked for grown defect list but didn't get it")]
    WrongListKind,

    #[error("{command}: response too short, need {need} bytes, got {got}")]
    ShortResponse {
        command: &'static str,
        need: usize,
        got: usize,
    },

    #[error("error opening {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Usage(String),
}

impl MaintError {
    /// Input, option and list-kind errors. These are not device failures,
    /// so more verbose command tracing would not explain them.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            MaintError::Syntax { .. }
                | MaintError::CapacityExceeded { .. }
                | MaintError::WidthMismatch { .. }
                | MaintError::IncompatibleOptions(_)
                | MaintError::Ambiguous
                | MaintError::WrongListKind
                | MaintError::Usage(_)
        )
    }

    /// Whether `-v` output could help explain this failure.
    pub fn wants_verbose_hint(&self) -> bool {
        !self.is_configuration() && !self.is_open_failure()
    }

    pub fn is_open_failure(&self) -> bool {
        matches!(self, MaintError::Open { .. })
    }

    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        MaintError::Io {
            context: context.into(),
            source,
        }
    }
}
