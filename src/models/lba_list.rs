// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Logical block address lists for REASSIGN BLOCKS.
//!
//! Two sources are accepted:
//! - an inline, comma separated argument (`0x10,17,20h`);
//! - a line oriented stream (stdin) selected by the `-` sentinel, with
//!   spaces, tabs or commas between numbers and `#` comments.
//!
//! Numbers are decimal unless prefixed by `0x`/`0X` or suffixed by `h`/`H`.
//! A trailing `h`/`H` on the argument (or on a stream line) also marks every
//! number before it as hex, so `17,20h` is `0x17, 0x20`.

use std::{fmt, io::BufRead, ops::Deref};

use tracing::debug;

use crate::models::error::{MaintError, Position};

/// Default bound on the number of addresses in one list.
pub const MAX_ADDRESSES: usize = 1024;
/// Default bound on the number of lines read from a stream.
pub const MAX_INPUT_LINES: usize = 512;
/// Argument value that selects stream input.
pub const STREAM_SENTINEL: &str = "-";

const STREAM_SEPARATORS: &[u8] = b" ,\t";

/// An ordered, bounded list of logical block addresses. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LbaList(Vec<u64>);

impl LbaList {
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u64> {
        self.0
    }
}

/// Renders as a `--address=` argument, e.g. `0x10,0x17`.
impl fmt::Display for LbaList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, lba) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{lba:#x}")?;
        }
        Ok(())
    }
}

impl From<Vec<u64>> for LbaList {
    fn from(addresses: Vec<u64>) -> Self {
        Self(addresses)
    }
}

impl Deref for LbaList {
    type Target = [u64];

    fn deref(&self) -> &[u64] {
        &self.0
    }
}

/// Per-invocation parser state for LBA lists.
#[derive(Debug, Clone, Copy)]
pub struct LbaListParser {
    max_capacity: usize,
    max_lines: usize,
}

impl Default for LbaListParser {
    fn default() -> Self {
        Self::new(MAX_ADDRESSES, MAX_INPUT_LINES)
    }
}

impl LbaListParser {
    pub fn new(max_capacity: usize, max_lines: usize) -> Self {
        Self {
            max_capacity,
            max_lines,
        }
    }

    /// Parse an `--address=` value, reading `stream` only when the value is
    /// the `-` sentinel.
    pub fn parse_argument<R: BufRead>(
        &self,
        arg: &str,
        stream: R,
    ) -> Result<LbaList, MaintError> {
        if arg == STREAM_SENTINEL {
            self.parse_stream(stream)
        } else {
            self.parse_inline(arg)
        }
    }

    pub fn parse_inline(&self, input: &str) -> Result<LbaList, MaintError> {
        let bytes = input.as_bytes();
        if let Some(bad) = bytes.iter().position(|&b| !is_inline_char(b)) {
            return Err(MaintError::Syntax {
                position: Position::inline(bad + 1),
            });
        }

        let mut out = Vec::new();
        let mut start = 0;
        for token in input.split(',') {
            let value = parse_number(token, has_hex_suffix(&bytes[start..]))
                .ok_or(MaintError::Syntax {
                    position: Position::inline(start + 1),
                })?;
            self.push(&mut out, value)?;
            start += token.len() + 1;
        }

        Ok(LbaList(out))
    }

    pub fn parse_stream<R: BufRead>(&self, mut reader: R) -> Result<LbaList, MaintError> {
        let mut out = Vec::new();
        let mut line = Vec::with_capacity(128);

        for line_no in 1..=self.max_lines {
            line.clear();
            let n = reader
                .read_until(b'\n', &mut line)
                .map_err(|e| MaintError::io("failed to read address list", e))?;
            if n == 0 {
                return Ok(LbaList(out));
            }
            self.parse_line(&line, line_no, &mut out)?;
        }

        debug!(
            "address list input truncated after {} lines",
            self.max_lines
        );
        Ok(LbaList(out))
    }

    fn parse_line(
        &self,
        raw: &[u8],
        line_no: usize,
        out: &mut Vec<u64>,
    ) -> Result<(), MaintError> {
        let line = raw.strip_suffix(b"\n").unwrap_or(raw);
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        let indent = line
            .iter()
            .take_while(|&&b| b == b' ' || b == b'\t')
            .count();
        let body = &line[indent..];
        if body.is_empty() || body[0] == b'#' {
            return Ok(());
        }

        // Everything up to an optional trailing comment must be numeric text.
        let data_len = body.iter().position(|&b| b == b'#').unwrap_or(body.len());
        let data = &body[..data_len];
        let data_end = data
            .iter()
            .rposition(|b| !STREAM_SEPARATORS.contains(b))
            .map_or(0, |i| i + 1);
        if let Some(bad) = data.iter().position(|&b| !is_stream_char(b)) {
            return Err(MaintError::Syntax {
                position: Position::at_line(line_no, indent + bad + 1),
            });
        }

        let mut offset = 0;
        while offset < data.len() {
            if STREAM_SEPARATORS.contains(&data[offset]) {
                offset += 1;
                continue;
            }
            let len = data[offset..]
                .iter()
                .position(|b| STREAM_SEPARATORS.contains(b))
                .unwrap_or(data.len() - offset);
            let token = &data[offset..offset + len];
            let hex_tail = has_hex_suffix(&data[offset..data_end]);
            let value = std::str::from_utf8(token)
                .ok()
                .and_then(|t| parse_number(t, hex_tail))
                .ok_or(MaintError::Syntax {
                    position: Position::at_line(line_no, indent + offset + 1),
                })?;
            self.push(out, value)?;
            offset += len;
        }

        Ok(())
    }

    fn push(&self, out: &mut Vec<u64>, value: u64) -> Result<(), MaintError> {
        if out.len() >= self.max_capacity {
            return Err(MaintError::CapacityExceeded {
                capacity: self.max_capacity,
            });
        }
        out.push(value);
        Ok(())
    }
}

/// Parse one numeric token.
///
/// A `0x`/`0X` prefix or `h`/`H` suffix means hex. `hex_tail` is set when the
/// remaining input from this token onward ends in `h`/`H`, which makes a bare
/// token hex as well. Anything else is decimal.
pub fn parse_number(token: &str, hex_tail: bool) -> Option<u64> {
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        parse_hex_digits(hex)
    } else if let Some(hex) = token.strip_suffix(['h', 'H']) {
        parse_hex_digits(hex)
    } else if hex_tail {
        parse_hex_digits(token)
    } else if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        token.parse().ok()
    } else {
        None
    }
}

fn parse_hex_digits(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

fn has_hex_suffix(rest: &[u8]) -> bool {
    matches!(rest.last(), Some(b'h' | b'H'))
}

fn is_inline_char(b: u8) -> bool {
    b.is_ascii_hexdigit() || matches!(b, b'h' | b'H' | b'x' | b'X' | b',')
}

fn is_stream_char(b: u8) -> bool {
    is_inline_char(b) || b == b' ' || b == b'\t'
}
