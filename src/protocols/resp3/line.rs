//! CRLF line scanning.

use super::error::ErrorKind;
use std::ops::Range;

/// A CRLF-terminated line found in a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Offset of the carriage return.
    pub cr: usize,
    /// Bytes between the scan start and the carriage return.
    pub payload: Range<usize>,
}

impl Line {
    /// Offset just past the line feed.
    pub fn end(&self) -> usize {
        self.cr + 2
    }
}

/// Find the line starting at `start`.
///
/// The first carriage return ends the line and must be followed by a line
/// feed. `Ok(None)` means no complete terminator is available yet.
pub fn scan_line(buf: &[u8], start: usize) -> Result<Option<Line>, ErrorKind> {
    let rest = match buf.get(start..) {
        Some(rest) => rest,
        None => return Ok(None),
    };

    let cr = match rest.iter().position(|&b| b == b'\r') {
        Some(pos) => start + pos,
        None => return Ok(None),
    };

    match buf.get(cr + 1) {
        None => Ok(None),
        Some(b'\n') => Ok(Some(Line {
            cr,
            payload: start..cr,
        })),
        Some(_) => Err(ErrorKind::InvalidData),
    }
}

/// Parse a line payload as a signed 64-bit decimal.
pub(crate) fn parse_i64(text: &[u8]) -> Option<i64> {
    std::str::from_utf8(text).ok()?.parse().ok()
}

/// Parse a line payload as a floating point number.
pub(crate) fn parse_f64(text: &[u8]) -> Option<f64> {
    std::str::from_utf8(text).ok()?.parse().ok()
}

/// Big numbers are an optional `-` followed by at least one ASCII digit.
pub(crate) fn is_big_number(text: &[u8]) -> bool {
    let digits = text.strip_prefix(b"-").unwrap_or(text);
    !digits.is_empty() && digits.iter().all(u8::is_ascii_digit)
}
