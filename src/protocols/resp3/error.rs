//! RESP3 parsing errors.
//!
//! Running out of bytes is not an error: validators report it as `Ok(None)`
//! so the caller can retry once more data has arrived. Everything here is
//! fatal to the current decode attempt.

use bytes::Bytes;
use std::fmt;

/// Kind of protocol violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Leading byte is not one of the fifteen RESP3 type identifiers.
    InvalidLeadingByte,
    /// Wrong terminator bytes, bad boolean marker or malformed null.
    InvalidData,
    /// Length, count or integer text is not a signed 64-bit integer.
    CanNotParseInteger,
    /// Double text is not a floating point number.
    CanNotParseDouble,
    /// Big number text is not an optionally negative run of digits.
    CanNotParseBigNumber,
    /// Verbatim string payload has no `:` after its format tag.
    MissingColonInVerbatimString,
    /// Aggregate nesting reached the depth limit.
    TooDeeplyNestedAggregatedTypes,
    /// Blob length or aggregate count is negative.
    NegativeLength,
}

impl ErrorKind {
    fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidLeadingByte => "invalid leading byte",
            ErrorKind::InvalidData => "invalid data",
            ErrorKind::CanNotParseInteger => "can not parse integer",
            ErrorKind::CanNotParseDouble => "can not parse double",
            ErrorKind::CanNotParseBigNumber => "can not parse big number",
            ErrorKind::MissingColonInVerbatimString => "missing colon in verbatim string",
            ErrorKind::TooDeeplyNestedAggregatedTypes => "too deeply nested aggregated types",
            ErrorKind::NegativeLength => "negative length",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure located inside a validation run.
///
/// `offset` is where the offending element starts, counted from the first
/// byte handed to the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanError {
    pub(crate) kind: ErrorKind,
    pub(crate) offset: usize,
}

impl ScanError {
    pub(crate) fn new(kind: ErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// Attach the top-level buffer the run was started on.
    pub(crate) fn with_buffer(self, buffer: Bytes) -> ParseError {
        ParseError {
            kind: self.kind,
            offset: self.offset,
            buffer,
            buffer_offset: 0,
        }
    }

    /// Attach a copy of the bytes around the failure only.
    ///
    /// Used where the top-level buffer is mutable and may be large; at most
    /// `2 * CONTEXT_BYTES` bytes are copied.
    pub(crate) fn with_window(self, buffer: &[u8]) -> ParseError {
        let end = (self.offset + CONTEXT_BYTES).min(buffer.len());
        let start = self.offset.saturating_sub(CONTEXT_BYTES).min(end);
        ParseError {
            kind: self.kind,
            offset: self.offset,
            buffer: Bytes::copy_from_slice(&buffer[start..end]),
            buffer_offset: start,
        }
    }
}

/// A RESP3 protocol error.
///
/// `buffer` holds bytes of the top-level decode attempt, even when the
/// failure sits deep inside a nested aggregate. [`Token::decode`] attaches
/// the whole readable buffer; the runtime decoder attaches a short window
/// around the failure, starting at [`ParseError::buffer_offset`].
///
/// [`Token::decode`]: super::Token::decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ErrorKind,
    offset: usize,
    buffer: Bytes,
    buffer_offset: usize,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Offset of the offending element from the start of the top-level
    /// attempt.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn buffer(&self) -> &Bytes {
        &self.buffer
    }

    /// Position of `buffer()[0]` within the top-level attempt.
    pub fn buffer_offset(&self) -> usize {
        self.buffer_offset
    }
}

/// Bytes of context kept on each side of the failure offset.
const CONTEXT_BYTES: usize = 16;

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self
            .offset
            .saturating_sub(self.buffer_offset)
            .min(self.buffer.len());
        let end = (start + CONTEXT_BYTES).min(self.buffer.len());
        write!(
            f,
            "RESP3 {} at offset {} near {:?}",
            self.kind,
            self.offset,
            String::from_utf8_lossy(&self.buffer[start..end])
        )
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err = ScanError::new(ErrorKind::InvalidData, 4)
            .with_buffer(Bytes::from_static(b"*1\r\n#x\r\n"));
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(err.offset(), 4);
        assert_eq!(
            err.to_string(),
            "RESP3 invalid data at offset 4 near \"#x\\r\\n\""
        );
    }

    #[test]
    fn test_display_offset_past_end() {
        let err = ScanError::new(ErrorKind::InvalidLeadingByte, 10)
            .with_buffer(Bytes::from_static(b"?"));
        assert_eq!(
            err.to_string(),
            "RESP3 invalid leading byte at offset 10 near \"\""
        );
    }

    #[test]
    fn test_window_is_bounded() {
        let mut input = vec![b'x'; 1000];
        input.extend_from_slice(b"#x\r\n");
        let err = ScanError::new(ErrorKind::InvalidData, 1000).with_window(&input);

        assert_eq!(err.offset(), 1000);
        assert_eq!(err.buffer_offset(), 984);
        assert_eq!(err.buffer().len(), 20);
        assert_eq!(
            err.to_string(),
            "RESP3 invalid data at offset 1000 near \"#x\\r\\n\""
        );
    }

    #[test]
    fn test_window_at_start() {
        let err = ScanError::new(ErrorKind::InvalidLeadingByte, 0).with_window(b"?abc");
        assert_eq!(err.buffer_offset(), 0);
        assert_eq!(err.buffer(), &Bytes::from_static(b"?abc"));
    }
}
