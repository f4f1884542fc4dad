//! Inbound byte accumulation.
//!
//! Network reads deliver bytes in arbitrary chunks. `InboundBuffer` collects
//! them until a complete token can be split off the front. Split tokens are
//! frozen into reference-counted `Bytes` that keep sharing the allocation
//! they were read into; nothing is copied on the way out.

use bytes::{Bytes, BytesMut};
use std::fmt;

/// Error returned when a delivery would grow the buffer past its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferFull {
    /// Bytes that would have been buffered.
    pub requested: usize,
    /// Configured limit.
    pub limit: usize,
}

impl fmt::Display for BufferFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inbound buffer limit exceeded: {} bytes requested, limit is {}",
            self.requested, self.limit
        )
    }
}

impl std::error::Error for BufferFull {}

/// Accumulates inbound bytes for incremental decoding.
///
/// The front of the buffer is always the start of the next undecoded token.
#[derive(Debug)]
pub struct InboundBuffer {
    data: BytesMut,
    max_size: usize,
}

impl InboundBuffer {
    /// Create an empty buffer that refuses to hold more than `max_size` bytes.
    pub fn new(max_size: usize) -> Self {
        Self {
            data: BytesMut::new(),
            max_size,
        }
    }

    /// Append a delivery.
    ///
    /// Leaves the buffer unchanged if the limit would be exceeded.
    pub fn extend(&mut self, chunk: &[u8]) -> Result<(), BufferFull> {
        let requested = self.data.len() + chunk.len();
        if requested > self.max_size {
            return Err(BufferFull {
                requested,
                limit: self.max_size,
            });
        }
        self.data.extend_from_slice(chunk);
        Ok(())
    }

    /// Inspect the byte at `offset` without consuming anything.
    pub fn peek(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    /// Unconsumed bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Number of unconsumed bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume the first `len` bytes.
    ///
    /// # Panics
    /// Panics if `len` exceeds [`InboundBuffer::len`].
    pub fn split_to(&mut self, len: usize) -> Bytes {
        self.data.split_to(len).freeze()
    }

    /// Drop everything buffered.
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_buffer_basic() {
        let mut buf = InboundBuffer::new(1024);
        assert!(buf.is_empty());

        buf.extend(b"+OK\r\n").unwrap();
        buf.extend(b":1\r\n").unwrap();

        assert_eq!(buf.len(), 9);
        assert_eq!(buf.peek(0), Some(b'+'));
        assert_eq!(buf.peek(5), Some(b':'));
        assert_eq!(buf.peek(9), None);

        let first = buf.split_to(5);
        assert_eq!(&first[..], b"+OK\r\n");
        assert_eq!(buf.as_slice(), b":1\r\n");
    }

    #[test]
    fn test_inbound_buffer_limit() {
        let mut buf = InboundBuffer::new(8);
        buf.extend(b"$3\r\n").unwrap();

        let err = buf.extend(b"foo\r\n").unwrap_err();
        assert_eq!(
            err,
            BufferFull {
                requested: 9,
                limit: 8
            }
        );
        // Nothing was appended
        assert_eq!(buf.as_slice(), b"$3\r\n");
    }

    #[test]
    fn test_split_is_zero_copy() {
        let mut buf = InboundBuffer::new(1024);
        buf.extend(b"$5\r\nhello\r\n+next").unwrap();
        let start = buf.as_slice().as_ptr();

        let token = buf.split_to(11);
        assert_eq!(token.as_ptr(), start);
        assert_eq!(buf.as_slice(), b"+next");
    }

    #[test]
    fn test_clear() {
        let mut buf = InboundBuffer::new(1024);
        buf.extend(b"#x\r\n").unwrap();

        buf.clear();

        assert!(buf.is_empty());
        assert_eq!(buf.peek(0), None);
    }
}
