//! Incremental token decoding over an accumulating buffer.
//!
//! The read loop owning a connection feeds each delivery into a
//! [`TokenDecoder`] and then calls [`TokenDecoder::decode`] until it asks for
//! more data. Each attempt revalidates from the front of the buffer; bytes
//! are only consumed once a complete token has been produced.

use super::buffer::{BufferFull, InboundBuffer};
use crate::config::DecoderConfig;
use crate::protocols::resp3::validate::validate;
use crate::protocols::resp3::{ParseError, Token};
use tracing::{debug, trace, warn};

/// Result of one decode attempt.
#[derive(Debug)]
pub enum DecodeResult {
    /// A complete token was split off the buffer.
    Token(Token),
    /// The buffer does not hold a complete token yet.
    NeedData,
    /// Protocol error; the buffer is left as it was and should be dropped
    /// together with the connection.
    Error(ParseError),
}

/// Synchronous RESP3 decoder for one inbound byte stream.
///
/// A decoder must be driven by a single reader. The tokens it produces are
/// immutable and can be shared freely.
#[derive(Debug)]
pub struct TokenDecoder {
    buffer: InboundBuffer,
    max_depth: usize,
}

impl TokenDecoder {
    pub fn new(config: &DecoderConfig) -> Self {
        Self {
            buffer: InboundBuffer::new(config.max_buffer_size),
            max_depth: config.max_depth,
        }
    }

    /// Append a delivery of bytes read from the peer.
    pub fn feed(&mut self, data: &[u8]) -> Result<(), BufferFull> {
        self.buffer.extend(data).inspect_err(|err| {
            warn!(
                requested = err.requested,
                limit = err.limit,
                "Inbound buffer limit exceeded"
            );
        })
    }

    /// Try to decode the next token from the buffered bytes.
    pub fn decode(&mut self) -> DecodeResult {
        match validate(self.buffer.as_slice(), 0, self.max_depth) {
            Ok(Some(len)) => {
                let token = Token::from_validated(self.buffer.split_to(len));
                debug!(
                    len,
                    type_id = %token.type_id(),
                    remaining = self.buffer.len(),
                    "Token decoded"
                );
                DecodeResult::Token(token)
            }
            Ok(None) => {
                trace!(buffered = self.buffer.len(), "Need more data");
                DecodeResult::NeedData
            }
            Err(err) => {
                let err = err.with_window(self.buffer.as_slice());
                warn!(kind = ?err.kind(), offset = err.offset(), "RESP3 protocol error");
                DecodeResult::Error(err)
            }
        }
    }

    /// Decode every complete token currently buffered.
    ///
    /// Stops at the first error; tokens decoded before it are still returned
    /// through `out`.
    pub fn decode_all(&mut self, out: &mut Vec<Token>) -> Result<(), ParseError> {
        loop {
            match self.decode() {
                DecodeResult::Token(token) => out.push(token),
                DecodeResult::NeedData => return Ok(()),
                DecodeResult::Error(err) => return Err(err),
            }
        }
    }

    /// Bytes received but not yet decoded.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// First undecoded byte, if any.
    pub fn peek(&self) -> Option<u8> {
        self.buffer.peek(0)
    }

    /// Discard buffered bytes, e.g. after a protocol error.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

impl Default for TokenDecoder {
    fn default() -> Self {
        Self::new(&DecoderConfig::default())
    }
}
