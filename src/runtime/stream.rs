//! Async token reader over any byte source.
//!
//! Reads chunks from an [`AsyncRead`] into a [`TokenDecoder`] until a whole
//! token is available. Cancellation is left to the caller: dropping the
//! future between reads discards nothing that was already buffered.

use super::buffer::BufferFull;
use super::decoder::{DecodeResult, TokenDecoder};
use crate::config::DecoderConfig;
use crate::protocols::resp3::{ParseError, Token};
use std::fmt;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

/// Errors produced while reading tokens from a stream.
#[derive(Debug)]
pub enum StreamError {
    /// Reading from the source failed.
    Io(io::Error),
    /// The peer sent malformed RESP3.
    Protocol(ParseError),
    /// A token grew past the buffer limit before completing.
    BufferFull(BufferFull),
    /// The source ended in the middle of a token.
    Truncated { buffered: usize },
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Io(e) => write!(f, "I/O error: {e}"),
            StreamError::Protocol(e) => write!(f, "{e}"),
            StreamError::BufferFull(e) => write!(f, "{e}"),
            StreamError::Truncated { buffered } => {
                write!(f, "stream ended with {buffered} bytes of an incomplete token")
            }
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Io(e) => Some(e),
            StreamError::Protocol(e) => Some(e),
            StreamError::BufferFull(e) => Some(e),
            StreamError::Truncated { .. } => None,
        }
    }
}

impl From<io::Error> for StreamError {
    fn from(e: io::Error) -> Self {
        StreamError::Io(e)
    }
}

impl From<ParseError> for StreamError {
    fn from(e: ParseError) -> Self {
        StreamError::Protocol(e)
    }
}

impl From<BufferFull> for StreamError {
    fn from(e: BufferFull) -> Self {
        StreamError::BufferFull(e)
    }
}

/// Reads RESP3 tokens from an async byte source.
#[derive(Debug)]
pub struct TokenReader<R> {
    reader: R,
    decoder: TokenDecoder,
    chunk: Vec<u8>,
}

impl<R: AsyncRead + Unpin> TokenReader<R> {
    pub fn new(reader: R, config: &DecoderConfig) -> Self {
        Self {
            reader,
            decoder: TokenDecoder::new(config),
            chunk: vec![0u8; config.chunk_size.max(1)],
        }
    }

    /// Read the next token.
    ///
    /// Returns `Ok(None)` once the source ends cleanly between tokens.
    pub async fn read_token(&mut self) -> Result<Option<Token>, StreamError> {
        loop {
            match self.decoder.decode() {
                DecodeResult::Token(token) => return Ok(Some(token)),
                DecodeResult::Error(err) => return Err(err.into()),
                DecodeResult::NeedData => {}
            }

            let n = self.reader.read(&mut self.chunk).await?;
            if n == 0 {
                if self.decoder.is_empty() {
                    debug!("Stream closed");
                    return Ok(None);
                }
                return Err(StreamError::Truncated {
                    buffered: self.decoder.buffered(),
                });
            }

            self.decoder.feed(&self.chunk[..n])?;
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
