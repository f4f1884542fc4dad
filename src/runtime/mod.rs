//! Read-loop plumbing around the RESP3 decoder.
//!
//! - `InboundBuffer`: accumulates deliveries and hands out zero-copy slices
//! - `TokenDecoder`: retries token validation as bytes arrive
//! - `TokenReader`: async adapter over any `AsyncRead` source

mod buffer;
mod decoder;
mod stream;

pub use buffer::{BufferFull, InboundBuffer};
pub use decoder::{DecodeResult, TokenDecoder};
pub use stream::{StreamError, TokenReader};
