//! resp3-token: incremental, zero-copy RESP3 decoding.
//!
//! Bytes arrive from the network in arbitrary chunks. The decoder tells
//! "not enough bytes yet" apart from malformed data without blocking, and
//! hands out validated [`Token`]s that share the inbound buffer's storage.
//!
//! ```
//! use bytes::Bytes;
//! use resp3_token::{Token, Value};
//!
//! let mut buf = Bytes::from_static(b"%1\r\n+key\r\n:42\r\n");
//! let token = Token::decode(&mut buf).unwrap().unwrap();
//!
//! let Value::Map(map) = token.value() else { unreachable!() };
//! let (key, value) = map.iter().next().unwrap();
//! assert_eq!(key.value().as_bytes().unwrap(), "key");
//! assert_eq!(value.value().as_i64(), Some(42));
//! ```

pub mod config;
pub mod protocols;
pub mod runtime;

pub use protocols::resp3::{
    ErrorKind, List, PairList, ParseError, Token, TypeId, Value, Verbatim, MAX_DEPTH,
};
