//! RESP3 (Redis Serialization Protocol v3) token decoding.
//!
//! Decoding happens in two phases:
//!
//! 1. [`Token::decode`] locates and validates the exact byte span of the next
//!    complete encoding, or reports that more bytes are needed.
//! 2. [`Token::value`] turns a token into a typed [`Value`] on demand.
//!    Aggregates become [`List`] / [`PairList`] views whose children are
//!    only split off when iterated.
//!
//! All tokens, values and views share the decoded [`bytes::Bytes`] storage.
//!
//! ## Wire Format
//!
//! ```text
//! _\r\n                      null
//! #t\r\n                     boolean
//! $5\r\nhello\r\n            blob string      (! blob error, = verbatim)
//! +OK\r\n                    simple string    (- simple error)
//! :1000\r\n                  integer
//! ,3.14\r\n                  double
//! (12345678901234567890\r\n  big number
//! *2\r\n:1\r\n:2\r\n         array            (~ set, > push)
//! %1\r\n+key\r\n:42\r\n      map              (| attribute)
//! ```

pub mod aggregate;
pub mod error;
pub mod line;
pub mod token;
pub mod type_id;
pub mod validate;
pub mod value;

pub use aggregate::{List, ListIter, PairIter, PairList};
pub use error::{ErrorKind, ParseError};
pub use token::Token;
pub use type_id::TypeId;
pub use validate::MAX_DEPTH;
pub use value::{Value, Verbatim};
