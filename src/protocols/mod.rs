//! Protocol implementations.
//!
//! - `resp3`: Redis RESP3 token validation and value decoding

pub mod resp3;
