//! Validated RESP3 tokens.

use super::error::ParseError;
use super::type_id::TypeId;
use super::validate::{validate, MAX_DEPTH};
use super::value::Value;
use bytes::Bytes;

/// One complete, well-formed RESP3 encoding.
///
/// A token is a reference-counted slice of the buffer it was decoded from,
/// spanning exactly the bytes of its encoding. It can only be obtained by
/// successful validation, and equality and hashing follow the encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    bytes: Bytes,
}

impl Token {
    /// Decode the token at the front of `buf`.
    ///
    /// On success the token's bytes are split off the front of `buf`.
    /// `Ok(None)` means `buf` does not yet hold a complete token; `buf` is
    /// left untouched in that case and on error.
    pub fn decode(buf: &mut Bytes) -> Result<Option<Token>, ParseError> {
        Token::decode_with_max_depth(buf, MAX_DEPTH)
    }

    /// Like [`Token::decode`] with a custom aggregate nesting limit.
    pub fn decode_with_max_depth(
        buf: &mut Bytes,
        max_depth: usize,
    ) -> Result<Option<Token>, ParseError> {
        match validate(buf, 0, max_depth) {
            Ok(Some(len)) => Ok(Some(Token {
                bytes: buf.split_to(len),
            })),
            Ok(None) => Ok(None),
            Err(err) => Err(err.with_buffer(buf.clone())),
        }
    }

    /// Wrap bytes already known to be exactly one valid encoding.
    pub(crate) fn from_validated(bytes: Bytes) -> Token {
        Token { bytes }
    }

    /// Split the next child off an already validated aggregate body.
    pub(crate) fn next_validated(buf: &mut Bytes) -> Token {
        match validate(buf, 0, usize::MAX) {
            Ok(Some(len)) => Token {
                bytes: buf.split_to(len),
            },
            _ => unreachable!("aggregate children are validated with their parent"),
        }
    }

    pub fn type_id(&self) -> TypeId {
        TypeId::read_validated(&self.bytes)
    }

    /// The raw encoding, including type identifier and terminators.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Materialize the typed value.
    ///
    /// Aggregates come back as lazy views over this token's bytes; nothing
    /// is copied and children are only validated again when iterated.
    pub fn value(&self) -> Value {
        Value::materialize(&self.bytes)
    }
}

impl AsRef<[u8]> for Token {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::resp3::ErrorKind;
    use std::collections::HashSet;

    fn decode(input: &'static [u8]) -> Token {
        let mut buf = Bytes::from_static(input);
        let token = Token::decode(&mut buf).unwrap().unwrap();
        assert!(buf.is_empty());
        token
    }

    #[test]
    fn test_decode_splits_front() {
        let mut buf = Bytes::from_static(b"+OK\r\n:1\r\n");
        let first = Token::decode(&mut buf).unwrap().unwrap();
        assert_eq!(first.as_bytes(), b"+OK\r\n");
        assert_eq!(&buf[..], b":1\r\n");

        let second = Token::decode(&mut buf).unwrap().unwrap();
        assert_eq!(second.type_id(), TypeId::Integer);
        assert!(buf.is_empty());
        assert_eq!(Token::decode(&mut buf), Ok(None));
    }

    #[test]
    fn test_incomplete_leaves_buffer() {
        let mut buf = Bytes::from_static(b"$5\r\nhel");
        assert_eq!(Token::decode(&mut buf), Ok(None));
        assert_eq!(&buf[..], b"$5\r\nhel");
    }

    #[test]
    fn test_error_leaves_buffer() {
        let mut buf = Bytes::from_static(b"#x\r\n");
        let err = Token::decode(&mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(&buf[..], b"#x\r\n");
    }

    #[test]
    fn test_unknown_tag_consumes_nothing() {
        let mut buf = Bytes::from_static(b"@what\r\n");
        let err = Token::decode(&mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidLeadingByte);
        assert_eq!(err.offset(), 0);
        assert_eq!(buf.len(), 7);
    }

    #[test]
    fn test_nested_error_reports_top_level_buffer() {
        let mut buf = Bytes::from_static(b"*2\r\n:1\r\n~1\r\n:x\r\n");
        let err = Token::decode(&mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CanNotParseInteger);
        assert_eq!(err.buffer(), &Bytes::from_static(b"*2\r\n:1\r\n~1\r\n:x\r\n"));
        assert_eq!(err.offset(), 12);
    }

    #[test]
    fn test_token_shares_backing_storage() {
        let backing = Bytes::from(b"$5\r\nhello\r\n".to_vec());
        let mut buf = backing.clone();
        let token = Token::decode(&mut buf).unwrap().unwrap();
        assert_eq!(token.as_bytes().as_ptr(), backing.as_ptr());
    }

    #[test]
    fn test_equality_by_content() {
        let a = decode(b"*2\r\n:1\r\n:2\r\n");
        let b = decode(b"*2\r\n:1\r\n:2\r\n");
        let c = decode(b"*2\r\n:1\r\n:3\r\n");
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Token> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_custom_depth() {
        let mut buf = Bytes::from_static(b"*1\r\n*1\r\n:1\r\n");
        let err = Token::decode_with_max_depth(&mut buf, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooDeeplyNestedAggregatedTypes);
        assert_eq!(err.offset(), 4);
        assert!(Token::decode_with_max_depth(&mut buf, 3).unwrap().is_some());
    }

    #[test]
    fn test_tokens_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Token>();
        assert_send_sync::<Value>();
    }
}
