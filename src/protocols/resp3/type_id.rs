//! RESP3 type identifiers (the leading byte of every encoding).

use super::error::ErrorKind;
use std::fmt;

/// One of the fifteen RESP3 wire types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeId {
    /// `_\r\n`
    Null,
    /// `#t\r\n` or `#f\r\n`
    Boolean,
    /// `$5\r\nhello\r\n`
    BlobString,
    /// `!21\r\nSYNTAX invalid syntax\r\n`
    BlobError,
    /// `=15\r\ntxt:Some string\r\n`
    VerbatimString,
    /// `+OK\r\n`
    SimpleString,
    /// `-ERR message\r\n`
    SimpleError,
    /// `:1000\r\n`
    Integer,
    /// `,1.23\r\n`
    Double,
    /// `(3492890328409238509324850943850943825024385\r\n`
    BigNumber,
    /// `*2\r\n...`
    Array,
    /// `~2\r\n...`
    Set,
    /// `>2\r\n...`
    Push,
    /// `%1\r\n...` (two elements per entry)
    Map,
    /// `|1\r\n...` (two elements per entry)
    Attribute,
}

impl TypeId {
    /// Decode a leading byte.
    pub fn from_byte(byte: u8) -> Result<TypeId, ErrorKind> {
        let id = match byte {
            b'_' => TypeId::Null,
            b'#' => TypeId::Boolean,
            b'$' => TypeId::BlobString,
            b'!' => TypeId::BlobError,
            b'=' => TypeId::VerbatimString,
            b'+' => TypeId::SimpleString,
            b'-' => TypeId::SimpleError,
            b':' => TypeId::Integer,
            b',' => TypeId::Double,
            b'(' => TypeId::BigNumber,
            b'*' => TypeId::Array,
            b'~' => TypeId::Set,
            b'>' => TypeId::Push,
            b'%' => TypeId::Map,
            b'|' => TypeId::Attribute,
            _ => return Err(ErrorKind::InvalidLeadingByte),
        };
        Ok(id)
    }

    /// Look at the first byte of `buf` without consuming it.
    ///
    /// Returns `Ok(None)` when `buf` is empty.
    pub fn peek(buf: &[u8]) -> Result<Option<TypeId>, ErrorKind> {
        match buf.first() {
            Some(&byte) => TypeId::from_byte(byte).map(Some),
            None => Ok(None),
        }
    }

    /// Read the leading byte of a span that has already been validated.
    pub(crate) fn read_validated(buf: &[u8]) -> TypeId {
        match buf.first().map(|&b| TypeId::from_byte(b)) {
            Some(Ok(id)) => id,
            _ => unreachable!("validated span starts with a known type identifier"),
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            TypeId::Null => b'_',
            TypeId::Boolean => b'#',
            TypeId::BlobString => b'$',
            TypeId::BlobError => b'!',
            TypeId::VerbatimString => b'=',
            TypeId::SimpleString => b'+',
            TypeId::SimpleError => b'-',
            TypeId::Integer => b':',
            TypeId::Double => b',',
            TypeId::BigNumber => b'(',
            TypeId::Array => b'*',
            TypeId::Set => b'~',
            TypeId::Push => b'>',
            TypeId::Map => b'%',
            TypeId::Attribute => b'|',
        }
    }

    /// Whether the encoding carries a count of nested child tokens.
    pub fn is_aggregate(&self) -> bool {
        self.multiplier().is_some()
    }

    /// Child tokens per declared count unit, for aggregates.
    pub fn multiplier(&self) -> Option<usize> {
        match self {
            TypeId::Array | TypeId::Set | TypeId::Push => Some(1),
            TypeId::Map | TypeId::Attribute => Some(2),
            _ => None,
        }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeId::Null => "null",
            TypeId::Boolean => "boolean",
            TypeId::BlobString => "blob-string",
            TypeId::BlobError => "blob-error",
            TypeId::VerbatimString => "verbatim-string",
            TypeId::SimpleString => "simple-string",
            TypeId::SimpleError => "simple-error",
            TypeId::Integer => "integer",
            TypeId::Double => "double",
            TypeId::BigNumber => "big-number",
            TypeId::Array => "array",
            TypeId::Set => "set",
            TypeId::Push => "push",
            TypeId::Map => "map",
            TypeId::Attribute => "attribute",
        };
        f.write_str(name)
    }
}
