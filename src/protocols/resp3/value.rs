//! Typed RESP3 values.

use super::aggregate::{List, ListIter, PairList};
use super::line::{parse_f64, parse_i64};
use super::type_id::TypeId;
use bytes::Bytes;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

/// A decoded RESP3 value.
///
/// String-like variants are zero-copy slices of the token they came from.
/// Aggregates are lazy views; see [`List`] and [`PairList`].
///
/// Equality and hashing compare doubles by bit pattern, so `NaN` equals
/// itself and `0.0` differs from `-0.0`. This keeps `Value` usable as a set
/// or map key.
#[derive(Debug, Clone)]
pub enum Value {
    SimpleString(Bytes),
    SimpleError(Bytes),
    BlobString(Bytes),
    BlobError(Bytes),
    VerbatimString(Verbatim),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Null,
    /// Decimal digits, optionally with a leading `-`, never narrowed to a
    /// fixed-width integer.
    BigNumber(Bytes),
    Array(List),
    Set(List),
    Push(List),
    Map(PairList),
    Attribute(PairList),
}

/// Verbatim string payload: a three byte format tag, `:`, then the text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Verbatim {
    payload: Bytes,
}

impl Verbatim {
    /// Format tag such as `txt` or `mkd`.
    pub fn format(&self) -> &[u8] {
        &self.payload[..3]
    }

    pub fn text(&self) -> Bytes {
        self.payload.slice(4..)
    }

    /// The full payload, format tag included.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }
}

impl Value {
    /// Build a value from the bytes of a validated token.
    pub(crate) fn materialize(bytes: &Bytes) -> Value {
        let id = TypeId::read_validated(bytes);
        let end = bytes.len() - 2;

        match id {
            TypeId::Null => Value::Null,
            TypeId::Boolean => Value::Boolean(bytes[1] == b't'),
            TypeId::SimpleString => Value::SimpleString(bytes.slice(1..end)),
            TypeId::SimpleError => Value::SimpleError(bytes.slice(1..end)),
            TypeId::BlobString => Value::BlobString(bytes.slice(header_end(bytes)..end)),
            TypeId::BlobError => Value::BlobError(bytes.slice(header_end(bytes)..end)),
            TypeId::VerbatimString => Value::VerbatimString(Verbatim {
                payload: bytes.slice(header_end(bytes)..end),
            }),
            TypeId::Integer => Value::Integer(validated(parse_i64(&bytes[1..end]))),
            TypeId::Double => Value::Double(validated(parse_f64(&bytes[1..end]))),
            TypeId::BigNumber => Value::BigNumber(bytes.slice(1..end)),
            TypeId::Array => Value::Array(list(bytes)),
            TypeId::Set => Value::Set(list(bytes)),
            TypeId::Push => Value::Push(list(bytes)),
            TypeId::Map => Value::Map(pair_list(bytes)),
            TypeId::Attribute => Value::Attribute(pair_list(bytes)),
        }
    }

    pub fn type_id(&self) -> TypeId {
        match self {
            Value::SimpleString(_) => TypeId::SimpleString,
            Value::SimpleError(_) => TypeId::SimpleError,
            Value::BlobString(_) => TypeId::BlobString,
            Value::BlobError(_) => TypeId::BlobError,
            Value::VerbatimString(_) => TypeId::VerbatimString,
            Value::Integer(_) => TypeId::Integer,
            Value::Double(_) => TypeId::Double,
            Value::Boolean(_) => TypeId::Boolean,
            Value::Null => TypeId::Null,
            Value::BigNumber(_) => TypeId::BigNumber,
            Value::Array(_) => TypeId::Array,
            Value::Set(_) => TypeId::Set,
            Value::Push(_) => TypeId::Push,
            Value::Map(_) => TypeId::Map,
            Value::Attribute(_) => TypeId::Attribute,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::SimpleError(_) | Value::BlobError(_))
    }

    /// Payload of any string-like value, errors included. Verbatim strings
    /// yield their text without the format tag.
    pub fn as_bytes(&self) -> Option<Bytes> {
        match self {
            Value::SimpleString(b)
            | Value::SimpleError(b)
            | Value::BlobString(b)
            | Value::BlobError(b)
            | Value::BigNumber(b) => Some(b.clone()),
            Value::VerbatimString(v) => Some(v.text()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Elements of an array, set or push.
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::Array(list) | Value::Set(list) | Value::Push(list) => Some(list),
            _ => None,
        }
    }

    /// Entries of a map or attribute.
    pub fn as_pairs(&self) -> Option<&PairList> {
        match self {
            Value::Map(pairs) | Value::Attribute(pairs) => Some(pairs),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::SimpleString(a), Value::SimpleString(b))
            | (Value::SimpleError(a), Value::SimpleError(b))
            | (Value::BlobString(a), Value::BlobString(b))
            | (Value::BlobError(a), Value::BlobError(b))
            | (Value::BigNumber(a), Value::BigNumber(b)) => a == b,
            (Value::VerbatimString(a), Value::VerbatimString(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b))
            | (Value::Set(a), Value::Set(b))
            | (Value::Push(a), Value::Push(b)) => a == b,
            (Value::Map(a), Value::Map(b)) | (Value::Attribute(a), Value::Attribute(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Value::SimpleString(b)
            | Value::SimpleError(b)
            | Value::BlobString(b)
            | Value::BlobError(b)
            | Value::BigNumber(b) => b.hash(state),
            Value::VerbatimString(v) => v.hash(state),
            Value::Integer(n) => n.hash(state),
            Value::Double(n) => n.to_bits().hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::Null => {}
            Value::Array(list) | Value::Set(list) | Value::Push(list) => list.hash(state),
            Value::Map(pairs) | Value::Attribute(pairs) => pairs.hash(state),
        }
    }
}

/// Offset just past the first line (length or count header).
fn header_end(bytes: &[u8]) -> usize {
    match bytes.iter().position(|&b| b == b'\r') {
        Some(cr) => cr + 2,
        None => unreachable!("validated span has a header line"),
    }
}

/// Declared count of a validated aggregate.
fn count(bytes: &[u8]) -> usize {
    let text = &bytes[1..header_end(bytes) - 2];
    validated(parse_i64(text).and_then(|n| usize::try_from(n).ok()))
}

fn list(bytes: &Bytes) -> List {
    List::new(count(bytes), bytes.slice(header_end(bytes)..))
}

fn pair_list(bytes: &Bytes) -> PairList {
    PairList::new(count(bytes), bytes.slice(header_end(bytes)..))
}

fn validated<T>(parsed: Option<T>) -> T {
    match parsed {
        Some(value) => value,
        None => unreachable!("token text was checked during validation"),
    }
}

impl fmt::Display for Value {
    /// Renders redis-cli style. Nested aggregates are walked with an explicit
    /// stack of open frames, so any token that validated can be printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack: Vec<Frame> = Vec::new();
        if let Some(frame) = open(f, self)? {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            let Some(token) = frame.items.next() else {
                f.write_str(if frame.pairs { "}" } else { "]" })?;
                stack.pop();
                continue;
            };
            if frame.index > 0 {
                // Keys and values alternate in a pair frame
                f.write_str(if frame.pairs && frame.index % 2 == 1 { ": " } else { ", " })?;
            }
            frame.index += 1;

            if let Some(child) = open(f, &token.value())? {
                stack.push(child);
            }
        }
        Ok(())
    }
}

/// An aggregate whose opening bracket has been written.
struct Frame {
    items: ListIter,
    index: usize,
    pairs: bool,
}

/// Write a scalar in full, or the opening of an aggregate.
fn open(f: &mut fmt::Formatter<'_>, value: &Value) -> Result<Option<Frame>, fmt::Error> {
    let (prefix, list, pairs) = match value {
        Value::Array(list) => ("[", list, false),
        Value::Set(list) => ("~[", list, false),
        Value::Push(list) => (">[", list, false),
        Value::Map(map) => ("{", map.elements(), true),
        Value::Attribute(map) => ("|{", map.elements(), true),
        scalar => {
            write_scalar(f, scalar)?;
            return Ok(None);
        }
    };
    f.write_str(prefix)?;
    Ok(Some(Frame {
        items: list.iter(),
        index: 0,
        pairs,
    }))
}

fn write_scalar(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::SimpleString(s) => write!(f, "{}", String::from_utf8_lossy(s)),
        Value::SimpleError(s) | Value::BlobError(s) => {
            write!(f, "(error) {}", String::from_utf8_lossy(s))
        }
        Value::BlobString(s) => write!(f, "{:?}", String::from_utf8_lossy(s)),
        Value::VerbatimString(v) => write!(f, "{:?}", String::from_utf8_lossy(&v.text())),
        Value::Integer(n) => write!(f, "(integer) {n}"),
        Value::Double(n) => write!(f, "(double) {n}"),
        Value::Boolean(b) => write!(f, "({b})"),
        Value::Null => f.write_str("(nil)"),
        Value::BigNumber(s) => write!(f, "(big number) {}", String::from_utf8_lossy(s)),
        Value::Array(_)
        | Value::Set(_)
        | Value::Push(_)
        | Value::Map(_)
        | Value::Attribute(_) => unreachable!("aggregates are opened as frames"),
    }
}
