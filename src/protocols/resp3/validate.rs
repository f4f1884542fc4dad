//! Boundary detection and validation of RESP3 encodings.
//!
//! Each call to [`validate`] either finds the exact length of one complete,
//! well-formed token at the start of the buffer, reports that more bytes are
//! needed, or fails. Nothing is consumed here; callers split the buffer only
//! after a successful run, so an incomplete attempt can simply be retried
//! once more data has been appended.
//!
//! Aggregates are walked with an explicit stack of remaining child counts
//! rather than by recursion, so hostile nesting can never exhaust the call
//! stack. The stack height is the nesting depth.

use super::error::{ErrorKind, ScanError};
use super::line::{is_big_number, parse_f64, parse_i64, scan_line};
use super::type_id::TypeId;

/// Default aggregate nesting limit.
pub const MAX_DEPTH: usize = 1000;

/// One element header as seen by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    /// A complete scalar encoding of the given length.
    Scalar(usize),
    /// An aggregate header followed by `children` child tokens.
    Aggregate { header: usize, children: usize },
}

/// Validate the token at the start of `buf`.
///
/// `depth` is the nesting depth of that token; top-level attempts pass 0.
/// Returns the token's encoded length, or `Ok(None)` if `buf` ends before
/// the token does. Error offsets are relative to `buf`.
pub(crate) fn validate(
    buf: &[u8],
    depth: usize,
    max_depth: usize,
) -> Result<Option<usize>, ScanError> {
    let mut pos = 0;
    // Children still expected by each open aggregate, innermost last.
    let mut open: Vec<usize> = Vec::new();

    loop {
        let element = match scan_element(&buf[pos..], depth + open.len(), max_depth) {
            Ok(Some(element)) => element,
            Ok(None) => return Ok(None),
            Err(kind) => return Err(ScanError::new(kind, pos)),
        };

        match element {
            Element::Scalar(len) => pos += len,
            Element::Aggregate { header, children } => {
                pos += header;
                if children > 0 {
                    open.push(children);
                    continue;
                }
            }
        }

        // An element just completed; close every aggregate it finishes.
        loop {
            match open.last_mut() {
                None => return Ok(Some(pos)),
                Some(remaining) if *remaining > 1 => {
                    *remaining -= 1;
                    break;
                }
                Some(_) => {
                    open.pop();
                }
            }
        }
    }
}

/// Scan the element starting at `buf[0]`, found at nesting `depth`.
fn scan_element(buf: &[u8], depth: usize, max_depth: usize) -> Result<Option<Element>, ErrorKind> {
    let id = match TypeId::peek(buf)? {
        Some(id) => id,
        None => return Ok(None),
    };

    let len = match id {
        TypeId::Null => scan_null(buf)?,
        TypeId::Boolean => scan_boolean(buf)?,
        TypeId::BlobString | TypeId::BlobError | TypeId::VerbatimString => scan_blob(buf, id)?,
        TypeId::SimpleString | TypeId::SimpleError => scan_simple(buf)?,
        TypeId::Integer => scan_number(
            buf,
            |text| parse_i64(text).is_some(),
            ErrorKind::CanNotParseInteger,
        )?,
        TypeId::Double => scan_number(
            buf,
            |text| parse_f64(text).is_some(),
            ErrorKind::CanNotParseDouble,
        )?,
        TypeId::BigNumber => scan_number(buf, is_big_number, ErrorKind::CanNotParseBigNumber)?,
        TypeId::Array | TypeId::Set | TypeId::Push | TypeId::Map | TypeId::Attribute => {
            return scan_aggregate_header(buf, id, depth, max_depth);
        }
    };

    Ok(len.map(Element::Scalar))
}

/// `_\r\n`
fn scan_null(buf: &[u8]) -> Result<Option<usize>, ErrorKind> {
    match buf.get(..3) {
        None => Ok(None),
        Some(b"_\r\n") => Ok(Some(3)),
        Some(_) => Err(ErrorKind::InvalidData),
    }
}

/// `#t\r\n` or `#f\r\n`
fn scan_boolean(buf: &[u8]) -> Result<Option<usize>, ErrorKind> {
    match buf.get(..4) {
        None => Ok(None),
        Some(b"#t\r\n") | Some(b"#f\r\n") => Ok(Some(4)),
        Some(_) => Err(ErrorKind::InvalidData),
    }
}

/// Blob string, blob error and verbatim string:
/// `<tag><len>\r\n<len bytes>\r\n`
fn scan_blob(buf: &[u8], id: TypeId) -> Result<Option<usize>, ErrorKind> {
    let line = match scan_line(buf, 1)? {
        Some(line) => line,
        None => return Ok(None),
    };
    let payload_len = parse_length(&buf[line.payload.clone()])?;
    let total = line
        .end()
        .checked_add(payload_len)
        .and_then(|n| n.checked_add(2))
        .ok_or(ErrorKind::CanNotParseInteger)?;

    if buf.len() < total {
        return Ok(None);
    }

    if &buf[total - 2..total] != b"\r\n" {
        return Err(ErrorKind::InvalidData);
    }

    if id == TypeId::VerbatimString {
        // Three byte format tag, then the separator.
        let colon = line.end() + 3;
        if colon >= total - 2 || buf[colon] != b':' {
            return Err(ErrorKind::MissingColonInVerbatimString);
        }
    }

    Ok(Some(total))
}

/// Simple string and simple error: `<tag><text>\r\n`
fn scan_simple(buf: &[u8]) -> Result<Option<usize>, ErrorKind> {
    Ok(scan_line(buf, 1)?.map(|line| line.end()))
}

/// Integer, double and big number: a single line whose text must satisfy
/// `is_valid`.
fn scan_number(
    buf: &[u8],
    is_valid: impl Fn(&[u8]) -> bool,
    error: ErrorKind,
) -> Result<Option<usize>, ErrorKind> {
    let line = match scan_line(buf, 1)? {
        Some(line) => line,
        None => return Ok(None),
    };

    if !is_valid(&buf[line.payload.clone()]) {
        return Err(error);
    }

    Ok(Some(line.end()))
}

/// Aggregate header: `<tag><count>\r\n`
fn scan_aggregate_header(
    buf: &[u8],
    id: TypeId,
    depth: usize,
    max_depth: usize,
) -> Result<Option<Element>, ErrorKind> {
    // Children would sit one level deeper.
    if depth.saturating_add(1) >= max_depth {
        return Err(ErrorKind::TooDeeplyNestedAggregatedTypes);
    }

    let line = match scan_line(buf, 1)? {
        Some(line) => line,
        None => return Ok(None),
    };
    let count = parse_length(&buf[line.payload.clone()])?;
    let children = id
        .multiplier()
        .and_then(|multiplier| count.checked_mul(multiplier))
        .ok_or(ErrorKind::CanNotParseInteger)?;

    Ok(Some(Element::Aggregate {
        header: line.end(),
        children,
    }))
}

/// Parse a declared blob length or aggregate count.
fn parse_length(text: &[u8]) -> Result<usize, ErrorKind> {
    let n = parse_i64(text).ok_or(ErrorKind::CanNotParseInteger)?;
    if n < 0 {
        return Err(ErrorKind::NegativeLength);
    }
    usize::try_from(n).map_err(|_| ErrorKind::CanNotParseInteger)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(buf: &[u8]) -> Result<Option<usize>, ScanError> {
        validate(buf, 0, MAX_DEPTH)
    }

    fn kind(buf: &[u8]) -> ErrorKind {
        check(buf).unwrap_err().kind
    }

    fn nested_arrays(levels: usize) -> Vec<u8> {
        let mut buf = b"*1\r\n".repeat(levels);
        buf.extend_from_slice(b":1\r\n");
        buf
    }

    const VALID: &[&[u8]] = &[
        b"_\r\n",
        b"#t\r\n",
        b"#f\r\n",
        b"$5\r\nhello\r\n",
        b"$0\r\n\r\n",
        b"!21\r\nSYNTAX invalid syntax\r\n",
        b"=15\r\ntxt:Some string\r\n",
        b"+OK\r\n",
        b"-ERR unknown command\r\n",
        b":1000\r\n",
        b":-42\r\n",
        b",3.14\r\n",
        b",inf\r\n",
        b"(3492890328409238509324850943850943825024385\r\n",
        b"(-5\r\n",
        b"*2\r\n:1\r\n:2\r\n",
        b"*0\r\n",
        b"~2\r\n+a\r\n+b\r\n",
        b">2\r\n+message\r\n$5\r\nhello\r\n",
        b"%1\r\n+key\r\n:42\r\n",
        b"|1\r\n+ttl\r\n:3600\r\n",
        b"*2\r\n%1\r\n+a\r\n*1\r\n_\r\n~1\r\n#t\r\n",
    ];

    #[test]
    fn test_valid_encodings_consume_exact_length() {
        for encoding in VALID {
            assert_eq!(check(encoding), Ok(Some(encoding.len())), "{encoding:?}");
        }
    }

    #[test]
    fn test_trailing_bytes_are_not_consumed() {
        assert_eq!(check(b"+OK\r\n+NEXT\r\n"), Ok(Some(5)));
        assert_eq!(check(b"*1\r\n:1\r\n:2\r\n"), Ok(Some(8)));
        assert_eq!(check(b"$3\r\nfoo\r\n_\r\n"), Ok(Some(9)));
    }

    #[test]
    fn test_every_truncation_needs_more_data() {
        for encoding in VALID {
            for cut in 0..encoding.len() {
                assert_eq!(check(&encoding[..cut]), Ok(None), "{encoding:?} cut at {cut}");
            }
        }
    }

    #[test]
    fn test_blob_missing_payload() {
        assert_eq!(check(b"$5\r\nhel"), Ok(None));
    }

    #[test]
    fn test_invalid_leading_byte() {
        assert_eq!(
            check(b"?oops\r\n"),
            Err(ScanError::new(ErrorKind::InvalidLeadingByte, 0))
        );
    }

    #[test]
    fn test_invalid_boolean() {
        assert_eq!(kind(b"#x\r\n"), ErrorKind::InvalidData);
        assert_eq!(kind(b"#tt\r\n"), ErrorKind::InvalidData);
    }

    #[test]
    fn test_invalid_null() {
        assert_eq!(kind(b"_x\r\n"), ErrorKind::InvalidData);
        assert_eq!(kind(b"_\r\r"), ErrorKind::InvalidData);
    }

    #[test]
    fn test_blob_bad_terminator() {
        assert_eq!(kind(b"$5\r\nhelloXX"), ErrorKind::InvalidData);
        assert_eq!(kind(b"$5\r\nhello!\r\n"), ErrorKind::InvalidData);
    }

    #[test]
    fn test_blob_bad_length() {
        assert_eq!(kind(b"$abc\r\nhello\r\n"), ErrorKind::CanNotParseInteger);
        assert_eq!(kind(b"$\r\n\r\n"), ErrorKind::CanNotParseInteger);
        assert_eq!(kind(b"$1.5\r\nh\r\n"), ErrorKind::CanNotParseInteger);
    }

    #[test]
    fn test_negative_lengths_rejected() {
        assert_eq!(kind(b"$-1\r\n"), ErrorKind::NegativeLength);
        assert_eq!(kind(b"*-1\r\n"), ErrorKind::NegativeLength);
        assert_eq!(kind(b"%-3\r\n"), ErrorKind::NegativeLength);
    }

    #[test]
    fn test_length_line_bare_cr() {
        assert_eq!(kind(b"$5\rX"), ErrorKind::InvalidData);
        assert_eq!(kind(b"+hel\rlo\r\n"), ErrorKind::InvalidData);
    }

    #[test]
    fn test_verbatim_missing_colon() {
        assert_eq!(
            kind(b"=15\r\ntxt;Some string\r\n"),
            ErrorKind::MissingColonInVerbatimString
        );
        assert_eq!(kind(b"=3\r\ntxt\r\n"), ErrorKind::MissingColonInVerbatimString);
        assert_eq!(kind(b"=0\r\n\r\n"), ErrorKind::MissingColonInVerbatimString);
        assert_eq!(check(b"=4\r\ntxt:\r\n"), Ok(Some(10)));
    }

    #[test]
    fn test_numeric_grammar() {
        assert_eq!(kind(b":12a\r\n"), ErrorKind::CanNotParseInteger);
        assert_eq!(kind(b":\r\n"), ErrorKind::CanNotParseInteger);
        assert_eq!(kind(b",abc\r\n"), ErrorKind::CanNotParseDouble);
        assert_eq!(kind(b"(12a\r\n"), ErrorKind::CanNotParseBigNumber);
        assert_eq!(kind(b"(-\r\n"), ErrorKind::CanNotParseBigNumber);
        assert_eq!(kind(b"(\r\n"), ErrorKind::CanNotParseBigNumber);
        assert_eq!(check(b"(5\r\n"), Ok(Some(4)));
        assert_eq!(check(b"(-5\r\n"), Ok(Some(5)));
    }

    #[test]
    fn test_aggregate_bad_count() {
        assert_eq!(kind(b"*x\r\n"), ErrorKind::CanNotParseInteger);
        assert_eq!(kind(b"%\r\n"), ErrorKind::CanNotParseInteger);
    }

    #[test]
    fn test_huge_count_needs_more_data() {
        // No allocation is made up front for declared children.
        assert_eq!(check(b"*9223372036854775807\r\n:1\r\n"), Ok(None));
        assert_eq!(check(b"%9223372036854775807\r\n"), Ok(None));
        assert_eq!(check(b"$9223372036854775807\r\nabc"), Ok(None));
    }

    #[test]
    fn test_map_needs_both_halves() {
        assert_eq!(check(b"%1\r\n+key\r\n"), Ok(None));
    }

    #[test]
    fn test_nested_error_offset_is_absolute() {
        let buf = b"*2\r\n:1\r\n*1\r\n#x\r\n";
        assert_eq!(
            check(buf),
            Err(ScanError::new(ErrorKind::InvalidData, 12))
        );
    }

    #[test]
    fn test_depth_boundary() {
        let ok = nested_arrays(999);
        assert_eq!(check(&ok), Ok(Some(ok.len())));

        let too_deep = nested_arrays(1000);
        let err = check(&too_deep).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TooDeeplyNestedAggregatedTypes);
        assert_eq!(err.offset, 999 * 4);
    }

    #[test]
    fn test_depth_checked_before_count_line() {
        // The innermost header is cut short but the limit still trips.
        let mut buf = b"*1\r\n".repeat(999);
        buf.push(b'*');
        assert_eq!(
            check(&buf).unwrap_err().kind,
            ErrorKind::TooDeeplyNestedAggregatedTypes
        );
    }

    #[test]
    fn test_custom_depth_limit() {
        let too_deep = ErrorKind::TooDeeplyNestedAggregatedTypes;
        assert_eq!(validate(b"*1\r\n*0\r\n", 0, 2).unwrap_err().kind, too_deep);
        assert_eq!(validate(b"*1\r\n:1\r\n", 0, 2), Ok(Some(8)));
        assert_eq!(validate(b"*0\r\n", 1, 2).unwrap_err().kind, too_deep);
    }

    #[test]
    fn test_deep_nesting_beyond_default_limit() {
        let buf = nested_arrays(100_000);
        assert_eq!(validate(&buf, 0, usize::MAX), Ok(Some(buf.len())));
    }
}
