//! Lazy views over aggregate bodies.
//!
//! A view holds the declared count and a slice of the aggregate's body.
//! Iteration splits child tokens off a private clone of that slice, so every
//! call to `iter` starts from the beginning and independent traversals never
//! share a cursor.

use super::token::Token;
use bytes::Bytes;
use std::iter::FusedIterator;

/// Elements of an array, set or push.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct List {
    count: usize,
    buffer: Bytes,
}

impl List {
    /// `buffer` must hold exactly `count` validated tokens.
    pub(crate) fn new(count: usize, buffer: Bytes) -> Self {
        Self { count, buffer }
    }

    /// Number of elements.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iter(&self) -> ListIter {
        ListIter {
            remaining: self.count,
            buffer: self.buffer.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = Token;
    type IntoIter = ListIter;

    fn into_iter(self) -> ListIter {
        self.iter()
    }
}

/// Iterator over the tokens of a [`List`].
#[derive(Debug, Clone)]
pub struct ListIter {
    remaining: usize,
    buffer: Bytes,
}

impl Iterator for ListIter {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            // The last child spans the rest of the body
            return Some(Token::from_validated(std::mem::take(&mut self.buffer)));
        }
        Some(Token::next_validated(&mut self.buffer))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ListIter {}

impl FusedIterator for ListIter {}

/// Entries of a map or attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairList {
    count: usize,
    elements: List,
}

impl PairList {
    /// `buffer` must hold exactly `2 * count` validated tokens.
    pub(crate) fn new(count: usize, buffer: Bytes) -> Self {
        Self {
            count,
            elements: List::new(count * 2, buffer),
        }
    }

    /// Number of key/value pairs.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iter(&self) -> PairIter {
        PairIter {
            elements: self.elements.iter(),
        }
    }

    /// Keys and values as one flat list, in wire order.
    pub fn elements(&self) -> &List {
        &self.elements
    }
}

impl<'a> IntoIterator for &'a PairList {
    type Item = (Token, Token);
    type IntoIter = PairIter;

    fn into_iter(self) -> PairIter {
        self.iter()
    }
}

/// Iterator over the `(key, value)` pairs of a [`PairList`].
#[derive(Debug, Clone)]
pub struct PairIter {
    elements: ListIter,
}

impl Iterator for PairIter {
    type Item = (Token, Token);

    fn next(&mut self) -> Option<(Token, Token)> {
        let key = self.elements.next()?;
        match self.elements.next() {
            Some(value) => Some((key, value)),
            None => unreachable!("pair list holds an even number of elements"),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pairs = self.elements.len() / 2;
        (pairs, Some(pairs))
    }
}

impl ExactSizeIterator for PairIter {}

impl FusedIterator for PairIter {}
