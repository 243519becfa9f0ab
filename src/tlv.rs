/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! The TLV stream reader (tag/length/value tokenizer). `Tlv::parse` reads
//! one complete header+value pair out of a byte slice; `TlvCursor` walks a
//! sequence of sibling TLVs inside an already length-delimited parent value,
//! which is how nesting depth is tracked: a child can never observe more
//! bytes than its parent handed it, so an out-of-budget declared length
//! surfaces as [`TlvParseError::LengthInconsistent`] rather than reading
//! past the parent's boundary.

use thiserror::Error;

use crate::ber::{BerLength, BerLengthParseError};

#[derive(Debug, PartialEq, Eq, Error)]
pub enum TlvParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error("unexpected tag {found:#04x}, expected {expected:#04x}")]
    UnexpectedTag { expected: u8, found: u8 },
    #[error("declared length exceeds the enclosing frame's remaining budget")]
    LengthInconsistent,
    #[error("indefinite length is not supported on the LDAP decode path")]
    IndefiniteLength,
}

impl From<BerLengthParseError> for TlvParseError {
    fn from(value: BerLengthParseError) -> Self {
        match value {
            BerLengthParseError::NeedMoreData(n) => TlvParseError::NeedMoreData(n),
            BerLengthParseError::TooLargeValue => TlvParseError::LengthInconsistent,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Tlv<'a> {
    tag: u8,
    value: &'a [u8],
    encoded_len: usize,
}

impl<'a> Tlv<'a> {
    /// Read one TLV header and value off the front of `data`, whatever its tag.
    pub fn parse(data: &'a [u8]) -> Result<Self, TlvParseError> {
        if data.is_empty() {
            return Err(TlvParseError::NeedMoreData(1));
        }
        let tag = data[0];
        let length = BerLength::parse(&data[1..])?;
        if length.indefinite() {
            return Err(TlvParseError::IndefiniteLength);
        }
        let header_len = 1 + length.encoded_len();
        let total = header_len as u64 + length.value();
        if total > data.len() as u64 {
            let missing = total - data.len() as u64;
            return Err(TlvParseError::NeedMoreData(missing as usize));
        }
        let total = total as usize;
        Ok(Tlv {
            tag,
            value: &data[header_len..total],
            encoded_len: total,
        })
    }

    /// Like [`Tlv::parse`] but requires an exact tag match.
    pub fn parse_tag(data: &'a [u8], expected: u8) -> Result<Self, TlvParseError> {
        let tlv = Self::parse(data)?;
        if tlv.tag != expected {
            return Err(TlvParseError::UnexpectedTag {
                expected,
                found: tlv.tag,
            });
        }
        Ok(tlv)
    }

    #[inline]
    pub fn tag(&self) -> u8 {
        self.tag
    }

    #[inline]
    pub fn value(&self) -> &'a [u8] {
        self.value
    }

    #[inline]
    pub fn encoded_len(&self) -> usize {
        self.encoded_len
    }
}

/// Walks sibling TLVs inside a single already-delimited constructed value,
/// e.g. the members of a `SEQUENCE OF`. Each `next()` call is one "expected
/// remaining bytes" decrement against the parent frame's budget (`data`).
pub struct TlvCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> TlvCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        TlvCursor { data, pos: 0 }
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.data.len()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Yields the next sibling TLV, or `None` once the frame's budget is
    /// fully consumed. A TLV whose declared length would run past the
    /// frame's remaining budget is `LengthInconsistent`, never a short read
    /// past the parent.
    pub fn next(&mut self) -> Result<Option<Tlv<'a>>, TlvParseError> {
        if self.is_exhausted() {
            return Ok(None);
        }
        let tlv = Tlv::parse(&self.data[self.pos..]).map_err(|e| match e {
            TlvParseError::NeedMoreData(_) => TlvParseError::LengthInconsistent,
            other => other,
        })?;
        self.pos += tlv.encoded_len();
        Ok(Some(tlv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_short_and_long_form() {
        let t = Tlv::parse(&[0x04, 0x02, b'h', b'i']).unwrap();
        assert_eq!(t.tag(), 0x04);
        assert_eq!(t.value(), b"hi");
        assert_eq!(t.encoded_len(), 4);

        let mut data = vec![0x04, 0x81, 200];
        data.extend(std::iter::repeat_n(b'x', 200));
        let t = Tlv::parse(&data).unwrap();
        assert_eq!(t.value().len(), 200);
        assert_eq!(t.encoded_len(), 203);
    }

    #[test]
    fn parse_needs_more_data() {
        let e = Tlv::parse(&[0x04, 0x05, 1, 2]).unwrap_err();
        assert_eq!(e, TlvParseError::NeedMoreData(3));
    }

    #[test]
    fn parse_tag_mismatch() {
        let e = Tlv::parse_tag(&[0x04, 0x00], 0x02).unwrap_err();
        assert_eq!(
            e,
            TlvParseError::UnexpectedTag {
                expected: 0x02,
                found: 0x04
            }
        );
    }

    #[test]
    fn cursor_walks_siblings_and_stops_at_budget() {
        let data = [0x02, 0x01, 0x01, 0x02, 0x01, 0x02];
        let mut cursor = TlvCursor::new(&data);
        let a = cursor.next().unwrap().unwrap();
        assert_eq!(a.value(), &[0x01]);
        let b = cursor.next().unwrap().unwrap();
        assert_eq!(b.value(), &[0x02]);
        assert!(cursor.next().unwrap().is_none());
    }

    #[test]
    fn cursor_rejects_child_overrunning_parent_budget() {
        // declares a 5-byte value but the parent frame only hands over 2 bytes
        let data = [0x04, 0x05, 0x01, 0x02];
        let mut cursor = TlvCursor::new(&data);
        let e = cursor.next().unwrap_err();
        assert_eq!(e, TlvParseError::LengthInconsistent);
    }
}
