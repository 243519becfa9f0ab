/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! A primitive OCTET STRING TLV under an arbitrary identifier octet: the
//! universal tag (0x04) for `LDAPString`/`AttributeDescription`/
//! `AssertionValue`, or a context-specific tag where the grammar uses
//! implicit tagging (bind credentials, extended request/response fields).
//! Generalizes the teacher's tag-specific `LdapSequence` constructors into
//! one parser parameterized by the identifier byte.

use thiserror::Error;

use super::{BerLength, BerLengthParseError};

#[derive(Debug, PartialEq, Eq, Error)]
pub enum BerOctetStringParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error("unexpected tag {found:#04x}, expected {expected:#04x}")]
    UnexpectedTag { expected: u8, found: u8 },
    #[error("invalid ber length")]
    TooLargeLength,
    #[error("indefinite length")]
    IndefiniteLength,
}

impl From<BerLengthParseError> for BerOctetStringParseError {
    fn from(value: BerLengthParseError) -> Self {
        match value {
            BerLengthParseError::NeedMoreData(n) => BerOctetStringParseError::NeedMoreData(n),
            BerLengthParseError::TooLargeValue => BerOctetStringParseError::TooLargeLength,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BerOctetString<'a> {
    data: &'a [u8],
    encoded_len: usize,
}

impl<'a> BerOctetString<'a> {
    pub fn parse(data: &'a [u8], identifier: u8) -> Result<Self, BerOctetStringParseError> {
        if data.is_empty() {
            return Err(BerOctetStringParseError::NeedMoreData(1));
        }
        if data[0] != identifier {
            return Err(BerOctetStringParseError::UnexpectedTag {
                expected: identifier,
                found: data[0],
            });
        }

        let length = BerLength::parse(&data[1..])?;
        if length.indefinite() {
            return Err(BerOctetStringParseError::IndefiniteLength);
        }

        let offset = 1 + length.encoded_len();
        let total = offset as u64 + length.value();
        if total > data.len() as u64 {
            return Err(BerOctetStringParseError::NeedMoreData(
                (total - data.len() as u64) as usize,
            ));
        }
        let total = total as usize;
        Ok(BerOctetString {
            data: &data[offset..total],
            encoded_len: total,
        })
    }

    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn encoded_len(&self) -> usize {
        self.encoded_len
    }
}

/// Encode an OCTET STRING TLV under `identifier`, with BER definite-length
/// (short or long form as needed).
pub fn encode_octet_string(buf: &mut Vec<u8>, identifier: u8, value: &[u8]) {
    buf.push(identifier);
    let mut encoder = super::BerLengthEncoder::default();
    buf.extend_from_slice(encoder.encode(value.len()));
    buf.extend_from_slice(value);
}
