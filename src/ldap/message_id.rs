/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! The `messageID` field of `LDAPMessage` (RFC 4511 section 4.1.1): a plain
//! INTEGER in `0 .. 2^31-1`. `0` is reserved for messages a server sends
//! without a matching request (Notice of Disconnection, Unsolicited
//! Notification), so it is valid to parse but callers that originate
//! requests should never emit it.

use thiserror::Error;

use crate::ber::{BerInteger, BerIntegerEncoder, BerIntegerParseError};

#[derive(Debug, PartialEq, Eq, Error)]
pub enum LdapMessageIdParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error("invalid ber type")]
    InvalidType,
    #[error("invalid ber length")]
    TooLargeLength,
    #[error("indefinite length")]
    IndefiniteLength,
    #[error("invalid value bytes")]
    InvalidValueBytes,
    #[error("messageID {0} out of range")]
    OutOfRange(i64),
}

impl From<BerIntegerParseError> for LdapMessageIdParseError {
    fn from(value: BerIntegerParseError) -> Self {
        match value {
            BerIntegerParseError::NeedMoreData(n) => LdapMessageIdParseError::NeedMoreData(n),
            BerIntegerParseError::InvalidType => LdapMessageIdParseError::InvalidType,
            BerIntegerParseError::TooLargeLength => LdapMessageIdParseError::TooLargeLength,
            BerIntegerParseError::IndefiniteLength => LdapMessageIdParseError::IndefiniteLength,
            BerIntegerParseError::InvalidValueBytes => LdapMessageIdParseError::InvalidValueBytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LdapMessageId {
    value: i32,
    encoded_len: usize,
}

impl LdapMessageId {
    pub fn parse(data: &[u8]) -> Result<Self, LdapMessageIdParseError> {
        let integer = BerInteger::parse(data)?;
        let value = integer.value();
        if !(0..=i32::MAX as i64).contains(&value) {
            return Err(LdapMessageIdParseError::OutOfRange(value));
        }
        Ok(LdapMessageId {
            value: value as i32,
            encoded_len: integer.encoded_len(),
        })
    }

    #[inline]
    pub fn value(&self) -> i32 {
        self.value
    }

    #[inline]
    pub fn encoded_len(&self) -> usize {
        self.encoded_len
    }

    pub fn encode(buf: &mut Vec<u8>, value: i32) {
        let mut encoder = BerIntegerEncoder::default();
        buf.extend_from_slice(encoder.encode(value as i64));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        let v = LdapMessageId::parse(&[0x02, 0x01, 0x01]).unwrap();
        assert_eq!(v.value(), 1);
        assert_eq!(v.encoded_len(), 3);
    }

    #[test]
    fn parse_rejects_negative() {
        let e = LdapMessageId::parse(&[0x02, 0x01, 0xFF]).unwrap_err();
        assert_eq!(e, LdapMessageIdParseError::OutOfRange(-1));
    }

    #[test]
    fn encode_roundtrip() {
        let mut buf = Vec::new();
        LdapMessageId::encode(&mut buf, 42);
        let v = LdapMessageId::parse(&buf).unwrap();
        assert_eq!(v.value(), 42);
    }
}
