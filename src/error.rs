/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! The error taxonomy from spec section 7, kept as one enum per side of the
//! wire rather than one enum for everything: encode failures are
//! caller/programmer errors surfaced synchronously, decode failures are a
//! classification a caller logs and acts on (tear down the connection).

use thiserror::Error;

use crate::ber::{BerBooleanParseError, BerIntegerParseError, BerLengthParseError};
use crate::ldap::LdapResult;
use crate::tlv::TlvParseError;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("output buffer too small: needed {needed}, had {available}")]
    BufferOverflow { needed: usize, available: usize },
    #[error("invalid message: {0}")]
    InvalidMessage(&'static str),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("need {0} more bytes before this PDU can be decoded")]
    NeedMoreData(usize),
    #[error("malformed BER: {0}")]
    Malformed(&'static str),
    #[error("unexpected tag {found:#04x}, expected {expected:#04x} in state {state}")]
    UnexpectedTag {
        state: &'static str,
        expected: u8,
        found: u8,
    },
    #[error("length inconsistent: {0}")]
    LengthInconsistent(&'static str),
    #[error("PDU of {size} bytes exceeds the configured cap of {max} bytes")]
    PduTooLarge { size: usize, max: usize },
    #[error("invalid LDAPOID: {0}")]
    InvalidOid(String),
    #[error("invalid LDAPDN: {0}")]
    InvalidDn(String),
    #[error("invalid LDAPURL: {0}")]
    InvalidUrl(String),
    /// A recoverable error discovered inside a request where LDAP semantics
    /// require the server to answer with a specific LdapResult rather than
    /// simply tearing the connection down (spec.md section 7).
    #[error("response-carrying decode error: {reason}")]
    ResponseCarrying {
        reason: &'static str,
        message_id: i32,
        response: Box<LdapResult>,
    },
}

impl From<BerLengthParseError> for DecodeError {
    fn from(value: BerLengthParseError) -> Self {
        match value {
            BerLengthParseError::NeedMoreData(n) => DecodeError::NeedMoreData(n),
            BerLengthParseError::TooLargeValue => {
                DecodeError::LengthInconsistent("BER length field too large")
            }
        }
    }
}

impl From<BerIntegerParseError> for DecodeError {
    fn from(value: BerIntegerParseError) -> Self {
        match value {
            BerIntegerParseError::NeedMoreData(n) => DecodeError::NeedMoreData(n),
            BerIntegerParseError::InvalidType => DecodeError::Malformed("expected INTEGER tag"),
            BerIntegerParseError::TooLargeLength => {
                DecodeError::LengthInconsistent("INTEGER length field too large")
            }
            BerIntegerParseError::IndefiniteLength => {
                DecodeError::Malformed("indefinite length is not valid for INTEGER")
            }
            BerIntegerParseError::InvalidValueBytes => {
                DecodeError::Malformed("invalid INTEGER value bytes")
            }
        }
    }
}

impl From<BerBooleanParseError> for DecodeError {
    fn from(value: BerBooleanParseError) -> Self {
        match value {
            BerBooleanParseError::NeedMoreData(n) => DecodeError::NeedMoreData(n),
            BerBooleanParseError::InvalidType => DecodeError::Malformed("expected BOOLEAN tag"),
            BerBooleanParseError::TooLargeLength => {
                DecodeError::LengthInconsistent("BOOLEAN length field too large")
            }
            BerBooleanParseError::IndefiniteLength => {
                DecodeError::Malformed("indefinite length is not valid for BOOLEAN")
            }
            BerBooleanParseError::InvalidLength => {
                DecodeError::Malformed("BOOLEAN value must be exactly 1 byte")
            }
            BerBooleanParseError::NonCanonicalValue(_) => {
                DecodeError::Malformed("non-canonical BOOLEAN byte rejected by strict mode")
            }
        }
    }
}

impl From<TlvParseError> for DecodeError {
    fn from(value: TlvParseError) -> Self {
        match value {
            TlvParseError::NeedMoreData(n) => DecodeError::NeedMoreData(n),
            TlvParseError::UnexpectedTag { expected, found } => DecodeError::UnexpectedTag {
                state: "tlv",
                expected,
                found,
            },
            TlvParseError::LengthInconsistent => {
                DecodeError::LengthInconsistent("child TLV overruns its parent's budget")
            }
            TlvParseError::IndefiniteLength => {
                DecodeError::Malformed("indefinite length is not supported")
            }
        }
    }
}
