/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! The streaming front end (spec.md section 6): callers own a TCP byte
//! stream and don't know where PDU boundaries fall, so `Decoder` buffers
//! whatever arrives and yields complete `LdapMessage`s as they become
//! available. The per-type `parse`/`encode` functions under [`crate::ldap`]
//! stay pure and allocation-light; this is the only place in the crate that
//! owns a growable buffer.

use log::{debug, trace};

use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::ldap::{
    AddParseError, AttributeParseError, BindParseError, BindResponseParseError, CompareParseError,
    DelParseError, ExtendedParseError, FilterParseError, LdapMessage, LdapMessageParseError,
    LdapResultParseError, ModifyDnParseError, ModifyParseError, ProtocolOpParseError as OpErr,
    SearchRequestParseError, SearchResultEntryParseError,
};

/// Incrementally decodes `LDAPMessage` PDUs out of a byte stream.
///
/// Feed it bytes as they arrive with [`Decoder::feed`], then drain complete
/// messages with [`Decoder::poll`] until it returns `Ok(None)`.
#[derive(Debug)]
pub struct Decoder {
    config: DecoderConfig,
    buf: Vec<u8>,
}

impl Decoder {
    pub fn new(config: DecoderConfig) -> Self {
        Decoder {
            config,
            buf: Vec::new(),
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Appends newly-received bytes to the internal buffer.
    pub fn feed(&mut self, data: &[u8]) {
        trace!("decoder fed {} bytes", data.len());
        self.buf.extend_from_slice(data);
    }

    /// Attempts to decode one `LDAPMessage` out of the buffered bytes.
    ///
    /// Returns `Ok(None)` if the buffer does not yet hold a complete PDU;
    /// the caller should `feed` more data and try again. On success the
    /// consumed bytes are dropped from the internal buffer so the next
    /// `poll` starts at the following PDU.
    pub fn poll(&mut self) -> Result<Option<LdapMessage>, DecodeError> {
        if self.buf.is_empty() {
            return Ok(None);
        }
        match LdapMessage::decode(&self.buf, &self.config) {
            Ok(Some((message, used))) => {
                debug!(
                    "decoded LDAPMessage id={} op={:#04x} ({} bytes)",
                    message.message_id,
                    message.protocol_op.tag(),
                    used
                );
                self.buf.drain(..used);
                Ok(Some(message))
            }
            Ok(None) => Ok(None),
            Err(LdapMessageParseError::NeedMoreData(_)) => Ok(None),
            Err(LdapMessageParseError::PduTooLarge { size, max }) => {
                Err(DecodeError::PduTooLarge { size, max })
            }
            Err(other) => Err(decode_error_from_message(other)),
        }
    }

    /// Bytes currently buffered but not yet consumed by a decoded message.
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }
}

/// `AttributeParseError` is reachable through `SearchResultEntry`, `Modify`,
/// `Add` and `Compare`'s sub-errors; classified once here rather than four
/// times over.
fn attribute_error(err: AttributeParseError) -> DecodeError {
    match err {
        AttributeParseError::NeedMoreData(n) => DecodeError::NeedMoreData(n),
        AttributeParseError::Malformed(e) => e.into(),
        AttributeParseError::NoValues => {
            DecodeError::Malformed("attribute must carry at least one value")
        }
        AttributeParseError::EmptyAttributeType => {
            DecodeError::Malformed("attribute type must not be empty")
        }
    }
}

/// `LdapResultParseError` is reachable through `SearchResultDone`,
/// `ModifyResponse`, `AddResponse`, `DelResponse`, `ModifyDnResponse`,
/// `CompareResponse`, `BindResponse` and `ExtendedResponse`.
fn ldap_result_error(err: LdapResultParseError) -> DecodeError {
    match err {
        LdapResultParseError::NeedMoreData(n) => DecodeError::NeedMoreData(n),
        LdapResultParseError::Malformed(e) => e.into(),
        LdapResultParseError::InvalidUrl(url) => DecodeError::InvalidUrl(url),
        LdapResultParseError::UnexpectedReferral { .. } => {
            DecodeError::Malformed("referral present on a non-REFERRAL result code")
        }
    }
}

fn filter_error(err: FilterParseError) -> DecodeError {
    match err {
        FilterParseError::NeedMoreData(n) => DecodeError::NeedMoreData(n),
        FilterParseError::Malformed(e) => e.into(),
        FilterParseError::TooDeeplyNested(_) => {
            DecodeError::LengthInconsistent("filter nesting exceeds the maximum supported depth")
        }
        FilterParseError::EmptySubstrings => {
            DecodeError::Malformed("substrings filter must carry at least one of initial/any/final")
        }
    }
}

fn decode_error_from_message(err: LdapMessageParseError) -> DecodeError {
    match err {
        LdapMessageParseError::NeedMoreData(n) => DecodeError::NeedMoreData(n),
        LdapMessageParseError::PduTooLarge { size, max } => DecodeError::PduTooLarge { size, max },
        LdapMessageParseError::Malformed(e) => e.into(),
        LdapMessageParseError::MessageId(_) => DecodeError::Malformed("invalid messageID"),
        LdapMessageParseError::Control(_) => DecodeError::Malformed("invalid control"),
        LdapMessageParseError::ProtocolOp(op_err) => match op_err {
            OpErr::NeedMoreData(n) => DecodeError::NeedMoreData(n),
            OpErr::Malformed(e) => e.into(),
            OpErr::UnsupportedOp(found) => DecodeError::UnexpectedTag {
                state: "protocolOp",
                expected: 0,
                found,
            },
            OpErr::Bind(e) => match e {
                BindParseError::NeedMoreData(n) => DecodeError::NeedMoreData(n),
                BindParseError::Malformed(e) => e.into(),
                BindParseError::InvalidDn(dn) => DecodeError::InvalidDn(dn),
            },
            OpErr::BindResponse(e) => match e {
                BindResponseParseError::NeedMoreData(n) => DecodeError::NeedMoreData(n),
                BindResponseParseError::Result(e) => ldap_result_error(e),
            },
            OpErr::Search(e) => match e {
                SearchRequestParseError::NeedMoreData(n) => DecodeError::NeedMoreData(n),
                SearchRequestParseError::Malformed(e) => e.into(),
                SearchRequestParseError::InvalidScope(_) => {
                    DecodeError::Malformed("invalid scope value")
                }
                SearchRequestParseError::InvalidDerefAliases(_) => {
                    DecodeError::Malformed("invalid derefAliases value")
                }
                SearchRequestParseError::Filter(e) => filter_error(e),
                SearchRequestParseError::InvalidDn(dn) => DecodeError::InvalidDn(dn),
            },
            OpErr::SearchResultEntry(e) => match e {
                SearchResultEntryParseError::NeedMoreData(n) => DecodeError::NeedMoreData(n),
                SearchResultEntryParseError::Malformed(e) => e.into(),
                SearchResultEntryParseError::Attribute(e) => attribute_error(e),
                SearchResultEntryParseError::InvalidDn(dn) => DecodeError::InvalidDn(dn),
            },
            OpErr::Result(e) => ldap_result_error(e),
            OpErr::Modify(e) => match e {
                ModifyParseError::NeedMoreData(n) => DecodeError::NeedMoreData(n),
                ModifyParseError::Malformed(e) => e.into(),
                ModifyParseError::InvalidOperation(_) => {
                    DecodeError::Malformed("invalid modify operation code")
                }
                ModifyParseError::Attribute(e) => attribute_error(e),
                ModifyParseError::InvalidDn(dn) => DecodeError::InvalidDn(dn),
            },
            OpErr::Add(e) => match e {
                AddParseError::NeedMoreData(n) => DecodeError::NeedMoreData(n),
                AddParseError::Malformed(e) => e.into(),
                AddParseError::Attribute(e) => attribute_error(e),
                AddParseError::InvalidDn(dn) => DecodeError::InvalidDn(dn),
            },
            OpErr::ModifyDn(e) => match e {
                ModifyDnParseError::NeedMoreData(n) => DecodeError::NeedMoreData(n),
                ModifyDnParseError::Malformed(e) => e.into(),
                ModifyDnParseError::InvalidDn(dn) => DecodeError::InvalidDn(dn),
            },
            OpErr::Compare(e) => match e {
                CompareParseError::NeedMoreData(n) => DecodeError::NeedMoreData(n),
                CompareParseError::Malformed(e) => e.into(),
                CompareParseError::Attribute(e) => attribute_error(e),
                CompareParseError::InvalidDn(dn) => DecodeError::InvalidDn(dn),
            },
            OpErr::Extended(e) => match e {
                ExtendedParseError::NeedMoreData(n) => DecodeError::NeedMoreData(n),
                ExtendedParseError::Malformed(e) => e.into(),
                ExtendedParseError::InvalidOid(oid) => DecodeError::InvalidOid(oid),
            },
            OpErr::Del(e) => match e {
                DelParseError::InvalidDn(dn) => DecodeError::InvalidDn(dn),
            },
            OpErr::ResponseCarrying {
                reason,
                message_id,
                response,
            } => DecodeError::ResponseCarrying {
                reason,
                message_id,
                response,
            },
        },
    }
}
