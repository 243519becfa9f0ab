/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! `LDAPMessage` (RFC 4511 section 4.1.1): the envelope around every PDU.
//! `ProtocolOp` dispatches on the operation's application tag, the one
//! place in this crate where decoding genuinely branches on a small,
//! closed set of tags rather than following a fixed field sequence.

use thiserror::Error;

use crate::config::DecoderConfig;
use crate::tlv::{Tlv, TlvParseError};

use super::abandon::AbandonRequest;
use super::add::{AddParseError, AddRequest};
use super::attribute::AttributeParseError;
use super::bind::{BindParseError, BindRequest, BindResponse, BindResponseParseError};
use super::compare::{CompareParseError, CompareRequest};
use super::control::{Control, ControlParseError, encode_controls, parse_controls};
use super::del::{DelParseError, DelRequest};
use super::extended::{ExtendedParseError, ExtendedRequest, ExtendedResponse, IntermediateResponse};
use super::message_id::{LdapMessageId, LdapMessageIdParseError};
use super::moddn::{ModifyDnParseError, ModifyDnRequest};
use super::modify::{ModifyParseError, ModifyRequest};
use super::result::{LdapResult, LdapResultParseError, ResultCode};
use super::search::{SearchRequest, SearchRequestParseError, SearchResultEntry, SearchResultEntryParseError, SearchResultReference};

const TAG_BIND_REQUEST: u8 = 0x60;
const TAG_BIND_RESPONSE: u8 = 0x61;
const TAG_UNBIND_REQUEST: u8 = 0x42;
const TAG_SEARCH_REQUEST: u8 = 0x63;
const TAG_SEARCH_RESULT_ENTRY: u8 = 0x64;
const TAG_SEARCH_RESULT_DONE: u8 = 0x65;
const TAG_MODIFY_REQUEST: u8 = 0x66;
const TAG_MODIFY_RESPONSE: u8 = 0x67;
const TAG_ADD_REQUEST: u8 = 0x68;
const TAG_ADD_RESPONSE: u8 = 0x69;
const TAG_DEL_REQUEST: u8 = 0x4a;
const TAG_DEL_RESPONSE: u8 = 0x6b;
const TAG_MODIFY_DN_REQUEST: u8 = 0x6c;
const TAG_MODIFY_DN_RESPONSE: u8 = 0x6d;
const TAG_COMPARE_REQUEST: u8 = 0x6e;
const TAG_COMPARE_RESPONSE: u8 = 0x6f;
const TAG_ABANDON_REQUEST: u8 = 0x50;
const TAG_SEARCH_RESULT_REFERENCE: u8 = 0x73;
const TAG_EXTENDED_REQUEST: u8 = 0x77;
const TAG_EXTENDED_RESPONSE: u8 = 0x78;
const TAG_INTERMEDIATE_RESPONSE: u8 = 0x79;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolOp {
    BindRequest(BindRequest),
    BindResponse(BindResponse),
    UnbindRequest,
    SearchRequest(SearchRequest),
    SearchResultEntry(SearchResultEntry),
    SearchResultDone(LdapResult),
    ModifyRequest(ModifyRequest),
    ModifyResponse(LdapResult),
    AddRequest(AddRequest),
    AddResponse(LdapResult),
    DelRequest(DelRequest),
    DelResponse(LdapResult),
    ModifyDnRequest(ModifyDnRequest),
    ModifyDnResponse(LdapResult),
    CompareRequest(CompareRequest),
    CompareResponse(LdapResult),
    AbandonRequest(AbandonRequest),
    SearchResultReference(SearchResultReference),
    ExtendedRequest(ExtendedRequest),
    ExtendedResponse(ExtendedResponse),
    IntermediateResponse(IntermediateResponse),
}

impl ProtocolOp {
    pub fn tag(&self) -> u8 {
        match self {
            ProtocolOp::BindRequest(_) => TAG_BIND_REQUEST,
            ProtocolOp::BindResponse(_) => TAG_BIND_RESPONSE,
            ProtocolOp::UnbindRequest => TAG_UNBIND_REQUEST,
            ProtocolOp::SearchRequest(_) => TAG_SEARCH_REQUEST,
            ProtocolOp::SearchResultEntry(_) => TAG_SEARCH_RESULT_ENTRY,
            ProtocolOp::SearchResultDone(_) => TAG_SEARCH_RESULT_DONE,
            ProtocolOp::ModifyRequest(_) => TAG_MODIFY_REQUEST,
            ProtocolOp::ModifyResponse(_) => TAG_MODIFY_RESPONSE,
            ProtocolOp::AddRequest(_) => TAG_ADD_REQUEST,
            ProtocolOp::AddResponse(_) => TAG_ADD_RESPONSE,
            ProtocolOp::DelRequest(_) => TAG_DEL_REQUEST,
            ProtocolOp::DelResponse(_) => TAG_DEL_RESPONSE,
            ProtocolOp::ModifyDnRequest(_) => TAG_MODIFY_DN_REQUEST,
            ProtocolOp::ModifyDnResponse(_) => TAG_MODIFY_DN_RESPONSE,
            ProtocolOp::CompareRequest(_) => TAG_COMPARE_REQUEST,
            ProtocolOp::CompareResponse(_) => TAG_COMPARE_RESPONSE,
            ProtocolOp::AbandonRequest(_) => TAG_ABANDON_REQUEST,
            ProtocolOp::SearchResultReference(_) => TAG_SEARCH_RESULT_REFERENCE,
            ProtocolOp::ExtendedRequest(_) => TAG_EXTENDED_REQUEST,
            ProtocolOp::ExtendedResponse(_) => TAG_EXTENDED_RESPONSE,
            ProtocolOp::IntermediateResponse(_) => TAG_INTERMEDIATE_RESPONSE,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProtocolOpParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error(transparent)]
    Malformed(#[from] TlvParseError),
    #[error("unsupported protocolOp tag {0:#04x}")]
    UnsupportedOp(u8),
    #[error(transparent)]
    Bind(#[from] BindParseError),
    #[error(transparent)]
    BindResponse(#[from] BindResponseParseError),
    #[error(transparent)]
    Search(#[from] SearchRequestParseError),
    #[error(transparent)]
    SearchResultEntry(#[from] SearchResultEntryParseError),
    #[error(transparent)]
    Result(#[from] LdapResultParseError),
    #[error(transparent)]
    Modify(#[from] ModifyParseError),
    #[error(transparent)]
    Add(#[from] AddParseError),
    #[error(transparent)]
    ModifyDn(#[from] ModifyDnParseError),
    #[error(transparent)]
    Compare(#[from] CompareParseError),
    #[error(transparent)]
    Extended(#[from] ExtendedParseError),
    #[error(transparent)]
    Del(#[from] DelParseError),
    /// A recoverable error the sender can only find out about from the
    /// server's response, not a dropped connection (spec.md section 7).
    #[error("response-carrying decode error: {reason}")]
    ResponseCarrying {
        reason: &'static str,
        message_id: i32,
        response: Box<LdapResult>,
    },
}

impl ProtocolOp {
    fn parse(data: &[u8], message_id: i32, config: &DecoderConfig) -> Result<(Self, usize), ProtocolOpParseError> {
        if data.is_empty() {
            return Err(ProtocolOpParseError::NeedMoreData(1));
        }
        let allow_null_referral = config.allow_null_referral_in_non_referral_result();
        let outer = Tlv::parse(data)?;
        let op = match outer.tag() {
            TAG_BIND_REQUEST => {
                let (req, _) = BindRequest::parse(outer.value())?;
                ProtocolOp::BindRequest(req)
            }
            TAG_BIND_RESPONSE => {
                let (resp, _) = BindResponse::parse(outer.value(), allow_null_referral)?;
                ProtocolOp::BindResponse(resp)
            }
            TAG_UNBIND_REQUEST => ProtocolOp::UnbindRequest,
            TAG_SEARCH_REQUEST => {
                let (req, _) = SearchRequest::parse(outer.value())?;
                ProtocolOp::SearchRequest(req)
            }
            TAG_SEARCH_RESULT_ENTRY => {
                let (entry, _) = SearchResultEntry::parse(outer.value())?;
                ProtocolOp::SearchResultEntry(entry)
            }
            TAG_SEARCH_RESULT_DONE => {
                let (result, _) = LdapResult::parse(outer.value(), allow_null_referral)?;
                ProtocolOp::SearchResultDone(result)
            }
            TAG_MODIFY_REQUEST => match ModifyRequest::parse(outer.value()) {
                Ok((req, _)) => ProtocolOp::ModifyRequest(req),
                Err(ModifyParseError::Attribute(AttributeParseError::EmptyAttributeType)) => {
                    return Err(ProtocolOpParseError::ResponseCarrying {
                        reason: "ModifyRequest attribute type is empty",
                        message_id,
                        response: Box::new(LdapResult::new(
                            ResultCode::InvalidAttributeSyntax,
                            "",
                            "attribute type must not be empty",
                        )),
                    });
                }
                Err(e) => return Err(e.into()),
            },
            TAG_MODIFY_RESPONSE => {
                let (result, _) = LdapResult::parse(outer.value(), allow_null_referral)?;
                ProtocolOp::ModifyResponse(result)
            }
            TAG_ADD_REQUEST => {
                let (req, _) = AddRequest::parse(outer.value())?;
                ProtocolOp::AddRequest(req)
            }
            TAG_ADD_RESPONSE => {
                let (result, _) = LdapResult::parse(outer.value(), allow_null_referral)?;
                ProtocolOp::AddResponse(result)
            }
            TAG_DEL_REQUEST => ProtocolOp::DelRequest(DelRequest::from_value(outer.value())?),
            TAG_DEL_RESPONSE => {
                let (result, _) = LdapResult::parse(outer.value(), allow_null_referral)?;
                ProtocolOp::DelResponse(result)
            }
            TAG_MODIFY_DN_REQUEST => {
                let (req, _) = ModifyDnRequest::parse(outer.value())?;
                ProtocolOp::ModifyDnRequest(req)
            }
            TAG_MODIFY_DN_RESPONSE => {
                let (result, _) = LdapResult::parse(outer.value(), allow_null_referral)?;
                ProtocolOp::ModifyDnResponse(result)
            }
            TAG_COMPARE_REQUEST => {
                let (req, _) = CompareRequest::parse(outer.value())?;
                ProtocolOp::CompareRequest(req)
            }
            TAG_COMPARE_RESPONSE => {
                let (result, _) = LdapResult::parse(outer.value(), allow_null_referral)?;
                ProtocolOp::CompareResponse(result)
            }
            TAG_ABANDON_REQUEST => ProtocolOp::AbandonRequest(AbandonRequest::from_value(outer.value())),
            TAG_SEARCH_RESULT_REFERENCE => {
                let (reference, _) = SearchResultReference::parse(outer.value())?;
                ProtocolOp::SearchResultReference(reference)
            }
            TAG_EXTENDED_REQUEST => match ExtendedRequest::parse(outer.value()) {
                Ok((req, _)) => ProtocolOp::ExtendedRequest(req),
                Err(ExtendedParseError::InvalidOid(oid)) => {
                    return Err(ProtocolOpParseError::ResponseCarrying {
                        reason: "ExtendedRequest requestName is not a valid LDAPOID",
                        message_id,
                        response: Box::new(LdapResult::new(
                            ResultCode::ProtocolError,
                            "",
                            format!("invalid requestName OID: {oid}"),
                        )),
                    });
                }
                Err(e) => return Err(e.into()),
            },
            TAG_EXTENDED_RESPONSE => {
                let (resp, _) = ExtendedResponse::parse(outer.value(), allow_null_referral)?;
                ProtocolOp::ExtendedResponse(resp)
            }
            TAG_INTERMEDIATE_RESPONSE => {
                let (resp, _) = IntermediateResponse::parse(outer.value())?;
                ProtocolOp::IntermediateResponse(resp)
            }
            found => return Err(ProtocolOpParseError::UnsupportedOp(found)),
        };
        Ok((op, outer.encoded_len()))
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        let mut inner = Vec::new();
        match self {
            ProtocolOp::BindRequest(req) => req.encode(&mut inner),
            ProtocolOp::BindResponse(resp) => resp.encode(&mut inner),
            ProtocolOp::UnbindRequest => {}
            ProtocolOp::SearchRequest(req) => req.encode(&mut inner),
            ProtocolOp::SearchResultEntry(entry) => entry.encode(&mut inner),
            ProtocolOp::SearchResultDone(result) => result.encode(&mut inner),
            ProtocolOp::ModifyRequest(req) => req.encode(&mut inner),
            ProtocolOp::ModifyResponse(result) => result.encode(&mut inner),
            ProtocolOp::AddRequest(req) => req.encode(&mut inner),
            ProtocolOp::AddResponse(result) => result.encode(&mut inner),
            ProtocolOp::DelRequest(req) => inner.extend_from_slice(req.value_bytes()),
            ProtocolOp::DelResponse(result) => result.encode(&mut inner),
            ProtocolOp::ModifyDnRequest(req) => req.encode(&mut inner),
            ProtocolOp::ModifyDnResponse(result) => result.encode(&mut inner),
            ProtocolOp::CompareRequest(req) => req.encode(&mut inner),
            ProtocolOp::CompareResponse(result) => result.encode(&mut inner),
            ProtocolOp::AbandonRequest(req) => inner.extend_from_slice(&req.encode_value()),
            ProtocolOp::SearchResultReference(reference) => reference.encode(&mut inner),
            ProtocolOp::ExtendedRequest(req) => req.encode(&mut inner),
            ProtocolOp::ExtendedResponse(resp) => resp.encode(&mut inner),
            ProtocolOp::IntermediateResponse(resp) => resp.encode(&mut inner),
        }
        buf.push(self.tag());
        let mut len_encoder = crate::ber::BerLengthEncoder::default();
        buf.extend_from_slice(len_encoder.encode(inner.len()));
        buf.extend_from_slice(&inner);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapMessage {
    pub message_id: i32,
    pub protocol_op: ProtocolOp,
    pub controls: Vec<Control>,
}

#[derive(Debug, Error)]
pub enum LdapMessageParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error(transparent)]
    Malformed(#[from] TlvParseError),
    #[error(transparent)]
    MessageId(#[from] LdapMessageIdParseError),
    #[error(transparent)]
    ProtocolOp(#[from] ProtocolOpParseError),
    #[error(transparent)]
    Control(#[from] ControlParseError),
    #[error("PDU of {size} bytes exceeds the configured cap of {max} bytes")]
    PduTooLarge { size: usize, max: usize },
}

impl LdapMessage {
    pub fn new(message_id: i32, protocol_op: ProtocolOp) -> Self {
        LdapMessage {
            message_id,
            protocol_op,
            controls: Vec::new(),
        }
    }

    pub fn with_controls(mut self, controls: Vec<Control>) -> Self {
        self.controls = controls;
        self
    }

    /// Attempts to decode one complete `LDAPMessage` from the front of
    /// `data`, returning the message and the number of bytes it occupied.
    /// Returns `Ok(None)` if `data` does not yet contain a complete PDU.
    pub fn decode(
        data: &[u8],
        config: &DecoderConfig,
    ) -> Result<Option<(Self, usize)>, LdapMessageParseError> {
        let envelope = match Tlv::parse_tag(data, 0x30) {
            Ok(tlv) => tlv,
            Err(TlvParseError::NeedMoreData(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if envelope.encoded_len() > config.max_pdu_bytes() {
            return Err(LdapMessageParseError::PduTooLarge {
                size: envelope.encoded_len(),
                max: config.max_pdu_bytes(),
            });
        }

        let body = envelope.value();
        let message_id_tlv = LdapMessageId::parse(body)?;
        let message_id = message_id_tlv.value();
        let mut offset = message_id_tlv.encoded_len();

        let (protocol_op, op_used) = ProtocolOp::parse(&body[offset..], message_id, config)?;
        offset += op_used;

        let mut controls = Vec::new();
        if offset < body.len() {
            if let Some((parsed_controls, used)) = parse_controls(&body[offset..])? {
                controls = parsed_controls;
                offset += used;
            }
        }

        Ok(Some((
            LdapMessage {
                message_id,
                protocol_op,
                controls,
            },
            envelope.encoded_len(),
        )))
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        let mut body = Vec::new();
        LdapMessageId::encode(&mut body, self.message_id);
        self.protocol_op.encode(&mut body);
        encode_controls(&mut body, &self.controls);

        buf.push(0x30);
        let mut len_encoder = crate::ber::BerLengthEncoder::default();
        buf.extend_from_slice(len_encoder.encode(body.len()));
        buf.extend_from_slice(&body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbind_roundtrips() {
        let message = LdapMessage::new(1, ProtocolOp::UnbindRequest);
        let mut buf = Vec::new();
        message.encode(&mut buf);
        assert_eq!(buf, vec![0x30, 0x05, 0x02, 0x01, 0x01, 0x42, 0x00]);

        let config = DecoderConfig::default();
        let (decoded, used) = LdapMessage::decode(&buf, &config).unwrap().unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, message);
    }

    #[test]
    fn delete_response_default_success_roundtrips() {
        let message = LdapMessage::new(
            42,
            ProtocolOp::DelResponse(LdapResult::success()),
        );
        let mut buf = Vec::new();
        message.encode(&mut buf);
        assert_eq!(
            buf,
            vec![
                0x30, 0x0c, 0x02, 0x01, 0x2a, 0x6b, 0x07, 0x0a, 0x01, 0x00, 0x04, 0x00, 0x04, 0x00,
            ]
        );

        let config = DecoderConfig::default();
        let (decoded, used) = LdapMessage::decode(&buf, &config).unwrap().unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, message);
    }

    #[test]
    fn abandon_request_roundtrips() {
        let message = LdapMessage::new(7, ProtocolOp::AbandonRequest(AbandonRequest { message_id: 3 }));
        let mut buf = Vec::new();
        message.encode(&mut buf);
        assert_eq!(buf, vec![0x30, 0x06, 0x02, 0x01, 0x07, 0x50, 0x01, 0x03]);

        let config = DecoderConfig::default();
        let (decoded, used) = LdapMessage::decode(&buf, &config).unwrap().unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, message);
    }

    #[test]
    fn partial_pdu_returns_none() {
        let message = LdapMessage::new(1, ProtocolOp::UnbindRequest);
        let mut buf = Vec::new();
        message.encode(&mut buf);
        let config = DecoderConfig::default();
        assert!(LdapMessage::decode(&buf[..buf.len() - 1], &config).unwrap().is_none());
    }

    #[test]
    fn pdu_too_large_is_rejected() {
        let message = LdapMessage::new(
            1,
            ProtocolOp::AddRequest(super::super::add::AddRequest {
                entry: "cn=x".repeat(100),
                attributes: vec![],
            }),
        );
        let mut buf = Vec::new();
        message.encode(&mut buf);
        let mut config = DecoderConfig::default();
        config.set_max_pdu_bytes(8);
        assert!(matches!(
            LdapMessage::decode(&buf, &config),
            Err(LdapMessageParseError::PduTooLarge { .. })
        ));
    }

    #[test]
    fn modify_request_with_empty_attribute_type_is_response_carrying() {
        use super::super::modify::{Change, ModifyOperation};
        use crate::ldap::PartialAttribute;

        let request = ModifyRequest {
            object: "cn=counter,dc=example,dc=com".to_string(),
            changes: vec![Change {
                operation: ModifyOperation::Increment,
                modification: PartialAttribute {
                    attribute_desc: String::new(),
                    values: vec![b"1".to_vec()],
                },
            }],
        };
        let mut inner = Vec::new();
        request.encode(&mut inner);
        let config = DecoderConfig::default();
        match ProtocolOp::parse(&inner, 9, &config).unwrap_err() {
            ProtocolOpParseError::ResponseCarrying { message_id, response, .. } => {
                assert_eq!(message_id, 9);
                assert_eq!(response.result_code(), ResultCode::InvalidAttributeSyntax);
            }
            other => panic!("expected ResponseCarrying, got {other:?}"),
        }
    }

    #[test]
    fn extended_request_with_invalid_oid_is_response_carrying() {
        let request = ExtendedRequest {
            request_name: "not-an-oid".to_string(),
            request_value: None,
        };
        let mut inner = Vec::new();
        request.encode(&mut inner);
        let config = DecoderConfig::default();
        match ProtocolOp::parse(&inner, 4, &config).unwrap_err() {
            ProtocolOpParseError::ResponseCarrying { message_id, response, .. } => {
                assert_eq!(message_id, 4);
                assert_eq!(response.result_code(), ResultCode::ProtocolError);
            }
            other => panic!("expected ResponseCarrying, got {other:?}"),
        }
    }

    #[test]
    fn message_with_controls_roundtrips() {
        let message = LdapMessage::new(5, ProtocolOp::UnbindRequest)
            .with_controls(vec![Control::new("1.2.3.4", true, Some(b"x".to_vec()))]);
        let mut buf = Vec::new();
        message.encode(&mut buf);
        let config = DecoderConfig::default();
        let (decoded, used) = LdapMessage::decode(&buf, &config).unwrap().unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, message);
    }
}
