/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! `ExtendedRequest`/`ExtendedResponse`/`IntermediateResponse` (RFC 4511
//! sections 4.12, 4.13). A server may send an `ExtendedResponse` with
//! `messageID` 0 and `responseName`
//! `1.3.6.1.4.1.1466.20036` (Notice of Disconnection) without a matching
//! request; that is an `Unsolicited Notification` (section 4.4) and is not
//! modeled as a distinct type here, only as a messageID the envelope layer
//! permits for this one operation.

use thiserror::Error;

use crate::ber::encode_octet_string;
use crate::oid::is_valid_oid;
use crate::tlv::{Tlv, TlvParseError};

use super::result::{LdapResult, LdapResultParseError};

const TAG_REQUEST_NAME: u8 = 0x80;
const TAG_REQUEST_VALUE: u8 = 0x81;
const TAG_RESPONSE_NAME: u8 = 0x8a;
const TAG_RESPONSE_VALUE: u8 = 0x8b;
const TAG_INTERMEDIATE_RESPONSE_NAME: u8 = 0x80;
const TAG_INTERMEDIATE_RESPONSE_VALUE: u8 = 0x81;

pub const OID_NOTICE_OF_DISCONNECTION: &str = "1.3.6.1.4.1.1466.20036";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedRequest {
    pub request_name: String,
    pub request_value: Option<Vec<u8>>,
}

#[derive(Debug, Error)]
pub enum ExtendedParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error(transparent)]
    Malformed(#[from] TlvParseError),
    #[error("invalid LDAPOID: {0}")]
    InvalidOid(String),
}

impl ExtendedRequest {
    pub fn parse(data: &[u8]) -> Result<(Self, usize), ExtendedParseError> {
        let name_tlv = Tlv::parse_tag(data, TAG_REQUEST_NAME)?;
        let request_name = String::from_utf8_lossy(name_tlv.value()).into_owned();
        if !is_valid_oid(&request_name) {
            return Err(ExtendedParseError::InvalidOid(request_name));
        }
        let mut offset = name_tlv.encoded_len();

        let mut request_value = None;
        if offset < data.len() && data[offset] == TAG_REQUEST_VALUE {
            let tlv = Tlv::parse_tag(&data[offset..], TAG_REQUEST_VALUE)?;
            request_value = Some(tlv.value().to_vec());
            offset += tlv.encoded_len();
        }

        Ok((
            ExtendedRequest {
                request_name,
                request_value,
            },
            offset,
        ))
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        encode_octet_string(buf, TAG_REQUEST_NAME, self.request_name.as_bytes());
        if let Some(value) = &self.request_value {
            encode_octet_string(buf, TAG_REQUEST_VALUE, value);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedResponse {
    pub result: LdapResult,
    pub response_name: Option<String>,
    pub response_value: Option<Vec<u8>>,
}

impl ExtendedResponse {
    pub fn parse(
        data: &[u8],
        allow_null_referral_in_non_referral_result: bool,
    ) -> Result<(Self, usize), LdapResultParseError> {
        let (result, mut consumed) = LdapResult::parse(data, allow_null_referral_in_non_referral_result)?;

        let mut response_name = None;
        if consumed < data.len() && data[consumed] == TAG_RESPONSE_NAME {
            let tlv = Tlv::parse_tag(&data[consumed..], TAG_RESPONSE_NAME)?;
            response_name = Some(String::from_utf8_lossy(tlv.value()).into_owned());
            consumed += tlv.encoded_len();
        }

        let mut response_value = None;
        if consumed < data.len() && data[consumed] == TAG_RESPONSE_VALUE {
            let tlv = Tlv::parse_tag(&data[consumed..], TAG_RESPONSE_VALUE)?;
            response_value = Some(tlv.value().to_vec());
            consumed += tlv.encoded_len();
        }

        Ok((
            ExtendedResponse {
                result,
                response_name,
                response_value,
            },
            consumed,
        ))
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        self.result.encode(buf);
        if let Some(name) = &self.response_name {
            encode_octet_string(buf, TAG_RESPONSE_NAME, name.as_bytes());
        }
        if let Some(value) = &self.response_value {
            encode_octet_string(buf, TAG_RESPONSE_VALUE, value);
        }
    }

    pub fn notice_of_disconnection(result: LdapResult) -> Self {
        ExtendedResponse {
            result,
            response_name: Some(OID_NOTICE_OF_DISCONNECTION.to_string()),
            response_value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntermediateResponse {
    pub response_name: Option<String>,
    pub response_value: Option<Vec<u8>>,
}

impl IntermediateResponse {
    pub fn parse(data: &[u8]) -> Result<(Self, usize), ExtendedParseError> {
        let mut offset = 0;
        let mut response_name = None;
        if offset < data.len() && data[offset] == TAG_INTERMEDIATE_RESPONSE_NAME {
            let tlv = Tlv::parse_tag(&data[offset..], TAG_INTERMEDIATE_RESPONSE_NAME)?;
            response_name = Some(String::from_utf8_lossy(tlv.value()).into_owned());
            offset += tlv.encoded_len();
        }
        let mut response_value = None;
        if offset < data.len() && data[offset] == TAG_INTERMEDIATE_RESPONSE_VALUE {
            let tlv = Tlv::parse_tag(&data[offset..], TAG_INTERMEDIATE_RESPONSE_VALUE)?;
            response_value = Some(tlv.value().to_vec());
            offset += tlv.encoded_len();
        }
        Ok((
            IntermediateResponse {
                response_name,
                response_value,
            },
            offset,
        ))
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        if let Some(name) = &self.response_name {
            encode_octet_string(buf, TAG_INTERMEDIATE_RESPONSE_NAME, name.as_bytes());
        }
        if let Some(value) = &self.response_value {
            encode_octet_string(buf, TAG_INTERMEDIATE_RESPONSE_VALUE, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ldap::result::ResultCode;

    #[test]
    fn extended_request_roundtrips() {
        let request = ExtendedRequest {
            request_name: "1.3.6.1.4.1.4203.1.11.1".to_string(),
            request_value: Some(b"payload".to_vec()),
        };
        let mut buf = Vec::new();
        request.encode(&mut buf);
        let (decoded, used) = ExtendedRequest::parse(&buf).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, request);
    }

    #[test]
    fn notice_of_disconnection_roundtrips() {
        let response = ExtendedResponse::notice_of_disconnection(LdapResult::new(
            ResultCode::Unavailable,
            "",
            "server shutting down",
        ));
        let mut buf = Vec::new();
        response.encode(&mut buf);
        let (decoded, used) = ExtendedResponse::parse(&buf, true).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded.response_name.as_deref(), Some(OID_NOTICE_OF_DISCONNECTION));
    }

    #[test]
    fn intermediate_response_with_no_fields_roundtrips() {
        let response = IntermediateResponse::default();
        let mut buf = Vec::new();
        response.encode(&mut buf);
        assert!(buf.is_empty());
        let (decoded, used) = IntermediateResponse::parse(&buf).unwrap();
        assert_eq!(used, 0);
        assert_eq!(decoded, response);
    }
}
