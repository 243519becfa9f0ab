/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! `BindRequest`/`BindResponse` (RFC 4511 section 4.2).

use thiserror::Error;

use crate::ber::{BerInteger, BerIntegerEncoder, BerIntegerParseError, encode_octet_string};
use crate::dn::is_valid_dn;
use crate::tlv::{Tlv, TlvCursor, TlvParseError};

use super::result::{LdapResult, LdapResultParseError};

const TAG_SIMPLE: u8 = 0x80;
const TAG_SASL: u8 = 0xa3;
const TAG_SERVER_SASL_CREDS: u8 = 0x87;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationChoice {
    Simple(Vec<u8>),
    Sasl { mechanism: String, credentials: Option<Vec<u8>> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindRequest {
    pub version: i64,
    pub name: String,
    pub authentication: AuthenticationChoice,
}

#[derive(Debug, Error)]
pub enum BindParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error(transparent)]
    Malformed(#[from] TlvParseError),
    #[error("invalid LDAPDN: {0}")]
    InvalidDn(String),
}

impl From<BerIntegerParseError> for BindParseError {
    fn from(value: BerIntegerParseError) -> Self {
        match value {
            BerIntegerParseError::NeedMoreData(n) => BindParseError::NeedMoreData(n),
            _ => BindParseError::Malformed(TlvParseError::LengthInconsistent),
        }
    }
}

impl BindRequest {
    /// Parses the contents of a BindRequest (tag 0x60 already stripped by
    /// the caller's operation dispatch).
    pub fn parse(data: &[u8]) -> Result<(Self, usize), BindParseError> {
        let version_tlv = BerInteger::parse(data)?;
        let version = version_tlv.value();
        let mut offset = version_tlv.encoded_len();

        let name_tlv = Tlv::parse_tag(&data[offset..], 0x04)?;
        let name = String::from_utf8_lossy(name_tlv.value()).into_owned();
        if !is_valid_dn(&name) {
            return Err(BindParseError::InvalidDn(name));
        }
        offset += name_tlv.encoded_len();

        let auth_tlv = Tlv::parse(&data[offset..])?;
        let authentication = match auth_tlv.tag() {
            TAG_SIMPLE => AuthenticationChoice::Simple(auth_tlv.value().to_vec()),
            TAG_SASL => {
                let mut cursor = TlvCursor::new(auth_tlv.value());
                let mechanism_tlv = cursor.next()?.ok_or(BindParseError::NeedMoreData(1))?;
                let mechanism = String::from_utf8_lossy(mechanism_tlv.value()).into_owned();
                let credentials = cursor.next()?.map(|tlv| tlv.value().to_vec());
                AuthenticationChoice::Sasl {
                    mechanism,
                    credentials,
                }
            }
            found => {
                return Err(BindParseError::Malformed(TlvParseError::UnexpectedTag {
                    expected: TAG_SIMPLE,
                    found,
                }));
            }
        };
        offset += auth_tlv.encoded_len();

        Ok((
            BindRequest {
                version,
                name,
                authentication,
            },
            offset,
        ))
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        let mut encoder = BerIntegerEncoder::default();
        buf.extend_from_slice(encoder.encode(self.version));
        encode_octet_string(buf, 0x04, self.name.as_bytes());
        match &self.authentication {
            AuthenticationChoice::Simple(password) => {
                encode_octet_string(buf, TAG_SIMPLE, password);
            }
            AuthenticationChoice::Sasl {
                mechanism,
                credentials,
            } => {
                let mut inner = Vec::new();
                encode_octet_string(&mut inner, 0x04, mechanism.as_bytes());
                if let Some(credentials) = credentials {
                    encode_octet_string(&mut inner, 0x04, credentials);
                }
                buf.push(TAG_SASL);
                let mut len_encoder = crate::ber::BerLengthEncoder::default();
                buf.extend_from_slice(len_encoder.encode(inner.len()));
                buf.extend_from_slice(&inner);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindResponse {
    pub result: LdapResult,
    pub server_sasl_creds: Option<Vec<u8>>,
}

#[derive(Debug, Error)]
pub enum BindResponseParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error(transparent)]
    Result(#[from] LdapResultParseError),
}

impl BindResponse {
    pub fn parse(
        data: &[u8],
        allow_null_referral_in_non_referral_result: bool,
    ) -> Result<(Self, usize), BindResponseParseError> {
        let (result, mut consumed) = LdapResult::parse(data, allow_null_referral_in_non_referral_result)?;
        let mut server_sasl_creds = None;
        if consumed < data.len() && data[consumed] == TAG_SERVER_SASL_CREDS {
            let tlv = Tlv::parse_tag(&data[consumed..], TAG_SERVER_SASL_CREDS)
                .map_err(LdapResultParseError::from)?;
            server_sasl_creds = Some(tlv.value().to_vec());
            consumed += tlv.encoded_len();
        }
        Ok((
            BindResponse {
                result,
                server_sasl_creds,
            },
            consumed,
        ))
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        self.result.encode(buf);
        if let Some(creds) = &self.server_sasl_creds {
            encode_octet_string(buf, TAG_SERVER_SASL_CREDS, creds);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ldap::result::ResultCode;

    #[test]
    fn simple_bind_roundtrips() {
        let request = BindRequest {
            version: 3,
            name: String::new(),
            authentication: AuthenticationChoice::Simple(Vec::new()),
        };
        let mut buf = Vec::new();
        request.encode(&mut buf);
        let (decoded, used) = BindRequest::parse(&buf).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, request);
    }

    #[test]
    fn sasl_bind_roundtrips() {
        let request = BindRequest {
            version: 3,
            name: "cn=admin,dc=example,dc=com".to_string(),
            authentication: AuthenticationChoice::Sasl {
                mechanism: "CRAM-MD5".to_string(),
                credentials: Some(b"response".to_vec()),
            },
        };
        let mut buf = Vec::new();
        request.encode(&mut buf);
        let (decoded, used) = BindRequest::parse(&buf).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, request);
    }

    #[test]
    fn simple_bind_rejects_malformed_dn() {
        let mut buf = Vec::new();
        let mut encoder = BerIntegerEncoder::default();
        buf.extend_from_slice(encoder.encode(3));
        encode_octet_string(&mut buf, 0x04, b"cn=admin,,dc=com");
        encode_octet_string(&mut buf, TAG_SIMPLE, b"");
        assert!(matches!(BindRequest::parse(&buf), Err(BindParseError::InvalidDn(_))));
    }

    #[test]
    fn bind_response_with_sasl_creds_roundtrips() {
        let response = BindResponse {
            result: LdapResult::new(ResultCode::SaslBindInProgress, "", ""),
            server_sasl_creds: Some(b"challenge".to_vec()),
        };
        let mut buf = Vec::new();
        response.encode(&mut buf);
        let (decoded, used) = BindResponse::parse(&buf, true).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, response);
    }
}
