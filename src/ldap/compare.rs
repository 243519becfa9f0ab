/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! `CompareRequest` (RFC 4511 section 4.10). `CompareResponse` carries no
//! fields beyond `LDAPResult`; its `resultCode` is `compareTrue` or
//! `compareFalse` rather than `success`, both of which are represented
//! directly by [`super::result::LdapResult`].

use thiserror::Error;

use crate::ber::encode_octet_string;
use crate::dn::is_valid_dn;
use crate::tlv::{Tlv, TlvParseError};

use super::attribute::{AttributeParseError, AttributeValueAssertion};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareRequest {
    pub entry: String,
    pub ava: AttributeValueAssertion,
}

#[derive(Debug, Error)]
pub enum CompareParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error(transparent)]
    Malformed(#[from] TlvParseError),
    #[error(transparent)]
    Attribute(#[from] AttributeParseError),
    #[error("invalid LDAPDN: {0}")]
    InvalidDn(String),
}

impl CompareRequest {
    pub fn parse(data: &[u8]) -> Result<(Self, usize), CompareParseError> {
        let entry_tlv = Tlv::parse_tag(data, 0x04)?;
        let entry = String::from_utf8_lossy(entry_tlv.value()).into_owned();
        if !is_valid_dn(&entry) {
            return Err(CompareParseError::InvalidDn(entry));
        }
        let offset = entry_tlv.encoded_len();

        let (ava, ava_used) = AttributeValueAssertion::parse(&data[offset..])?;

        Ok((CompareRequest { entry, ava }, offset + ava_used))
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        encode_octet_string(buf, 0x04, self.entry.as_bytes());
        self.ava.encode(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_with_binary_assertion_value() {
        let request = CompareRequest {
            entry: "cn=admin,dc=example,dc=com".to_string(),
            ava: AttributeValueAssertion {
                attribute_desc: "userPassword".to_string(),
                assertion_value: vec![0x00, 0xDE, 0xAD, 0x00, 0xBE, 0xEF],
            },
        };
        let mut buf = Vec::new();
        request.encode(&mut buf);
        let (decoded, used) = CompareRequest::parse(&buf).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, request);
    }

    #[test]
    fn rejects_malformed_entry() {
        let mut buf = Vec::new();
        encode_octet_string(&mut buf, 0x04, b"cn=a,,dc=com");
        assert!(matches!(CompareRequest::parse(&buf), Err(CompareParseError::InvalidDn(_))));
    }
}
