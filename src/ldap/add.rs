/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! `AddRequest` (RFC 4511 section 4.7). `AddResponse` carries no fields
//! beyond `LDAPResult` and is represented directly by
//! [`super::result::LdapResult`].

use thiserror::Error;

use crate::ber::encode_octet_string;
use crate::dn::is_valid_dn;
use crate::tlv::{Tlv, TlvParseError};

use super::attribute::{Attribute, AttributeParseError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRequest {
    pub entry: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Error)]
pub enum AddParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error(transparent)]
    Malformed(#[from] TlvParseError),
    #[error(transparent)]
    Attribute(#[from] AttributeParseError),
    #[error("invalid LDAPDN: {0}")]
    InvalidDn(String),
}

impl AddRequest {
    pub fn parse(data: &[u8]) -> Result<(Self, usize), AddParseError> {
        let entry_tlv = Tlv::parse_tag(data, 0x04)?;
        let entry = String::from_utf8_lossy(entry_tlv.value()).into_owned();
        if !is_valid_dn(&entry) {
            return Err(AddParseError::InvalidDn(entry));
        }
        let mut offset = entry_tlv.encoded_len();

        let attrs_tlv = Tlv::parse_tag(&data[offset..], 0x30)?;
        let mut attributes = Vec::new();
        let mut attr_offset = 0;
        while attr_offset < attrs_tlv.value().len() {
            let (attribute, used) = Attribute::parse(&attrs_tlv.value()[attr_offset..])?;
            attributes.push(attribute);
            attr_offset += used;
        }
        offset += attrs_tlv.encoded_len();

        Ok((AddRequest { entry, attributes }, offset))
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        encode_octet_string(buf, 0x04, self.entry.as_bytes());
        let mut inner = Vec::new();
        for attribute in &self.attributes {
            attribute.encode(&mut inner);
        }
        buf.push(0x30);
        let mut len_encoder = crate::ber::BerLengthEncoder::default();
        buf.extend_from_slice(len_encoder.encode(inner.len()));
        buf.extend_from_slice(&inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_request_preserves_attribute_and_value_order() {
        let request = AddRequest {
            entry: "cn=new,dc=example,dc=com".to_string(),
            attributes: vec![
                Attribute::new("objectClass", vec![b"top".to_vec(), b"person".to_vec()]),
                Attribute::new("cn", vec![b"new".to_vec()]),
            ],
        };
        let mut buf = Vec::new();
        request.encode(&mut buf);
        let (decoded, used) = AddRequest::parse(&buf).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, request);
    }

    #[test]
    fn add_request_rejects_malformed_entry() {
        let mut buf = Vec::new();
        encode_octet_string(&mut buf, 0x04, b"cn=a,,dc=com");
        buf.push(0x30);
        buf.push(0x00);
        assert!(matches!(AddRequest::parse(&buf), Err(AddParseError::InvalidDn(_))));
    }
}
