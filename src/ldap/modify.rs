/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! `ModifyRequest` (RFC 4511 section 4.6). `ModifyResponse` carries no
//! fields beyond `LDAPResult` and is represented directly by
//! [`super::result::LdapResult`].

use thiserror::Error;

use crate::ber::encode_octet_string;
use crate::dn::is_valid_dn;
use crate::tlv::{Tlv, TlvParseError};

use super::attribute::{AttributeParseError, PartialAttribute};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyOperation {
    Add,
    Delete,
    Replace,
    Increment,
}

impl ModifyOperation {
    fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(ModifyOperation::Add),
            1 => Some(ModifyOperation::Delete),
            2 => Some(ModifyOperation::Replace),
            3 => Some(ModifyOperation::Increment),
            _ => None,
        }
    }

    fn to_i64(self) -> i64 {
        match self {
            ModifyOperation::Add => 0,
            ModifyOperation::Delete => 1,
            ModifyOperation::Replace => 2,
            ModifyOperation::Increment => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub operation: ModifyOperation,
    pub modification: PartialAttribute,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyRequest {
    pub object: String,
    pub changes: Vec<Change>,
}

#[derive(Debug, Error)]
pub enum ModifyParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error(transparent)]
    Malformed(#[from] TlvParseError),
    #[error("invalid modify operation code {0}")]
    InvalidOperation(i64),
    #[error(transparent)]
    Attribute(#[from] AttributeParseError),
    #[error("invalid LDAPDN: {0}")]
    InvalidDn(String),
}

impl ModifyRequest {
    pub fn parse(data: &[u8]) -> Result<(Self, usize), ModifyParseError> {
        let object_tlv = Tlv::parse_tag(data, 0x04)?;
        let object = String::from_utf8_lossy(object_tlv.value()).into_owned();
        if !is_valid_dn(&object) {
            return Err(ModifyParseError::InvalidDn(object));
        }
        let mut offset = object_tlv.encoded_len();

        let changes_tlv = Tlv::parse_tag(&data[offset..], 0x30)?;
        let mut changes = Vec::new();
        let mut change_offset = 0;
        while change_offset < changes_tlv.value().len() {
            let change_outer = Tlv::parse_tag(&changes_tlv.value()[change_offset..], 0x30)?;
            let op_tlv = Tlv::parse_tag(change_outer.value(), 0x0a)?;
            let op_value = decode_enumerated(op_tlv.value());
            let operation = ModifyOperation::from_i64(op_value)
                .ok_or(ModifyParseError::InvalidOperation(op_value))?;
            let (modification, _used) =
                PartialAttribute::parse(&change_outer.value()[op_tlv.encoded_len()..])?;
            changes.push(Change {
                operation,
                modification,
            });
            change_offset += change_outer.encoded_len();
        }
        offset += changes_tlv.encoded_len();

        Ok((ModifyRequest { object, changes }, offset))
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        encode_octet_string(buf, 0x04, self.object.as_bytes());
        let mut inner = Vec::new();
        for change in &self.changes {
            let mut change_buf = Vec::new();
            let mut int_encoder = crate::ber::BerIntegerEncoder::default();
            change_buf.extend_from_slice(int_encoder.encode_enumerated(change.operation.to_i64()));
            change.modification.encode(&mut change_buf);
            inner.push(0x30);
            let mut len_encoder = crate::ber::BerLengthEncoder::default();
            inner.extend_from_slice(len_encoder.encode(change_buf.len()));
            inner.extend_from_slice(&change_buf);
        }
        buf.push(0x30);
        let mut len_encoder = crate::ber::BerLengthEncoder::default();
        buf.extend_from_slice(len_encoder.encode(inner.len()));
        buf.extend_from_slice(&inner);
    }
}

fn decode_enumerated(bytes: &[u8]) -> i64 {
    let mut value: i64 = 0;
    for &b in bytes {
        value = (value << 8) | b as i64;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modify_request_roundtrips() {
        let request = ModifyRequest {
            object: "cn=admin,dc=example,dc=com".to_string(),
            changes: vec![
                Change {
                    operation: ModifyOperation::Replace,
                    modification: PartialAttribute {
                        attribute_desc: "mail".to_string(),
                        values: vec![b"new@example.com".to_vec()],
                    },
                },
                Change {
                    operation: ModifyOperation::Delete,
                    modification: PartialAttribute {
                        attribute_desc: "description".to_string(),
                        values: vec![],
                    },
                },
            ],
        };
        let mut buf = Vec::new();
        request.encode(&mut buf);
        let (decoded, used) = ModifyRequest::parse(&buf).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, request);
    }

    #[test]
    fn increment_operation_roundtrips() {
        let request = ModifyRequest {
            object: "cn=counter,dc=example,dc=com".to_string(),
            changes: vec![Change {
                operation: ModifyOperation::Increment,
                modification: PartialAttribute {
                    attribute_desc: "uidNumber".to_string(),
                    values: vec![b"1".to_vec()],
                },
            }],
        };
        let mut buf = Vec::new();
        request.encode(&mut buf);
        let (decoded, used) = ModifyRequest::parse(&buf).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, request);
    }

    #[test]
    fn rejects_malformed_object() {
        let mut buf = Vec::new();
        encode_octet_string(&mut buf, 0x04, b"cn=a,,dc=com");
        buf.push(0x30);
        buf.push(0x00);
        assert!(matches!(ModifyRequest::parse(&buf), Err(ModifyParseError::InvalidDn(_))));
    }
}
