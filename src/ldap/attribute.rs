/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! `PartialAttribute`/`Attribute` (RFC 4511 section 4.1.7/4.1.8): an
//! attribute description paired with a `SET OF` values. `Attribute`
//! additionally requires at least one value; `PartialAttribute` (used by
//! `SearchResultEntry` and `Modify`) allows zero, which for `Modify` means
//! "delete all values of this attribute".

use thiserror::Error;

use crate::ber::encode_octet_string;
use crate::tlv::{TlvCursor, TlvParseError};

#[derive(Debug, Error)]
pub enum AttributeParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error(transparent)]
    Malformed(#[from] TlvParseError),
    #[error("attribute must carry at least one value")]
    NoValues,
    #[error("attribute type must not be empty")]
    EmptyAttributeType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialAttribute {
    pub attribute_desc: String,
    pub values: Vec<Vec<u8>>,
}

impl PartialAttribute {
    /// Parses a `PartialAttribute` SEQUENCE (tag 0x30), returning the
    /// number of bytes consumed.
    pub fn parse(data: &[u8]) -> Result<(Self, usize), AttributeParseError> {
        let outer = crate::tlv::Tlv::parse_tag(data, 0x30)?;
        let mut cursor = TlvCursor::new(outer.value());
        let desc_tlv = cursor
            .next()?
            .ok_or(AttributeParseError::NeedMoreData(1))?;
        let attribute_desc = String::from_utf8_lossy(desc_tlv.value()).into_owned();
        if attribute_desc.is_empty() {
            return Err(AttributeParseError::EmptyAttributeType);
        }

        let values_tlv = cursor
            .next()?
            .ok_or(AttributeParseError::NeedMoreData(1))?;
        let mut values = Vec::new();
        let mut inner = TlvCursor::new(values_tlv.value());
        while let Some(tlv) = inner.next()? {
            values.push(tlv.value().to_vec());
        }

        Ok((
            PartialAttribute {
                attribute_desc,
                values,
            },
            outer.encoded_len(),
        ))
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        let mut inner = Vec::new();
        encode_octet_string(&mut inner, 0x04, self.attribute_desc.as_bytes());
        let mut values = Vec::new();
        for value in &self.values {
            encode_octet_string(&mut values, 0x04, value);
        }
        encode_set(&mut inner, 0x31, &values);
        encode_set(buf, 0x30, &inner);
    }

    pub fn into_attribute(self) -> Result<Attribute, AttributeParseError> {
        if self.values.is_empty() {
            return Err(AttributeParseError::NoValues);
        }
        Ok(Attribute {
            attribute_desc: self.attribute_desc,
            values: self.values,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub attribute_desc: String,
    pub values: Vec<Vec<u8>>,
}

impl Attribute {
    pub fn new(attribute_desc: impl Into<String>, values: Vec<Vec<u8>>) -> Self {
        Attribute {
            attribute_desc: attribute_desc.into(),
            values,
        }
    }

    pub fn parse(data: &[u8]) -> Result<(Self, usize), AttributeParseError> {
        let (partial, used) = PartialAttribute::parse(data)?;
        let attribute = partial.into_attribute()?;
        Ok((attribute, used))
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        PartialAttribute {
            attribute_desc: self.attribute_desc.clone(),
            values: self.values.clone(),
        }
        .encode(buf);
    }
}

fn encode_set(buf: &mut Vec<u8>, tag: u8, inner: &[u8]) {
    buf.push(tag);
    let mut len_encoder = crate::ber::BerLengthEncoder::default();
    buf.extend_from_slice(len_encoder.encode(inner.len()));
    buf.extend_from_slice(inner);
}

/// `AttributeValueAssertion` (RFC 4511 section 4.1.8): the type/value pair
/// used directly by `CompareRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValueAssertion {
    pub attribute_desc: String,
    pub assertion_value: Vec<u8>,
}

impl AttributeValueAssertion {
    pub fn parse(data: &[u8]) -> Result<(Self, usize), AttributeParseError> {
        let outer = crate::tlv::Tlv::parse_tag(data, 0x30)?;
        let mut cursor = TlvCursor::new(outer.value());
        let desc_tlv = cursor
            .next()?
            .ok_or(AttributeParseError::NeedMoreData(1))?;
        let value_tlv = cursor
            .next()?
            .ok_or(AttributeParseError::NeedMoreData(1))?;
        Ok((
            AttributeValueAssertion {
                attribute_desc: String::from_utf8_lossy(desc_tlv.value()).into_owned(),
                assertion_value: value_tlv.value().to_vec(),
            },
            outer.encoded_len(),
        ))
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        let mut inner = Vec::new();
        encode_octet_string(&mut inner, 0x04, self.attribute_desc.as_bytes());
        encode_octet_string(&mut inner, 0x04, &self.assertion_value);
        encode_set(buf, 0x30, &inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_attribute_roundtrips() {
        let attr = PartialAttribute {
            attribute_desc: "mail".to_string(),
            values: vec![b"a@example.com".to_vec(), b"b@example.com".to_vec()],
        };
        let mut buf = Vec::new();
        attr.encode(&mut buf);
        let (decoded, used) = PartialAttribute::parse(&buf).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, attr);
    }

    #[test]
    fn partial_attribute_allows_zero_values() {
        let attr = PartialAttribute {
            attribute_desc: "description".to_string(),
            values: vec![],
        };
        let mut buf = Vec::new();
        attr.encode(&mut buf);
        let (decoded, _) = PartialAttribute::parse(&buf).unwrap();
        assert_eq!(decoded, attr);
        assert!(decoded.into_attribute().is_err());
    }

    #[test]
    fn partial_attribute_rejects_empty_type() {
        let attr = PartialAttribute {
            attribute_desc: String::new(),
            values: vec![b"x".to_vec()],
        };
        let mut buf = Vec::new();
        attr.encode(&mut buf);
        assert!(matches!(PartialAttribute::parse(&buf), Err(AttributeParseError::EmptyAttributeType)));
    }

    #[test]
    fn attribute_requires_at_least_one_value() {
        let attr = Attribute::new("cn", vec![b"admin".to_vec()]);
        let mut buf = Vec::new();
        attr.encode(&mut buf);
        let (decoded, used) = Attribute::parse(&buf).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, attr);
    }

    #[test]
    fn ava_roundtrips_with_binary_value() {
        let ava = AttributeValueAssertion {
            attribute_desc: "userPassword".to_string(),
            assertion_value: vec![0x00, 0x01, 0xFF],
        };
        let mut buf = Vec::new();
        ava.encode(&mut buf);
        let (decoded, used) = AttributeValueAssertion::parse(&buf).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, ava);
    }
}
