/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! `SearchRequest`/`SearchResultEntry`/`SearchResultReference` (RFC 4511
//! section 4.5). `SearchResultDone` carries no fields beyond `LDAPResult`
//! and is represented directly by [`super::result::LdapResult`].

use thiserror::Error;

use crate::ber::{BerBoolean, BerBooleanParseError, BerInteger, BerIntegerEncoder, BerIntegerParseError, encode_bool, encode_octet_string};
use crate::dn::is_valid_dn;
use crate::tlv::{Tlv, TlvCursor, TlvParseError};

use super::attribute::{AttributeParseError, PartialAttribute};
use super::filter::{Filter, FilterParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    BaseObject,
    SingleLevel,
    WholeSubtree,
}

impl Scope {
    fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Scope::BaseObject),
            1 => Some(Scope::SingleLevel),
            2 => Some(Scope::WholeSubtree),
            _ => None,
        }
    }

    fn to_i64(self) -> i64 {
        match self {
            Scope::BaseObject => 0,
            Scope::SingleLevel => 1,
            Scope::WholeSubtree => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerefAliases {
    NeverDerefAliases,
    DerefInSearching,
    DerefFindingBaseObj,
    DerefAlways,
}

impl DerefAliases {
    fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(DerefAliases::NeverDerefAliases),
            1 => Some(DerefAliases::DerefInSearching),
            2 => Some(DerefAliases::DerefFindingBaseObj),
            3 => Some(DerefAliases::DerefAlways),
            _ => None,
        }
    }

    fn to_i64(self) -> i64 {
        match self {
            DerefAliases::NeverDerefAliases => 0,
            DerefAliases::DerefInSearching => 1,
            DerefAliases::DerefFindingBaseObj => 2,
            DerefAliases::DerefAlways => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub base_object: String,
    pub scope: Scope,
    pub deref_aliases: DerefAliases,
    pub size_limit: i64,
    pub time_limit: i64,
    pub types_only: bool,
    pub filter: Filter,
    /// `"*"` (all user attributes), `"+"` (all operational attributes) and
    /// `"1.1"` (no attributes) are carried through as opaque strings; this
    /// codec does not interpret attribute-selector semantics.
    pub attributes: Vec<String>,
}

#[derive(Debug, Error)]
pub enum SearchRequestParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error(transparent)]
    Malformed(#[from] TlvParseError),
    #[error("invalid scope value {0}")]
    InvalidScope(i64),
    #[error("invalid derefAliases value {0}")]
    InvalidDerefAliases(i64),
    #[error(transparent)]
    Filter(#[from] FilterParseError),
    #[error("invalid LDAPDN: {0}")]
    InvalidDn(String),
}

impl From<BerIntegerParseError> for SearchRequestParseError {
    fn from(value: BerIntegerParseError) -> Self {
        match value {
            BerIntegerParseError::NeedMoreData(n) => SearchRequestParseError::NeedMoreData(n),
            _ => SearchRequestParseError::Malformed(TlvParseError::LengthInconsistent),
        }
    }
}

impl From<BerBooleanParseError> for SearchRequestParseError {
    fn from(value: BerBooleanParseError) -> Self {
        match value {
            BerBooleanParseError::NeedMoreData(n) => SearchRequestParseError::NeedMoreData(n),
            _ => SearchRequestParseError::Malformed(TlvParseError::LengthInconsistent),
        }
    }
}

impl SearchRequest {
    pub fn parse(data: &[u8]) -> Result<(Self, usize), SearchRequestParseError> {
        let base_object_tlv = Tlv::parse_tag(data, 0x04)?;
        let base_object = String::from_utf8_lossy(base_object_tlv.value()).into_owned();
        if !is_valid_dn(&base_object) {
            return Err(SearchRequestParseError::InvalidDn(base_object));
        }
        let mut offset = base_object_tlv.encoded_len();

        let scope_int = BerInteger::parse_enumerated_value(&data[offset..])?;
        let scope = Scope::from_i64(scope_int.value())
            .ok_or(SearchRequestParseError::InvalidScope(scope_int.value()))?;
        offset += scope_int.encoded_len();

        let deref_int = BerInteger::parse_enumerated_value(&data[offset..])?;
        let deref_aliases = DerefAliases::from_i64(deref_int.value())
            .ok_or(SearchRequestParseError::InvalidDerefAliases(deref_int.value()))?;
        offset += deref_int.encoded_len();

        let size_limit_int = BerInteger::parse(&data[offset..])?;
        let size_limit = size_limit_int.value();
        offset += size_limit_int.encoded_len();

        let time_limit_int = BerInteger::parse(&data[offset..])?;
        let time_limit = time_limit_int.value();
        offset += time_limit_int.encoded_len();

        let types_only_ber = BerBoolean::parse(&data[offset..], false)?;
        let types_only = types_only_ber.value();
        offset += types_only_ber.encoded_len();

        let (filter, filter_used) = Filter::parse(&data[offset..])?;
        offset += filter_used;

        let attributes_tlv = Tlv::parse_tag(&data[offset..], 0x30)?;
        let mut attributes = Vec::new();
        let mut cursor = TlvCursor::new(attributes_tlv.value());
        while let Some(tlv) = cursor.next()? {
            attributes.push(String::from_utf8_lossy(tlv.value()).into_owned());
        }
        offset += attributes_tlv.encoded_len();

        Ok((
            SearchRequest {
                base_object,
                scope,
                deref_aliases,
                size_limit,
                time_limit,
                types_only,
                filter,
                attributes,
            },
            offset,
        ))
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        encode_octet_string(buf, 0x04, self.base_object.as_bytes());
        let mut int_encoder = BerIntegerEncoder::default();
        buf.extend_from_slice(int_encoder.encode_enumerated(self.scope.to_i64()));
        buf.extend_from_slice(int_encoder.encode_enumerated(self.deref_aliases.to_i64()));
        buf.extend_from_slice(int_encoder.encode(self.size_limit));
        buf.extend_from_slice(int_encoder.encode(self.time_limit));
        encode_bool(buf, 0x01, self.types_only);
        self.filter.encode(buf);

        let mut inner = Vec::new();
        for attribute in &self.attributes {
            encode_octet_string(&mut inner, 0x04, attribute.as_bytes());
        }
        buf.push(0x30);
        let mut len_encoder = crate::ber::BerLengthEncoder::default();
        buf.extend_from_slice(len_encoder.encode(inner.len()));
        buf.extend_from_slice(&inner);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultEntry {
    pub object_name: String,
    pub attributes: Vec<PartialAttribute>,
}

#[derive(Debug, Error)]
pub enum SearchResultEntryParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error(transparent)]
    Malformed(#[from] TlvParseError),
    #[error(transparent)]
    Attribute(#[from] AttributeParseError),
    #[error("invalid LDAPDN: {0}")]
    InvalidDn(String),
}

impl SearchResultEntry {
    pub fn parse(data: &[u8]) -> Result<(Self, usize), SearchResultEntryParseError> {
        let name_tlv = Tlv::parse_tag(data, 0x04)?;
        let object_name = String::from_utf8_lossy(name_tlv.value()).into_owned();
        if !is_valid_dn(&object_name) {
            return Err(SearchResultEntryParseError::InvalidDn(object_name));
        }
        let mut offset = name_tlv.encoded_len();

        let attrs_tlv = Tlv::parse_tag(&data[offset..], 0x30)?;
        let mut attributes = Vec::new();
        let mut attr_offset = 0;
        while attr_offset < attrs_tlv.value().len() {
            let (attribute, used) = PartialAttribute::parse(&attrs_tlv.value()[attr_offset..])?;
            attributes.push(attribute);
            attr_offset += used;
        }
        offset += attrs_tlv.encoded_len();

        Ok((
            SearchResultEntry {
                object_name,
                attributes,
            },
            offset,
        ))
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        encode_octet_string(buf, 0x04, self.object_name.as_bytes());
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

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultReference {
    pub uris: Vec<String>,
}

impl SearchResultReference {
    pub fn parse(data: &[u8]) -> Result<(Self, usize), TlvParseError> {
        let mut uris = Vec::new();
        let mut cursor = TlvCursor::new(data);
        while let Some(tlv) = cursor.next()? {
            uris.push(String::from_utf8_lossy(tlv.value()).into_owned());
        }
        let consumed = data.len() - cursor.remaining();
        Ok((SearchResultReference { uris }, consumed))
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        for uri in &self.uris {
            encode_octet_string(buf, 0x04, uri.as_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_request_roundtrips() {
        let request = SearchRequest {
            base_object: "dc=example,dc=com".to_string(),
            scope: Scope::WholeSubtree,
            deref_aliases: DerefAliases::NeverDerefAliases,
            size_limit: 0,
            time_limit: 0,
            types_only: false,
            filter: Filter::Present("objectClass".to_string()),
            attributes: vec!["cn".to_string(), "mail".to_string()],
        };
        let mut buf = Vec::new();
        request.encode(&mut buf);
        let (decoded, used) = SearchRequest::parse(&buf).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, request);
    }

    #[test]
    fn search_result_entry_roundtrips() {
        let entry = SearchResultEntry {
            object_name: "cn=admin,dc=example,dc=com".to_string(),
            attributes: vec![PartialAttribute {
                attribute_desc: "cn".to_string(),
                values: vec![b"admin".to_vec()],
            }],
        };
        let mut buf = Vec::new();
        entry.encode(&mut buf);
        let (decoded, used) = SearchResultEntry::parse(&buf).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, entry);
    }

    #[test]
    fn search_request_rejects_malformed_base_object() {
        let request = SearchRequest {
            base_object: "not a dn".to_string(),
            scope: Scope::WholeSubtree,
            deref_aliases: DerefAliases::NeverDerefAliases,
            size_limit: 0,
            time_limit: 0,
            types_only: false,
            filter: Filter::Present("objectClass".to_string()),
            attributes: vec![],
        };
        let mut buf = Vec::new();
        encode_octet_string(&mut buf, 0x04, request.base_object.as_bytes());
        assert!(matches!(SearchRequest::parse(&buf), Err(SearchRequestParseError::InvalidDn(_))));
    }

    #[test]
    fn search_result_entry_rejects_malformed_object_name() {
        let mut buf = Vec::new();
        encode_octet_string(&mut buf, 0x04, b"cn=a,,dc=com");
        buf.push(0x30);
        buf.push(0x00);
        assert!(matches!(
            SearchResultEntry::parse(&buf),
            Err(SearchResultEntryParseError::InvalidDn(_))
        ));
    }

    #[test]
    fn search_result_reference_roundtrips() {
        let reference = SearchResultReference {
            uris: vec!["ldap://a.example.com/".to_string(), "ldap://b.example.com/".to_string()],
        };
        let mut buf = Vec::new();
        reference.encode(&mut buf);
        let (decoded, used) = SearchResultReference::parse(&buf).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, reference);
    }
}
