/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! `Control` (RFC 4511 section 4.1.11) and the `[0] SEQUENCE OF Control`
//! envelope every `LDAPMessage` may carry. `Control::control_value` itself
//! stays opaque (`Vec<u8>`): the typed payloads below (`PagedResultsControl`,
//! `PersistentSearchControl`, `ServerSortRequestControl`/`SortKey`,
//! `ServerSortResponseControl`, `SubentriesControl`) are the byte-exact
//! encode/decode layer a [`super::registry::ControlValueFactory`] wraps, or
//! that a caller can reach directly without going through the registry.

use thiserror::Error;

use crate::ber::{BerBoolean, BerBooleanParseError, BerIntegerEncoder, BerLengthEncoder, encode_bool, encode_octet_string};
use crate::oid::is_valid_oid;
use crate::tlv::{Tlv, TlvCursor, TlvParseError};

pub const OID_PAGED_RESULTS: &str = "1.2.840.113556.1.4.319";
pub const OID_PERSISTENT_SEARCH: &str = "2.16.840.1.113730.3.4.3";
pub const OID_SERVER_SIDE_SORT_REQUEST: &str = "1.2.840.113556.1.4.473";
pub const OID_SERVER_SIDE_SORT_RESPONSE: &str = "1.2.840.113556.1.4.474";
pub const OID_SUBENTRIES: &str = "1.3.6.1.4.1.4203.1.10.1";

#[derive(Debug, Error)]
pub enum ControlParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error(transparent)]
    Malformed(#[from] TlvParseError),
    #[error("invalid controlType OID: {0}")]
    InvalidOid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub control_type: String,
    pub criticality: bool,
    pub control_value: Option<Vec<u8>>,
}

impl Control {
    pub fn new(control_type: impl Into<String>, criticality: bool, control_value: Option<Vec<u8>>) -> Self {
        Control {
            control_type: control_type.into(),
            criticality,
            control_value,
        }
    }

    pub fn paged_results(page_size: i64, cookie: Vec<u8>, criticality: bool) -> Self {
        let value = PagedResultsControl {
            size: page_size,
            cookie,
        }
        .encode_value();
        Control::new(OID_PAGED_RESULTS, criticality, Some(value))
    }

    /// Parses a single `Control` SEQUENCE (tag 0x30).
    pub fn parse(data: &[u8]) -> Result<(Self, usize), ControlParseError> {
        let outer = Tlv::parse_tag(data, 0x30)?;
        let mut cursor = TlvCursor::new(outer.value());

        let type_tlv = cursor.next()?.ok_or(ControlParseError::NeedMoreData(1))?;
        let control_type = String::from_utf8_lossy(type_tlv.value()).into_owned();
        if !is_valid_oid(&control_type) {
            return Err(ControlParseError::InvalidOid(control_type));
        }

        let mut criticality = false;
        let mut control_value = None;

        let remaining_start = outer.value().len() - cursor.remaining();
        if let Some(next_tlv) = cursor.next()? {
            if next_tlv.tag() == 0x01 {
                let bounds = &outer.value()[remaining_start..];
                criticality = BerBoolean::parse(bounds, false)
                    .map(|b| b.value())
                    .unwrap_or(false);
                if let Some(value_tlv) = cursor.next()? {
                    control_value = Some(value_tlv.value().to_vec());
                }
            } else {
                control_value = Some(next_tlv.value().to_vec());
            }
        }

        Ok((
            Control {
                control_type,
                criticality,
                control_value,
            },
            outer.encoded_len(),
        ))
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        let mut inner = Vec::new();
        encode_octet_string(&mut inner, 0x04, self.control_type.as_bytes());
        if self.criticality {
            encode_bool(&mut inner, 0x01, true);
        }
        if let Some(value) = &self.control_value {
            encode_octet_string(&mut inner, 0x04, value);
        }
        buf.push(0x30);
        let mut len_encoder = crate::ber::BerLengthEncoder::default();
        buf.extend_from_slice(len_encoder.encode(inner.len()));
        buf.extend_from_slice(&inner);
    }
}

fn wrap_sequence(tag: u8, inner: Vec<u8>) -> Vec<u8> {
    let mut wrapped = Vec::with_capacity(inner.len() + 4);
    wrapped.push(tag);
    let mut len_encoder = BerLengthEncoder::default();
    wrapped.extend_from_slice(len_encoder.encode(inner.len()));
    wrapped.extend_from_slice(&inner);
    wrapped
}

fn decode_integer_value(bytes: &[u8]) -> i64 {
    let mut value: i64 = if bytes.first().is_some_and(|b| b & 0x80 != 0) {
        -1
    } else {
        0
    };
    for &b in bytes {
        value = (value << 8) | b as i64;
    }
    value
}

fn decode_bool_value(bytes: &[u8]) -> bool {
    bytes.first().is_some_and(|&b| b != 0)
}

#[derive(Debug, Error)]
pub enum TypedControlParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error(transparent)]
    Malformed(#[from] TlvParseError),
    #[error(transparent)]
    Boolean(#[from] BerBooleanParseError),
}

/// PagedResultsControl value (RFC 2696): `SEQUENCE { size INTEGER, cookie
/// OCTET STRING }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedResultsControl {
    pub size: i64,
    pub cookie: Vec<u8>,
}

impl PagedResultsControl {
    pub fn encode_value(&self) -> Vec<u8> {
        let mut value = Vec::new();
        let mut int_encoder = BerIntegerEncoder::default();
        value.extend_from_slice(int_encoder.encode(self.size));
        encode_octet_string(&mut value, 0x04, &self.cookie);
        wrap_sequence(0x30, value)
    }

    pub fn decode_value(bytes: &[u8]) -> Result<Self, TypedControlParseError> {
        let outer = Tlv::parse_tag(bytes, 0x30)?;
        let mut cursor = TlvCursor::new(outer.value());
        let size_tlv = cursor.next()?.ok_or(TypedControlParseError::NeedMoreData(1))?;
        let cookie_tlv = cursor.next()?.ok_or(TypedControlParseError::NeedMoreData(1))?;
        Ok(PagedResultsControl {
            size: decode_integer_value(size_tlv.value()),
            cookie: cookie_tlv.value().to_vec(),
        })
    }
}

/// PersistentSearchControl value: `SEQUENCE { changeTypes INTEGER,
/// changesOnly BOOLEAN, returnECs BOOLEAN }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistentSearchControl {
    pub change_types: i64,
    pub changes_only: bool,
    pub return_ecs: bool,
}

impl PersistentSearchControl {
    pub fn encode_value(&self) -> Vec<u8> {
        let mut value = Vec::new();
        let mut int_encoder = BerIntegerEncoder::default();
        value.extend_from_slice(int_encoder.encode(self.change_types));
        encode_bool(&mut value, 0x01, self.changes_only);
        encode_bool(&mut value, 0x01, self.return_ecs);
        wrap_sequence(0x30, value)
    }

    pub fn decode_value(bytes: &[u8]) -> Result<Self, TypedControlParseError> {
        let outer = Tlv::parse_tag(bytes, 0x30)?;
        let mut cursor = TlvCursor::new(outer.value());
        let change_types_tlv = cursor.next()?.ok_or(TypedControlParseError::NeedMoreData(1))?;
        let changes_only_tlv = cursor.next()?.ok_or(TypedControlParseError::NeedMoreData(1))?;
        let return_ecs_tlv = cursor.next()?.ok_or(TypedControlParseError::NeedMoreData(1))?;
        Ok(PersistentSearchControl {
            change_types: decode_integer_value(change_types_tlv.value()),
            changes_only: decode_bool_value(changes_only_tlv.value()),
            return_ecs: decode_bool_value(return_ecs_tlv.value()),
        })
    }
}

/// One `SortKeyList` entry (RFC 2891): `SEQUENCE { attributeType
/// AttributeDescription, orderingRule [0] OPTIONAL, reverseOrder [1]
/// BOOLEAN DEFAULT FALSE }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub attribute_type: String,
    pub ordering_rule: Option<String>,
    pub reverse_order: bool,
}

/// ServerSort request control value: `SEQUENCE OF` [`SortKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSortRequestControl {
    pub sort_keys: Vec<SortKey>,
}

impl ServerSortRequestControl {
    pub fn encode_value(&self) -> Vec<u8> {
        let mut inner = Vec::new();
        for key in &self.sort_keys {
            let mut key_buf = Vec::new();
            encode_octet_string(&mut key_buf, 0x04, key.attribute_type.as_bytes());
            if let Some(rule) = &key.ordering_rule {
                encode_octet_string(&mut key_buf, 0x80, rule.as_bytes());
            }
            if key.reverse_order {
                encode_bool(&mut key_buf, 0x81, true);
            }
            inner.extend_from_slice(&wrap_sequence(0x30, key_buf));
        }
        wrap_sequence(0x30, inner)
    }

    pub fn decode_value(bytes: &[u8]) -> Result<Self, TypedControlParseError> {
        let outer = Tlv::parse_tag(bytes, 0x30)?;
        let mut cursor = TlvCursor::new(outer.value());
        let mut sort_keys = Vec::new();
        while let Some(key_tlv) = cursor.next()? {
            let mut key_cursor = TlvCursor::new(key_tlv.value());
            let type_tlv = key_cursor
                .next()?
                .ok_or(TypedControlParseError::NeedMoreData(1))?;
            let attribute_type = String::from_utf8_lossy(type_tlv.value()).into_owned();
            let mut ordering_rule = None;
            let mut reverse_order = false;
            while let Some(tlv) = key_cursor.next()? {
                match tlv.tag() {
                    0x80 => ordering_rule = Some(String::from_utf8_lossy(tlv.value()).into_owned()),
                    0x81 => reverse_order = decode_bool_value(tlv.value()),
                    _ => {}
                }
            }
            sort_keys.push(SortKey {
                attribute_type,
                ordering_rule,
                reverse_order,
            });
        }
        Ok(ServerSortRequestControl { sort_keys })
    }
}

/// ServerSort response control value: `SEQUENCE { sortResult ENUMERATED,
/// attributeType [0] AttributeDescription OPTIONAL }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSortResponseControl {
    pub sort_result: i64,
    pub attribute_type: Option<String>,
}

impl ServerSortResponseControl {
    pub fn encode_value(&self) -> Vec<u8> {
        let mut inner = Vec::new();
        let mut int_encoder = BerIntegerEncoder::default();
        inner.extend_from_slice(int_encoder.encode_enumerated(self.sort_result));
        if let Some(attribute_type) = &self.attribute_type {
            encode_octet_string(&mut inner, 0x80, attribute_type.as_bytes());
        }
        wrap_sequence(0x30, inner)
    }

    pub fn decode_value(bytes: &[u8]) -> Result<Self, TypedControlParseError> {
        let outer = Tlv::parse_tag(bytes, 0x30)?;
        let mut cursor = TlvCursor::new(outer.value());
        let result_tlv = cursor.next()?.ok_or(TypedControlParseError::NeedMoreData(1))?;
        let mut attribute_type = None;
        if let Some(tlv) = cursor.next()? {
            if tlv.tag() == 0x80 {
                attribute_type = Some(String::from_utf8_lossy(tlv.value()).into_owned());
            }
        }
        Ok(ServerSortResponseControl {
            sort_result: decode_integer_value(result_tlv.value()),
            attribute_type,
        })
    }
}

/// SubentriesControl value (RFC 3672): a bare `BOOLEAN`, not wrapped in a
/// SEQUENCE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubentriesControl {
    pub visibility: bool,
}

impl SubentriesControl {
    pub fn encode_value(&self) -> Vec<u8> {
        let mut value = Vec::new();
        encode_bool(&mut value, 0x01, self.visibility);
        value
    }

    pub fn decode_value(bytes: &[u8]) -> Result<Self, TypedControlParseError> {
        let value = BerBoolean::parse(bytes, false)?;
        Ok(SubentriesControl {
            visibility: value.value(),
        })
    }
}

/// Parses the optional `[0] SEQUENCE OF Control` that trails `LDAPMessage`
/// (tag 0xa0), returning `None` if `data` does not start with that tag.
pub fn parse_controls(data: &[u8]) -> Result<Option<(Vec<Control>, usize)>, ControlParseError> {
    if data.first() != Some(&0xa0) {
        return Ok(None);
    }
    let outer = Tlv::parse_tag(data, 0xa0)?;
    let mut controls = Vec::new();
    let mut offset = 0;
    while offset < outer.value().len() {
        let (control, used) = Control::parse(&outer.value()[offset..])?;
        controls.push(control);
        offset += used;
    }
    Ok(Some((controls, outer.encoded_len())))
}

pub fn encode_controls(buf: &mut Vec<u8>, controls: &[Control]) {
    if controls.is_empty() {
        return;
    }
    let mut inner = Vec::new();
    for control in controls {
        control.encode(&mut inner);
    }
    buf.push(0xa0);
    let mut len_encoder = crate::ber::BerLengthEncoder::default();
    buf.extend_from_slice(len_encoder.encode(inner.len()));
    buf.extend_from_slice(&inner);
}
