/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! The `Filter` CHOICE (RFC 4511 section 4.5.1.7): a recursive tree of
//! boolean combinators (`and`/`or`/`not`) over attribute-value tests.
//! Decoding recurses with a depth cap so a maliciously deep `and`/`or`/`not`
//! chain cannot blow the stack; the cap is generous enough that no
//! conformant client construction ever hits it.

use thiserror::Error;

use crate::ber::{BerOctetString, encode_octet_string};
use crate::tlv::{TlvCursor, TlvParseError};

const MAX_FILTER_DEPTH: usize = 32;

const TAG_AND: u8 = 0xa0;
const TAG_OR: u8 = 0xa1;
const TAG_NOT: u8 = 0xa2;
const TAG_EQUALITY_MATCH: u8 = 0xa3;
const TAG_SUBSTRINGS: u8 = 0xa4;
const TAG_GREATER_OR_EQUAL: u8 = 0xa5;
const TAG_LESS_OR_EQUAL: u8 = 0xa6;
const TAG_PRESENT: u8 = 0x87;
const TAG_APPROX_MATCH: u8 = 0xa8;
const TAG_EXTENSIBLE_MATCH: u8 = 0xa9;

const TAG_SUBSTRING_INITIAL: u8 = 0x80;
const TAG_SUBSTRING_ANY: u8 = 0x81;
const TAG_SUBSTRING_FINAL: u8 = 0x82;

const TAG_MATCHING_RULE: u8 = 0x81;
const TAG_MATCH_TYPE: u8 = 0x82;
const TAG_MATCH_VALUE: u8 = 0x83;
const TAG_DN_ATTRIBUTES: u8 = 0x84;

#[derive(Debug, Error)]
pub enum FilterParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error(transparent)]
    Malformed(#[from] TlvParseError),
    #[error("filter nesting exceeds the maximum supported depth of {0}")]
    TooDeeplyNested(usize),
    #[error("substrings filter must carry at least one of initial/any/final")]
    EmptySubstrings,
}

impl From<crate::ber::BerOctetStringParseError> for FilterParseError {
    fn from(value: crate::ber::BerOctetStringParseError) -> Self {
        use crate::ber::BerOctetStringParseError as E;
        match value {
            E::NeedMoreData(n) => FilterParseError::NeedMoreData(n),
            E::UnexpectedTag { expected, found } => {
                FilterParseError::Malformed(TlvParseError::UnexpectedTag { expected, found })
            }
            _ => FilterParseError::Malformed(TlvParseError::LengthInconsistent),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringFilter {
    pub attribute_desc: String,
    pub initial: Option<Vec<u8>>,
    pub any: Vec<Vec<u8>>,
    pub r#final: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingRuleAssertion {
    pub matching_rule: Option<String>,
    pub attribute_desc: Option<String>,
    pub match_value: Vec<u8>,
    pub dn_attributes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    EqualityMatch {
        attribute_desc: String,
        assertion_value: Vec<u8>,
    },
    Substrings(SubstringFilter),
    GreaterOrEqual {
        attribute_desc: String,
        assertion_value: Vec<u8>,
    },
    LessOrEqual {
        attribute_desc: String,
        assertion_value: Vec<u8>,
    },
    Present(String),
    ApproxMatch {
        attribute_desc: String,
        assertion_value: Vec<u8>,
    },
    ExtensibleMatch(MatchingRuleAssertion),
}

impl Filter {
    pub fn parse(data: &[u8]) -> Result<(Self, usize), FilterParseError> {
        Self::parse_depth(data, 0)
    }

    fn parse_depth(data: &[u8], depth: usize) -> Result<(Self, usize), FilterParseError> {
        if depth > MAX_FILTER_DEPTH {
            return Err(FilterParseError::TooDeeplyNested(MAX_FILTER_DEPTH));
        }
        if data.is_empty() {
            return Err(FilterParseError::NeedMoreData(1));
        }
        let tag = data[0];
        match tag {
            TAG_AND | TAG_OR => {
                let outer = crate::tlv::Tlv::parse(data)?;
                let mut children = Vec::new();
                let mut offset = 0;
                while offset < outer.value().len() {
                    let (child, used) = Self::parse_depth(&outer.value()[offset..], depth + 1)?;
                    children.push(child);
                    offset += used;
                }
                let filter = if tag == TAG_AND {
                    Filter::And(children)
                } else {
                    Filter::Or(children)
                };
                Ok((filter, outer.encoded_len()))
            }
            TAG_NOT => {
                let outer = crate::tlv::Tlv::parse(data)?;
                let (inner, used) = Self::parse_depth(outer.value(), depth + 1)?;
                if used != outer.value().len() {
                    return Err(FilterParseError::Malformed(TlvParseError::LengthInconsistent));
                }
                Ok((Filter::Not(Box::new(inner)), outer.encoded_len()))
            }
            TAG_EQUALITY_MATCH | TAG_GREATER_OR_EQUAL | TAG_LESS_OR_EQUAL | TAG_APPROX_MATCH => {
                let outer = crate::tlv::Tlv::parse(data)?;
                let (attribute_desc, assertion_value) = parse_ava(outer.value())?;
                let filter = match tag {
                    TAG_EQUALITY_MATCH => Filter::EqualityMatch {
                        attribute_desc,
                        assertion_value,
                    },
                    TAG_GREATER_OR_EQUAL => Filter::GreaterOrEqual {
                        attribute_desc,
                        assertion_value,
                    },
                    TAG_LESS_OR_EQUAL => Filter::LessOrEqual {
                        attribute_desc,
                        assertion_value,
                    },
                    _ => Filter::ApproxMatch {
                        attribute_desc,
                        assertion_value,
                    },
                };
                Ok((filter, outer.encoded_len()))
            }
            TAG_PRESENT => {
                let os = BerOctetString::parse(data, TAG_PRESENT)?;
                let attribute_desc = String::from_utf8_lossy(os.data()).into_owned();
                Ok((Filter::Present(attribute_desc), os.encoded_len()))
            }
            TAG_SUBSTRINGS => {
                let outer = crate::tlv::Tlv::parse(data)?;
                let filter = parse_substrings(outer.value())?;
                Ok((Filter::Substrings(filter), outer.encoded_len()))
            }
            TAG_EXTENSIBLE_MATCH => {
                let outer = crate::tlv::Tlv::parse(data)?;
                let mra = parse_extensible_match(outer.value())?;
                Ok((Filter::ExtensibleMatch(mra), outer.encoded_len()))
            }
            found => Err(FilterParseError::Malformed(TlvParseError::UnexpectedTag {
                expected: TAG_EQUALITY_MATCH,
                found,
            })),
        }
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            Filter::And(children) => encode_set(buf, TAG_AND, children),
            Filter::Or(children) => encode_set(buf, TAG_OR, children),
            Filter::Not(inner) => {
                let mut inner_buf = Vec::new();
                inner.encode(&mut inner_buf);
                encode_constructed(buf, TAG_NOT, &inner_buf);
            }
            Filter::EqualityMatch {
                attribute_desc,
                assertion_value,
            } => encode_ava(buf, TAG_EQUALITY_MATCH, attribute_desc, assertion_value),
            Filter::GreaterOrEqual {
                attribute_desc,
                assertion_value,
            } => encode_ava(buf, TAG_GREATER_OR_EQUAL, attribute_desc, assertion_value),
            Filter::LessOrEqual {
                attribute_desc,
                assertion_value,
            } => encode_ava(buf, TAG_LESS_OR_EQUAL, attribute_desc, assertion_value),
            Filter::ApproxMatch {
                attribute_desc,
                assertion_value,
            } => encode_ava(buf, TAG_APPROX_MATCH, attribute_desc, assertion_value),
            Filter::Present(attribute_desc) => {
                encode_octet_string(buf, TAG_PRESENT, attribute_desc.as_bytes());
            }
            Filter::Substrings(substrings) => encode_substrings(buf, substrings),
            Filter::ExtensibleMatch(mra) => encode_extensible_match(buf, mra),
        }
    }
}

fn parse_ava(value: &[u8]) -> Result<(String, Vec<u8>), FilterParseError> {
    let mut cursor = TlvCursor::new(value);
    let attr = cursor.next()?.ok_or(FilterParseError::NeedMoreData(1))?;
    let val = cursor.next()?.ok_or(FilterParseError::NeedMoreData(1))?;
    Ok((
        String::from_utf8_lossy(attr.value()).into_owned(),
        val.value().to_vec(),
    ))
}

fn encode_ava(buf: &mut Vec<u8>, tag: u8, attribute_desc: &str, assertion_value: &[u8]) {
    let mut inner = Vec::new();
    encode_octet_string(&mut inner, 0x04, attribute_desc.as_bytes());
    encode_octet_string(&mut inner, 0x04, assertion_value);
    encode_constructed(buf, tag, &inner);
}

fn encode_constructed(buf: &mut Vec<u8>, tag: u8, value: &[u8]) {
    buf.push(tag);
    let mut len_encoder = crate::ber::BerLengthEncoder::default();
    buf.extend_from_slice(len_encoder.encode(value.len()));
    buf.extend_from_slice(value);
}

fn encode_set(buf: &mut Vec<u8>, tag: u8, children: &[Filter]) {
    let mut inner = Vec::new();
    for child in children {
        child.encode(&mut inner);
    }
    encode_constructed(buf, tag, &inner);
}

fn parse_substrings(value: &[u8]) -> Result<SubstringFilter, FilterParseError> {
    let mut cursor = TlvCursor::new(value);
    let attr_tlv = cursor.next()?.ok_or(FilterParseError::NeedMoreData(1))?;
    let attribute_desc = String::from_utf8_lossy(attr_tlv.value()).into_owned();

    let substrings_tlv = cursor.next()?.ok_or(FilterParseError::NeedMoreData(1))?;
    let mut initial = None;
    let mut any = Vec::new();
    let mut r#final = None;
    let mut inner = TlvCursor::new(substrings_tlv.value());
    while let Some(tlv) = inner.next()? {
        match tlv.tag() {
            TAG_SUBSTRING_INITIAL => initial = Some(tlv.value().to_vec()),
            TAG_SUBSTRING_ANY => any.push(tlv.value().to_vec()),
            TAG_SUBSTRING_FINAL => r#final = Some(tlv.value().to_vec()),
            found => {
                return Err(FilterParseError::Malformed(TlvParseError::UnexpectedTag {
                    expected: TAG_SUBSTRING_ANY,
                    found,
                }));
            }
        }
    }

    if initial.is_none() && any.is_empty() && r#final.is_none() {
        return Err(FilterParseError::EmptySubstrings);
    }

    Ok(SubstringFilter {
        attribute_desc,
        initial,
        any,
        r#final,
    })
}

fn encode_substrings(buf: &mut Vec<u8>, filter: &SubstringFilter) {
    let mut inner = Vec::new();
    encode_octet_string(&mut inner, 0x04, filter.attribute_desc.as_bytes());

    let mut substrings = Vec::new();
    if let Some(initial) = &filter.initial {
        encode_octet_string(&mut substrings, TAG_SUBSTRING_INITIAL, initial);
    }
    for any in &filter.any {
        encode_octet_string(&mut substrings, TAG_SUBSTRING_ANY, any);
    }
    if let Some(r#final) = &filter.r#final {
        encode_octet_string(&mut substrings, TAG_SUBSTRING_FINAL, r#final);
    }
    encode_constructed(&mut inner, 0x30, &substrings);

    encode_constructed(buf, TAG_SUBSTRINGS, &inner);
}

fn parse_extensible_match(value: &[u8]) -> Result<MatchingRuleAssertion, FilterParseError> {
    let mut matching_rule = None;
    let mut attribute_desc = None;
    let mut match_value = Vec::new();
    let mut dn_attributes = false;

    let mut cursor = TlvCursor::new(value);
    while let Some(tlv) = cursor.next()? {
        match tlv.tag() {
            TAG_MATCHING_RULE => matching_rule = Some(String::from_utf8_lossy(tlv.value()).into_owned()),
            TAG_MATCH_TYPE => attribute_desc = Some(String::from_utf8_lossy(tlv.value()).into_owned()),
            TAG_MATCH_VALUE => match_value = tlv.value().to_vec(),
            TAG_DN_ATTRIBUTES => dn_attributes = tlv.value().first().copied().unwrap_or(0) != 0,
            found => {
                return Err(FilterParseError::Malformed(TlvParseError::UnexpectedTag {
                    expected: TAG_MATCH_VALUE,
                    found,
                }));
            }
        }
    }

    Ok(MatchingRuleAssertion {
        matching_rule,
        attribute_desc,
        match_value,
        dn_attributes,
    })
}

fn encode_extensible_match(buf: &mut Vec<u8>, mra: &MatchingRuleAssertion) {
    let mut inner = Vec::new();
    if let Some(matching_rule) = &mra.matching_rule {
        encode_octet_string(&mut inner, TAG_MATCHING_RULE, matching_rule.as_bytes());
    }
    if let Some(attribute_desc) = &mra.attribute_desc {
        encode_octet_string(&mut inner, TAG_MATCH_TYPE, attribute_desc.as_bytes());
    }
    encode_octet_string(&mut inner, TAG_MATCH_VALUE, &mra.match_value);
    if mra.dn_attributes {
        crate::ber::encode_bool(&mut inner, TAG_DN_ATTRIBUTES, true);
    }
    encode_constructed(buf, TAG_EXTENSIBLE_MATCH, &inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(filter: &Filter) -> Filter {
        let mut buf = Vec::new();
        filter.encode(&mut buf);
        let (decoded, used) = Filter::parse(&buf).unwrap();
        assert_eq!(used, buf.len());
        decoded
    }

    #[test]
    fn present_roundtrips() {
        let filter = Filter::Present("objectClass".to_string());
        assert_eq!(roundtrip(&filter), filter);
    }

    #[test]
    fn equality_roundtrips() {
        let filter = Filter::EqualityMatch {
            attribute_desc: "cn".to_string(),
            assertion_value: b"admin".to_vec(),
        };
        assert_eq!(roundtrip(&filter), filter);
    }

    #[test]
    fn and_or_not_nest_and_roundtrip() {
        let filter = Filter::And(vec![
            Filter::Present("cn".to_string()),
            Filter::Not(Box::new(Filter::EqualityMatch {
                attribute_desc: "uid".to_string(),
                assertion_value: b"root".to_vec(),
            })),
            Filter::Or(vec![
                Filter::GreaterOrEqual {
                    attribute_desc: "age".to_string(),
                    assertion_value: b"18".to_vec(),
                },
                Filter::LessOrEqual {
                    attribute_desc: "age".to_string(),
                    assertion_value: b"65".to_vec(),
                },
            ]),
        ]);
        assert_eq!(roundtrip(&filter), filter);
    }

    #[test]
    fn substrings_roundtrip() {
        let filter = Filter::Substrings(SubstringFilter {
            attribute_desc: "cn".to_string(),
            initial: Some(b"A".to_vec()),
            any: vec![b"B".to_vec(), b"C".to_vec()],
            r#final: Some(b"Z".to_vec()),
        });
        assert_eq!(roundtrip(&filter), filter);
    }

    #[test]
    fn extensible_match_roundtrip() {
        let filter = Filter::ExtensibleMatch(MatchingRuleAssertion {
            matching_rule: Some("caseIgnoreMatch".to_string()),
            attribute_desc: Some("cn".to_string()),
            match_value: b"Admin".to_vec(),
            dn_attributes: true,
        });
        assert_eq!(roundtrip(&filter), filter);
    }

    #[test]
    fn deeply_nested_not_is_rejected() {
        let mut filter = Filter::Present("a".to_string());
        for _ in 0..MAX_FILTER_DEPTH + 2 {
            filter = Filter::Not(Box::new(filter));
        }
        let mut buf = Vec::new();
        filter.encode(&mut buf);
        assert!(matches!(
            Filter::parse(&buf),
            Err(FilterParseError::TooDeeplyNested(_))
        ));
    }

    #[test]
    fn empty_substrings_is_rejected() {
        let filter = Filter::Substrings(SubstringFilter {
            attribute_desc: "cn".to_string(),
            initial: None,
            any: vec![],
            r#final: None,
        });
        let mut buf = Vec::new();
        filter.encode(&mut buf);
        assert!(matches!(
            Filter::parse(&buf),
            Err(FilterParseError::EmptySubstrings)
        ));
    }
}
