/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! `LDAPResult` (RFC 4511 section 4.1.9): the `resultCode`/`matchedDN`/
//! `diagnosticMessage`/`referral` tuple every response operation carries,
//! either inline (`DeleteResponse`, `ModifyResponse`, ...) or wrapped inside
//! a richer response (`BindResponse`, `ExtendedResponse`).

use log::warn;
use thiserror::Error;

use crate::ber::{BerIntegerEncoder, encode_octet_string};
use crate::tlv::{TlvCursor, TlvParseError};
use crate::url::is_valid_url;

/// Decodes a two's-complement big-endian INTEGER/ENUMERATED value (the `V`
/// of a TLV already split out by [`crate::tlv::Tlv`]).
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

/// `resultCode` (RFC 4511 section 4.1.9), enumerated 0..90. Unknown codes
/// the wire carries round-trip through `Other` rather than being rejected:
/// new result codes get assigned by later RFCs and extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    OperationsError,
    ProtocolError,
    TimeLimitExceeded,
    SizeLimitExceeded,
    CompareFalse,
    CompareTrue,
    AuthMethodNotSupported,
    StrongerAuthRequired,
    Referral,
    AdminLimitExceeded,
    UnavailableCriticalExtension,
    ConfidentialityRequired,
    SaslBindInProgress,
    NoSuchAttribute,
    UndefinedAttributeType,
    InappropriateMatching,
    ConstraintViolation,
    AttributeOrValueExists,
    InvalidAttributeSyntax,
    NoSuchObject,
    AliasProblem,
    InvalidDnSyntax,
    AliasDereferencingProblem,
    InappropriateAuthentication,
    InvalidCredentials,
    InsufficientAccessRights,
    Busy,
    Unavailable,
    UnwillingToPerform,
    LoopDetect,
    NamingViolation,
    ObjectClassViolation,
    NotAllowedOnNonLeaf,
    NotAllowedOnRdn,
    EntryAlreadyExists,
    ObjectClassModsProhibited,
    AffectsMultipleDsas,
    Other(i64),
}

impl ResultCode {
    pub fn from_i64(value: i64) -> Self {
        match value {
            0 => Self::Success,
            1 => Self::OperationsError,
            2 => Self::ProtocolError,
            3 => Self::TimeLimitExceeded,
            4 => Self::SizeLimitExceeded,
            5 => Self::CompareFalse,
            6 => Self::CompareTrue,
            7 => Self::AuthMethodNotSupported,
            8 => Self::StrongerAuthRequired,
            10 => Self::Referral,
            11 => Self::AdminLimitExceeded,
            12 => Self::UnavailableCriticalExtension,
            13 => Self::ConfidentialityRequired,
            14 => Self::SaslBindInProgress,
            16 => Self::NoSuchAttribute,
            17 => Self::UndefinedAttributeType,
            18 => Self::InappropriateMatching,
            19 => Self::ConstraintViolation,
            20 => Self::AttributeOrValueExists,
            21 => Self::InvalidAttributeSyntax,
            32 => Self::NoSuchObject,
            33 => Self::AliasProblem,
            34 => Self::InvalidDnSyntax,
            36 => Self::AliasDereferencingProblem,
            48 => Self::InappropriateAuthentication,
            49 => Self::InvalidCredentials,
            50 => Self::InsufficientAccessRights,
            51 => Self::Busy,
            52 => Self::Unavailable,
            53 => Self::UnwillingToPerform,
            54 => Self::LoopDetect,
            64 => Self::NamingViolation,
            65 => Self::ObjectClassViolation,
            66 => Self::NotAllowedOnNonLeaf,
            67 => Self::NotAllowedOnRdn,
            68 => Self::EntryAlreadyExists,
            69 => Self::ObjectClassModsProhibited,
            71 => Self::AffectsMultipleDsas,
            80 => Self::Other(80),
            other => Self::Other(other),
        }
    }

    pub fn to_i64(self) -> i64 {
        match self {
            Self::Success => 0,
            Self::OperationsError => 1,
            Self::ProtocolError => 2,
            Self::TimeLimitExceeded => 3,
            Self::SizeLimitExceeded => 4,
            Self::CompareFalse => 5,
            Self::CompareTrue => 6,
            Self::AuthMethodNotSupported => 7,
            Self::StrongerAuthRequired => 8,
            Self::Referral => 10,
            Self::AdminLimitExceeded => 11,
            Self::UnavailableCriticalExtension => 12,
            Self::ConfidentialityRequired => 13,
            Self::SaslBindInProgress => 14,
            Self::NoSuchAttribute => 16,
            Self::UndefinedAttributeType => 17,
            Self::InappropriateMatching => 18,
            Self::ConstraintViolation => 19,
            Self::AttributeOrValueExists => 20,
            Self::InvalidAttributeSyntax => 21,
            Self::NoSuchObject => 32,
            Self::AliasProblem => 33,
            Self::InvalidDnSyntax => 34,
            Self::AliasDereferencingProblem => 36,
            Self::InappropriateAuthentication => 48,
            Self::InvalidCredentials => 49,
            Self::InsufficientAccessRights => 50,
            Self::Busy => 51,
            Self::Unavailable => 52,
            Self::UnwillingToPerform => 53,
            Self::LoopDetect => 54,
            Self::NamingViolation => 64,
            Self::ObjectClassViolation => 65,
            Self::NotAllowedOnNonLeaf => 66,
            Self::NotAllowedOnRdn => 67,
            Self::EntryAlreadyExists => 68,
            Self::ObjectClassModsProhibited => 69,
            Self::AffectsMultipleDsas => 71,
            Self::Other(code) => code,
        }
    }

    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success | Self::CompareTrue | Self::CompareFalse)
    }
}

#[derive(Debug, Error)]
pub enum LdapResultParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error(transparent)]
    Malformed(#[from] TlvParseError),
    #[error("invalid LDAPURL in referral: {0}")]
    InvalidUrl(String),
    #[error("referral present on non-REFERRAL result code {result_code}")]
    UnexpectedReferral { result_code: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapResult {
    pub result_code: i64,
    pub matched_dn: String,
    pub diagnostic_message: String,
    pub referral: Option<Vec<String>>,
}

impl LdapResult {
    pub fn success() -> Self {
        LdapResult {
            result_code: ResultCode::Success.to_i64(),
            matched_dn: String::new(),
            diagnostic_message: String::new(),
            referral: None,
        }
    }

    pub fn new(code: ResultCode, matched_dn: impl Into<String>, message: impl Into<String>) -> Self {
        LdapResult {
            result_code: code.to_i64(),
            matched_dn: matched_dn.into(),
            diagnostic_message: message.into(),
            referral: None,
        }
    }

    pub fn result_code(&self) -> ResultCode {
        ResultCode::from_i64(self.result_code)
    }

    /// Parses the component fields of `LDAPResult` out of a TLV value (the
    /// contents already stripped of the enclosing application/context tag
    /// the caller's operation uses), returning the number of bytes consumed.
    ///
    /// `allow_null_referral_in_non_referral_result` mirrors
    /// [`crate::config::DecoderConfig::allow_null_referral_in_non_referral_result`]:
    /// when a referral accompanies a result code other than `REFERRAL`, a
    /// `true` value logs a warning and discards it; `false` rejects the PDU
    /// with [`LdapResultParseError::UnexpectedReferral`].
    pub fn parse(
        data: &[u8],
        allow_null_referral_in_non_referral_result: bool,
    ) -> Result<(Self, usize), LdapResultParseError> {
        let mut cursor = TlvCursor::new(data);

        let code_tlv = cursor
            .next()?
            .ok_or(LdapResultParseError::NeedMoreData(1))?;
        if code_tlv.tag() != 0x0a {
            return Err(LdapResultParseError::Malformed(TlvParseError::UnexpectedTag {
                expected: 0x0a,
                found: code_tlv.tag(),
            }));
        }
        let result_code = decode_integer_value(code_tlv.value());

        let matched_dn_tlv = cursor
            .next()?
            .ok_or(LdapResultParseError::NeedMoreData(1))?;
        let matched_dn = String::from_utf8_lossy(matched_dn_tlv.value()).into_owned();

        let message_tlv = cursor
            .next()?
            .ok_or(LdapResultParseError::NeedMoreData(1))?;
        let diagnostic_message = String::from_utf8_lossy(message_tlv.value()).into_owned();

        let mut referral = None;
        if !cursor.is_exhausted() {
            let remaining = &data[data.len() - cursor.remaining()..];
            if remaining.first() == Some(&0xa3) {
                let referral_tlv = cursor.next()?.unwrap();
                let mut urls = Vec::new();
                let mut inner = TlvCursor::new(referral_tlv.value());
                while let Some(url_tlv) = inner.next()? {
                    let url = String::from_utf8_lossy(url_tlv.value()).into_owned();
                    if !is_valid_url(&url) {
                        return Err(LdapResultParseError::InvalidUrl(url));
                    }
                    urls.push(url);
                }
                referral = Some(urls);
            }
        }

        if referral.is_some() && ResultCode::from_i64(result_code) != ResultCode::Referral {
            if !allow_null_referral_in_non_referral_result {
                return Err(LdapResultParseError::UnexpectedReferral { result_code });
            }
            warn!("discarding referral URIs accompanying non-REFERRAL result code {result_code}");
            referral = None;
        }

        let consumed = data.len() - cursor.remaining();
        Ok((
            LdapResult {
                result_code,
                matched_dn,
                diagnostic_message,
                referral,
            },
            consumed,
        ))
    }

    /// Encodes the component fields (without the enclosing application tag
    /// the caller's operation supplies).
    pub fn encode(&self, buf: &mut Vec<u8>) {
        let mut int_encoder = BerIntegerEncoder::default();
        buf.extend_from_slice(int_encoder.encode_enumerated(self.result_code));
        encode_octet_string(buf, 0x04, self.matched_dn.as_bytes());
        encode_octet_string(buf, 0x04, self.diagnostic_message.as_bytes());
        if let Some(referral) = &self.referral {
            let mut inner = Vec::new();
            for url in referral {
                encode_octet_string(&mut inner, 0x04, url.as_bytes());
            }
            buf.push(0xa3);
            let mut len_encoder = crate::ber::BerLengthEncoder::default();
            buf.extend_from_slice(len_encoder.encode(inner.len()));
            buf.extend_from_slice(&inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_success_no_referral() {
        let result = LdapResult::success();
        let mut buf = Vec::new();
        result.encode(&mut buf);
        let (decoded, consumed) = LdapResult::parse(&buf, true).unwrap();
        assert_eq!(consumed, buf.len());
        assert_eq!(decoded, result);
        assert_eq!(decoded.result_code(), ResultCode::Success);
    }

    #[test]
    fn roundtrip_with_matched_dn_and_message() {
        let result = LdapResult::new(ResultCode::NoSuchObject, "dc=example,dc=com", "no such entry");
        let mut buf = Vec::new();
        result.encode(&mut buf);
        let (decoded, _) = LdapResult::parse(&buf, true).unwrap();
        assert_eq!(decoded, result);
    }

    #[test]
    fn roundtrip_with_referral() {
        let mut result = LdapResult::new(ResultCode::Referral, "", "");
        result.referral = Some(vec!["ldap://other.example.com/".to_string()]);
        let mut buf = Vec::new();
        result.encode(&mut buf);
        let (decoded, consumed) = LdapResult::parse(&buf, true).unwrap();
        assert_eq!(consumed, buf.len());
        assert_eq!(decoded.referral, result.referral);
    }

    #[test]
    fn other_code_roundtrips_numerically() {
        let result = LdapResult::new(ResultCode::Other(118), "", "canceled");
        let mut buf = Vec::new();
        result.encode(&mut buf);
        let (decoded, _) = LdapResult::parse(&buf, true).unwrap();
        assert_eq!(decoded.result_code, 118);
    }

    #[test]
    fn non_referral_code_with_referral_is_dropped_when_tolerated() {
        let mut result = LdapResult::new(ResultCode::Success, "", "");
        result.referral = Some(vec!["ldap://other.example.com/".to_string()]);
        let mut buf = Vec::new();
        result.encode(&mut buf);
        let (decoded, _) = LdapResult::parse(&buf, true).unwrap();
        assert_eq!(decoded.referral, None);
    }

    #[test]
    fn non_referral_code_with_referral_is_rejected_when_not_tolerated() {
        let mut result = LdapResult::new(ResultCode::Success, "", "");
        result.referral = Some(vec!["ldap://other.example.com/".to_string()]);
        let mut buf = Vec::new();
        result.encode(&mut buf);
        assert!(matches!(
            LdapResult::parse(&buf, false),
            Err(LdapResultParseError::UnexpectedReferral { result_code: 0 })
        ));
    }
}
