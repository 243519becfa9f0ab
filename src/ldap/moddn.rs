/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! `ModifyDNRequest` (RFC 4511 section 4.9). `ModifyDNResponse` carries no
//! fields beyond `LDAPResult` and is represented directly by
//! [`super::result::LdapResult`].

use thiserror::Error;

use crate::ber::{BerBoolean, BerBooleanParseError, encode_bool, encode_octet_string};
use crate::dn::is_valid_dn;
use crate::tlv::{Tlv, TlvParseError};

const TAG_NEW_SUPERIOR: u8 = 0x80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyDnRequest {
    pub entry: String,
    pub new_rdn: String,
    pub delete_old_rdn: bool,
    pub new_superior: Option<String>,
}

#[derive(Debug, Error)]
pub enum ModifyDnParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error(transparent)]
    Malformed(#[from] TlvParseError),
    #[error("invalid LDAPDN: {0}")]
    InvalidDn(String),
}

impl From<BerBooleanParseError> for ModifyDnParseError {
    fn from(value: BerBooleanParseError) -> Self {
        match value {
            BerBooleanParseError::NeedMoreData(n) => ModifyDnParseError::NeedMoreData(n),
            _ => ModifyDnParseError::Malformed(TlvParseError::LengthInconsistent),
        }
    }
}

impl ModifyDnRequest {
    pub fn parse(data: &[u8]) -> Result<(Self, usize), ModifyDnParseError> {
        let entry_tlv = Tlv::parse_tag(data, 0x04)?;
        let entry = String::from_utf8_lossy(entry_tlv.value()).into_owned();
        if !is_valid_dn(&entry) {
            return Err(ModifyDnParseError::InvalidDn(entry));
        }
        let mut offset = entry_tlv.encoded_len();

        let new_rdn_tlv = Tlv::parse_tag(&data[offset..], 0x04)?;
        let new_rdn = String::from_utf8_lossy(new_rdn_tlv.value()).into_owned();
        offset += new_rdn_tlv.encoded_len();

        let delete_old_rdn_ber = BerBoolean::parse(&data[offset..], false)?;
        let delete_old_rdn = delete_old_rdn_ber.value();
        offset += delete_old_rdn_ber.encoded_len();

        let mut new_superior = None;
        if offset < data.len() && data[offset] == TAG_NEW_SUPERIOR {
            let tlv = Tlv::parse_tag(&data[offset..], TAG_NEW_SUPERIOR)?;
            let superior = String::from_utf8_lossy(tlv.value()).into_owned();
            if !is_valid_dn(&superior) {
                return Err(ModifyDnParseError::InvalidDn(superior));
            }
            new_superior = Some(superior);
            offset += tlv.encoded_len();
        }

        Ok((
            ModifyDnRequest {
                entry,
                new_rdn,
                delete_old_rdn,
                new_superior,
            },
            offset,
        ))
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        encode_octet_string(buf, 0x04, self.entry.as_bytes());
        encode_octet_string(buf, 0x04, self.new_rdn.as_bytes());
        encode_bool(buf, 0x01, self.delete_old_rdn);
        if let Some(new_superior) = &self.new_superior {
            encode_octet_string(buf, TAG_NEW_SUPERIOR, new_superior.as_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_without_new_superior() {
        let request = ModifyDnRequest {
            entry: "cn=old,dc=example,dc=com".to_string(),
            new_rdn: "cn=new".to_string(),
            delete_old_rdn: true,
            new_superior: None,
        };
        let mut buf = Vec::new();
        request.encode(&mut buf);
        let (decoded, used) = ModifyDnRequest::parse(&buf).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, request);
    }

    #[test]
    fn roundtrips_with_new_superior() {
        let request = ModifyDnRequest {
            entry: "cn=old,dc=example,dc=com".to_string(),
            new_rdn: "cn=new".to_string(),
            delete_old_rdn: false,
            new_superior: Some("dc=other,dc=com".to_string()),
        };
        let mut buf = Vec::new();
        request.encode(&mut buf);
        let (decoded, used) = ModifyDnRequest::parse(&buf).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(decoded, request);
    }

    #[test]
    fn rejects_malformed_entry() {
        let mut buf = Vec::new();
        encode_octet_string(&mut buf, 0x04, b"cn=a,,dc=com");
        encode_octet_string(&mut buf, 0x04, b"cn=new");
        encode_bool(&mut buf, 0x01, false);
        assert!(matches!(ModifyDnRequest::parse(&buf), Err(ModifyDnParseError::InvalidDn(_))));
    }
}
