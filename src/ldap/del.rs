/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! `DelRequest` (RFC 4511 section 4.8): `[APPLICATION 10] LDAPDN`, a bare
//! primitive OCTET STRING with no further structure. `DelResponse` carries
//! no fields beyond `LDAPResult` and is represented directly by
//! [`super::result::LdapResult`].

use thiserror::Error;

use crate::dn::is_valid_dn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelRequest {
    pub name: String,
}

#[derive(Debug, Error)]
pub enum DelParseError {
    #[error("invalid LDAPDN: {0}")]
    InvalidDn(String),
}

impl DelRequest {
    /// `data` is the already-extracted value of the `[APPLICATION 10]` TLV.
    pub fn from_value(data: &[u8]) -> Result<Self, DelParseError> {
        let name = String::from_utf8_lossy(data).into_owned();
        if !is_valid_dn(&name) {
            return Err(DelParseError::InvalidDn(name));
        }
        Ok(DelRequest { name })
    }

    pub fn value_bytes(&self) -> &[u8] {
        self.name.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_value_decodes_utf8_dn() {
        let request = DelRequest::from_value(b"cn=old,dc=example,dc=com").unwrap();
        assert_eq!(request.name, "cn=old,dc=example,dc=com");
        assert_eq!(request.value_bytes(), b"cn=old,dc=example,dc=com");
    }

    #[test]
    fn from_value_rejects_malformed_dn() {
        assert!(matches!(DelRequest::from_value(b"cn=a,,dc=com"), Err(DelParseError::InvalidDn(_))));
    }
}
