/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! Syntactic LDAPURL validation (RFC 4516 section 2): `scheme://...` with a
//! recognized scheme. Referral URIs are not required to be LDAP URLs by
//! RFC 4511, so any URI-shaped string with a scheme is accepted; only the
//! gross shape is checked, never host/port/DN resolution.

pub fn is_valid_url(s: &str) -> bool {
    let Some((scheme, rest)) = s.split_once("://") else {
        return false;
    };
    if scheme.is_empty() || rest.is_empty() {
        return false;
    }
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
}
