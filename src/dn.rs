/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! Syntactic LDAPDN validation (RFC 4514): a comma-separated sequence of
//! RDNs, each RDN a `+`-separated sequence of `attr=value` pairs, `attr`
//! a non-empty descriptor or dotted OID. No attribute-type or matching-rule
//! resolution (spec.md's schema Non-goal) — a DN is accepted as long as it
//! has the right shape; the empty DN (root DSE / unauthenticated bind) is
//! always valid.

fn is_valid_attribute_type(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    if s.as_bytes()[0].is_ascii_digit() {
        return crate::oid::is_valid_oid(s);
    }
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn is_valid_rdn(rdn: &str) -> bool {
    if rdn.is_empty() {
        return false;
    }
    rdn.split('+').all(|ava| {
        let Some((attr, _value)) = ava.split_once('=') else {
            return false;
        };
        is_valid_attribute_type(attr)
    })
}

/// Returns `true` if `s` is a syntactically valid LDAPDN. The empty string
/// (the root DSE or an unauthenticated bind DN) is valid.
pub fn is_valid_dn(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    s.split(',').all(is_valid_rdn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_dns() {
        assert!(is_valid_dn(""));
        assert!(is_valid_dn("dc=example,dc=com"));
        assert!(is_valid_dn("cn=a,dc=x"));
        assert!(is_valid_dn("cn=Multi+sn=Valued,dc=example,dc=com"));
        assert!(is_valid_dn("1.3.6.1.4.1=weird,dc=example,dc=com"));
    }

    #[test]
    fn rejects_invalid_dns() {
        assert!(!is_valid_dn(","));
        assert!(!is_valid_dn("cn"));
        assert!(!is_valid_dn("=value,dc=com"));
        assert!(!is_valid_dn("9bad=value"));
        assert!(!is_valid_dn("cn=a,,dc=com"));
    }
}
