/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! Syntactic LDAPOID validation (RFC 4512 section 1.4): a dotted sequence
//! of decimal numbers, at least two components, no empty component and no
//! leading zero in a multi-digit component. Purely syntactic, no OID
//! registry or schema lookup (spec.md's schema Non-goal).

/// Returns `true` if `s` is a syntactically valid LDAPOID.
pub fn is_valid_oid(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    let mut components = 0;
    for part in s.split('.') {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        if part.len() > 1 && part.starts_with('0') {
            return false;
        }
        components += 1;
    }
    components >= 2
}
