/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! Decoder configuration, following the `Default` + setter-method pattern
//! the pack's library crates use for their config structs (e.g.
//! `g3-cert-agent::CertAgentConfig`). There is nothing to load from a file:
//! the core is a library, not a daemon, so there is no YAML/serde layer here.

/// Per-connection decoder tuning (spec.md section 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    max_pdu_bytes: usize,
    strict_booleans: bool,
    allow_null_referral_in_non_referral_result: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            max_pdu_bytes: 2 * 1024 * 1024,
            strict_booleans: false,
            allow_null_referral_in_non_referral_result: true,
        }
    }
}

impl DecoderConfig {
    pub fn set_max_pdu_bytes(&mut self, max: usize) {
        self.max_pdu_bytes = max;
    }

    pub fn set_strict_booleans(&mut self, strict: bool) {
        self.strict_booleans = strict;
    }

    pub fn set_allow_null_referral_in_non_referral_result(&mut self, allow: bool) {
        self.allow_null_referral_in_non_referral_result = allow;
    }

    #[inline]
    pub fn max_pdu_bytes(&self) -> usize {
        self.max_pdu_bytes
    }

    #[inline]
    pub fn strict_booleans(&self) -> bool {
        self.strict_booleans
    }

    #[inline]
    pub fn allow_null_referral_in_non_referral_result(&self) -> bool {
        self.allow_null_referral_in_non_referral_result
    }
}
