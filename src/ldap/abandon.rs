/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! `AbandonRequest` (RFC 4511 section 4.11): `[APPLICATION 16] MessageID`,
//! a bare primitive INTEGER. Has no response.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbandonRequest {
    pub message_id: i32,
}

impl AbandonRequest {
    /// `value` is the two's-complement big-endian bytes already extracted
    /// from the `[APPLICATION 16]` TLV.
    pub fn from_value(value: &[u8]) -> Self {
        let mut v: i64 = if value.first().is_some_and(|b| b & 0x80 != 0) {
            -1
        } else {
            0
        };
        for &b in value {
            v = (v << 8) | b as i64;
        }
        AbandonRequest {
            message_id: v as i32,
        }
    }

    pub fn encode_value(&self) -> Vec<u8> {
        let mut encoder = crate::ber::BerIntegerEncoder::default();
        // encode() includes the universal INTEGER tag/length header; the
        // message dispatch layer supplies the [APPLICATION 16] tag instead,
        // so only the value octets are kept.
        let full = encoder.encode(self.message_id as i64).to_vec();
        full[2..].to_vec()
    }
}
