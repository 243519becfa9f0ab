/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! End-to-end scenarios over the complete envelope + decoder stack, each
//! anchored to a literal byte sequence rather than only an internal
//! structural round-trip.

use hex_literal::hex;

use ldap_codec::config::DecoderConfig;
use ldap_codec::decoder::Decoder;
use ldap_codec::ldap::{
    AbandonRequest, AddRequest, Attribute, AttributeValueAssertion, CompareRequest, DerefAliases, Filter,
    LdapMessage, LdapResult, ProtocolOp, Scope, SearchRequest,
};

#[test]
fn unbind_round_trip() {
    let message = LdapMessage::new(1, ProtocolOp::UnbindRequest);
    let mut buf = Vec::new();
    message.encode(&mut buf);
    assert_eq!(buf, hex!("30 05 02 01 01 42 00"));

    let mut decoder = Decoder::new(DecoderConfig::default());
    decoder.feed(&buf);
    let decoded = decoder.poll().unwrap().unwrap();
    assert_eq!(decoded, message);
    assert_eq!(decoder.buffered_len(), 0);
}

#[test]
fn default_success_delete_response() {
    let message = LdapMessage::new(42, ProtocolOp::DelResponse(LdapResult::success()));
    let mut buf = Vec::new();
    message.encode(&mut buf);
    assert_eq!(buf, hex!("30 0C 02 01 2A 6B 07 0A 01 00 04 00 04 00"));

    let mut decoder = Decoder::new(DecoderConfig::default());
    decoder.feed(&buf);
    let decoded = decoder.poll().unwrap().unwrap();
    assert_eq!(decoded, message);
}

#[test]
fn abandon_request_literal_bytes() {
    let message = LdapMessage::new(7, ProtocolOp::AbandonRequest(AbandonRequest { message_id: 3 }));
    let mut buf = Vec::new();
    message.encode(&mut buf);
    assert_eq!(buf, hex!("30 06 02 01 07 50 01 03"));

    let mut decoder = Decoder::new(DecoderConfig::default());
    decoder.feed(&buf);
    assert_eq!(decoder.poll().unwrap().unwrap(), message);
}

#[test]
fn search_request_with_present_filter_splits_across_two_feeds() {
    let message = LdapMessage::new(
        2,
        ProtocolOp::SearchRequest(SearchRequest {
            base_object: "dc=example,dc=com".to_string(),
            scope: Scope::WholeSubtree,
            deref_aliases: DerefAliases::NeverDerefAliases,
            size_limit: 0,
            time_limit: 0,
            types_only: false,
            filter: Filter::Present("objectClass".to_string()),
            attributes: vec!["cn".to_string()],
        }),
    );
    let mut buf = Vec::new();
    message.encode(&mut buf);

    let split_at = buf.len() / 2;
    let (first_half, second_half) = buf.split_at(split_at);

    let mut decoder = Decoder::new(DecoderConfig::default());
    decoder.feed(first_half);
    assert!(decoder.poll().unwrap().is_none());
    decoder.feed(second_half);
    let decoded = decoder.poll().unwrap().unwrap();
    assert_eq!(decoded, message);
}

#[test]
fn add_request_preserves_attribute_and_value_order() {
    let message = LdapMessage::new(
        3,
        ProtocolOp::AddRequest(AddRequest {
            entry: "cn=a,dc=x".to_string(),
            attributes: vec![Attribute::new("cn", vec![b"a".to_vec(), b"b".to_vec()])],
        }),
    );
    let mut buf = Vec::new();
    message.encode(&mut buf);

    let mut decoder = Decoder::new(DecoderConfig::default());
    decoder.feed(&buf);
    let decoded = decoder.poll().unwrap().unwrap();
    assert_eq!(decoded, message);
    match decoded.protocol_op {
        ProtocolOp::AddRequest(req) => {
            assert_eq!(req.attributes[0].values, vec![b"a".to_vec(), b"b".to_vec()]);
        }
        _ => panic!("expected AddRequest"),
    }
}

#[test]
fn compare_request_with_embedded_nul_bytes_survives_round_trip() {
    let message = LdapMessage::new(
        4,
        ProtocolOp::CompareRequest(CompareRequest {
            entry: "cn=admin,dc=example,dc=com".to_string(),
            ava: AttributeValueAssertion {
                attribute_desc: "userPassword".to_string(),
                assertion_value: hex!("00 01 02 FF").to_vec(),
            },
        }),
    );
    let mut buf = Vec::new();
    message.encode(&mut buf);

    let mut decoder = Decoder::new(DecoderConfig::default());
    decoder.feed(&buf);
    let decoded = decoder.poll().unwrap().unwrap();
    match decoded.protocol_op {
        ProtocolOp::CompareRequest(req) => {
            assert_eq!(req.ava.assertion_value, vec![0x00, 0x01, 0x02, 0xFF]);
        }
        _ => panic!("expected CompareRequest"),
    }
}
