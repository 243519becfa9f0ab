/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! Pluggable control and extended-operation payload types, keyed by OID.
//!
//! Registration is a two-phase process rather than a process-wide mutable
//! singleton: a [`CodecServiceBuilder`] accumulates factories, then
//! [`CodecServiceBuilder::build`] freezes them into a [`CodecService`] that
//! is read-only for the rest of its lifetime. Callers that want a shared,
//! concurrently-readable instance wrap the built `CodecService` in their own
//! `Arc`; this module does not impose one.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use super::control::{
    PagedResultsControl, PersistentSearchControl, ServerSortRequestControl, ServerSortResponseControl,
    SubentriesControl, TypedControlParseError,
};
use super::control::{
    OID_PAGED_RESULTS, OID_PERSISTENT_SEARCH, OID_SERVER_SIDE_SORT_REQUEST, OID_SERVER_SIDE_SORT_RESPONSE,
    OID_SUBENTRIES,
};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no factory registered for OID {0}")]
    NoSuchOid(String),
    #[error(transparent)]
    Value(#[from] TypedControlParseError),
}

/// A decoded control or extended-operation value, as produced by a
/// [`ValueFactory`]. Trait objects let the registry hand back heterogeneous
/// typed payloads through a single lookup.
pub trait ControlValue: fmt::Debug {
    fn encode_value(&self) -> Vec<u8>;
}

impl ControlValue for PagedResultsControl {
    fn encode_value(&self) -> Vec<u8> {
        self.encode_value()
    }
}

impl ControlValue for PersistentSearchControl {
    fn encode_value(&self) -> Vec<u8> {
        self.encode_value()
    }
}

impl ControlValue for ServerSortRequestControl {
    fn encode_value(&self) -> Vec<u8> {
        self.encode_value()
    }
}

impl ControlValue for ServerSortResponseControl {
    fn encode_value(&self) -> Vec<u8> {
        self.encode_value()
    }
}

impl ControlValue for SubentriesControl {
    fn encode_value(&self) -> Vec<u8> {
        self.encode_value()
    }
}

/// Produces and parses the typed value for a single OID. One factory is
/// registered per control type, per extended-request type, etc.
pub trait ValueFactory: Send + Sync {
    fn new_value(&self) -> Box<dyn ControlValue>;
    fn decode_value(&self, bytes: &[u8]) -> Result<Box<dyn ControlValue>, RegistryError>;
}

macro_rules! value_factory {
    ($name:ident, $ty:ty, $default:expr) => {
        #[derive(Debug, Default)]
        pub struct $name;

        impl ValueFactory for $name {
            fn new_value(&self) -> Box<dyn ControlValue> {
                Box::new($default)
            }

            fn decode_value(&self, bytes: &[u8]) -> Result<Box<dyn ControlValue>, RegistryError> {
                Ok(Box::new(<$ty>::decode_value(bytes)?))
            }
        }
    };
}

value_factory!(
    PagedResultsControlFactory,
    PagedResultsControl,
    PagedResultsControl {
        size: 0,
        cookie: Vec::new(),
    }
);
value_factory!(
    PersistentSearchControlFactory,
    PersistentSearchControl,
    PersistentSearchControl {
        change_types: 0,
        changes_only: false,
        return_ecs: false,
    }
);
value_factory!(
    ServerSortRequestControlFactory,
    ServerSortRequestControl,
    ServerSortRequestControl { sort_keys: Vec::new() }
);
value_factory!(
    ServerSortResponseControlFactory,
    ServerSortResponseControl,
    ServerSortResponseControl {
        sort_result: 0,
        attribute_type: None,
    }
);
value_factory!(
    SubentriesControlFactory,
    SubentriesControl,
    SubentriesControl { visibility: true }
);

type FactoryMap = HashMap<String, Box<dyn ValueFactory>>;

/// Accumulates control and extended-operation factories before they become
/// read-only. Mirrors `registerRequestControl`/`registerResponseControl`/
/// `registerExtendedRequest`/`registerExtendedResponse`/
/// `registerIntermediateResponse`: each register call returns whatever
/// factory it replaced.
#[derive(Default)]
pub struct CodecServiceBuilder {
    request_controls: FactoryMap,
    response_controls: FactoryMap,
    extended_requests: FactoryMap,
    extended_responses: FactoryMap,
    intermediate_responses: FactoryMap,
}

impl CodecServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder pre-populated with the five control types this codec
    /// always knows how to decode byte-exactly (PagedResults,
    /// PersistentSearch, ServerSort request/response, Subentries).
    pub fn with_well_known_controls() -> Self {
        let mut builder = Self::new();
        builder.register_request_control(OID_PAGED_RESULTS, Box::new(PagedResultsControlFactory));
        builder.register_response_control(OID_PAGED_RESULTS, Box::new(PagedResultsControlFactory));
        builder.register_request_control(OID_PERSISTENT_SEARCH, Box::new(PersistentSearchControlFactory));
        builder.register_request_control(
            OID_SERVER_SIDE_SORT_REQUEST,
            Box::new(ServerSortRequestControlFactory),
        );
        builder.register_response_control(
            OID_SERVER_SIDE_SORT_RESPONSE,
            Box::new(ServerSortResponseControlFactory),
        );
        builder.register_request_control(OID_SUBENTRIES, Box::new(SubentriesControlFactory));
        builder
    }

    pub fn register_request_control(
        &mut self,
        oid: impl Into<String>,
        factory: Box<dyn ValueFactory>,
    ) -> Option<Box<dyn ValueFactory>> {
        self.request_controls.insert(oid.into(), factory)
    }

    pub fn register_response_control(
        &mut self,
        oid: impl Into<String>,
        factory: Box<dyn ValueFactory>,
    ) -> Option<Box<dyn ValueFactory>> {
        self.response_controls.insert(oid.into(), factory)
    }

    pub fn register_extended_request(
        &mut self,
        oid: impl Into<String>,
        factory: Box<dyn ValueFactory>,
    ) -> Option<Box<dyn ValueFactory>> {
        self.extended_requests.insert(oid.into(), factory)
    }

    pub fn register_extended_response(
        &mut self,
        oid: impl Into<String>,
        factory: Box<dyn ValueFactory>,
    ) -> Option<Box<dyn ValueFactory>> {
        self.extended_responses.insert(oid.into(), factory)
    }

    pub fn register_intermediate_response(
        &mut self,
        oid: impl Into<String>,
        factory: Box<dyn ValueFactory>,
    ) -> Option<Box<dyn ValueFactory>> {
        self.intermediate_responses.insert(oid.into(), factory)
    }

    pub fn build(self) -> CodecService {
        CodecService {
            request_controls: self.request_controls,
            response_controls: self.response_controls,
            extended_requests: self.extended_requests,
            extended_responses: self.extended_responses,
            intermediate_responses: self.intermediate_responses,
        }
    }
}

/// Read-only lookup of control/extended-operation factories by OID. Build
/// one with [`CodecServiceBuilder`] and share it (behind an `Arc`, if
/// needed) across however many decoders use it; nothing here mutates after
/// `build()`.
pub struct CodecService {
    request_controls: FactoryMap,
    response_controls: FactoryMap,
    extended_requests: FactoryMap,
    extended_responses: FactoryMap,
    intermediate_responses: FactoryMap,
}

impl CodecService {
    pub fn decode_request_control(&self, oid: &str, bytes: &[u8]) -> Result<Box<dyn ControlValue>, RegistryError> {
        decode_with(&self.request_controls, oid, bytes)
    }

    pub fn decode_response_control(&self, oid: &str, bytes: &[u8]) -> Result<Box<dyn ControlValue>, RegistryError> {
        decode_with(&self.response_controls, oid, bytes)
    }

    pub fn decode_extended_request(&self, oid: &str, bytes: &[u8]) -> Result<Box<dyn ControlValue>, RegistryError> {
        decode_with(&self.extended_requests, oid, bytes)
    }

    pub fn decode_extended_response(&self, oid: &str, bytes: &[u8]) -> Result<Box<dyn ControlValue>, RegistryError> {
        decode_with(&self.extended_responses, oid, bytes)
    }

    pub fn decode_intermediate_response(&self, oid: &str, bytes: &[u8]) -> Result<Box<dyn ControlValue>, RegistryError> {
        decode_with(&self.intermediate_responses, oid, bytes)
    }
}

fn decode_with(map: &FactoryMap, oid: &str, bytes: &[u8]) -> Result<Box<dyn ControlValue>, RegistryError> {
    let factory = map
        .get(oid)
        .ok_or_else(|| RegistryError::NoSuchOid(oid.to_string()))?;
    factory.decode_value(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_registration_returns_previous_factory() {
        let mut builder = CodecServiceBuilder::new();
        assert!(
            builder
                .register_request_control(OID_PAGED_RESULTS, Box::new(PagedResultsControlFactory))
                .is_none()
        );
        assert!(
            builder
                .register_request_control(OID_PAGED_RESULTS, Box::new(PagedResultsControlFactory))
                .is_some()
        );
    }

    #[test]
    fn well_known_controls_decode_through_the_service() {
        let service = CodecServiceBuilder::with_well_known_controls().build();
        let value = PagedResultsControl {
            size: 10,
            cookie: b"abc".to_vec(),
        };
        let encoded = value.encode_value();
        let decoded = service.decode_request_control(OID_PAGED_RESULTS, &encoded).unwrap();
        assert_eq!(decoded.encode_value(), encoded);
    }

    #[test]
    fn unregistered_oid_is_rejected() {
        let service = CodecServiceBuilder::new().build();
        assert!(matches!(
            service.decode_request_control(OID_PAGED_RESULTS, &[]),
            Err(RegistryError::NoSuchOid(_))
        ));
    }
}
