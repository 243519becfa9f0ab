/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod message_id;
pub use message_id::{LdapMessageId, LdapMessageIdParseError};

mod result;
pub use result::{LdapResult, LdapResultParseError, ResultCode};

mod filter;
pub use filter::{Filter, FilterParseError, MatchingRuleAssertion, SubstringFilter};

mod attribute;
pub use attribute::{Attribute, AttributeParseError, AttributeValueAssertion, PartialAttribute};

mod control;
pub use control::{
    Control, ControlParseError, OID_PAGED_RESULTS, OID_PERSISTENT_SEARCH, OID_SERVER_SIDE_SORT_REQUEST,
    OID_SERVER_SIDE_SORT_RESPONSE, OID_SUBENTRIES, PagedResultsControl, PersistentSearchControl,
    ServerSortRequestControl, ServerSortResponseControl, SortKey, SubentriesControl, TypedControlParseError,
    encode_controls, parse_controls,
};

mod registry;
pub use registry::{
    CodecService, CodecServiceBuilder, ControlValue, PagedResultsControlFactory, PersistentSearchControlFactory,
    RegistryError, ServerSortRequestControlFactory, ServerSortResponseControlFactory, SubentriesControlFactory,
    ValueFactory,
};

mod bind;
pub use bind::{AuthenticationChoice, BindParseError, BindRequest, BindResponse, BindResponseParseError};

mod search;
pub use search::{
    DerefAliases, Scope, SearchRequest, SearchRequestParseError, SearchResultEntry, SearchResultEntryParseError,
    SearchResultReference,
};

mod modify;
pub use modify::{Change, ModifyOperation, ModifyParseError, ModifyRequest};

mod add;
pub use add::{AddParseError, AddRequest};

mod del;
pub use del::{DelParseError, DelRequest};

mod moddn;
pub use moddn::{ModifyDnParseError, ModifyDnRequest};

mod compare;
pub use compare::{CompareParseError, CompareRequest};

mod abandon;
pub use abandon::AbandonRequest;

mod extended;
pub use extended::{ExtendedParseError, ExtendedRequest, ExtendedResponse, IntermediateResponse, OID_NOTICE_OF_DISCONNECTION};

mod message;
pub use message::{LdapMessage, LdapMessageParseError, ProtocolOp, ProtocolOpParseError};
