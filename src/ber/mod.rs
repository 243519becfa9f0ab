/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod tag;
pub use tag::{
    TAG_BOOLEAN, TAG_ENUMERATED, TAG_INTEGER, TAG_NULL, TAG_OCTET_STRING, TAG_SEQUENCE, TAG_SET,
    nbytes,
};

mod length;
pub use length::{BerLength, BerLengthEncoder, BerLengthParseError};

mod integer;
pub use integer::{BerInteger, BerIntegerEncoder, BerIntegerParseError};

mod boolean;
pub use boolean::{BerBoolean, BerBooleanParseError, encode_bool};

mod octet_string;
pub use octet_string::{BerOctetString, BerOctetStringParseError, encode_octet_string};
