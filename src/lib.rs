/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

pub mod ber;
pub mod tlv;

pub mod config;
pub mod decoder;
pub mod error;

pub mod dn;
pub mod oid;
pub mod url;

pub mod ldap;
