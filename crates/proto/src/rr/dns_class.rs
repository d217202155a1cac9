// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! class of DNS operations, in general always IN for internet

use std::fmt;

use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// In mDNS the top bit of the class is not part of the class proper: on a
/// question it requests a unicast response, on a record it signals cache
/// flush. The bit is preserved bit-exactly through decode and re-encode.
pub const MDNS_UNICAST_RESPONSE: u16 = 0x8000;

/// The DNS Class
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub enum DNSClass {
    /// Internet
    IN,
    /// No class, used in update messages
    NONE,
    /// QCLASS * (ANY)
    ANY,
    /// Unknown class, the raw value is preserved; this includes any class
    /// carrying the mDNS unicast-response / cache-flush bit
    Unknown(u16),
}

impl DNSClass {
    /// Returns `true` if the mDNS unicast-response / cache-flush bit is set
    pub fn unicast_response(self) -> bool {
        u16::from(self) & MDNS_UNICAST_RESPONSE != 0
    }

    /// Returns the class with the mDNS unicast-response bit stripped
    pub fn base(self) -> Self {
        Self::from(u16::from(self) & !MDNS_UNICAST_RESPONSE)
    }
}

impl From<u16> for DNSClass {
    fn from(value: u16) -> Self {
        match value {
            1 => Self::IN,
            254 => Self::NONE,
            255 => Self::ANY,
            _ => Self::Unknown(value),
        }
    }
}

impl From<DNSClass> for u16 {
    fn from(class: DNSClass) -> Self {
        match class {
            DNSClass::IN => 1,
            DNSClass::NONE => 254,
            DNSClass::ANY => 255,
            DNSClass::Unknown(value) => value,
        }
    }
}

impl BinEncodable for DNSClass {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u16((*self).into())
    }
}

impl<'r> BinDecodable<'r> for DNSClass {
    fn read(decoder: &mut BinDecoder<'r>) -> ProtoResult<Self> {
        decoder.read_u16().map(Self::from)
    }
}

impl fmt::Display for DNSClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.base() {
            Self::IN => f.write_str("IN"),
            Self::NONE => f.write_str("NONE"),
            Self::ANY => f.write_str("ANY"),
            Self::Unknown(code) => write!(f, "CLASS{code}"),
        }
    }
}
