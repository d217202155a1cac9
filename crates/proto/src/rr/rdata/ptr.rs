// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! PTR pointer record for naming other locations in the domain space

use std::fmt;

use crate::error::ProtoResult;
use crate::rr::Name;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// A domain name pointer, e.g. for reverse lookups and service enumeration
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct PTR(pub Name);

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<PTR> {
    Name::read(decoder).map(PTR)
}

/// Write the RData to the given Encoder
pub fn emit(encoder: &mut BinEncoder<'_>, ptr: &PTR) -> ProtoResult<()> {
    ptr.0.emit(encoder)
}

impl fmt::Display for PTR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
