// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! CNAME record for the canonical name of an alias

use std::fmt;

use crate::error::ProtoResult;
use crate::rr::Name;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// The canonical name for the alias
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct CNAME(pub Name);

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<CNAME> {
    Name::read(decoder).map(CNAME)
}

/// Write the RData to the given Encoder
pub fn emit(encoder: &mut BinEncoder<'_>, cname: &CNAME) -> ProtoResult<()> {
    cname.0.emit(encoder)
}

impl fmt::Display for CNAME {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
