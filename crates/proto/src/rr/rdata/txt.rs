// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! text records for storing arbitrary data

use std::fmt;

use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecoder, BinEncoder};

/// A single descriptive text <character-string>
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct TXT {
    txt: Box<[u8]>,
}

impl TXT {
    /// Creates a new TXT record data from its text
    pub fn new(txt: String) -> Self {
        Self {
            txt: txt.into_bytes().into_boxed_slice(),
        }
    }

    /// The raw character data of the record
    pub fn txt(&self) -> &[u8] {
        &self.txt
    }
}

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<TXT> {
    let txt = decoder.read_character_data()?.into();

    Ok(TXT { txt })
}

/// Write the RData to the given Encoder
pub fn emit(encoder: &mut BinEncoder<'_>, txt: &TXT) -> ProtoResult<()> {
    encoder.emit_character_data(&txt.txt)
}

impl fmt::Display for TXT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.txt))
    }
}
