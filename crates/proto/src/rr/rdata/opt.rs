// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! option record for passing EDNS protocol options
//!
//! The option payload is carried as opaque bytes: it is decoded far enough
//! to round-trip (code, length, data) and is never interpreted or
//! synthesized in answers.

use std::fmt;

use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecoder, BinEncoder};

/// A single EDNS option, uninterpreted
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct OPT {
    code: u16,
    data: Vec<u8>,
}

impl OPT {
    /// Creates a new OPT record data from a raw option
    pub fn new(code: u16, data: Vec<u8>) -> Self {
        Self { code, data }
    }

    /// The option code
    pub fn code(&self) -> u16 {
        self.code
    }

    /// The opaque option data
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<OPT> {
    let code = decoder.read_u16()?;
    let len = decoder.read_u16()?;
    let data = decoder.read_vec(len as usize)?;

    Ok(OPT { code, data })
}

/// Write the RData to the given Encoder
pub fn emit(encoder: &mut BinEncoder<'_>, opt: &OPT) -> ProtoResult<()> {
    encoder.emit_u16(opt.code)?;
    encoder.emit_u16(opt.data.len() as u16)?;
    encoder.emit_vec(&opt.data)
}

impl fmt::Display for OPT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OPT code {code}", code = self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test() {
        let rdata = OPT::new(4, vec![0xDE, 0xAD, 0xBE, 0xEF]);

        let mut bytes = Vec::new();
        let mut encoder = BinEncoder::new(&mut bytes);
        emit(&mut encoder, &rdata).expect("encoding failed");
        assert_eq!(bytes, vec![0, 4, 0, 4, 0xDE, 0xAD, 0xBE, 0xEF]);

        let mut decoder = BinDecoder::new(&bytes);
        assert_eq!(read(&mut decoder).expect("decoding failed"), rdata);
    }
}
