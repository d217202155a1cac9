// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! IPv4 address record data
//!
//! [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
//!
//! ```text
//! 3.4.1. A RDATA format
//!
//!     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!     |                    ADDRESS                    |
//!     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!
//! where:
//!
//! ADDRESS         A 32 bit Internet address.
//! ```

use std::fmt;
use std::net::Ipv4Addr;

use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecoder, BinEncoder};

/// The IPv4 address of the record
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct A(pub Ipv4Addr);

impl From<Ipv4Addr> for A {
    fn from(addr: Ipv4Addr) -> Self {
        Self(addr)
    }
}

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<A> {
    Ok(A(Ipv4Addr::new(
        decoder.pop()?,
        decoder.pop()?,
        decoder.pop()?,
        decoder.pop()?,
    )))
}

/// Write the RData to the given Encoder
pub fn emit(encoder: &mut BinEncoder<'_>, a: &A) -> ProtoResult<()> {
    encoder.emit_vec(&a.0.octets())
}

impl fmt::Display for A {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test() {
        let rdata = A(Ipv4Addr::new(192, 168, 64, 32));

        let mut bytes = Vec::new();
        let mut encoder = BinEncoder::new(&mut bytes);
        emit(&mut encoder, &rdata).expect("encoding failed");
        assert_eq!(bytes, vec![192, 168, 64, 32]);

        let mut decoder = BinDecoder::new(&bytes);
        assert_eq!(read(&mut decoder).expect("decoding failed"), rdata);
    }
}
