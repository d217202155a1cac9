// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! IPv6 address record data
//!
//! [RFC 3596, DNS Extensions to Support IPv6, October 2003](https://tools.ietf.org/html/rfc3596)
//!
//! ```text
//! 2.2 AAAA data format
//!
//!    A 128 bit IPv6 address is encoded in the data portion of an AAAA
//!    resource record in network byte order (high-order byte first).
//! ```

use std::fmt;
use std::net::Ipv6Addr;

use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecoder, BinEncoder};

/// The IPv6 address of the record
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct AAAA(pub Ipv6Addr);

impl From<Ipv6Addr> for AAAA {
    fn from(addr: Ipv6Addr) -> Self {
        Self(addr)
    }
}

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<AAAA> {
    let octets: [u8; 16] = decoder
        .read_slice(16)?
        .try_into()
        .expect("read_slice returned the wrong length");

    Ok(AAAA(Ipv6Addr::from(octets)))
}

/// Write the RData to the given Encoder
pub fn emit(encoder: &mut BinEncoder<'_>, aaaa: &AAAA) -> ProtoResult<()> {
    encoder.emit_vec(&aaaa.0.octets())
}

impl fmt::Display for AAAA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test() {
        let rdata = AAAA(Ipv6Addr::from_str("fe80::260:3eff:fe05:c2b0").unwrap());

        let mut bytes = Vec::new();
        let mut encoder = BinEncoder::new(&mut bytes);
        emit(&mut encoder, &rdata).expect("encoding failed");
        assert_eq!(bytes.len(), 16);

        let mut decoder = BinDecoder::new(&bytes);
        assert_eq!(read(&mut decoder).expect("decoding failed"), rdata);
    }
}
