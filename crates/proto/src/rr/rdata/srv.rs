// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! service records for identifying the host of a particular service
//!
//! [RFC 2782, DNS SRV RR, February 2000](https://tools.ietf.org/html/rfc2782)

use std::fmt;

use crate::error::ProtoResult;
use crate::rr::Name;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// The priority, weight, port and target of a service
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct SRV {
    priority: u16,
    weight: u16,
    port: u16,
    target: Name,
}

impl SRV {
    /// Creates a new SRV record data
    pub fn new(priority: u16, weight: u16, port: u16, target: Name) -> Self {
        Self {
            priority,
            weight,
            port,
            target,
        }
    }

    /// The priority of this target host, lower is preferred
    pub fn priority(&self) -> u16 {
        self.priority
    }

    /// The relative weight for entries with the same priority
    pub fn weight(&self) -> u16 {
        self.weight
    }

    /// The port on this target host of this service
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The domain name of the target host
    pub fn target(&self) -> &Name {
        &self.target
    }
}

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<SRV> {
    Ok(SRV {
        priority: decoder.read_u16()?,
        weight: decoder.read_u16()?,
        port: decoder.read_u16()?,
        target: Name::read(decoder)?,
    })
}

/// Write the RData to the given Encoder
pub fn emit(encoder: &mut BinEncoder<'_>, srv: &SRV) -> ProtoResult<()> {
    encoder.emit_u16(srv.priority)?;
    encoder.emit_u16(srv.weight)?;
    encoder.emit_u16(srv.port)?;
    srv.target.emit(encoder)
}

impl fmt::Display for SRV {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{priority} {weight} {port} {target}",
            priority = self.priority,
            weight = self.weight,
            port = self.port,
            target = self.target,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test() {
        let rdata = SRV::new(1, 2, 5353, Name::from_ascii("host.local.").unwrap());

        let mut bytes = Vec::new();
        let mut encoder = BinEncoder::new(&mut bytes);
        emit(&mut encoder, &rdata).expect("encoding failed");

        let mut decoder = BinDecoder::new(&bytes);
        assert_eq!(read(&mut decoder).expect("decoding failed"), rdata);
    }
}
