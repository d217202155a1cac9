// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! HINFO record for storing host information
//!
//! [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
//!
//! ```text
//! 3.3.2. HINFO RDATA format
//!
//!     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!     /                      CPU                      /
//!     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!     /                       OS                      /
//!     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!
//! where:
//!
//! CPU             A <character-string> which specifies the CPU type.
//!
//! OS              A <character-string> which specifies the operating
//!                 system type.
//! ```

use std::fmt;

use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecoder, BinEncoder};

/// Host information of the responding host
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct HINFO {
    cpu: Box<[u8]>,
    os: Box<[u8]>,
}

impl HINFO {
    /// Creates a new HINFO record data.
    ///
    /// # Arguments
    ///
    /// * `cpu` - A <character-string> which specifies the CPU type.
    /// * `os` - A <character-string> which specifies the operating system type.
    pub fn new(cpu: String, os: String) -> Self {
        Self {
            cpu: cpu.into_bytes().into_boxed_slice(),
            os: os.into_bytes().into_boxed_slice(),
        }
    }

    /// A <character-string> which specifies the CPU type.
    pub fn cpu(&self) -> &[u8] {
        &self.cpu
    }

    /// A <character-string> which specifies the operating system type.
    pub fn os(&self) -> &[u8] {
        &self.os
    }
}

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<HINFO> {
    let cpu = decoder.read_character_data()?.into();
    let os = decoder.read_character_data()?.into();

    Ok(HINFO { cpu, os })
}

/// Write the RData to the given Encoder
pub fn emit(encoder: &mut BinEncoder<'_>, hinfo: &HINFO) -> ProtoResult<()> {
    encoder.emit_character_data(&hinfo.cpu)?;
    encoder.emit_character_data(&hinfo.os)
}

impl fmt::Display for HINFO {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{cpu} {os}",
            cpu = String::from_utf8_lossy(&self.cpu),
            os = String::from_utf8_lossy(&self.os),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test() {
        let rdata = HINFO::new("x86_64".to_string(), "Linux".to_string());

        let mut bytes = Vec::new();
        let mut encoder = BinEncoder::new(&mut bytes);
        emit(&mut encoder, &rdata).expect("encoding failed");
        assert_eq!(bytes, b"\x06x86_64\x05Linux".to_vec());

        let mut decoder = BinDecoder::new(&bytes);
        assert_eq!(read(&mut decoder).expect("decoding failed"), rdata);
    }

    #[test]
    fn test_empty_strings() {
        let rdata = HINFO::new(String::new(), String::new());

        let mut bytes = Vec::new();
        let mut encoder = BinEncoder::new(&mut bytes);
        emit(&mut encoder, &rdata).expect("encoding failed");

        // empty strings encode as a single zero byte each
        assert_eq!(bytes, vec![0, 0]);
    }
}
