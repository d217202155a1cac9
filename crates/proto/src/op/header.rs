// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Message metadata

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// Metadata for the `Message` struct.
///
/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// 4.1.1. Header section format
///
/// The header contains the following fields
///
///                                    1  1  1  1  1  1
///      0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      ID                       |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |QR|   Opcode  |AA|TC|RD|RA|ZZ|AD|CD|   RCODE   |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    QDCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    ANCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    NSCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    ARCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// All fields are big-endian.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Header {
    id: u16,
    flags: Flags,
    query_count: u16,
    answer_count: u16,
    name_server_count: u16,
    additional_count: u16,
}

impl Header {
    /// A new header with all fields zeroed
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the header, always 12 bytes
    pub fn len() -> usize {
        12
    }

    /// Sets the id of the message, for queries this shouldn't be modified after
    pub fn set_id(&mut self, id: u16) -> &mut Self {
        self.id = id;
        self
    }

    /// Sets the entire flags word
    pub fn set_flags(&mut self, flags: Flags) -> &mut Self {
        self.flags = flags;
        self
    }

    /// Sets the response code, preserving the flag bits
    pub fn set_response_code(&mut self, response_code: ResponseCode) -> &mut Self {
        self.flags.set_response_code(response_code);
        self
    }

    /// Number of entries in the query section
    pub fn set_query_count(&mut self, query_count: u16) -> &mut Self {
        self.query_count = query_count;
        self
    }

    /// Number of entries in the answer section
    pub fn set_answer_count(&mut self, answer_count: u16) -> &mut Self {
        self.answer_count = answer_count;
        self
    }

    /// Number of entries in the authority section
    pub fn set_name_server_count(&mut self, name_server_count: u16) -> &mut Self {
        self.name_server_count = name_server_count;
        self
    }

    /// Number of entries in the additional section
    pub fn set_additional_count(&mut self, additional_count: u16) -> &mut Self {
        self.additional_count = additional_count;
        self
    }

    /// The message id
    pub fn id(&self) -> u16 {
        self.id
    }

    /// The flags word
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// A mutable reference to the flags word
    pub fn flags_mut(&mut self) -> &mut Flags {
        &mut self.flags
    }

    /// The response code carried in the low nibble of the flags word
    pub fn response_code(&self) -> ResponseCode {
        self.flags.response_code()
    }

    /// Number of entries in the query section
    pub fn query_count(&self) -> u16 {
        self.query_count
    }

    /// Number of entries in the answer section
    pub fn answer_count(&self) -> u16 {
        self.answer_count
    }

    /// Number of entries in the authority section
    pub fn name_server_count(&self) -> u16 {
        self.name_server_count
    }

    /// Number of entries in the additional section
    pub fn additional_count(&self) -> u16 {
        self.additional_count
    }
}

impl BinEncodable for Header {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u16(self.id)?;
        encoder.emit_u16(self.flags.bits())?;
        encoder.emit_u16(self.query_count)?;
        encoder.emit_u16(self.answer_count)?;
        encoder.emit_u16(self.name_server_count)?;
        encoder.emit_u16(self.additional_count)
    }
}

impl<'r> BinDecodable<'r> for Header {
    fn read(decoder: &mut BinDecoder<'r>) -> ProtoResult<Self> {
        Ok(Self {
            id: decoder.read_u16()?,
            flags: Flags::from_bits(decoder.read_u16()?),
            query_count: decoder.read_u16()?,
            answer_count: decoder.read_u16()?,
            name_server_count: decoder.read_u16()?,
            additional_count: decoder.read_u16()?,
        })
    }
}

/// The 16-bit flags word of the header.
///
/// The upper 12 bits carry the flag bits (and the opcode, which this
/// implementation passes through untouched), the low nibble carries the
/// response code.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Flags(u16);

impl Flags {
    /// Query/Response bit, set on responses
    pub const QR: Self = Self(0x8000);
    /// Authoritative Answer
    pub const AA: Self = Self(0x0400);
    /// TrunCation
    pub const TC: Self = Self(0x0200);
    /// Recursion Desired
    pub const RD: Self = Self(0x0100);
    /// Recursion Available
    pub const RA: Self = Self(0x0080);
    /// Authentic Data
    pub const AD: Self = Self(0x0020);
    /// Checking Disabled
    pub const CD: Self = Self(0x0010);

    /// Builds the flags word from its wire form
    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// The wire form of the flags word
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Returns `true` if all bits of `other` are set in `self`
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// The response code in the low nibble
    pub fn response_code(self) -> ResponseCode {
        ResponseCode::from((self.0 & 0x000F) as u8)
    }

    /// Replaces the response code in the low nibble
    pub fn set_response_code(&mut self, response_code: ResponseCode) {
        self.0 = (self.0 & !0x000F) | u16::from(u8::from(response_code) & 0x0F);
    }

    /// The opcode bits, passed through without interpretation
    pub fn op_code(self) -> u8 {
        ((self.0 >> 11) & 0x0F) as u8
    }
}

impl BitOr for Flags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Flags({:#06x})", self.0)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for (mask, name) in [
            (Self::QR, "qr"),
            (Self::AA, "aa"),
            (Self::TC, "tc"),
            (Self::RD, "rd"),
            (Self::RA, "ra"),
            (Self::AD, "ad"),
            (Self::CD, "cd"),
        ] {
            if self.contains(mask) {
                write!(f, "{sep}{name}")?;
                sep = " ";
            }
        }

        Ok(())
    }
}

/// The status code of the response to a query.
///
/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ResponseCode {
    /// No Error
    #[default]
    NoError,
    /// Format Error
    FormErr,
    /// Server Failure
    ServFail,
    /// Non-Existent Domain
    NXDomain,
    /// Not Implemented
    NotImp,
    /// Query Refused
    Refused,
    /// Unassigned response code
    Unknown(u8),
}

impl From<u8> for ResponseCode {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::FormErr,
            2 => Self::ServFail,
            3 => Self::NXDomain,
            4 => Self::NotImp,
            5 => Self::Refused,
            _ => Self::Unknown(value),
        }
    }
}

impl From<ResponseCode> for u8 {
    fn from(code: ResponseCode) -> Self {
        match code {
            ResponseCode::NoError => 0,
            ResponseCode::FormErr => 1,
            ResponseCode::ServFail => 2,
            ResponseCode::NXDomain => 3,
            ResponseCode::NotImp => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Unknown(value) => value,
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoError => f.write_str("NOERROR"),
            Self::FormErr => f.write_str("FORMERR"),
            Self::ServFail => f.write_str("SERVFAIL"),
            Self::NXDomain => f.write_str("NXDOMAIN"),
            Self::NotImp => f.write_str("NOTIMP"),
            Self::Refused => f.write_str("REFUSED"),
            Self::Unknown(code) => write!(f, "RCODE{code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::binary::BinEncodable;

    #[test]
    fn test_wire_round_trip() {
        let mut header = Header::new();
        header
            .set_id(0x00AB)
            .set_flags(Flags::QR | Flags::AA | Flags::RD | Flags::RA)
            .set_query_count(1)
            .set_answer_count(1);

        let bytes = header.to_bytes().unwrap();
        assert_eq!(
            bytes,
            vec![0x00, 0xAB, 0x85, 0x80, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(Header::from_bytes(&bytes).unwrap(), header);
    }

    #[test]
    fn test_response_code_nibble() {
        let mut flags = Flags::QR | Flags::AA;
        flags.set_response_code(ResponseCode::ServFail);

        assert_eq!(flags.bits(), 0x8402);
        assert_eq!(flags.response_code(), ResponseCode::ServFail);
        assert!(flags.contains(Flags::QR));

        // replacing the code does not disturb the flag bits
        flags.set_response_code(ResponseCode::NoError);
        assert_eq!(flags.bits(), 0x8400);
    }

    #[test]
    fn test_flags_display() {
        let flags = Flags::QR | Flags::AA | Flags::RD | Flags::RA;
        assert_eq!(flags.to_string(), "qr aa rd ra");
        assert_eq!(Flags::default().to_string(), "");
    }
}
