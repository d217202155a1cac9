// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! record data enum variants

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::ProtoResult;
use crate::rr::rdata;
use crate::rr::rdata::{A, AAAA, CNAME, HINFO, OPT, PTR, SRV, TXT};
use crate::rr::RecordType;
use crate::serialize::binary::{BinDecoder, BinEncodable, BinEncoder};

/// Record data enum variants
///
/// The record type on the wire selects the variant on decode; on encode the
/// variant determines the record type. Types without a known RDATA shape are
/// preserved as opaque bytes so that records can be re-encoded and forwarded
/// without loss.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum RData {
    /// IPv4 address
    A(A),
    /// IPv6 address
    AAAA(AAAA),
    /// Canonical name
    CNAME(CNAME),
    /// Domain name pointer
    PTR(PTR),
    /// Host information
    HINFO(HINFO),
    /// Text data
    TXT(TXT),
    /// Service locator
    SRV(SRV),
    /// EDNS option, uninterpreted
    OPT(OPT),
    /// A record type with no decodable representation; the raw bytes are kept
    Unknown {
        /// the wire type code of the record
        code: u16,
        /// the uninterpreted RDATA
        rdata: Vec<u8>,
    },
}

impl RData {
    /// Read the RData of the given type from the decoder
    ///
    /// # Arguments
    ///
    /// * `decoder` - the decoder positioned at the start of the RDATA
    /// * `record_type` - the type of the record, selects the RDATA shape
    /// * `rdata_length` - the declared RDLENGTH
    pub fn read(
        decoder: &mut BinDecoder<'_>,
        record_type: RecordType,
        rdata_length: u16,
    ) -> ProtoResult<Self> {
        let rdata = match record_type {
            RecordType::A => Self::A(rdata::a::read(decoder)?),
            RecordType::AAAA => Self::AAAA(rdata::aaaa::read(decoder)?),
            RecordType::CNAME => Self::CNAME(rdata::cname::read(decoder)?),
            RecordType::PTR => Self::PTR(rdata::ptr::read(decoder)?),
            RecordType::HINFO => Self::HINFO(rdata::hinfo::read(decoder)?),
            RecordType::TXT => Self::TXT(rdata::txt::read(decoder)?),
            RecordType::SRV => Self::SRV(rdata::srv::read(decoder)?),
            RecordType::OPT => Self::OPT(rdata::opt::read(decoder)?),
            _ => Self::Unknown {
                code: record_type.into(),
                rdata: decoder.read_vec(rdata_length as usize)?,
            },
        };

        Ok(rdata)
    }

    /// The record type of this RData
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::A(..) => RecordType::A,
            Self::AAAA(..) => RecordType::AAAA,
            Self::CNAME(..) => RecordType::CNAME,
            Self::PTR(..) => RecordType::PTR,
            Self::HINFO(..) => RecordType::HINFO,
            Self::TXT(..) => RecordType::TXT,
            Self::SRV(..) => RecordType::SRV,
            Self::OPT(..) => RecordType::OPT,
            Self::Unknown { code, .. } => RecordType::from(*code),
        }
    }
}

impl From<Ipv4Addr> for RData {
    fn from(addr: Ipv4Addr) -> Self {
        Self::A(addr.into())
    }
}

impl From<Ipv6Addr> for RData {
    fn from(addr: Ipv6Addr) -> Self {
        Self::AAAA(addr.into())
    }
}

impl BinEncodable for RData {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        match self {
            Self::A(a) => rdata::a::emit(encoder, a),
            Self::AAAA(aaaa) => rdata::aaaa::emit(encoder, aaaa),
            Self::CNAME(cname) => rdata::cname::emit(encoder, cname),
            Self::PTR(ptr) => rdata::ptr::emit(encoder, ptr),
            Self::HINFO(hinfo) => rdata::hinfo::emit(encoder, hinfo),
            Self::TXT(txt) => rdata::txt::emit(encoder, txt),
            Self::SRV(srv) => rdata::srv::emit(encoder, srv),
            Self::OPT(opt) => rdata::opt::emit(encoder, opt),
            Self::Unknown { rdata, .. } => encoder.emit_vec(rdata),
        }
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A(a) => fmt::Display::fmt(a, f),
            Self::AAAA(aaaa) => fmt::Display::fmt(aaaa, f),
            Self::CNAME(cname) => fmt::Display::fmt(cname, f),
            Self::PTR(ptr) => fmt::Display::fmt(ptr, f),
            Self::HINFO(hinfo) => fmt::Display::fmt(hinfo, f),
            Self::TXT(txt) => fmt::Display::fmt(txt, f),
            Self::SRV(srv) => fmt::Display::fmt(srv, f),
            Self::OPT(opt) => fmt::Display::fmt(opt, f),
            Self::Unknown { rdata, .. } => write!(f, "\\# {len}", len = rdata.len()),
        }
    }
}
