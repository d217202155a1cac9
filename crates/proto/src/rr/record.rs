// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! resource record implementation

use std::fmt;

use crate::error::{ProtoErrorKind, ProtoResult};
use crate::rr::{DNSClass, Name, RData, RecordType};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// Resource records are storage value in DNS, into which all key/value pair data is stored.
///
/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// 4.1.3. Resource record format
///
///                                     1  1  1  1  1  1
///       0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                                               |
///     /                                               /
///     /                      NAME                     /
///     |                                               |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      TYPE                     |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                     CLASS                     |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      TTL                      |
///     |                                               |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                   RDLENGTH                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--|--+--+--+
///     /                     RDATA                     /
///     /                                               /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Record {
    name: Name,
    rr_type: RecordType,
    dns_class: DNSClass,
    ttl: u32,
    rdata: Option<RData>,
}

impl Record {
    /// Create a record with the given data; the record type is derived from
    /// the RData variant
    pub fn from_rdata(name: Name, dns_class: DNSClass, ttl: u32, rdata: RData) -> Self {
        Self {
            name,
            rr_type: rdata.record_type(),
            dns_class,
            ttl,
            rdata: Some(rdata),
        }
    }

    /// Returns the name of the record
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the type of the record
    pub fn record_type(&self) -> RecordType {
        self.rr_type
    }

    /// Returns the class of the record
    pub fn dns_class(&self) -> DNSClass {
        self.dns_class
    }

    /// Returns the time-to-live of the record
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Returns the record data, `None` for records with a zero RDLENGTH
    pub fn data(&self) -> Option<&RData> {
        self.rdata.as_ref()
    }
}

impl BinEncodable for Record {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        self.name.emit(encoder)?;
        self.rr_type.emit(encoder)?;
        self.dns_class.emit(encoder)?;
        encoder.emit_u32(self.ttl)?;

        // RDLENGTH is not knowable until the RDATA has been written: reserve
        // a slot and patch it afterwards
        let place = encoder.place_u16()?;

        if let Some(rdata) = &self.rdata {
            rdata.emit(encoder)?;
        }

        let len = encoder.len_since_place(&place);
        place.replace(encoder, len as u16)
    }
}

impl<'r> BinDecodable<'r> for Record {
    fn read(decoder: &mut BinDecoder<'r>) -> ProtoResult<Self> {
        let name = Name::read(decoder)?;
        let rr_type = RecordType::read(decoder)?;
        let dns_class = DNSClass::read(decoder)?;
        let ttl = decoder.read_u32()?;
        let rdata_length = decoder.read_u16()?;

        let rdata = if rdata_length == 0 {
            None
        } else {
            let start = decoder.index();
            let rdata = RData::read(decoder, rr_type, rdata_length)?;

            // the declared length must exactly cover the decoded RDATA
            let read = decoder.index() - start;
            if read != rdata_length as usize {
                return Err(ProtoErrorKind::IncorrectRDataLengthRead {
                    read,
                    len: rdata_length as usize,
                }
                .into());
            }

            Some(rdata)
        };

        Ok(Self {
            name,
            rr_type,
            dns_class,
            ttl,
            rdata,
        })
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{name}\t{ttl}\t{class}\t{ty}",
            name = self.name,
            ttl = self.ttl,
            class = self.dns_class,
            ty = self.rr_type,
        )?;

        if let Some(rdata) = &self.rdata {
            write!(f, "\t{rdata}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::rr::rdata::HINFO;

    #[test]
    fn test_emit_patches_rdlength() {
        let record = Record::from_rdata(
            Name::from_ascii("host.local.").unwrap(),
            DNSClass::IN,
            120,
            RData::HINFO(HINFO::new("x86_64".to_string(), "Linux".to_string())),
        );

        let bytes = record.to_bytes().unwrap();

        // name(12) + type(2) + class(2) + ttl(4), then RDLENGTH
        let rdlength = u16::from_be_bytes([bytes[20], bytes[21]]);
        assert_eq!(rdlength as usize, bytes.len() - 22);
        assert_eq!(rdlength, 13);

        assert_eq!(Record::from_bytes(&bytes).unwrap(), record);
    }

    #[test]
    fn test_rdlength_mismatch_rejected() {
        let record = Record::from_rdata(
            Name::from_ascii("host.local.").unwrap(),
            DNSClass::IN,
            120,
            RData::from(Ipv4Addr::new(10, 0, 0, 1)),
        );

        let mut bytes = record.to_bytes().unwrap();

        // grow the declared RDLENGTH past the actual A payload
        bytes[21] += 1;
        bytes.push(0);

        let err = Record::from_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err.kind(),
            ProtoErrorKind::IncorrectRDataLengthRead { read: 4, len: 5 }
        ));
    }
}
