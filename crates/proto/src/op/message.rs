// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Basic protocol message for DNS

use std::fmt;

use crate::error::{ProtoErrorKind, ProtoResult};
use crate::op::{Header, Query};
use crate::rr::{RData, Record};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// The basic request and response data structure, used for all DNS protocols.
///
/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// 4.1. Format
///
/// All communications inside of the domain protocol are carried in a single
/// format called a message.  The top level format of message is divided
/// into 5 sections (some of which are empty in certain cases) shown below:
///
///     +--------------------------+
///     |        Header            |
///     +--------------------------+
///     |  Question / Zone         |
///     +--------------------------+
///     |   Answer  / Prerequisite |
///     +--------------------------+
///     | Authority / Update       |
///     +--------------------------+
///     |      Additional          |
///     +--------------------------+
/// ```
///
/// The section counts in the header always equal the lengths of the
/// sections: mutations go through the `add_*` helpers which update both.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Message {
    header: Header,
    queries: Vec<Query>,
    answers: Vec<Record>,
    name_servers: Vec<Record>,
    additionals: Vec<Record>,
}

impl Message {
    /// Returns a new "empty" Message
    pub fn new() -> Self {
        Self::default()
    }

    /// The header of the message
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// A mutable reference to the header
    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    /// The id of the message, for correlating requests and responses
    pub fn id(&self) -> u16 {
        self.header.id()
    }

    /// Sets the id of the message
    pub fn set_id(&mut self, id: u16) -> &mut Self {
        self.header.set_id(id);
        self
    }

    /// Appends a question to the message, updating the header count
    pub fn add_query(&mut self, query: Query) -> &mut Self {
        self.queries.push(query);
        self.header.set_query_count(self.queries.len() as u16);
        self
    }

    /// Appends an answer to the message, updating the header count
    pub fn add_answer(&mut self, record: Record) -> &mut Self {
        self.answers.push(record);
        self.header.set_answer_count(self.answers.len() as u16);
        self
    }

    /// Appends an authority record to the message, updating the header count
    pub fn add_name_server(&mut self, record: Record) -> &mut Self {
        self.name_servers.push(record);
        self.header
            .set_name_server_count(self.name_servers.len() as u16);
        self
    }

    /// Appends an additional record to the message, updating the header count
    pub fn add_additional(&mut self, record: Record) -> &mut Self {
        self.additionals.push(record);
        self.header
            .set_additional_count(self.additionals.len() as u16);
        self
    }

    /// The question section
    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    /// The answer section
    pub fn answers(&self) -> &[Record] {
        &self.answers
    }

    /// The authority section
    pub fn name_servers(&self) -> &[Record] {
        &self.name_servers
    }

    /// The additional section
    pub fn additionals(&self) -> &[Record] {
        &self.additionals
    }

    /// Decodes a message, rejecting records whose RDATA shape is unknown
    ///
    /// The regular decode preserves unknown RDATA as opaque bytes so records
    /// can be forwarded; this entry point refuses them instead.
    pub fn from_bytes_strict(bytes: &[u8]) -> ProtoResult<Self> {
        let message = Self::from_bytes(bytes)?;

        for record in message
            .answers
            .iter()
            .chain(&message.name_servers)
            .chain(&message.additionals)
        {
            if let Some(RData::Unknown { code, .. }) = record.data() {
                return Err(ProtoErrorKind::UnsupportedRecordType(*code).into());
            }
        }

        Ok(message)
    }
}

impl BinEncodable for Message {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        self.header.emit(encoder)?;

        for query in &self.queries {
            query.emit(encoder)?;
        }

        for record in self
            .answers
            .iter()
            .chain(&self.name_servers)
            .chain(&self.additionals)
        {
            record.emit(encoder)?;
        }

        Ok(())
    }
}

impl<'r> BinDecodable<'r> for Message {
    fn read(decoder: &mut BinDecoder<'r>) -> ProtoResult<Self> {
        let header = Header::read(decoder)?;

        let mut queries = Vec::with_capacity(header.query_count() as usize);
        for _ in 0..header.query_count() {
            queries.push(Query::read(decoder)?);
        }

        let mut read_records = |count: u16| -> ProtoResult<Vec<Record>> {
            let mut records = Vec::with_capacity(count as usize);
            for _ in 0..count {
                records.push(Record::read(decoder)?);
            }
            Ok(records)
        };

        let answers = read_records(header.answer_count())?;
        let name_servers = read_records(header.name_server_count())?;
        let additionals = read_records(header.additional_count())?;

        if !decoder.is_empty() {
            return Err(ProtoErrorKind::TrailingData {
                offset: decoder.index(),
                len: decoder.len(),
            }
            .into());
        }

        Ok(Self {
            header,
            queries,
            answers,
            name_servers,
            additionals,
        })
    }
}

/// Renders the message the way `dig` does
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = &self.header;

        writeln!(
            f,
            ";; opcode: {opcode}, status: {status}, id: {id}",
            opcode = opcode_str(header.flags().op_code()),
            status = header.response_code(),
            id = header.id(),
        )?;

        writeln!(
            f,
            ";; flags: {flags}; QUERY: {qd}, ANSWER: {an}, AUTHORITY: {ns}, ADDITIONAL: {ar}",
            flags = header.flags(),
            qd = header.query_count(),
            an = header.answer_count(),
            ns = header.name_server_count(),
            ar = header.additional_count(),
        )?;

        if !self.queries.is_empty() {
            writeln!(f, "\n;; QUESTION SECTION:")?;
            for query in &self.queries {
                writeln!(f, ";{query}")?;
            }
        }

        if !self.answers.is_empty() {
            writeln!(f, "\n;; ANSWER SECTION:")?;
            for answer in &self.answers {
                writeln!(f, "{answer}")?;
            }
        }

        if !self.name_servers.is_empty() {
            writeln!(f, "\n;; AUTHORITY SECTION:")?;
            for record in &self.name_servers {
                writeln!(f, "{record}")?;
            }
        }

        if !self.additionals.is_empty() {
            writeln!(f, "\n;; ADDITIONAL SECTION:")?;
            for record in &self.additionals {
                writeln!(f, "{record}")?;
            }
        }

        Ok(())
    }
}

fn opcode_str(op_code: u8) -> &'static str {
    match op_code {
        0 => "QUERY",
        4 => "NOTIFY",
        5 => "UPDATE",
        _ => "RESERVED",
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::op::Flags;
    use crate::rr::{DNSClass, Name, RecordType};

    fn query(name: &str, query_type: RecordType) -> Query {
        Query::new(Name::from_ascii(name).unwrap(), query_type, DNSClass::IN)
    }

    #[test]
    fn test_counts_follow_appends() {
        let mut message = Message::new();
        assert_eq!(message.header().query_count(), 0);

        message.add_query(query("host.local.", RecordType::A));
        assert_eq!(message.header().query_count(), 1);

        message.add_answer(Record::from_rdata(
            Name::from_ascii("host.local.").unwrap(),
            DNSClass::IN,
            120,
            RData::from(Ipv4Addr::new(10, 0, 0, 1)),
        ));
        assert_eq!(message.header().answer_count(), 1);
    }

    #[test]
    fn test_wire_round_trip() {
        let mut message = Message::new();
        message.set_id(0x1234);
        message.header_mut().set_flags(Flags::QR | Flags::AA);
        message.add_query(query("host.local.", RecordType::A));
        message.add_answer(Record::from_rdata(
            Name::from_ascii("host.local.").unwrap(),
            DNSClass::IN,
            120,
            RData::from(Ipv4Addr::new(192, 168, 1, 1)),
        ));

        let bytes = message.to_bytes().unwrap();
        assert_eq!(Message::from_bytes(&bytes).unwrap(), message);
    }

    #[test]
    fn test_trailing_data_rejected() {
        let mut message = Message::new();
        message.add_query(query("host.local.", RecordType::A));

        let mut bytes = message.to_bytes().unwrap();
        let offset = bytes.len();
        bytes.extend_from_slice(&[0xDE, 0xAD]);

        let err = Message::from_bytes(&bytes).unwrap_err();
        match err.kind() {
            ProtoErrorKind::TrailingData { offset: at, len: 2 } => assert_eq!(*at, offset),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_counts_exceeding_records_rejected() {
        let mut message = Message::new();
        message.add_query(query("host.local.", RecordType::A));

        let mut bytes = message.to_bytes().unwrap();

        // declare an answer that is not present
        bytes[7] = 1;

        let err = Message::from_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err.kind(),
            ProtoErrorKind::UnexpectedEnd { .. }
        ));
    }

    #[test]
    fn test_compressed_input_decodes_like_uncompressed() {
        // the uncompressed form of a response for host.local. A
        let mut message = Message::new();
        message.header_mut().set_flags(Flags::QR | Flags::AA);
        message.add_answer(Record::from_rdata(
            Name::from_ascii("host.local.").unwrap(),
            DNSClass::IN,
            120,
            RData::from(Ipv4Addr::new(192, 168, 1, 1)),
        ));
        message.add_additional(Record::from_rdata(
            Name::from_ascii("gateway.local.").unwrap(),
            DNSClass::IN,
            120,
            RData::from(Ipv4Addr::new(192, 168, 1, 254)),
        ));

        // the hand-crafted compressed form: `local.` appears once in the
        // answer name at offset 12+5=17, the additional name points at it
        #[rustfmt::skip]
        let compressed: Vec<u8> = vec![
            0x00, 0x00, 0x84, 0x00, // id 0, flags QR|AA
            0x00, 0x00, 0x00, 0x01, // QDCOUNT 0, ANCOUNT 1
            0x00, 0x00, 0x00, 0x01, // NSCOUNT 0, ARCOUNT 1
            4, b'h', b'o', b's', b't', 5, b'l', b'o', b'c', b'a', b'l', 0,
            0x00, 0x01, 0x00, 0x01, // type A, class IN
            0x00, 0x00, 0x00, 0x78, // ttl 120
            0x00, 0x04, 192, 168, 1, 1,
            7, b'g', b'a', b't', b'e', b'w', b'a', b'y', 0xC0, 0x11,
            0x00, 0x01, 0x00, 0x01,
            0x00, 0x00, 0x00, 0x78,
            0x00, 0x04, 192, 168, 1, 254,
        ];

        assert_eq!(Message::from_bytes(&compressed).unwrap(), message);
    }

    #[test]
    fn test_display() {
        let mut message = Message::new();
        message.header_mut().set_flags(Flags::QR | Flags::AA);
        message.add_answer(Record::from_rdata(
            Name::from_ascii("host.local.").unwrap(),
            DNSClass::IN,
            120,
            RData::from(Ipv4Addr::new(192, 168, 1, 1)),
        ));

        let rendered = message.to_string();
        assert_eq!(
            rendered,
            ";; opcode: QUERY, status: NOERROR, id: 0\n\
             ;; flags: qr aa; QUERY: 0, ANSWER: 1, AUTHORITY: 0, ADDITIONAL: 0\n\
             \n\
             ;; ANSWER SECTION:\n\
             host.local.\t120\tIN\tA\t192.168.1.1\n"
        );
    }
}
