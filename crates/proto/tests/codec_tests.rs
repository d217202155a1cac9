// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Whole-message codec properties

use std::net::{Ipv4Addr, Ipv6Addr};

use moodns_proto::op::{Flags, Message, Query};
use moodns_proto::rr::rdata::{HINFO, SRV};
use moodns_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use moodns_proto::serialize::binary::{BinDecodable, BinEncodable};
use moodns_proto::ProtoErrorKind;

fn name(raw: &str) -> Name {
    Name::from_ascii(raw).unwrap()
}

fn response() -> Message {
    let mut message = Message::new();
    message.set_id(0x00AB);
    message
        .header_mut()
        .set_flags(Flags::QR | Flags::AA | Flags::RD | Flags::RA);

    message.add_query(Query::new(name("host.local."), RecordType::ANY, DNSClass::IN));

    message.add_answer(Record::from_rdata(
        name("host.local."),
        DNSClass::IN,
        120,
        RData::from(Ipv4Addr::new(192, 168, 1, 1)),
    ));
    message.add_answer(Record::from_rdata(
        name("host.local."),
        DNSClass::IN,
        120,
        RData::from(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1)),
    ));
    message.add_answer(Record::from_rdata(
        name("host.local."),
        DNSClass::IN,
        120,
        RData::HINFO(HINFO::new("x86_64".to_string(), "Linux".to_string())),
    ));
    message.add_additional(Record::from_rdata(
        name("_ssh._tcp.local."),
        DNSClass::IN,
        120,
        RData::SRV(SRV::new(0, 0, 22, name("host.local."))),
    ));

    message
}

#[test]
fn test_decode_inverts_encode() {
    let message = response();

    let bytes = message.to_bytes().expect("encoding failed");
    let decoded = Message::from_bytes(&bytes).expect("decoding failed");

    assert_eq!(decoded, message);

    // and the byte form is stable
    assert_eq!(decoded.to_bytes().unwrap(), bytes);
}

#[test]
fn test_strict_mode_rejects_unknown_rdata() {
    let mut message = Message::new();
    message.add_answer(Record::from_rdata(
        name("host.local."),
        DNSClass::IN,
        120,
        RData::Unknown {
            code: 47,
            rdata: vec![1, 2, 3],
        },
    ));

    let bytes = message.to_bytes().unwrap();

    // the lenient decode keeps the record, the strict one refuses it
    let decoded = Message::from_bytes(&bytes).unwrap();
    assert_eq!(decoded.answers()[0].record_type(), RecordType::Unknown(47));

    let err = Message::from_bytes_strict(&bytes).unwrap_err();
    assert!(matches!(
        err.kind(),
        ProtoErrorKind::UnsupportedRecordType(47)
    ));
}

#[test]
fn test_record_sections_round_trip_in_order() {
    let message = response();
    let bytes = message.to_bytes().unwrap();
    let decoded = Message::from_bytes(&bytes).unwrap();

    assert_eq!(decoded.header().query_count(), 1);
    assert_eq!(decoded.header().answer_count(), 3);
    assert_eq!(decoded.header().additional_count(), 1);

    let types: Vec<RecordType> = decoded.answers().iter().map(|r| r.record_type()).collect();
    assert_eq!(
        types,
        vec![RecordType::A, RecordType::AAAA, RecordType::HINFO]
    );
}
