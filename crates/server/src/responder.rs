// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The responder: receives queries, classifies them and builds replies

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{debug, warn};

use moodns_proto::multicast::{MdnsSocket, PacketInfo, MDNS_IPV4, MDNS_PORT};
use moodns_proto::op::{Flags, Message, ResponseCode};
use moodns_proto::rr::rdata::HINFO;
use moodns_proto::rr::{DNSClass, Name, RData, Record, RecordType, MDNS_UNICAST_RESPONSE};
use moodns_proto::serialize::binary::{BinDecodable, BinEncodable};

use crate::forward::forward_query;
use crate::host;

/// TTL of the answers for the local name
const LOCAL_TTL: u32 = 120;

/// A responder serving one listen address.
///
/// Queries for the local name are answered directly. Queries from legacy
/// unicast-DNS clients (source port other than 5353) get their id and
/// question echoed and are answered by unicast; multicast queries are
/// answered to the group with id 0. When forwarding is enabled, queries
/// received on loopback for names other than the local name are re-issued on
/// the group and the answers spliced back.
pub struct Responder {
    socket: Arc<MdnsSocket>,
    local_name: Name,
    forward: bool,
    silent: bool,
    /// id of the most recent forwarded query, to drop its echo
    sent_id: u16,
}

impl Responder {
    /// A new responder serving `local_name` on the given socket
    pub fn new(socket: Arc<MdnsSocket>, local_name: Name, forward: bool, silent: bool) -> Self {
        Self {
            socket,
            local_name,
            forward,
            silent,
            sent_id: 0,
        }
    }

    /// Serves queries until the process exits.
    ///
    /// Receive, decode and send failures are logged (unless silent) and never
    /// terminate the loop.
    pub async fn run(mut self) {
        loop {
            let (bytes, info) = match self.socket.recv().await {
                Ok(received) => received,
                Err(err) => {
                    if !self.silent {
                        warn!("error reading request: {err}");
                    }
                    continue;
                }
            };

            let Some((reply, target)) = self.handle(&bytes, &info).await else {
                continue;
            };

            if let Err(err) = self.send(&reply, target).await {
                if !self.silent {
                    warn!("error sending response: {err}");
                }
            }
        }
    }

    /// Classifies one datagram and builds the reply, if any is owed
    async fn handle(
        &mut self,
        bytes: &[u8],
        info: &PacketInfo,
    ) -> Option<(Message, SocketAddr)> {
        let request = match Message::from_bytes(bytes) {
            Ok(request) => request,
            Err(err) => {
                if !self.silent {
                    warn!("error decoding request from {from}: {err}", from = info.from);
                }
                return None;
            }
        };

        // responses are never answered
        if request.header().flags().contains(Flags::QR) {
            return None;
        }

        // the echo of a query this responder just forwarded
        if info.from.port() == MDNS_PORT && self.sent_id > 0 && request.id() == self.sent_id {
            return None;
        }

        let legacy = info.from.port() != MDNS_PORT;

        let mut reply = Message::new();

        let mut flags = Flags::QR | Flags::AA;
        if request.header().flags().contains(Flags::RD) {
            flags |= Flags::RD | Flags::RA;
        }
        reply.header_mut().set_flags(flags);

        // legacy clients correlate by id and require the question echoed
        if legacy {
            reply.set_id(request.id());
        }

        for query in request.queries() {
            if !class_accepted(query.query_class()) {
                continue;
            }

            if legacy {
                reply.add_query(query.clone());
            }

            if query.name() != &self.local_name {
                if info.loopback && self.forward {
                    self.sent_id = forward_query(query, &mut reply).await;
                }

                continue;
            }

            for rdata in local_rdata(query.query_type(), info) {
                reply.add_answer(Record::from_rdata(
                    query.name().clone(),
                    query.query_class(),
                    LOCAL_TTL,
                    rdata,
                ));
            }
        }

        // nothing to say
        if reply.header().answer_count() == 0
            && reply.header().response_code() == ResponseCode::NoError
        {
            return None;
        }

        let target = if legacy { info.from } else { MDNS_IPV4 };

        Some((reply, target))
    }

    async fn send(&self, reply: &Message, target: SocketAddr) -> moodns_proto::ProtoResult<()> {
        self.socket.send_to(&reply.to_bytes()?, target).await?;
        Ok(())
    }
}

/// mDNS accepts IN (with or without the unicast-response bit) and ANY
fn class_accepted(class: DNSClass) -> bool {
    matches!(class, DNSClass::IN | DNSClass::ANY)
        || u16::from(class) == (u16::from(DNSClass::IN) | MDNS_UNICAST_RESPONSE)
}

/// The RDATA served for a query of the given type against the local name
fn local_rdata(query_type: RecordType, info: &PacketInfo) -> Vec<RData> {
    let mut rdata = Vec::new();

    match query_type {
        RecordType::A => rdata.extend(info.local_v4.map(RData::from)),
        RecordType::AAAA => rdata.extend(info.local_v6.map(RData::from)),
        RecordType::HINFO => rdata.extend(hinfo_rdata()),
        RecordType::ANY => {
            rdata.extend(info.local_v4.map(RData::from));
            rdata.extend(info.local_v6.map(RData::from));
            rdata.extend(hinfo_rdata());
        }
        _ => {}
    }

    rdata
}

/// HINFO from the host-info hook; on failure the answer is omitted
fn hinfo_rdata() -> Option<RData> {
    match host::host_info() {
        Ok(info) => Some(RData::HINFO(HINFO::new(info.cpu, info.os))),
        Err(err) => {
            debug!("hinfo answer omitted: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    use super::*;

    fn test_socket() -> Arc<MdnsSocket> {
        Arc::new(MdnsSocket::bind("127.0.0.1:0".parse().unwrap()).unwrap())
    }

    fn responder(forward: bool) -> Responder {
        Responder::new(
            test_socket(),
            Name::from_ascii("host.local.").unwrap(),
            forward,
            false,
        )
    }

    fn peer_info(from: &str, loopback: bool) -> PacketInfo {
        PacketInfo {
            from: from.parse().unwrap(),
            ifindex: Some(2),
            dst: Some(IpAddr::V4(Ipv4Addr::new(224, 0, 0, 251))),
            loopback,
            local_v4: Some(Ipv4Addr::new(192, 168, 1, 1)),
            local_v6: Some(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1)),
        }
    }

    #[tokio::test]
    async fn test_multicast_a_query() {
        // id 0, flags 0, one question: host.local. A IN
        #[rustfmt::skip]
        let request: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            4, b'h', b'o', b's', b't', 5, b'l', b'o', b'c', b'a', b'l', 0,
            0x00, 0x01, 0x00, 0x01,
        ];

        let mut responder = responder(false);
        let info = peer_info("10.0.0.2:5353", false);

        let (reply, target) = responder.handle(&request, &info).await.expect("no reply");

        // multicast queries are answered to the group, id 0, no question echo
        assert_eq!(target, MDNS_IPV4);

        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x00, 0x00, 0x84, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
            4, b'h', b'o', b's', b't', 5, b'l', b'o', b'c', b'a', b'l', 0,
            0x00, 0x01, 0x00, 0x01,
            0x00, 0x00, 0x00, 0x78,
            0x00, 0x04, 192, 168, 1, 1,
        ];
        assert_eq!(reply.to_bytes().unwrap(), expected);
    }

    #[tokio::test]
    async fn test_legacy_aaaa_query() {
        // a legacy unicast-DNS client: source port 54321, id 0x00AB, RD set
        #[rustfmt::skip]
        let request: Vec<u8> = vec![
            0x00, 0xAB, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            4, b'h', b'o', b's', b't', 5, b'l', b'o', b'c', b'a', b'l', 0,
            0x00, 0x1C, 0x00, 0x01,
        ];

        let mut responder = responder(false);
        let info = peer_info("127.0.0.1:54321", true);

        let (reply, target) = responder.handle(&request, &info).await.expect("no reply");

        // unicast reply to the sender, id and question echoed, RD mirrored
        assert_eq!(target, info.from);
        assert_eq!(reply.id(), 0x00AB);
        assert_eq!(reply.header().flags().bits(), 0x8580);
        assert_eq!(reply.header().query_count(), 1);
        assert_eq!(reply.queries()[0].query_type(), RecordType::AAAA);

        assert_eq!(reply.header().answer_count(), 1);
        let answer = &reply.answers()[0];
        assert_eq!(answer.name(), &Name::from_ascii("host.local.").unwrap());
        assert_eq!(answer.ttl(), 120);
        assert_eq!(
            answer.data(),
            Some(&RData::from(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1)))
        );
    }

    #[tokio::test]
    async fn test_any_query() {
        let mut request = Message::new();
        request.add_query(moodns_proto::op::Query::new(
            Name::from_ascii("host.local.").unwrap(),
            RecordType::ANY,
            DNSClass::IN,
        ));

        let mut responder = responder(false);
        let info = peer_info("10.0.0.2:5353", false);

        let (reply, _) = responder
            .handle(&request.to_bytes().unwrap(), &info)
            .await
            .expect("no reply");

        // A, then AAAA, then HINFO, each with the local-name TTL
        assert_eq!(reply.header().answer_count(), 3);
        let types: Vec<RecordType> = reply.answers().iter().map(|r| r.record_type()).collect();
        assert_eq!(
            types,
            vec![RecordType::A, RecordType::AAAA, RecordType::HINFO]
        );
        assert!(reply.answers().iter().all(|r| r.ttl() == 120));
    }

    #[tokio::test]
    async fn test_forward_off_link_name_is_refused() {
        let mut request = Message::new();
        request.set_id(0x0042);
        request.add_query(moodns_proto::op::Query::new(
            Name::from_ascii("google.com.").unwrap(),
            RecordType::A,
            DNSClass::IN,
        ));

        let mut responder = responder(true);
        let info = peer_info("127.0.0.1:40000", true);

        let (reply, target) = responder
            .handle(&request.to_bytes().unwrap(), &info)
            .await
            .expect("no reply");

        assert_eq!(target, info.from);
        assert_eq!(reply.header().response_code(), ResponseCode::ServFail);
        assert_eq!(reply.header().answer_count(), 0);
    }

    #[tokio::test]
    async fn test_non_local_name_without_forward_is_dropped() {
        let mut request = Message::new();
        request.add_query(moodns_proto::op::Query::new(
            Name::from_ascii("other.local.").unwrap(),
            RecordType::A,
            DNSClass::IN,
        ));

        let mut responder = responder(false);
        let info = peer_info("10.0.0.2:5353", false);

        assert!(responder
            .handle(&request.to_bytes().unwrap(), &info)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_unsupported_class_is_ignored() {
        // a CHAOS-class question never matches
        let mut request = Message::new();
        request.add_query(moodns_proto::op::Query::new(
            Name::from_ascii("host.local.").unwrap(),
            RecordType::A,
            DNSClass::from(3),
        ));

        let mut responder = responder(false);
        let info = peer_info("10.0.0.2:5353", false);

        assert!(responder
            .handle(&request.to_bytes().unwrap(), &info)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_unicast_class_is_accepted() {
        let mut request = Message::new();
        request.add_query(moodns_proto::op::Query::new(
            Name::from_ascii("host.local.").unwrap(),
            RecordType::A,
            DNSClass::from(1 | MDNS_UNICAST_RESPONSE),
        ));

        let mut responder = responder(false);
        let info = peer_info("10.0.0.2:5353", false);

        let (reply, _) = responder
            .handle(&request.to_bytes().unwrap(), &info)
            .await
            .expect("no reply");

        // the answer's class mirrors the question's, bit included
        assert_eq!(
            u16::from(reply.answers()[0].dns_class()),
            1 | MDNS_UNICAST_RESPONSE
        );
    }

    #[tokio::test]
    async fn test_forwarded_echo_is_dropped() {
        let mut responder = responder(true);
        responder.sent_id = 0x1234;

        let mut request = Message::new();
        request.set_id(0x1234);
        request.add_query(moodns_proto::op::Query::new(
            Name::from_ascii("other.local.").unwrap(),
            RecordType::A,
            DNSClass::IN,
        ));

        let info = peer_info("10.0.0.2:5353", false);
        assert!(responder
            .handle(&request.to_bytes().unwrap(), &info)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_responses_are_dropped() {
        let mut request = Message::new();
        request.header_mut().set_flags(Flags::QR);
        request.add_query(moodns_proto::op::Query::new(
            Name::from_ascii("host.local.").unwrap(),
            RecordType::A,
            DNSClass::IN,
        ));

        let mut responder = responder(false);
        let info = peer_info("10.0.0.2:5353", false);

        assert!(responder
            .handle(&request.to_bytes().unwrap(), &info)
            .await
            .is_none());
    }
}
