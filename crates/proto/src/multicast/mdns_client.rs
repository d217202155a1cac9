// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! One-shot mDNS queries

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use tokio::time::timeout;

use crate::error::{ProtoErrorKind, ProtoResult};
use crate::multicast::{MdnsSocket, MDNS_IPV4};
use crate::op::Message;
use crate::serialize::binary::{BinDecodable, BinEncodable};

/// How long to wait for a response to a one-shot query
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(3);

/// Sends a one-shot query to the mDNS group and awaits the response.
///
/// A transient socket is bound to an ephemeral port, the request is sent to
/// the group, and one reply is read within [`RESPONSE_TIMEOUT`]. The reply's
/// id must match the request's.
pub async fn send_request(request: &Message) -> ProtoResult<Message> {
    let bind = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0));
    let socket = MdnsSocket::bind(bind)?;

    socket.send_to(&request.to_bytes()?, MDNS_IPV4).await?;

    let (bytes, _info) = timeout(RESPONSE_TIMEOUT, socket.recv())
        .await
        .map_err(|_elapsed| ProtoErrorKind::Timeout)??;

    let response = Message::from_bytes(&bytes)?;

    if response.id() != request.id() {
        return Err(ProtoErrorKind::WrongId {
            expected: request.id(),
            got: response.id(),
        }
        .into());
    }

    Ok(response)
}
