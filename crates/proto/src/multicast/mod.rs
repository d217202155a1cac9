// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Multicast DNS related protocol handlers

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

mod mdns_client;
mod mdns_socket;

pub use self::mdns_client::{send_request, RESPONSE_TIMEOUT};
pub use self::mdns_socket::{MdnsSocket, PacketInfo};

/// mDNS port, for both queries and responses
pub const MDNS_PORT: u16 = 5353;

/// mDNS ipv4 group <https://www.iana.org/assignments/multicast-addresses/multicast-addresses.xhtml>
pub const MDNS_GROUP_V4: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 251);

/// The well-known ipv4 multicast socket address
pub const MDNS_IPV4: SocketAddr = SocketAddr::V4(SocketAddrV4::new(MDNS_GROUP_V4, MDNS_PORT));

/// Receive buffer size, one full jumbo frame; mDNS messages must fit in this
pub const MAX_PAYLOAD_LEN: usize = 9000;
