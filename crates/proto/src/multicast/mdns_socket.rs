// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::io;
use std::mem;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6, UdpSocket};
use std::os::fd::AsRawFd;

use pnet::datalink;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::io::unix::AsyncFd;
use tracing::debug;

use crate::error::ProtoResult;
use crate::multicast::{MAX_PAYLOAD_LEN, MDNS_GROUP_V4};

/// A UDP socket configured for mDNS.
///
/// Receives carry per-packet context: the receiving interface, the packet's
/// destination address and the unicast addresses of the receiving interface.
/// That requires `recvmsg(2)` with `IP_PKTINFO` control messages, which the
/// tokio socket does not surface, so the socket is kept in its std form and
/// driven through an `AsyncFd`.
///
/// Multicast group membership is managed per interface index; the kernel
/// allows membership mutation concurrently with datagram I/O, so the
/// interface monitor can share this socket with a running receive loop.
pub struct MdnsSocket {
    io: AsyncFd<UdpSocket>,
}

/// Per-packet receive context
#[derive(Debug, Clone)]
pub struct PacketInfo {
    /// The source address of the packet
    pub from: SocketAddr,
    /// Index of the receiving interface, if ancillary data was present
    pub ifindex: Option<u32>,
    /// The destination address of the packet, if ancillary data was present
    pub dst: Option<IpAddr>,
    /// Whether the packet arrived on a loopback interface
    pub loopback: bool,
    /// An IPv4 unicast address of the receiving interface
    pub local_v4: Option<Ipv4Addr>,
    /// An IPv6 unicast address of the receiving interface
    pub local_v6: Option<Ipv6Addr>,
}

impl MdnsSocket {
    /// Opens an mDNS socket bound to the given address.
    ///
    /// The socket is configured with address reuse (other mDNS responders may
    /// share the port), link-local multicast TTL, multicast loopback off and
    /// per-packet receive context. It joins no groups; membership is driven
    /// by the interface monitor as interfaces appear.
    pub fn bind(addr: SocketAddr) -> ProtoResult<Self> {
        let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))?;

        socket.set_reuse_address(true)?;
        socket.set_reuse_port(true)?;

        if addr.is_ipv4() {
            socket.set_multicast_ttl_v4(1)?;
            socket.set_multicast_loop_v4(false)?;
            set_pktinfo(&socket)?;
        }

        socket.bind(&addr.into())?;
        socket.set_nonblocking(true)?;

        debug!("bound mdns socket to {addr}");

        Ok(Self {
            io: AsyncFd::new(UdpSocket::from(socket))?,
        })
    }

    /// The local address the socket is bound to
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.io.get_ref().local_addr()
    }

    /// Receives one datagram together with its per-packet context.
    ///
    /// If ancillary data is absent the packet is assumed to have arrived on
    /// the loopback interface.
    pub async fn recv(&self) -> ProtoResult<(Vec<u8>, PacketInfo)> {
        let mut buf = vec![0_u8; MAX_PAYLOAD_LEN];

        loop {
            let mut guard = self.io.readable().await?;

            match guard.try_io(|io| recv_pktinfo(io.get_ref(), &mut buf)) {
                Ok(result) => {
                    let (len, from, ifindex, dst) = result?;
                    buf.truncate(len);

                    return Ok((buf, PacketInfo::for_interface(from, ifindex, dst)));
                }
                Err(_would_block) => continue,
            }
        }
    }

    /// Sends a datagram to the given unicast or multicast address.
    ///
    /// No outgoing interface is pinned; the routing decision is the OS's.
    pub async fn send_to(&self, buf: &[u8], target: SocketAddr) -> ProtoResult<usize> {
        loop {
            let mut guard = self.io.writable().await?;

            match guard.try_io(|io| io.get_ref().send_to(buf, target)) {
                Ok(result) => return Ok(result?),
                Err(_would_block) => continue,
            }
        }
    }

    /// Joins the mDNS IPv4 group on the interface with the given index
    pub fn join_multicast_v4(&self, ifindex: u32) -> io::Result<()> {
        self.membership(ifindex, libc::IP_ADD_MEMBERSHIP)?;
        debug!("joined {MDNS_GROUP_V4} on interface {ifindex}");
        Ok(())
    }

    /// Leaves the mDNS IPv4 group on the interface with the given index
    pub fn leave_multicast_v4(&self, ifindex: u32) -> io::Result<()> {
        self.membership(ifindex, libc::IP_DROP_MEMBERSHIP)?;
        debug!("left {MDNS_GROUP_V4} on interface {ifindex}");
        Ok(())
    }

    fn membership(&self, ifindex: u32, opt: libc::c_int) -> io::Result<()> {
        let mreqn = libc::ip_mreqn {
            imr_multiaddr: libc::in_addr {
                s_addr: u32::from_ne_bytes(MDNS_GROUP_V4.octets()),
            },
            imr_address: libc::in_addr { s_addr: 0 },
            imr_ifindex: ifindex as libc::c_int,
        };

        let rc = unsafe {
            libc::setsockopt(
                self.io.get_ref().as_raw_fd(),
                libc::IPPROTO_IP,
                opt,
                &mreqn as *const libc::ip_mreqn as *const libc::c_void,
                mem::size_of::<libc::ip_mreqn>() as libc::socklen_t,
            )
        };

        if rc < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(())
    }
}

impl PacketInfo {
    fn for_interface(from: SocketAddr, ifindex: Option<u32>, dst: Option<IpAddr>) -> Self {
        let interface = match ifindex {
            Some(index) => datalink::interfaces().into_iter().find(|i| i.index == index),
            None => datalink::interfaces().into_iter().find(|i| i.is_loopback()),
        };

        let loopback =
            ifindex.is_none() || interface.as_ref().is_some_and(|i| i.is_loopback());

        let mut local_v4 = None;
        let mut local_v6 = None;

        if let Some(interface) = &interface {
            for ip in &interface.ips {
                match ip.ip() {
                    IpAddr::V4(v4) if local_v4.is_none() => local_v4 = Some(v4),
                    IpAddr::V6(v6) if local_v6.is_none() => local_v6 = Some(v6),
                    _ => {}
                }
            }
        }

        Self {
            from,
            ifindex,
            dst,
            loopback,
            local_v4,
            local_v6,
        }
    }
}

fn set_pktinfo(socket: &Socket) -> io::Result<()> {
    let val: libc::c_int = 1;

    let rc = unsafe {
        libc::setsockopt(
            socket.as_raw_fd(),
            libc::IPPROTO_IP,
            libc::IP_PKTINFO,
            &val as *const libc::c_int as *const libc::c_void,
            mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };

    if rc < 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

type RawReceive = (usize, SocketAddr, Option<u32>, Option<IpAddr>);

fn recv_pktinfo(socket: &UdpSocket, buf: &mut [u8]) -> io::Result<RawReceive> {
    let mut iov = libc::iovec {
        iov_base: buf.as_mut_ptr() as *mut libc::c_void,
        iov_len: buf.len(),
    };
    let mut src_addr: libc::sockaddr_storage = unsafe { mem::zeroed() };
    let mut cmsg_buf = [0_u8; 128];

    let mut msg: libc::msghdr = unsafe { mem::zeroed() };
    msg.msg_name = &mut src_addr as *mut libc::sockaddr_storage as *mut libc::c_void;
    msg.msg_namelen = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;
    msg.msg_iov = &mut iov;
    msg.msg_iovlen = 1;
    msg.msg_control = cmsg_buf.as_mut_ptr() as *mut libc::c_void;
    msg.msg_controllen = cmsg_buf.len() as _;

    let n = unsafe { libc::recvmsg(socket.as_raw_fd(), &mut msg, 0) };
    if n < 0 {
        return Err(io::Error::last_os_error());
    }

    // a datagram larger than one jumbo frame cannot be a valid message
    if msg.msg_flags & libc::MSG_TRUNC != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "datagram exceeds the receive buffer",
        ));
    }

    let from = sockaddr_to_socket_addr(&src_addr).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, "unknown source address family")
    })?;

    let (ifindex, dst) = extract_pktinfo(&msg);

    Ok((n as usize, from, ifindex, dst))
}

fn extract_pktinfo(msg: &libc::msghdr) -> (Option<u32>, Option<IpAddr>) {
    let mut cmsg = unsafe { libc::CMSG_FIRSTHDR(msg) };

    while !cmsg.is_null() {
        let hdr = unsafe { &*cmsg };

        if hdr.cmsg_level == libc::IPPROTO_IP && hdr.cmsg_type == libc::IP_PKTINFO {
            let pktinfo = unsafe { &*(libc::CMSG_DATA(cmsg) as *const libc::in_pktinfo) };

            let ifindex = match pktinfo.ipi_ifindex {
                0 => None,
                index => Some(index as u32),
            };
            let dst = IpAddr::V4(Ipv4Addr::from(u32::from_be(pktinfo.ipi_addr.s_addr)));

            return (ifindex, Some(dst));
        }

        cmsg = unsafe { libc::CMSG_NXTHDR(msg, cmsg) };
    }

    (None, None)
}

fn sockaddr_to_socket_addr(addr: &libc::sockaddr_storage) -> Option<SocketAddr> {
    match libc::c_int::from(addr.ss_family) {
        libc::AF_INET => {
            let sin = unsafe { &*(addr as *const libc::sockaddr_storage as *const libc::sockaddr_in) };
            let ip = Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr));

            Some(SocketAddr::V4(SocketAddrV4::new(
                ip,
                u16::from_be(sin.sin_port),
            )))
        }
        libc::AF_INET6 => {
            let sin6 =
                unsafe { &*(addr as *const libc::sockaddr_storage as *const libc::sockaddr_in6) };
            let ip = Ipv6Addr::from(sin6.sin6_addr.s6_addr);

            Some(SocketAddr::V6(SocketAddrV6::new(
                ip,
                u16::from_be(sin6.sin6_port),
                sin6.sin6_flowinfo,
                sin6.sin6_scope_id,
            )))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multicast::MDNS_IPV4;

    #[tokio::test]
    async fn test_bind_and_local_send() {
        let socket = MdnsSocket::bind("127.0.0.1:0".parse().unwrap()).expect("bind failed");
        let addr = socket.local_addr().unwrap();
        assert_ne!(addr.port(), 0);

        let peer = MdnsSocket::bind("127.0.0.1:0".parse().unwrap()).expect("bind failed");
        peer.send_to(b"hello", addr).await.expect("send failed");

        let (bytes, info) = socket.recv().await.expect("recv failed");
        assert_eq!(bytes, b"hello");
        assert_eq!(info.from, peer.local_addr().unwrap());
        assert!(info.loopback);
    }

    #[test]
    fn test_group_address() {
        assert_eq!(MDNS_IPV4.to_string(), "224.0.0.251:5353");
    }
}
