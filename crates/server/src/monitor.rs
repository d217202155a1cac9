// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Interface monitor: drives multicast group membership from netlink events

use std::collections::HashSet;
use std::io;
use std::mem;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::sync::Arc;

use tokio::io::unix::AsyncFd;
use tracing::{debug, error, warn};

use moodns_proto::multicast::MdnsSocket;

const NETLINK_BUFFER_LEN: usize = 4096;

/// `sizeof(struct nlmsghdr)`
const NLMSG_HDRLEN: usize = 16;

/// `sizeof(struct ifaddrmsg)`
const IFADDRMSG_LEN: usize = 8;

/// Watches the OS for interface address changes and maintains mDNS group
/// membership on the shared socket.
///
/// A netlink route socket subscribes to link and address notifications; an
/// address dump is requested up front so that already-configured interfaces
/// are joined at start-up. New addresses with a relevant scope join the
/// group on their interface, deleted addresses leave it. The joined set
/// makes duplicate joins idempotent.
///
/// Membership setsockopts are issued directly on the shared socket: the
/// kernel permits them concurrently with the responder's datagram I/O.
pub struct InterfaceMonitor {
    netlink: AsyncFd<OwnedFd>,
    socket: Arc<MdnsSocket>,
    joined: HashSet<u32>,
}

/// An address appeared on or disappeared from an interface
#[derive(Debug, PartialEq, Eq)]
struct AddrEvent {
    new: bool,
    index: u32,
    scope: u8,
}

impl InterfaceMonitor {
    /// Opens the netlink subscription and requests the initial address dump
    pub fn new(socket: Arc<MdnsSocket>) -> io::Result<Self> {
        let groups =
            libc::RTMGRP_LINK | libc::RTMGRP_IPV4_IFADDR | libc::RTMGRP_IPV6_IFADDR;

        let fd = unsafe {
            libc::socket(
                libc::AF_NETLINK,
                libc::SOCK_DGRAM | libc::SOCK_NONBLOCK | libc::SOCK_CLOEXEC,
                libc::NETLINK_ROUTE,
            )
        };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };

        let mut sa: libc::sockaddr_nl = unsafe { mem::zeroed() };
        sa.nl_family = libc::AF_NETLINK as libc::sa_family_t;
        sa.nl_groups = groups as u32;

        let rc = unsafe {
            libc::bind(
                fd.as_raw_fd(),
                &sa as *const libc::sockaddr_nl as *const libc::sockaddr,
                mem::size_of::<libc::sockaddr_nl>() as libc::socklen_t,
            )
        };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }

        let monitor = Self {
            netlink: AsyncFd::new(fd)?,
            socket,
            joined: HashSet::new(),
        };

        monitor.request_addr_dump()?;

        Ok(monitor)
    }

    /// Synthesizes new-address events for already-configured interfaces
    fn request_addr_dump(&self) -> io::Result<()> {
        // nlmsghdr followed by rtgenmsg, which is a single family byte
        let len = NLMSG_HDRLEN + 1;
        let mut req = [0_u8; NLMSG_HDRLEN + 4];

        req[0..4].copy_from_slice(&(len as u32).to_ne_bytes());
        req[4..6].copy_from_slice(&libc::RTM_GETADDR.to_ne_bytes());
        req[6..8]
            .copy_from_slice(&((libc::NLM_F_REQUEST | libc::NLM_F_DUMP) as u16).to_ne_bytes());
        req[8..12].copy_from_slice(&1_u32.to_ne_bytes());
        // nlmsg_pid and the rtgenmsg family (AF_UNSPEC) stay zero

        let rc = unsafe {
            libc::send(
                self.netlink.get_ref().as_raw_fd(),
                req.as_ptr() as *const libc::c_void,
                len,
                0,
            )
        };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(())
    }

    /// Runs the monitor until the event channel fails.
    ///
    /// A read or parse failure terminates the monitor with an error log; the
    /// responders keep serving, but new interfaces stop being joined.
    pub async fn run(mut self) {
        if let Err(err) = self.run_inner().await {
            error!("interface monitor terminated: {err}");
        }
    }

    async fn run_inner(&mut self) -> io::Result<()> {
        let mut buf = [0_u8; NETLINK_BUFFER_LEN];

        loop {
            let len = self.recv(&mut buf).await?;

            for event in parse_events(&buf[..len])? {
                self.apply(event);
            }
        }
    }

    async fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let mut guard = self.netlink.readable().await?;

            let result = guard.try_io(|netlink| {
                let n = unsafe {
                    libc::recv(
                        netlink.get_ref().as_raw_fd(),
                        buf.as_mut_ptr() as *mut libc::c_void,
                        buf.len(),
                        0,
                    )
                };
                if n < 0 {
                    return Err(io::Error::last_os_error());
                }
                Ok(n as usize)
            });

            match result {
                Ok(result) => return result,
                Err(_would_block) => continue,
            }
        }
    }

    fn apply(&mut self, event: AddrEvent) {
        if event.new {
            // link-local and host-scoped addresses never drive a join
            if event.scope != libc::RT_SCOPE_UNIVERSE && event.scope != libc::RT_SCOPE_SITE {
                return;
            }

            if !self.joined.insert(event.index) {
                return;
            }

            if let Err(err) = self.socket.join_multicast_v4(event.index) {
                // EADDRINUSE: the kernel already has this membership
                if err.raw_os_error() == Some(libc::EADDRINUSE) {
                    return;
                }

                warn!(
                    "could not join group on interface {index}: {err}",
                    index = event.index
                );
                self.joined.remove(&event.index);
            }
        } else {
            if !self.joined.remove(&event.index) {
                return;
            }

            if let Err(err) = self.socket.leave_multicast_v4(event.index) {
                debug!(
                    "could not leave group on interface {index}: {err}",
                    index = event.index
                );
            }
        }
    }
}

/// Extracts the address events from one netlink datagram.
///
/// Anything that is not an address message (dump terminators, link
/// notifications) is skipped; a malformed length is an error.
fn parse_events(buf: &[u8]) -> io::Result<Vec<AddrEvent>> {
    let mut events = Vec::new();
    let mut offset = 0;

    while buf.len() >= offset + NLMSG_HDRLEN {
        let nlmsg_len =
            u32::from_ne_bytes(buf[offset..offset + 4].try_into().unwrap()) as usize;
        let nlmsg_type = u16::from_ne_bytes(buf[offset + 4..offset + 6].try_into().unwrap());

        if nlmsg_len < NLMSG_HDRLEN || offset + nlmsg_len > buf.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "malformed netlink message length",
            ));
        }

        match nlmsg_type {
            libc::RTM_NEWADDR | libc::RTM_DELADDR
                if nlmsg_len >= NLMSG_HDRLEN + IFADDRMSG_LEN =>
            {
                // ifaddrmsg: family, prefixlen, flags, scope, index
                let ifaddr = &buf[offset + NLMSG_HDRLEN..];
                let scope = ifaddr[3];
                let index = u32::from_ne_bytes(ifaddr[4..8].try_into().unwrap());

                events.push(AddrEvent {
                    new: nlmsg_type == libc::RTM_NEWADDR,
                    index,
                    scope,
                });
            }
            _ => {}
        }

        offset += (nlmsg_len + 3) & !3;
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(nlmsg_type: u16, scope: u8, index: u32) -> Vec<u8> {
        let mut buf = vec![0_u8; NLMSG_HDRLEN + IFADDRMSG_LEN];
        buf[0..4].copy_from_slice(&((NLMSG_HDRLEN + IFADDRMSG_LEN) as u32).to_ne_bytes());
        buf[4..6].copy_from_slice(&nlmsg_type.to_ne_bytes());
        buf[NLMSG_HDRLEN + 3] = scope;
        buf[NLMSG_HDRLEN + 4..NLMSG_HDRLEN + 8].copy_from_slice(&index.to_ne_bytes());
        buf
    }

    #[test]
    fn test_parse_new_and_del() {
        let mut buf = message(libc::RTM_NEWADDR, libc::RT_SCOPE_UNIVERSE, 2);
        buf.extend(message(libc::RTM_DELADDR, libc::RT_SCOPE_UNIVERSE, 3));

        let events = parse_events(&buf).unwrap();
        assert_eq!(
            events,
            vec![
                AddrEvent {
                    new: true,
                    index: 2,
                    scope: libc::RT_SCOPE_UNIVERSE,
                },
                AddrEvent {
                    new: false,
                    index: 3,
                    scope: libc::RT_SCOPE_UNIVERSE,
                },
            ]
        );
    }

    #[test]
    fn test_parse_skips_other_messages() {
        // NLMSG_DONE terminates a dump; it carries no address
        let mut buf = vec![0_u8; NLMSG_HDRLEN + 4];
        buf[0..4].copy_from_slice(&((NLMSG_HDRLEN + 4) as u32).to_ne_bytes());
        buf[4..6].copy_from_slice(&(libc::NLMSG_DONE as u16).to_ne_bytes());

        assert_eq!(parse_events(&buf).unwrap(), vec![]);
    }

    #[test]
    fn test_parse_rejects_bad_length() {
        let mut buf = message(libc::RTM_NEWADDR, libc::RT_SCOPE_UNIVERSE, 2);
        buf[0..4].copy_from_slice(&4_u32.to_ne_bytes());

        assert!(parse_events(&buf).is_err());
    }
}
