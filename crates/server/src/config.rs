// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Configuration for the server

use std::net::SocketAddr;

use moodns_proto::rr::Name;
use moodns_proto::ProtoResult;

use crate::host;

/// Start-up configuration of the responder
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Addresses to listen on, one responder task is spawned per entry
    pub listen: Vec<SocketAddr>,
    /// Hostname override; the OS hostname is used when absent
    pub hostname: Option<String>,
    /// Forward loopback unicast-DNS queries for `*.local.` to the group
    pub forward: bool,
    /// Suppress per-packet error logs
    pub silent: bool,
}

impl ServerConfig {
    /// The name this responder answers for: `<hostname>.local.`
    pub fn local_name(&self) -> ProtoResult<Name> {
        let hostname = match &self.hostname {
            Some(hostname) => hostname.clone(),
            None => host::local_hostname()?,
        };

        Name::from_ascii(format!("{hostname}.local."))
    }
}
