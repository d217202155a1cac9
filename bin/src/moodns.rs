// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The `moodns` binary: a minimal multicast DNS server

#![warn(
    clippy::dbg_macro,
    clippy::unimplemented,
    missing_docs,
    rust_2018_idioms,
    unreachable_pub
)]

use std::net::{SocketAddr, ToSocketAddrs};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use moodns_proto::multicast::MdnsSocket;
use moodns_server::{InterfaceMonitor, Responder, ServerConfig};

/// Cli struct for all options managed with clap derive api.
#[derive(Debug, Parser)]
#[clap(name = "moodns", version, about = "Minimal multicast DNS server")]
struct Cli {
    /// Name of the local host, overrides the OS hostname
    #[clap(short = 'H', long = "host", value_name = "HOSTNAME")]
    host: Option<String>,

    /// Listen on these comma-separated addresses
    #[clap(
        short = 'l',
        long = "listen",
        value_name = "ADDR:PORT",
        default_value = "0.0.0.0:5353"
    )]
    listen: String,

    /// Forward loopback unicast-DNS queries for *.local. to multicast
    #[clap(short = 'r', long = "enable-multicast-forward")]
    enable_multicast_forward: bool,

    /// Suppress per-packet error logs
    #[clap(short = 's', long = "silent")]
    silent: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let listen = match resolve_listen_addrs(&cli.listen) {
        Ok(listen) => listen,
        Err(err) => {
            error!("invalid listen address '{listen}': {err}", listen = cli.listen);
            return ExitCode::FAILURE;
        }
    };

    let config = ServerConfig {
        listen,
        hostname: cli.host,
        forward: cli.enable_multicast_forward,
        silent: cli.silent,
    };

    let local_name = match config.local_name() {
        Ok(local_name) => local_name,
        Err(err) => {
            error!("error retrieving hostname: {err}");
            return ExitCode::FAILURE;
        }
    };

    info!("serving {local_name}");

    for addr in &config.listen {
        let socket = match MdnsSocket::bind(*addr) {
            Ok(socket) => Arc::new(socket),
            Err(err) => {
                error!("error starting server on {addr}: {err}");
                return ExitCode::FAILURE;
            }
        };

        let monitor = match InterfaceMonitor::new(socket.clone()) {
            Ok(monitor) => monitor,
            Err(err) => {
                error!("error subscribing to interface events: {err}");
                return ExitCode::FAILURE;
            }
        };
        tokio::spawn(monitor.run());

        let responder = Responder::new(
            socket,
            local_name.clone(),
            config.forward,
            config.silent,
        );
        tokio::spawn(responder.run());

        info!("listening on {addr}");
    }

    // the responder and monitor tasks run until the process is killed
    std::future::pending::<()>().await;

    unreachable!()
}

fn resolve_listen_addrs(listen: &str) -> std::io::Result<Vec<SocketAddr>> {
    let mut addrs = Vec::new();

    for part in listen.split(',') {
        let mut resolved = part.trim().to_socket_addrs()?;

        addrs.extend(resolved.next());
    }

    if addrs.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "no usable listen address",
        ));
    }

    Ok(addrs)
}
