// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The `moodns-resolve` binary: one-shot mDNS queries

#![warn(
    clippy::dbg_macro,
    clippy::unimplemented,
    missing_docs,
    rust_2018_idioms,
    unreachable_pub
)]

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use moodns_proto::multicast::send_request;
use moodns_proto::op::{Message, Query};
use moodns_proto::rr::{DNSClass, Name, RecordType};

/// Cli struct for all options managed with clap derive api.
#[derive(Debug, Parser)]
#[clap(name = "moodns-resolve", version, about = "One-shot mDNS resolver")]
struct Cli {
    /// Request the IPv6 address too
    #[clap(short = '6', long = "ipv6")]
    ipv6: bool,

    /// The name to resolve
    #[clap(value_name = "NAME")]
    name: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let name = match Name::from_ascii(&cli.name) {
        Ok(name) => name,
        Err(err) => {
            error!("invalid name '{name}': {err}", name = cli.name);
            return ExitCode::FAILURE;
        }
    };

    let mut request = Message::new();
    request.add_query(Query::new(name.clone(), RecordType::A, DNSClass::IN));

    if cli.ipv6 {
        request.add_query(Query::new(name, RecordType::AAAA, DNSClass::IN));
    }

    let response = match send_request(&request).await {
        Ok(response) => response,
        Err(err) => {
            error!("error sending request: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("{response}");

    ExitCode::SUCCESS
}
