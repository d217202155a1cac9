// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! moodns server components: the responder pipeline, the recursive
//! forwarder for legacy unicast-DNS clients and the interface monitor that
//! maintains multicast group membership.

#![warn(
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::unimplemented,
    missing_docs,
    unreachable_pub
)]

pub mod config;
pub mod forward;
pub mod host;
pub mod monitor;
pub mod responder;

pub use crate::config::ServerConfig;
pub use crate::monitor::InterfaceMonitor;
pub use crate::responder::Responder;
