// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! moodns protocol engine: the DNS/mDNS wire codec, the typed record model,
//! the multicast socket layer and the one-shot query client.

#![warn(
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::unimplemented,
    missing_docs,
    unreachable_pub
)]

pub mod error;
pub mod multicast;
pub mod op;
pub mod rr;
pub mod serialize;

pub use crate::error::{ProtoError, ProtoErrorKind, ProtoResult};
