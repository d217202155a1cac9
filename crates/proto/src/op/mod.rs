// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Operations to send with a `Client` or server, e.g. `Query`, `Message`

mod header;
mod message;
mod query;

pub use self::header::{Flags, Header, ResponseCode};
pub use self::message::Message;
pub use self::query::Query;
