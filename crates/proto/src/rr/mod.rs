// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Resource record related components, e.g. `Name` aka label, `Record` and `RData`

pub mod dns_class;
mod name;
pub mod rdata;
mod record;
pub mod record_data;
pub mod record_type;

pub use self::dns_class::{DNSClass, MDNS_UNICAST_RESPONSE};
pub use self::name::Name;
pub use self::record::Record;
pub use self::record_data::RData;
pub use self::record_type::RecordType;
