// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Recursive forwarding of legacy unicast-DNS queries onto the group

use tracing::debug;

use moodns_proto::multicast::send_request;
use moodns_proto::op::{Message, Query, ResponseCode};

/// Re-issues the question as a fresh multicast query and splices the answers
/// into the reply under construction.
///
/// Only `*.local.` names are forwarded; anything else marks the reply
/// SERVFAIL. The forwarded query carries a random id, which is returned so
/// the caller can suppress the echo of its own query; transport errors and
/// timeouts are dropped silently and return id 0, leaving the reply as it
/// was.
pub async fn forward_query(query: &Query, reply: &mut Message) -> u16 {
    if !query.name().ends_with(b"local.") {
        reply.header_mut().set_response_code(ResponseCode::ServFail);
        return 0;
    }

    let id = rand::random::<u16>();

    let mut request = Message::new();
    request.set_id(id);
    request.add_query(query.clone());

    let response = match send_request(&request).await {
        Ok(response) => response,
        Err(err) => {
            debug!("no answer forwarding {name}: {err}", name = query.name());
            return 0;
        }
    };

    for answer in response.answers() {
        reply.add_answer(answer.clone());
    }

    id
}
