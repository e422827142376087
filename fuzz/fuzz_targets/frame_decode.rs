//! Fuzz target for inbound frame classification
//!
//! Every text frame the server relays goes through `decode`. It must classify
//! anything as chat, control or ignored without panicking, and text that is
//! not a JSON object must come back as chat unchanged.

#![no_main]

use libfuzzer_sys::fuzz_target;
use roomchat_proto::{decode, Inbound};

fuzz_target!(|raw: &str| {
    let inbound = decode(raw);

    if !raw.trim_start().starts_with('{') {
        assert_eq!(inbound, Inbound::Chat(raw.to_owned()));
    }
});
