//! Fuzz target for hostile structured frames
//!
//! # Strategy
//!
//! - Deeply nested: objects/arrays nested past the parser's recursion limit
//! - System frames: `type: system` with arbitrary event names and client ids
//! - Type confusion: discriminators of the wrong JSON type
//! - Duplicate keys: repeated `type` or `event` fields
//!
//! # Invariants
//!
//! - NEVER panic on malformed JSON
//! - `join` and `leave` are recognized whatever else the object carries
//! - Nothing that parses as a JSON object is ever treated as chat

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use roomchat_proto::{decode, ControlEvent, Inbound};

#[derive(Debug, Clone, Arbitrary)]
enum JsonAttack {
    DeeplyNested { depth: u8, use_arrays: bool },
    SystemFrame { event: String, client_id: Option<String>, extra: Option<String> },
    TypeConfusion { discriminator: u64 },
    DuplicateKeys { first: String, second: String },
}

/// Minimal JSON string escaping, enough for arbitrary UTF-8.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fuzz_target!(|attack: JsonAttack| {
    match attack {
        JsonAttack::DeeplyNested { depth, use_arrays } => {
            let depth = usize::from(depth);
            let (open, close) = if use_arrays { ("[", "]") } else { ("{\"a\":", "}") };
            let raw = format!("{{\"type\":{}1{}}}", open.repeat(depth), close.repeat(depth));
            let _ = decode(&raw);
        }

        JsonAttack::SystemFrame { event, client_id, extra } => {
            let mut raw = format!("{{\"type\":\"system\",\"event\":{}", quote(&event));
            if let Some(id) = &client_id {
                raw.push_str(&format!(",\"client_id\":{}", quote(id)));
            }
            if let Some(extra) = &extra {
                raw.push_str(&format!(",\"extra\":{}", quote(extra)));
            }
            raw.push('}');

            let inbound = decode(&raw);
            assert!(!matches!(inbound, Inbound::Chat(_)), "object decoded as chat: {raw}");
            match event.as_str() {
                "join" => assert_eq!(inbound, Inbound::Control(ControlEvent::PeerJoined)),
                "leave" => assert_eq!(inbound, Inbound::Control(ControlEvent::PeerLeft)),
                _ => {}
            }
        }

        JsonAttack::TypeConfusion { discriminator } => {
            for raw in [
                format!("{{\"type\":{discriminator}}}"),
                format!("{{\"type\":\"system\",\"event\":{discriminator}}}"),
                r#"{"type":["system"],"event":"join"}"#.to_owned(),
            ] {
                assert!(!matches!(decode(&raw), Inbound::Chat(_)));
            }
        }

        JsonAttack::DuplicateKeys { first, second } => {
            let raw = format!(
                "{{\"type\":{},\"type\":{},\"event\":\"join\",\"event\":{}}}",
                quote(&first),
                quote(&second),
                quote(&first)
            );
            let _ = decode(&raw);
        }
    }
});
