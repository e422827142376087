//! Fuzz target for the session state machine
//!
//! Applies arbitrary interleavings of user sends, lifecycle calls and
//! transport signals to one session.
//!
//! # Invariants
//!
//! - Transcript sequence numbers are dense from zero
//! - Local entries equal the frames handed to the transport, in order
//! - A send is only accepted while connected
//! - Status reads Connected only while the connection is Connected, except
//!   after a teardown, which reports no status

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use roomchat_app::{Origin, Session};
use roomchat_core::{ConnectionAction, ConnectionState, LinkStatus, RoomId, TransportEvent};

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Send(String),
    Start,
    Close,
    Opened,
    Message(String),
    Closed,
    Errored,
}

fuzz_target!(|ops: Vec<Op>| {
    let Ok(room_id) = RoomId::new("fuzz") else { return };
    let mut session = Session::new(room_id);
    let mut transmitted: Vec<String> = Vec::new();
    let mut torn_down = false;

    for op in ops {
        match op {
            Op::Send(text) => {
                let was_connected = session.connection_state() == ConnectionState::Connected;
                if let Ok(actions) = session.append_local(&text) {
                    assert!(was_connected, "send accepted while {:?}", session.connection_state());
                    for action in actions {
                        if let ConnectionAction::Send(frame) = action {
                            transmitted.push(frame);
                        }
                    }
                }
            }
            Op::Start => {
                let _ = session.start();
            }
            Op::Close => torn_down |= !session.close().is_empty(),
            Op::Message(raw) => session.handle_transport(TransportEvent::Message(raw)),
            Op::Opened | Op::Closed | Op::Errored => {
                let signal = match op {
                    Op::Opened => TransportEvent::Opened,
                    Op::Closed => TransportEvent::Closed,
                    _ => TransportEvent::Errored { detail: "fuzz".into() },
                };
                let before = session.connection_state();
                session.handle_transport(signal);
                // Every transition reports a fresh status.
                if session.connection_state() != before {
                    torn_down = false;
                }
            }
        }

        if !torn_down && session.status() == LinkStatus::Connected {
            assert_eq!(session.connection_state(), ConnectionState::Connected);
        }
    }

    for (index, entry) in session.transcript().iter().enumerate() {
        assert_eq!(entry.sequence(), index as u64);
    }

    let local: Vec<&str> = session
        .transcript()
        .chat_entries()
        .filter(|entry| entry.origin == Origin::Local)
        .map(|entry| entry.text.as_str())
        .collect();
    let sent: Vec<&str> = transmitted.iter().map(String::as_str).collect();
    assert_eq!(local, sent);
});
